use axum::body::Bytes;
use axum::extract::{FromRequest, Request};

use super::json::invalid_json;
use crate::error::AppError;
use crate::models::shared::AdminCredentials;

/// Admin credentials read from a request body that may be empty.
///
/// Delete requests often arrive without a body; that is treated the same as
/// a body without `adminPassword` so the gate can answer with 403.
pub struct AdminBody(pub AdminCredentials);

impl<S> FromRequest<S> for AdminBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(AdminBody(AdminCredentials::default()));
        }

        let credentials = serde_json::from_slice(&bytes).map_err(invalid_json)?;
        Ok(AdminBody(credentials))
    }
}
