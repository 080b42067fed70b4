use std::fmt::Display;

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Validation error for a request body that is not the expected JSON.
///
/// Every body extractor reports through here so clients see one message shape.
pub fn invalid_json(detail: impl Display) -> AppError {
    AppError::Validation(format!("Invalid JSON body: {detail}"))
}

/// Catalog request body. Rejections become `VALIDATION_ERROR` responses.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(e @ JsonRejection::MissingJsonContentType(_)) => {
                Err(AppError::Validation(e.body_text()))
            }
            Err(e) => Err(invalid_json(e.body_text())),
        }
    }
}
