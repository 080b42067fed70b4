pub mod category;
pub mod material;
pub mod origin;
pub mod sword;

use sea_orm::ConnectionTrait;

use crate::error::AppError;
use crate::repository::AdminGate;

/// Check the admin secret carried in a request body.
///
/// Runs after body validation and before any store mutation.
pub async fn require_admin<C: ConnectionTrait>(
    conn: &C,
    password: Option<&str>,
) -> Result<(), AppError> {
    let password = match password {
        Some(p) if !p.is_empty() => p,
        _ => return Err(AppError::AdminPasswordRequired),
    };

    if AdminGate::new(conn).verify_password(password).await? {
        Ok(())
    } else {
        tracing::warn!("Rejected request with invalid admin password");
        Err(AppError::InvalidAdminPassword)
    }
}

/// Plain-text banner served at `/`.
pub async fn welcome() -> &'static str {
    "Welcome to the Armory sword catalog API. Documentation lives at /swagger-ui and /scalar."
}
