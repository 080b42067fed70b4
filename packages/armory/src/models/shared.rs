use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Longest accepted entity name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Admin secret carried in the body of gated requests.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct AdminCredentials {
    /// Shared admin password.
    #[serde(rename = "adminPassword")]
    #[schema(example = "admin123")]
    pub admin_password: Option<String>,
}

/// Confirmation returned by delete endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Sword deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn deleted(entity: &str) -> Self {
        Self {
            message: format!("{entity} deleted successfully"),
        }
    }
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a required name and return it trimmed.
pub fn validate_name(name: Option<&str>) -> Result<String, AppError> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

/// Trim an optional free-text field, mapping blank to `None`.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
