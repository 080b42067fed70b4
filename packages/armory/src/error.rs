use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::repository::CatalogError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `ADMIN_PASSWORD_REQUIRED`, `INVALID_ADMIN_PASSWORD`, `CONFLICT`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Name and category are required")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    AdminPasswordRequired,
    InvalidAdminPassword,
    NotFound(String),
    /// Delete refused because dependent rows exist.
    Conflict(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::AdminPasswordRequired => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "ADMIN_PASSWORD_REQUIRED",
                    message: "Admin password required".into(),
                },
            ),
            AppError::InvalidAdminPassword => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "INVALID_ADMIN_PASSWORD",
                    message: "Invalid admin password".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            // Clients of this API treat dependency conflicts as bad requests.
            AppError::Conflict(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(entity) => AppError::NotFound(format!("{entity} not found")),
            CatalogError::Conflict(reason) => {
                tracing::debug!("Delete refused: {reason}");
                AppError::Conflict(reason)
            }
            CatalogError::Database(e) => AppError::from(e),
        }
    }
}
