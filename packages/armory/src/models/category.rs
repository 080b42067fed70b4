use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::category;
use crate::error::AppError;
use crate::repository::category::CategoryInput;

use super::shared::{normalize_text, validate_name};

/// Request body for creating or replacing a category.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CategoryRequest {
    #[schema(example = "Katana")]
    pub name: Option<String>,
    #[schema(example = "Curved, single-edged Japanese sword")]
    pub description: Option<String>,
    /// Shared admin password.
    #[serde(rename = "adminPassword")]
    pub admin_password: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with the number of swords filed under it.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryDetailResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    #[serde(rename = "swordCount")]
    pub sword_count: u64,
}

impl From<category::Model> for CategoryResponse {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl TryFrom<CategoryRequest> for CategoryInput {
    type Error = AppError;

    fn try_from(req: CategoryRequest) -> Result<Self, Self::Error> {
        Ok(CategoryInput {
            name: validate_name(req.name.as_deref())?,
            description: normalize_text(req.description),
        })
    }
}
