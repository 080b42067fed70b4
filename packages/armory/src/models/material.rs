use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::material;
use crate::error::AppError;
use crate::repository::material::MaterialInput;

use super::shared::{normalize_text, validate_name};

/// Request body for creating or replacing a material.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct MaterialRequest {
    #[schema(example = "Damascus Steel")]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Shared admin password.
    #[serde(rename = "adminPassword")]
    pub admin_password: Option<String>,
}

#[derive(Clone, Serialize, utoipa::ToSchema)]
pub struct MaterialResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A material with the number of swords made of it.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MaterialDetailResponse {
    #[serde(flatten)]
    pub material: MaterialResponse,
    #[serde(rename = "swordCount")]
    pub sword_count: u64,
}

impl From<material::Model> for MaterialResponse {
    fn from(m: material::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl TryFrom<MaterialRequest> for MaterialInput {
    type Error = AppError;

    fn try_from(req: MaterialRequest) -> Result<Self, Self::Error> {
        Ok(MaterialInput {
            name: validate_name(req.name.as_deref())?,
            description: normalize_text(req.description),
        })
    }
}
