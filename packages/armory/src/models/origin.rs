use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::origin;
use crate::error::AppError;
use crate::repository::origin::OriginInput;

use super::shared::{normalize_text, validate_name};

/// Request body for creating or replacing an origin.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct OriginRequest {
    #[schema(example = "Japanese")]
    pub name: Option<String>,
    #[schema(example = "Japan")]
    pub region: Option<String>,
    #[schema(example = "Feudal Period")]
    pub historical_period: Option<String>,
    pub description: Option<String>,
    /// Shared admin password.
    #[serde(rename = "adminPassword")]
    pub admin_password: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OriginResponse {
    pub id: i32,
    pub name: String,
    pub region: Option<String>,
    pub historical_period: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An origin with the number of swords attributed to it.
#[derive(Serialize, utoipa::ToSchema)]
pub struct OriginDetailResponse {
    #[serde(flatten)]
    pub origin: OriginResponse,
    #[serde(rename = "swordCount")]
    pub sword_count: u64,
}

impl From<origin::Model> for OriginResponse {
    fn from(m: origin::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            region: m.region,
            historical_period: m.historical_period,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl TryFrom<OriginRequest> for OriginInput {
    type Error = AppError;

    fn try_from(req: OriginRequest) -> Result<Self, Self::Error> {
        Ok(OriginInput {
            name: validate_name(req.name.as_deref())?,
            region: normalize_text(req.region),
            historical_period: normalize_text(req.historical_period),
            description: normalize_text(req.description),
        })
    }
}
