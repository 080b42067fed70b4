use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::sword;
use crate::error::AppError;
use crate::repository::sword::{NewSword, SwordDetails, SwordField, SwordPatch};

use super::material::MaterialResponse;
use super::shared::{MAX_NAME_LENGTH, double_option, normalize_text};

/// Request body for creating a sword.
///
/// `name` and `category_id` are required; they are optional here so that a
/// missing value produces a validation message instead of a parse error.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct CreateSwordRequest {
    #[schema(example = "Bushido Katana")]
    pub name: Option<String>,
    #[schema(example = 1)]
    pub category_id: Option<i32>,
    pub origin_id: Option<i32>,
    /// Blade length in centimeters.
    #[schema(example = 73.5)]
    pub length: Option<f64>,
    /// Weight in kilograms.
    #[schema(example = 1.2)]
    pub weight: Option<f64>,
    #[schema(example = "2019-05-01")]
    pub date_manufactured: Option<NaiveDate>,
    /// Defaults to `false`.
    pub is_battle_ready: Option<bool>,
    /// Defaults to 0.
    pub in_stock: Option<i32>,
    #[schema(example = 899.99)]
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Materials the sword is made of.
    #[schema(example = json!([1, 4]))]
    pub material_ids: Option<Vec<i32>>,
}

/// Request body for updating a sword. Only provided fields are written.
///
/// Nullable columns accept an explicit `null` to clear them. `material_ids`
/// replaces the whole material set when present; `[]` clears it.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateSwordRequest {
    pub name: Option<String>,
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub origin_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub length: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_manufactured: Option<Option<NaiveDate>>,
    pub is_battle_ready: Option<bool>,
    pub in_stock: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub material_ids: Option<Vec<i32>>,
    /// Shared admin password.
    #[serde(rename = "adminPassword")]
    pub admin_password: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SwordListQuery {
    /// `true` to include category name, origin name and materials.
    pub details: Option<String>,
}

impl SwordListQuery {
    pub fn detailed(&self) -> bool {
        self.details.as_deref() == Some("true")
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SwordSearchQuery {
    /// Case-insensitive substring of the sword name.
    pub term: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SwordResponse {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub origin_id: Option<i32>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
    pub date_manufactured: Option<NaiveDate>,
    pub is_battle_ready: bool,
    pub in_stock: i32,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A sword with its display fields.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SwordDetailResponse {
    #[serde(flatten)]
    pub sword: SwordResponse,
    pub category_name: Option<String>,
    pub origin_name: Option<String>,
    /// Ordered by material name.
    pub materials: Vec<MaterialResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum SwordListResponse {
    Basic(Vec<SwordResponse>),
    Detailed(Vec<SwordDetailResponse>),
}

impl From<sword::Model> for SwordResponse {
    fn from(m: sword::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            category_id: m.category_id,
            origin_id: m.origin_id,
            length: m.length,
            weight: m.weight,
            date_manufactured: m.date_manufactured,
            is_battle_ready: m.is_battle_ready,
            in_stock: m.in_stock,
            price: m.price,
            description: m.description,
            image_url: m.image_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<SwordDetails> for SwordDetailResponse {
    fn from(d: SwordDetails) -> Self {
        Self {
            sword: d.sword.into(),
            category_name: d.category_name,
            origin_name: d.origin_name,
            materials: d.materials.into_iter().map(Into::into).collect(),
        }
    }
}

fn validate_sword_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_id(id: i32, field: &str) -> Result<i32, AppError> {
    if id <= 0 {
        return Err(AppError::Validation(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(id)
}

fn validate_measure(value: Option<f64>, field: &str) -> Result<Option<f64>, AppError> {
    if let Some(v) = value
        && !(v.is_finite() && v >= 0.0)
    {
        return Err(AppError::Validation(format!("{field} must be >= 0")));
    }
    Ok(value)
}

fn validate_in_stock(in_stock: i32) -> Result<i32, AppError> {
    if in_stock < 0 {
        return Err(AppError::Validation("in_stock must be >= 0".into()));
    }
    Ok(in_stock)
}

fn validate_material_ids(ids: &[i32]) -> Result<(), AppError> {
    for &id in ids {
        validate_id(id, "material_ids entries")?;
    }
    Ok(())
}

impl TryFrom<CreateSwordRequest> for NewSword {
    type Error = AppError;

    fn try_from(req: CreateSwordRequest) -> Result<Self, Self::Error> {
        let (Some(name), Some(category_id)) = (req.name.as_deref(), req.category_id) else {
            return Err(AppError::Validation(
                "Name and category are required".into(),
            ));
        };
        let name = validate_sword_name(name)?;
        let category_id = validate_id(category_id, "category_id")?;
        let origin_id = req
            .origin_id
            .map(|id| validate_id(id, "origin_id"))
            .transpose()?;
        let material_ids = req.material_ids.unwrap_or_default();
        validate_material_ids(&material_ids)?;

        Ok(NewSword {
            name,
            category_id,
            origin_id,
            length: validate_measure(req.length, "length")?,
            weight: validate_measure(req.weight, "weight")?,
            date_manufactured: req.date_manufactured,
            is_battle_ready: req.is_battle_ready.unwrap_or(false),
            in_stock: validate_in_stock(req.in_stock.unwrap_or(0))?,
            price: validate_measure(req.price, "price")?,
            description: normalize_text(req.description),
            image_url: normalize_text(req.image_url),
            material_ids,
        })
    }
}

impl TryFrom<UpdateSwordRequest> for SwordPatch {
    type Error = AppError;

    fn try_from(req: UpdateSwordRequest) -> Result<Self, Self::Error> {
        let mut fields = Vec::new();

        if let Some(name) = req.name {
            fields.push(SwordField::Name(validate_sword_name(&name)?));
        }
        if let Some(category_id) = req.category_id {
            fields.push(SwordField::CategoryId(validate_id(
                category_id,
                "category_id",
            )?));
        }
        if let Some(origin_id) = req.origin_id {
            let origin_id = origin_id
                .map(|id| validate_id(id, "origin_id"))
                .transpose()?;
            fields.push(SwordField::OriginId(origin_id));
        }
        if let Some(length) = req.length {
            fields.push(SwordField::Length(validate_measure(length, "length")?));
        }
        if let Some(weight) = req.weight {
            fields.push(SwordField::Weight(validate_measure(weight, "weight")?));
        }
        if let Some(date) = req.date_manufactured {
            fields.push(SwordField::DateManufactured(date));
        }
        if let Some(is_battle_ready) = req.is_battle_ready {
            fields.push(SwordField::IsBattleReady(is_battle_ready));
        }
        if let Some(in_stock) = req.in_stock {
            fields.push(SwordField::InStock(validate_in_stock(in_stock)?));
        }
        if let Some(price) = req.price {
            fields.push(SwordField::Price(validate_measure(price, "price")?));
        }
        if let Some(description) = req.description {
            fields.push(SwordField::Description(normalize_text(description)));
        }
        if let Some(image_url) = req.image_url {
            fields.push(SwordField::ImageUrl(normalize_text(image_url)));
        }

        if let Some(ref ids) = req.material_ids {
            validate_material_ids(ids)?;
        }

        Ok(SwordPatch {
            fields,
            material_ids: req.material_ids,
        })
    }
}

/// Validate a search term and return it trimmed.
pub fn validate_search_term(term: Option<&str>) -> Result<&str, AppError> {
    match term.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(AppError::Validation("Search term is required".into())),
    }
}
