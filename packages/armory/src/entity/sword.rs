use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "swords")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Deleting a category with swords is refused by the category handler,
    /// so the store keeps the default (no action) here.
    pub category_id: i32,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::category::Entity>,

    pub origin_id: Option<i32>,
    #[sea_orm(belongs_to, from = "origin_id", to = "id", on_delete = "SetNull")]
    pub origin: HasOne<super::origin::Entity>,

    pub length: Option<f64>, // in centimeters
    pub weight: Option<f64>, // in kilograms
    pub date_manufactured: Option<Date>,
    #[sea_orm(default_value = false)]
    pub is_battle_ready: bool,
    #[sea_orm(default_value = 0)]
    pub in_stock: i32,
    pub price: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub image_url: Option<String>,

    #[sea_orm(has_many, via = "sword_material")]
    pub materials: HasMany<super::material::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
