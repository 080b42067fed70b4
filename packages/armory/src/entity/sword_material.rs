use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sword_materials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sword_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub material_id: i32,
    #[sea_orm(belongs_to, from = "sword_id", to = "id", on_delete = "Cascade")]
    pub sword: HasOne<super::sword::Entity>,
    #[sea_orm(belongs_to, from = "material_id", to = "id")]
    pub material: HasOne<super::material::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
