use sea_orm::entity::prelude::*;

/// The shared admin secret. Only the first row is ever consulted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_credentials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Argon2 PHC string.
    pub password_hash: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
