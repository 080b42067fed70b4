use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use super::CatalogError;
use crate::entity::{material, sword_material};

/// Writable fields of a material. Update replaces both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialInput {
    pub name: String,
    pub description: Option<String>,
}

pub struct MaterialRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> MaterialRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<material::Model>, DbErr> {
        material::Entity::find()
            .order_by_asc(material::Column::Name)
            .all(self.conn)
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<material::Model>, DbErr> {
        material::Entity::find_by_id(id).one(self.conn).await
    }

    /// Number of swords made with this material.
    pub async fn count_swords(&self, id: i32) -> Result<u64, DbErr> {
        sword_material::Entity::find()
            .filter(sword_material::Column::MaterialId.eq(id))
            .count(self.conn)
            .await
    }

    pub async fn create(&self, input: MaterialInput) -> Result<material::Model, DbErr> {
        let now = Utc::now();
        material::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn update(
        &self,
        id: i32,
        input: MaterialInput,
    ) -> Result<material::Model, CatalogError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound("Material"))?;

        let mut active: material::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now());

        Ok(active.update(self.conn).await?)
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> MaterialRepository<'a, C> {
    /// Delete a material that no sword is made of.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let txn = self.conn.begin().await?;
        let repo = MaterialRepository::new(&txn);

        if repo.count_swords(id).await? > 0 {
            return Err(CatalogError::Conflict(
                "Cannot delete material that is used in existing swords".into(),
            ));
        }

        let result = material::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(CatalogError::NotFound("Material"));
        }

        txn.commit().await?;
        Ok(())
    }
}
