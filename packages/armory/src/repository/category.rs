use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use super::CatalogError;
use crate::entity::{category, sword};

/// Writable fields of a category. Update replaces both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

pub struct CategoryRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CategoryRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<category::Model>, DbErr> {
        category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(self.conn)
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<category::Model>, DbErr> {
        category::Entity::find_by_id(id).one(self.conn).await
    }

    /// Number of swords filed under this category.
    pub async fn count_swords(&self, id: i32) -> Result<u64, DbErr> {
        sword::Entity::find()
            .filter(sword::Column::CategoryId.eq(id))
            .count(self.conn)
            .await
    }

    pub async fn create(&self, input: CategoryInput) -> Result<category::Model, DbErr> {
        let now = Utc::now();
        category::ActiveModel {
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
        input: CategoryInput,
    ) -> Result<category::Model, CatalogError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound("Category"))?;

        let mut active: category::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now());

        Ok(active.update(self.conn).await?)
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> CategoryRepository<'a, C> {
    /// Delete a category that no sword references.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let txn = self.conn.begin().await?;
        let repo = CategoryRepository::new(&txn);

        if repo.count_swords(id).await? > 0 {
            return Err(CatalogError::Conflict(
                "Cannot delete category with existing swords".into(),
            ));
        }

        let result = category::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(CatalogError::NotFound("Category"));
        }

        txn.commit().await?;
        Ok(())
    }
}
