use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use super::CatalogError;
use crate::entity::{origin, sword};

/// Writable fields of an origin. Update replaces all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginInput {
    pub name: String,
    pub region: Option<String>,
    pub historical_period: Option<String>,
    pub description: Option<String>,
}

pub struct OriginRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> OriginRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<origin::Model>, DbErr> {
        origin::Entity::find()
            .order_by_asc(origin::Column::Name)
            .all(self.conn)
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<origin::Model>, DbErr> {
        origin::Entity::find_by_id(id).one(self.conn).await
    }

    /// Number of swords attributed to this origin.
    pub async fn count_swords(&self, id: i32) -> Result<u64, DbErr> {
        sword::Entity::find()
            .filter(sword::Column::OriginId.eq(id))
            .count(self.conn)
            .await
    }

    pub async fn create(&self, input: OriginInput) -> Result<origin::Model, DbErr> {
        let now = Utc::now();
        origin::ActiveModel {
            name: Set(input.name),
            region: Set(input.region),
            historical_period: Set(input.historical_period),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn update(&self, id: i32, input: OriginInput) -> Result<origin::Model, CatalogError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound("Origin"))?;

        let mut active: origin::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.region = Set(input.region);
        active.historical_period = Set(input.historical_period);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now());

        Ok(active.update(self.conn).await?)
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> OriginRepository<'a, C> {
    /// Delete an origin. Swords from it keep existing with no origin.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let txn = self.conn.begin().await?;

        // Same effect as the ON DELETE SET NULL action on swords.origin_id,
        // applied here so backends without foreign key enforcement agree.
        let detached = sword::Entity::update_many()
            .col_expr(sword::Column::OriginId, Expr::value(Option::<i32>::None))
            .filter(sword::Column::OriginId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        let result = origin::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(CatalogError::NotFound("Origin"));
        }

        txn.commit().await?;
        tracing::debug!(detached, "Origin deleted");
        Ok(())
    }
}
