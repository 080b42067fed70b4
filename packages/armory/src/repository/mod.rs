//! Store access for the catalog.
//!
//! Each repository borrows a connection (`DatabaseConnection` or an open
//! `DatabaseTransaction`) and returns [`CatalogError`] so the API layer can
//! tell missing rows and blocked deletes apart from store failures.

pub mod admin;
pub mod category;
pub mod material;
pub mod origin;
pub mod sword;

use sea_orm::DbErr;
use thiserror::Error;

pub use admin::AdminGate;
pub use category::CategoryRepository;
pub use material::MaterialRepository;
pub use origin::OriginRepository;
pub use sword::SwordRepository;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// No row with the requested id. Carries the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Delete blocked by dependent rows.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Drop duplicate ids, keeping first-seen order.
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
