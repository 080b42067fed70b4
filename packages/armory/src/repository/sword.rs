use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, Query as SeaQuery};
use sea_orm::*;
use tracing::instrument;

use super::{CatalogError, dedup_ids};
use crate::entity::{category, material, origin, sword, sword_material};

/// Most ids bound in one `IN (...)` list while enriching. SQLite caps bound
/// parameters per statement.
pub const ENRICH_CHUNK: usize = 500;

/// Input for [`SwordRepository::create`]. Defaults are already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSword {
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
    pub material_ids: Vec<i32>,
}

/// A single column assignment in a sword update.
#[derive(Debug, Clone, PartialEq)]
pub enum SwordField {
    Name(String),
    CategoryId(i32),
    OriginId(Option<i32>),
    Length(Option<f64>),
    Weight(Option<f64>),
    DateManufactured(Option<NaiveDate>),
    IsBattleReady(bool),
    InStock(i32),
    Price(Option<f64>),
    Description(Option<String>),
    ImageUrl(Option<String>),
}

impl SwordField {
    pub fn column(&self) -> sword::Column {
        match self {
            SwordField::Name(_) => sword::Column::Name,
            SwordField::CategoryId(_) => sword::Column::CategoryId,
            SwordField::OriginId(_) => sword::Column::OriginId,
            SwordField::Length(_) => sword::Column::Length,
            SwordField::Weight(_) => sword::Column::Weight,
            SwordField::DateManufactured(_) => sword::Column::DateManufactured,
            SwordField::IsBattleReady(_) => sword::Column::IsBattleReady,
            SwordField::InStock(_) => sword::Column::InStock,
            SwordField::Price(_) => sword::Column::Price,
            SwordField::Description(_) => sword::Column::Description,
            SwordField::ImageUrl(_) => sword::Column::ImageUrl,
        }
    }

    fn apply(self, active: &mut sword::ActiveModel) {
        match self {
            SwordField::Name(v) => active.name = Set(v),
            SwordField::CategoryId(v) => active.category_id = Set(v),
            SwordField::OriginId(v) => active.origin_id = Set(v),
            SwordField::Length(v) => active.length = Set(v),
            SwordField::Weight(v) => active.weight = Set(v),
            SwordField::DateManufactured(v) => active.date_manufactured = Set(v),
            SwordField::IsBattleReady(v) => active.is_battle_ready = Set(v),
            SwordField::InStock(v) => active.in_stock = Set(v),
            SwordField::Price(v) => active.price = Set(v),
            SwordField::Description(v) => active.description = Set(v),
            SwordField::ImageUrl(v) => active.image_url = Set(v),
        }
    }
}

/// Sparse update of a sword.
///
/// Only the listed fields are written. `material_ids` replaces the whole
/// association set when present (an empty list clears it) and leaves it
/// alone when `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwordPatch {
    pub fields: Vec<SwordField>,
    pub material_ids: Option<Vec<i32>>,
}

impl SwordPatch {
    /// Columns this patch writes, in application order.
    pub fn columns(&self) -> Vec<sword::Column> {
        self.fields.iter().map(SwordField::column).collect()
    }
}

/// A sword with its display fields resolved.
#[derive(Debug, Clone)]
pub struct SwordDetails {
    pub sword: sword::Model,
    pub category_name: Option<String>,
    pub origin_name: Option<String>,
    /// Ordered by material name.
    pub materials: Vec<material::Model>,
}

pub struct SwordRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SwordRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// All swords ordered by name.
    pub async fn list(&self) -> Result<Vec<sword::Model>, DbErr> {
        sword::Entity::find()
            .order_by_asc(sword::Column::Name)
            .order_by_asc(sword::Column::Id)
            .all(self.conn)
            .await
    }

    /// All swords ordered by name, each with category name, origin name and
    /// materials. Fails as a whole if any lookup fails.
    pub async fn list_detailed(&self) -> Result<Vec<SwordDetails>, DbErr> {
        let swords = self.list().await?;
        self.enrich(swords).await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<sword::Model>, DbErr> {
        sword::Entity::find_by_id(id).one(self.conn).await
    }

    /// The sword aggregate for `id`.
    pub async fn get_details(&self, id: i32) -> Result<SwordDetails, CatalogError> {
        let sword = self
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound("Sword"))?;

        let mut details = self.enrich(vec![sword]).await?;
        details.pop().ok_or(CatalogError::NotFound("Sword"))
    }

    /// Case-insensitive substring match on the name. The caller rejects
    /// blank terms.
    pub async fn search(&self, term: &str) -> Result<Vec<sword::Model>, DbErr> {
        let pattern = search_pattern(term, self.conn.get_database_backend());
        sword::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(sword::Column::Name)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            )
            .order_by_asc(sword::Column::Name)
            .order_by_asc(sword::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn find_by_category(&self, category_id: i32) -> Result<Vec<sword::Model>, DbErr> {
        sword::Entity::find()
            .filter(sword::Column::CategoryId.eq(category_id))
            .order_by_asc(sword::Column::Name)
            .order_by_asc(sword::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn find_by_material(&self, material_id: i32) -> Result<Vec<sword::Model>, DbErr> {
        sword::Entity::find()
            .filter(
                sword::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(sword_material::Column::SwordId)
                        .from(sword_material::Entity)
                        .and_where(sword_material::Column::MaterialId.eq(material_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(sword::Column::Name)
            .order_by_asc(sword::Column::Id)
            .all(self.conn)
            .await
    }

    /// Resolve names and materials for a batch of swords, preserving order.
    ///
    /// Ids are bound in chunks of [`ENRICH_CHUNK`], so the query count grows
    /// with the batch only once it exceeds one chunk.
    async fn enrich(&self, swords: Vec<sword::Model>) -> Result<Vec<SwordDetails>, DbErr> {
        if swords.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = swords.iter().map(|s| s.id).collect();

        let mut names: HashMap<i32, (Option<String>, Option<String>)> =
            HashMap::with_capacity(ids.len());
        let mut links = Vec::new();
        for chunk in ids.chunks(ENRICH_CHUNK) {
            let rows = sword::Entity::find()
                .select_only()
                .column(sword::Column::Id)
                .column_as(category::Column::Name, "category_name")
                .column_as(origin::Column::Name, "origin_name")
                .join(
                    JoinType::LeftJoin,
                    sword::Entity::belongs_to(category::Entity)
                        .from(sword::Column::CategoryId)
                        .to(category::Column::Id)
                        .into(),
                )
                .join(
                    JoinType::LeftJoin,
                    sword::Entity::belongs_to(origin::Entity)
                        .from(sword::Column::OriginId)
                        .to(origin::Column::Id)
                        .into(),
                )
                .filter(sword::Column::Id.is_in(chunk.iter().copied()))
                .into_tuple::<(i32, Option<String>, Option<String>)>()
                .all(self.conn)
                .await?;
            names.extend(
                rows.into_iter()
                    .map(|(id, category_name, origin_name)| (id, (category_name, origin_name))),
            );

            links.extend(
                sword_material::Entity::find()
                    .filter(sword_material::Column::SwordId.is_in(chunk.iter().copied()))
                    .all(self.conn)
                    .await?,
            );
        }

        let mut swords_by_material: HashMap<i32, Vec<i32>> = HashMap::new();
        for link in &links {
            swords_by_material
                .entry(link.material_id)
                .or_default()
                .push(link.sword_id);
        }

        let material_ids: Vec<i32> = swords_by_material.keys().copied().collect();
        let mut materials = Vec::with_capacity(material_ids.len());
        for chunk in material_ids.chunks(ENRICH_CHUNK) {
            materials.extend(
                material::Entity::find()
                    .filter(material::Column::Id.is_in(chunk.iter().copied()))
                    .all(self.conn)
                    .await?,
            );
        }
        materials.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let mut materials_by_sword: HashMap<i32, Vec<material::Model>> = HashMap::new();
        for m in materials {
            if let Some(sword_ids) = swords_by_material.get(&m.id) {
                for sword_id in sword_ids {
                    materials_by_sword
                        .entry(*sword_id)
                        .or_default()
                        .push(m.clone());
                }
            }
        }

        Ok(swords
            .into_iter()
            .map(|sword| {
                let (category_name, origin_name) = names.get(&sword.id).cloned().unwrap_or_default();
                let materials = materials_by_sword.remove(&sword.id).unwrap_or_default();
                SwordDetails {
                    sword,
                    category_name,
                    origin_name,
                    materials,
                }
            })
            .collect())
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> SwordRepository<'a, C> {
    /// Insert a sword and its material associations atomically.
    ///
    /// Any failure, including an unknown material id, leaves no sword row.
    #[instrument(skip(self, new), fields(name = %new.name, category_id = new.category_id))]
    pub async fn create(&self, new: NewSword) -> Result<sword::Model, CatalogError> {
        let txn = self.conn.begin().await?;

        let now = Utc::now();
        let model = sword::ActiveModel {
            name: Set(new.name),
            category_id: Set(new.category_id),
            origin_id: Set(new.origin_id),
            length: Set(new.length),
            weight: Set(new.weight),
            date_manufactured: Set(new.date_manufactured),
            is_battle_ready: Set(new.is_battle_ready),
            in_stock: Set(new.in_stock),
            price: Set(new.price),
            description: Set(new.description),
            image_url: Set(new.image_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_materials(&txn, model.id, &new.material_ids).await?;

        txn.commit().await?;
        tracing::info!(id = model.id, "Sword created");
        Ok(model)
    }

    /// Apply a sparse patch and, if requested, replace the material set.
    ///
    /// Both steps commit together. `updated_at` is refreshed even when the
    /// patch carries no fields.
    #[instrument(skip(self, patch), fields(columns = ?patch.columns(), replace_materials = patch.material_ids.is_some()))]
    pub async fn update(&self, id: i32, patch: SwordPatch) -> Result<sword::Model, CatalogError> {
        let txn = self.conn.begin().await?;

        let existing = sword::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CatalogError::NotFound("Sword"))?;

        let mut active: sword::ActiveModel = existing.into();
        for field in patch.fields {
            field.apply(&mut active);
        }
        active.updated_at = Set(Utc::now());
        let model = active.update(&txn).await?;

        if let Some(material_ids) = patch.material_ids {
            sword_material::Entity::delete_many()
                .filter(sword_material::Column::SwordId.eq(id))
                .exec(&txn)
                .await?;
            insert_materials(&txn, id, &material_ids).await?;
        }

        txn.commit().await?;
        Ok(model)
    }

    /// Remove a sword and its association rows.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let txn = self.conn.begin().await?;

        sword_material::Entity::delete_many()
            .filter(sword_material::Column::SwordId.eq(id))
            .exec(&txn)
            .await?;
        let result = sword::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(CatalogError::NotFound("Sword"));
        }

        txn.commit().await?;
        Ok(())
    }
}

/// Insert one join row per distinct id.
async fn insert_materials<C: ConnectionTrait>(
    conn: &C,
    sword_id: i32,
    material_ids: &[i32],
) -> Result<(), DbErr> {
    let material_ids = dedup_ids(material_ids);
    if material_ids.is_empty() {
        return Ok(());
    }

    let rows = material_ids
        .into_iter()
        .map(|material_id| sword_material::ActiveModel {
            sword_id: Set(sword_id),
            material_id: Set(material_id),
        });
    sword_material::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// LIKE pattern for a case-insensitive substring search.
///
/// SQLite's `LOWER()` only folds ASCII, so the term is folded the same way
/// there; otherwise a term typed with the stored casing of a non-ASCII name
/// would miss it.
pub fn search_pattern(term: &str, backend: DbBackend) -> String {
    let escaped = escape_like(term);
    let folded = match backend {
        DbBackend::Sqlite => escaped.to_ascii_lowercase(),
        _ => escaped.to_lowercase(),
    };
    format!("%{folded}%")
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
