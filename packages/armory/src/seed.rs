use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::{category, sword, sword_material};
use crate::repository::category::CategoryInput;
use crate::repository::material::MaterialInput;
use crate::repository::origin::OriginInput;
use crate::repository::sword::NewSword;
use crate::repository::{
    AdminGate, CatalogError, CategoryRepository, MaterialRepository, OriginRepository,
    SwordRepository,
};

/// Store the configured admin secret if none has been provisioned yet.
pub async fn provision_admin(db: &DatabaseConnection, password: &str) -> Result<(), DbErr> {
    if AdminGate::new(db).provision(password).await? {
        info!("Provisioned admin credential");
    }
    Ok(())
}

fn index_statements() -> Vec<(&'static str, IndexCreateStatement)> {
    vec![
        (
            "idx_swords_category_id",
            Index::create()
                .if_not_exists()
                .name("idx_swords_category_id")
                .table(sword::Entity)
                .col(sword::Column::CategoryId)
                .to_owned(),
        ),
        (
            "idx_swords_origin_id",
            Index::create()
                .if_not_exists()
                .name("idx_swords_origin_id")
                .table(sword::Entity)
                .col(sword::Column::OriginId)
                .to_owned(),
        ),
        // Lookups by sword use the primary key prefix; lookups by material need their own.
        (
            "idx_sword_materials_material_id",
            Index::create()
                .if_not_exists()
                .name("idx_sword_materials_material_id")
                .table(sword_material::Entity)
                .col(sword_material::Column::MaterialId)
                .to_owned(),
        ),
    ]
}

/// Ensure the secondary indexes used by the filter endpoints exist.
///
/// Schema sync only creates tables and columns, so these are created here.
/// Failures are logged and startup continues.
pub async fn ensure_indexes(db: &DatabaseConnection) {
    for (name, stmt) in index_statements() {
        let sql = match db.get_database_backend() {
            DbBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
            DbBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
            other => {
                warn!("Skipping index {} on unsupported backend {:?}", name, other);
                continue;
            }
        };

        match db.execute_unprepared(&sql).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => warn!("Failed to create index {}: {}", name, e),
        }
    }
}

const SAMPLE_CATEGORIES: &[(&str, &str)] = &[
    (
        "Katana",
        "Traditional Japanese sword characterized by a curved, single-edged blade",
    ),
    (
        "Longsword",
        "European sword with a cruciform hilt and straight double-edged blade",
    ),
    (
        "Rapier",
        "Long, slender, sharply pointed sword designed for thrusting attacks",
    ),
    ("Claymore", "Scottish large two-handed sword"),
    (
        "Scimitar",
        "Curved blade with the cutting edge on the convex side, originating from the Middle East",
    ),
];

const SAMPLE_MATERIALS: &[(&str, &str)] = &[
    ("Steel", "Common iron alloy used in most modern sword replicas"),
    ("Damascus Steel", "Historic steel known for distinctive patterns"),
    (
        "Carbon Steel",
        "Steel with higher carbon content for better edge retention",
    ),
    (
        "Folded Steel",
        "Steel that has been folded multiple times during forging",
    ),
    ("Bronze", "Historic copper alloy used before the Iron Age"),
    ("Tamahagane", "Traditional Japanese steel used in katana making"),
];

/// (name, region, historical period)
const SAMPLE_ORIGINS: &[(&str, &str, &str)] = &[
    ("Japanese", "Japan", "Feudal Period"),
    ("European", "Western Europe", "Medieval Period"),
    ("Arabic", "Middle East", "Medieval Islamic Period"),
    ("Chinese", "China", "Ming Dynasty"),
    ("Celtic", "Northern Europe", "Iron Age"),
];

struct SampleSword {
    name: &'static str,
    category: &'static str,
    origin: &'static str,
    length: f64,
    weight: f64,
    is_battle_ready: bool,
    in_stock: i32,
    price: f64,
    description: &'static str,
    materials: &'static [&'static str],
}

const SAMPLE_SWORDS: &[SampleSword] = &[
    SampleSword {
        name: "Bushido Katana",
        category: "Katana",
        origin: "Japanese",
        length: 73.5,
        weight: 1.2,
        is_battle_ready: true,
        in_stock: 5,
        price: 899.99,
        description: "Hand-forged traditional katana with real hamon",
        materials: &["Tamahagane", "Folded Steel"],
    },
    SampleSword {
        name: "Knight's Longsword",
        category: "Longsword",
        origin: "European",
        length: 110.0,
        weight: 1.8,
        is_battle_ready: true,
        in_stock: 3,
        price: 799.99,
        description: "Historically accurate replica of a 14th century longsword",
        materials: &["Carbon Steel"],
    },
    SampleSword {
        name: "Duelist Rapier",
        category: "Rapier",
        origin: "European",
        length: 104.0,
        weight: 1.0,
        is_battle_ready: false,
        in_stock: 8,
        price: 499.99,
        description: "Elegant rapier with ornate handguard, suitable for display",
        materials: &["Steel"],
    },
];

fn id_of(ids: &[(&'static str, i32)], name: &str) -> Result<i32, CatalogError> {
    ids.iter()
        .find(|(n, _)| *n == name)
        .map(|(_, id)| *id)
        .ok_or(CatalogError::NotFound("Sample reference"))
}

/// Insert the sample catalog when the store holds no categories yet.
///
/// Everything is written in one transaction.
pub async fn seed_sample_catalog(db: &DatabaseConnection) -> Result<(), CatalogError> {
    if category::Entity::find().count(db).await? > 0 {
        info!("Catalog already populated, skipping sample data");
        return Ok(());
    }

    let txn = db.begin().await?;

    let mut categories = Vec::with_capacity(SAMPLE_CATEGORIES.len());
    for &(name, description) in SAMPLE_CATEGORIES {
        let model = CategoryRepository::new(&txn)
            .create(CategoryInput {
                name: name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;
        categories.push((name, model.id));
    }

    let mut materials = Vec::with_capacity(SAMPLE_MATERIALS.len());
    for &(name, description) in SAMPLE_MATERIALS {
        let model = MaterialRepository::new(&txn)
            .create(MaterialInput {
                name: name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;
        materials.push((name, model.id));
    }

    let mut origins = Vec::with_capacity(SAMPLE_ORIGINS.len());
    for &(name, region, period) in SAMPLE_ORIGINS {
        let model = OriginRepository::new(&txn)
            .create(OriginInput {
                name: name.to_string(),
                region: Some(region.to_string()),
                historical_period: Some(period.to_string()),
                description: None,
            })
            .await?;
        origins.push((name, model.id));
    }

    for s in SAMPLE_SWORDS {
        let material_ids = s
            .materials
            .iter()
            .map(|m| id_of(&materials, m))
            .collect::<Result<Vec<_>, _>>()?;

        SwordRepository::new(&txn)
            .create(NewSword {
                name: s.name.to_string(),
                category_id: id_of(&categories, s.category)?,
                origin_id: Some(id_of(&origins, s.origin)?),
                length: Some(s.length),
                weight: Some(s.weight),
                date_manufactured: None,
                is_battle_ready: s.is_battle_ready,
                in_stock: s.in_stock,
                price: Some(s.price),
                description: Some(s.description.to_string()),
                image_url: None,
                material_ids,
            })
            .await?;
    }

    txn.commit().await?;
    info!(
        "Seeded sample catalog: {} categories, {} materials, {} origins, {} swords",
        SAMPLE_CATEGORIES.len(),
        SAMPLE_MATERIALS.len(),
        SAMPLE_ORIGINS.len(),
        SAMPLE_SWORDS.len()
    );

    Ok(())
}
