use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use armory::config::AppConfig;
use armory::database::init_db;
use armory::state::AppState;
use armory::{build_router, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database schema synced");

    seed::provision_admin(&db, &config.admin.password)
        .await
        .context("Failed to provision admin credential")?;
    seed::ensure_indexes(&db).await;
    if config.database.seed_sample_data {
        seed::seed_sample_catalog(&db)
            .await
            .context("Failed to seed sample catalog")?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState { db, config });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
