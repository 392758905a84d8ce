//! Database command handlers. Both need `DATABASE_URL`.

use std::path::Path;

use anyhow::Context;
use serde_json::json;

async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let config = nearby_core::load_app_config()?;
    let pool_config = nearby_db::PoolConfig::from_app_config(&config);
    let pool = nearby_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

pub(crate) async fn run_migrate() -> anyhow::Result<()> {
    let pool = connect().await?;
    let applied = nearby_db::run_migrations(&pool).await?;
    crate::print_json(&json!({ "migrationsApplied": applied }))
}

/// Imports a snapshot. With `dry_run` the file is only validated.
///
/// # Errors
///
/// Returns an error if the snapshot is unreadable or invalid, or the upsert
/// fails.
pub(crate) async fn run_import(file: &Path, dry_run: bool) -> anyhow::Result<()> {
    let snapshot = nearby_core::load_business_snapshot(file)
        .with_context(|| format!("loading {}", file.display()))?;

    if dry_run {
        return crate::print_json(&json!({
            "dryRun": true,
            "businesses": snapshot.businesses.len(),
        }));
    }

    let pool = connect().await?;
    nearby_db::run_migrations(&pool).await?;
    let counts = nearby_db::import_businesses(&pool, &snapshot.businesses).await?;
    crate::print_json(&json!({ "inserted": counts.inserted, "updated": counts.updated }))
}
