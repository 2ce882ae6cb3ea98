#![cfg(test)]
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn test_db_config() -> configs::DatabaseConfig {
    let mut cfg = configs::DatabaseConfig::default();
    cfg.normalize_from_env();
    if cfg.url.trim().is_empty() {
        cfg.url = models::db::DATABASE_URL.clone();
    }
    cfg.max_connections = cfg.max_connections.max(10);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout_secs = cfg.acquire_timeout_secs.max(10);
    cfg
}

/// Connect and migrate once. Tests treat a connection failure as "no
/// database available" and skip rather than fail.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = test_db_config();
    let db = connect_with_config(&cfg).await?;
    MIGRATED
        .get_or_try_init(|| async {
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    Ok(db)
}
