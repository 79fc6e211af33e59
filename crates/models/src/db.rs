use std::{env, time::Duration};

use once_cell::sync::Lazy;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

pub use configs::DatabaseConfig;

pub static DATABASE_URL: Lazy<String> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://back_office.db?mode=rwc".to_string())
});

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(DATABASE_URL.as_str()).await?;
    Ok(db)
}

/// Pool built from `[database]`; connection is verified before returning.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await?;
    test_connection(&db).await?;
    info!(max = cfg.max_connections, min = cfg.min_connections, sqlite = cfg.is_sqlite(), "database pool ready");
    Ok(db)
}

/// Private in-memory SQLite database. A single pooled connection keeps it alive
/// for as long as the returned handle lives.
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Ok(Database::connect(opt).await?)
}

pub async fn test_connection(db: &DatabaseConnection) -> anyhow::Result<()> {
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "SELECT 1".to_string())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_connection_answers_ping() -> Result<(), anyhow::Error> {
        let db = connect_in_memory().await?;
        test_connection(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn connect_with_config_uses_sqlite_url() -> Result<(), anyhow::Error> {
        let cfg = DatabaseConfig { url: "sqlite::memory:".into(), max_connections: 1, min_connections: 1, ..Default::default() };
        let db = connect_with_config(&cfg).await?;
        test_connection(&db).await?;
        Ok(())
    }
}
