mod crud_tests;
mod transaction_tests;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

pub(crate) async fn migrated_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = crate::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
