#![cfg(test)]
use chrono::Utc;
use migration::MigratorTrait;
use models::db::{connect_in_memory, connect_with_config, DatabaseConfig};
use models::status::TableStatus;
use models::{material, tables_restaurant};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::database::AuditContext;

/// Fresh, fully migrated database for the current test.
///
/// In-memory SQLite by default; `TEST_DATABASE_URL` points the suite at a
/// real server instead.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => {
            let cfg = DatabaseConfig { url, max_connections: 5, min_connections: 1, ..Default::default() };
            connect_with_config(&cfg).await?
        }
        Err(_) => connect_in_memory().await?,
    };
    migration::Migrator::fresh(&db).await?;
    Ok(db)
}

pub fn ctx() -> AuditContext { AuditContext::new(1, "TEST /") }

pub async fn material_fixture(db: &DatabaseConnection, name: &str, quantity: i32) -> Result<material::Model, anyhow::Error> {
    let now = Utc::now().fixed_offset();
    Ok(material::ActiveModel {
        material: Set(name.to_string()),
        unit: Set("kg".into()),
        limit_over: Set(1),
        quantity: Set(quantity),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn table_fixture(db: &DatabaseConnection, name: &str) -> Result<tables_restaurant::Model, anyhow::Error> {
    let now = Utc::now().fixed_offset();
    Ok(tables_restaurant::ActiveModel {
        name: Set(name.to_string()),
        number_seat: Set(4),
        status: Set(TableStatus::Ready),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?)
}
