//! Migrator registering entity-specific migrations in dependency order.
//! Indexes and seed data are applied last.
pub use sea_orm_migration::prelude::*;

mod audit;
mod m20240101_000001_create_role;
mod m20240101_000002_create_user;
mod m20240101_000003_create_material;
mod m20240101_000004_create_tables_restaurant;
mod m20240101_000005_create_booking;
mod m20240101_000006_create_check_inventory;
mod m20240101_000007_create_import_material;
mod m20240101_000008_create_export_material;
mod m20240101_000009_create_promotion;
mod m20240101_000010_create_user_log;
mod m20240101_000011_add_indexes;
mod m20240101_000012_seed_promotion;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_role::Migration),
            Box::new(m20240101_000002_create_user::Migration),
            Box::new(m20240101_000003_create_material::Migration),
            Box::new(m20240101_000004_create_tables_restaurant::Migration),
            Box::new(m20240101_000005_create_booking::Migration),
            Box::new(m20240101_000006_create_check_inventory::Migration),
            Box::new(m20240101_000007_create_import_material::Migration),
            Box::new(m20240101_000008_create_export_material::Migration),
            Box::new(m20240101_000009_create_promotion::Migration),
            Box::new(m20240101_000010_create_user_log::Migration),
            // Indexes should always be applied after the tables they cover
            Box::new(m20240101_000011_add_indexes::Migration),
            Box::new(m20240101_000012_seed_promotion::Migration),
        ]
    }
}
