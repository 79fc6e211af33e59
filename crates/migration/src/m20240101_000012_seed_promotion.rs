//! Seed the opening promotions.
use sea_orm_migration::prelude::*;

use crate::m20240101_000009_create_promotion::Promotion;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const SEEDED: [(&str, i32); 2] = [("Khai trương", 50), ("Quốc khánh", 30)];

#[derive(DeriveIden)]
enum Seed { Name, Percent, Note, Status, CreatedAt, UpdatedAt }

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().fixed_offset();
        let mut insert = Query::insert();
        insert
            .into_table(Promotion::Table)
            .columns([Seed::Name, Seed::Percent, Seed::Note, Seed::Status, Seed::CreatedAt, Seed::UpdatedAt]);
        for (name, percent) in SEEDED {
            insert.values_panic([
                name.into(),
                percent.into(),
                name.into(),
                "active".into(),
                now.into(),
                now.into(),
            ]);
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names: Vec<&str> = SEEDED.iter().map(|(n, _)| *n).collect();
        let delete = Query::delete()
            .from_table(Promotion::Table)
            .and_where(Expr::col(Promotion::Name).is_in(names))
            .to_owned();
        manager.exec_stmt(delete).await
    }
}
