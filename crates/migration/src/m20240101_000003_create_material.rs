//! Create `material`, the stock item every warehouse document points at.
use sea_orm_migration::{prelude::*, schema::*};

use crate::audit::with_audit_columns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(Material::Table)
                        .if_not_exists()
                        .col(pk_auto(Material::Id))
                        .col(string_len(Material::Material, 255).not_null())
                        .col(string_len(Material::Unit, 64).not_null())
                        .col(integer(Material::LimitOver).not_null().default(0))
                        .col(integer(Material::Quantity).not_null().default(0))
                        .col(string_len_null(Material::Note, 2000)),
                )
                .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Material::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Material { Table, Id, Material, Unit, LimitOver, Quantity, Note }
