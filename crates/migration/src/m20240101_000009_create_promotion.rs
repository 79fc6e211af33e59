//! Create `promotion`.
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
                        .table(Promotion::Table)
                        .if_not_exists()
                        .col(pk_auto(Promotion::Id))
                        .col(string_len(Promotion::Name, 2000).not_null())
                        .col(integer(Promotion::Percent).not_null())
                        .col(string_len_null(Promotion::Note, 2000))
                        .col(string_len(Promotion::Status, 32).not_null()),
                )
                .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Promotion::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Promotion { Table, Id, Name, Percent, Note, Status }
