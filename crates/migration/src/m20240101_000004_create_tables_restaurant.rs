//! Create `tables_restaurant` (dining tables).
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
                        .table(TablesRestaurant::Table)
                        .if_not_exists()
                        .col(pk_auto(TablesRestaurant::Id))
                        .col(string_len(TablesRestaurant::Name, 255).not_null())
                        .col(integer(TablesRestaurant::NumberSeat).not_null())
                        .col(string_len(TablesRestaurant::Status, 32).not_null())
                        .col(string_len_null(TablesRestaurant::Note, 2000)),
                )
                .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TablesRestaurant::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum TablesRestaurant { Table, Id, Name, NumberSeat, Status, Note }
