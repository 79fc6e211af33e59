//! Create `booking` with FK to `tables_restaurant`.
use sea_orm_migration::{prelude::*, schema::*};

use crate::audit::with_audit_columns;
use crate::m20240101_000004_create_tables_restaurant::TablesRestaurant;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(Booking::Table)
                        .if_not_exists()
                        .col(pk_auto(Booking::Id))
                        .col(integer(Booking::TableId).not_null())
                        .col(string_len(Booking::NameCustomer, 255).not_null())
                        .col(string_len(Booking::Phone, 32).not_null())
                        .col(integer(Booking::NumberPeople).not_null())
                        .col(timestamp_with_time_zone(Booking::ArrivalTime).not_null())
                        .col(string_len(Booking::Status, 32).not_null())
                        .col(string_len_null(Booking::Note, 2000))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_booking_table")
                                .from(Booking::Table, Booking::TableId)
                                .to(TablesRestaurant::Table, TablesRestaurant::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Booking { Table, Id, TableId, NameCustomer, Phone, NumberPeople, ArrivalTime, Status, Note }
