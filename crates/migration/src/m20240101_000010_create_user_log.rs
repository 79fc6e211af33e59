//! Create `user_log`, the before/after audit trail of every mutation.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserLog::Table)
                    .if_not_exists()
                    .col(pk_auto(UserLog::Id))
                    .col(integer(UserLog::UserId).not_null())
                    .col(string_len(UserLog::Route, 255).not_null())
                    .col(string_len(UserLog::Module, 64).not_null())
                    .col(integer_null(UserLog::RecordId))
                    .col(json_null(UserLog::OldValue))
                    .col(json_null(UserLog::NewValue))
                    .col(timestamp_with_time_zone(UserLog::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserLog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum UserLog { Table, Id, UserId, Route, Module, RecordId, OldValue, NewValue, CreatedAt }
