//! Create `user` with FK to `role`.
use sea_orm_migration::{prelude::*, schema::*};

use crate::audit::with_audit_columns;
use crate::m20240101_000001_create_role::Role;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(User::Table)
                        .if_not_exists()
                        .col(pk_auto(User::Id))
                        .col(string_len(User::Email, 255).unique_key().not_null())
                        .col(string_len(User::FullName, 255).not_null())
                        .col(string_len(User::PasswordHash, 255).not_null())
                        .col(integer(User::RoleId).not_null())
                        .col(string_len(User::Status, 32).not_null())
                        .col(timestamp_with_time_zone_null(User::LastLoginAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_user_role")
                                .from(User::Table, User::RoleId)
                                .to(Role::Table, Role::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum User { Table, Id, Email, FullName, PasswordHash, RoleId, Status, LastLoginAt }
