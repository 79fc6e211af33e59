//! Create `role` and `role_permission`.
//!
//! Permissions are stored as `<resource>_<action>` strings, one row each.
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
                        .table(Role::Table)
                        .if_not_exists()
                        .col(pk_auto(Role::Id))
                        .col(string_len(Role::Name, 64).unique_key().not_null())
                        .col(string_len_null(Role::Description, 2000)),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RolePermission::Table)
                    .if_not_exists()
                    .col(pk_auto(RolePermission::Id))
                    .col(integer(RolePermission::RoleId).not_null())
                    .col(string_len(RolePermission::Permission, 64).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_permission_role")
                            .from(RolePermission::Table, RolePermission::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RolePermission::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Role::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Role { Table, Id, Name, Description }

#[derive(DeriveIden)]
pub enum RolePermission { Table, Id, RoleId, Permission }
