//! Create `check_inventory` and its per-material lines `check_inventory_detail`.
use sea_orm_migration::{prelude::*, schema::*};

use crate::audit::with_audit_columns;
use crate::m20240101_000003_create_material::Material;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(CheckInventory::Table)
                        .if_not_exists()
                        .col(pk_auto(CheckInventory::Id))
                        .col(integer(CheckInventory::WarehouseStaffId).not_null())
                        .col(string_len(CheckInventory::Status, 32).not_null())
                        .col(string_len_null(CheckInventory::Note, 2000)),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(CheckInventoryDetail::Table)
                        .if_not_exists()
                        .col(pk_auto(CheckInventoryDetail::Id))
                        .col(integer(CheckInventoryDetail::CheckInventoryId).not_null())
                        .col(integer(CheckInventoryDetail::MaterialId).not_null())
                        .col(integer(CheckInventoryDetail::InventoryQuantity).not_null().default(0))
                        .col(integer(CheckInventoryDetail::DamagedQuantity).not_null().default(0))
                        .col(string_len_null(CheckInventoryDetail::Note, 2000))
                        .col(string_len(CheckInventoryDetail::Status, 32).not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_check_inventory_detail_parent")
                                .from(CheckInventoryDetail::Table, CheckInventoryDetail::CheckInventoryId)
                                .to(CheckInventory::Table, CheckInventory::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_check_inventory_detail_material")
                                .from(CheckInventoryDetail::Table, CheckInventoryDetail::MaterialId)
                                .to(Material::Table, Material::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CheckInventoryDetail::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CheckInventory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum CheckInventory { Table, Id, WarehouseStaffId, Status, Note }

#[derive(DeriveIden)]
pub enum CheckInventoryDetail { Table, Id, CheckInventoryId, MaterialId, InventoryQuantity, DamagedQuantity, Note, Status }
