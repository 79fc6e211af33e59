use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_role::RolePermission;
use crate::m20240101_000005_create_booking::Booking;
use crate::m20240101_000006_create_check_inventory::CheckInventoryDetail;
use crate::m20240101_000007_create_import_material::ImportMaterialOrder;
use crate::m20240101_000008_create_export_material::ExportMaterialOrder;
use crate::m20240101_000010_create_user_log::UserLog;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: [&str; 6] = [
    "uniq_role_permission",
    "idx_booking_table_status",
    "idx_check_inventory_detail_parent",
    "idx_import_material_order_parent",
    "idx_export_material_order_parent",
    "idx_user_log_user",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // RolePermission: one row per (role, permission)
        manager
            .create_index(
                Index::create()
                    .name(INDEXES[0])
                    .table(RolePermission::Table)
                    .col(RolePermission::RoleId)
                    .col(RolePermission::Permission)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Booking: waiting-booking lookups per table
        manager
            .create_index(
                Index::create()
                    .name(INDEXES[1])
                    .table(Booking::Table)
                    .col(Booking::TableId)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(INDEXES[2])
                    .table(CheckInventoryDetail::Table)
                    .col(CheckInventoryDetail::CheckInventoryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name(INDEXES[3])
                    .table(ImportMaterialOrder::Table)
                    .col(ImportMaterialOrder::ImportMaterialId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name(INDEXES[4])
                    .table(ExportMaterialOrder::Table)
                    .col(ExportMaterialOrder::ExportMaterialId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(INDEXES[5])
                    .table(UserLog::Table)
                    .col(UserLog::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEXES[0]).table(RolePermission::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[1]).table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[2]).table(CheckInventoryDetail::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[3]).table(ImportMaterialOrder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[4]).table(ExportMaterialOrder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[5]).table(UserLog::Table).to_owned())
            .await
    }
}
