//! Create `export_material` receipts and their `export_material_order` lines.
//!
//! Money columns hold whole currency units.
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
                        .table(ExportMaterial::Table)
                        .if_not_exists()
                        .col(pk_auto(ExportMaterial::Id))
                        .col(integer(ExportMaterial::WarehouseStaffId).not_null())
                        .col(string_len_null(ExportMaterial::Transporters, 255))
                        .col(big_integer(ExportMaterial::TotalPaymentExport).not_null().default(0))
                        .col(string_len(ExportMaterial::Status, 32).not_null())
                        .col(string_len_null(ExportMaterial::Note, 2000)),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(ExportMaterialOrder::Table)
                        .if_not_exists()
                        .col(pk_auto(ExportMaterialOrder::Id))
                        .col(integer(ExportMaterialOrder::ExportMaterialId).not_null())
                        .col(integer(ExportMaterialOrder::MaterialId).not_null())
                        .col(integer(ExportMaterialOrder::Quantity).not_null())
                        .col(big_integer(ExportMaterialOrder::PricePerUnit).not_null())
                        .col(string_len(ExportMaterialOrder::Status, 32).not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_export_material_order_parent")
                                .from(ExportMaterialOrder::Table, ExportMaterialOrder::ExportMaterialId)
                                .to(ExportMaterial::Table, ExportMaterial::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_export_material_order_material")
                                .from(ExportMaterialOrder::Table, ExportMaterialOrder::MaterialId)
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
        manager.drop_table(Table::drop().table(ExportMaterialOrder::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ExportMaterial::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum ExportMaterial { Table, Id, WarehouseStaffId, Transporters, TotalPaymentExport, Status, Note }

#[derive(DeriveIden)]
pub enum ExportMaterialOrder { Table, Id, ExportMaterialId, MaterialId, Quantity, PricePerUnit, Status }
