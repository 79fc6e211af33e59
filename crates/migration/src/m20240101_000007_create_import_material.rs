//! Create `import_material` receipts and their `import_material_order` lines.
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
                        .table(ImportMaterial::Table)
                        .if_not_exists()
                        .col(pk_auto(ImportMaterial::Id))
                        .col(integer(ImportMaterial::WarehouseStaffId).not_null())
                        .col(string_len_null(ImportMaterial::Supplier, 255))
                        .col(string_len_null(ImportMaterial::Transporters, 255))
                        .col(big_integer(ImportMaterial::TotalPaymentImport).not_null().default(0))
                        .col(string_len(ImportMaterial::Status, 32).not_null())
                        .col(string_len_null(ImportMaterial::Note, 2000)),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(ImportMaterialOrder::Table)
                        .if_not_exists()
                        .col(pk_auto(ImportMaterialOrder::Id))
                        .col(integer(ImportMaterialOrder::ImportMaterialId).not_null())
                        .col(integer(ImportMaterialOrder::MaterialId).not_null())
                        .col(integer(ImportMaterialOrder::Quantity).not_null())
                        .col(big_integer(ImportMaterialOrder::PricePerUnit).not_null())
                        .col(string_len(ImportMaterialOrder::Status, 32).not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_import_material_order_parent")
                                .from(ImportMaterialOrder::Table, ImportMaterialOrder::ImportMaterialId)
                                .to(ImportMaterial::Table, ImportMaterial::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_import_material_order_material")
                                .from(ImportMaterialOrder::Table, ImportMaterialOrder::MaterialId)
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
        manager.drop_table(Table::drop().table(ImportMaterialOrder::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ImportMaterial::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum ImportMaterial { Table, Id, WarehouseStaffId, Supplier, Transporters, TotalPaymentImport, Status, Note }

#[derive(DeriveIden)]
pub enum ImportMaterialOrder { Table, Id, ImportMaterialId, MaterialId, Quantity, PricePerUnit, Status }
