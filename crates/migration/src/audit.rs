//! Columns every business table carries: timestamps, soft delete and actor ids.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveIden)]
pub enum Audit {
    CreatedAt,
    UpdatedAt,
    DeletedAt,
    CreatedBy,
    UpdatedBy,
    DeletedBy,
}

pub fn with_audit_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(timestamp_with_time_zone(Audit::CreatedAt).not_null())
        .col(timestamp_with_time_zone(Audit::UpdatedAt).not_null())
        .col(timestamp_with_time_zone_null(Audit::DeletedAt))
        .col(integer_null(Audit::CreatedBy))
        .col(integer_null(Audit::UpdatedBy))
        .col(integer_null(Audit::DeletedBy))
}
