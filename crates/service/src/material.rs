//! Material catalogue and the stock arithmetic warehouse documents rely on.

use chrono::Utc;
use common::{ListData, ListQuery};
use models::material::{self, Column, Entity};
use models::soft_delete::SoftDelete;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::database::{clean, get_data_by_id, record_user_logging, snapshot, soft_delete_with_log, AuditContext};
use crate::errors::ServiceError;
use crate::pagination::{fetch_list, keyword_filter, order, Pagination};

pub const MODULE: &str = "material";
pub const ORDER_BY: [&str; 4] = ["createdAt", "material", "quantity", "id"];

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialInput {
    #[validate(length(min = 1, max = 255))]
    pub material: String,
    #[validate(length(min = 1, max = 64))]
    pub unit: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub limit_over: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialInput {
    #[validate(length(min = 1, max = 255))]
    pub material: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub unit: Option<String>,
    #[validate(range(min = 0))]
    pub limit_over: Option<i32>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDropdownItem {
    pub id: i32,
    pub material: String,
    pub limit_over: i32,
    pub unit: String,
    pub quantity: i32,
}

fn order_column(name: &str) -> Column {
    match name {
        "material" => Column::Material,
        "quantity" => Column::Quantity,
        "id" => Column::Id,
        _ => Column::CreatedAt,
    }
}

pub async fn list(db: &DatabaseConnection, q: &ListQuery) -> Result<ListData<material::Model>, ServiceError> {
    q.validate()?;
    let order_by = q.order_by_or(&ORDER_BY).map_err(ServiceError::Validation)?;
    let select = keyword_filter(Entity::find_active(), Column::Material, q);
    let select = order(select, order_column(order_by), q.direction());
    fetch_list(db, select, Pagination::from(q)).await
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<material::Model, ServiceError> {
    get_data_by_id::<Entity, _>(db, MODULE, id).await
}

/// Every live material, for select boxes and for seeding inventory checks.
pub async fn dropdown(db: &DatabaseConnection) -> Result<Vec<MaterialDropdownItem>, ServiceError> {
    let rows = Entity::find_active().order_by_asc(Column::Material).all(db).await?;
    Ok(rows
        .into_iter()
        .map(|m| MaterialDropdownItem { id: m.id, material: m.material, limit_over: m.limit_over, unit: m.unit, quantity: m.quantity })
        .collect())
}

#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn create(db: &DatabaseConnection, ctx: &AuditContext, mut input: CreateMaterialInput) -> Result<material::Model, ServiceError> {
    input.material = input.material.trim().to_string();
    input.unit = input.unit.trim().to_string();
    input.note = clean(input.note);
    input.validate()?;

    let txn = db.begin().await?;
    let now = Utc::now().fixed_offset();
    let created = material::ActiveModel {
        material: Set(input.material),
        unit: Set(input.unit),
        limit_over: Set(input.limit_over),
        quantity: Set(input.quantity),
        note: Set(input.note),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(Some(ctx.user_id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    record_user_logging(&txn, ctx, MODULE, Some(created.id), None, Some(snapshot(&created)?)).await?;
    txn.commit().await?;
    info!(id = created.id, "material_created");
    Ok(created)
}

/// Edits descriptive fields only; quantity moves through warehouse documents.
#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn update(db: &DatabaseConnection, ctx: &AuditContext, id: i32, input: UpdateMaterialInput) -> Result<material::Model, ServiceError> {
    let input = UpdateMaterialInput {
        material: clean(input.material),
        unit: clean(input.unit),
        limit_over: input.limit_over,
        note: input.note.map(|n| n.trim().to_string()),
    };
    input.validate()?;

    let txn = db.begin().await?;
    let current = get_data_by_id::<Entity, _>(&txn, MODULE, id).await?;
    let mut am = current.clone().into_active_model();
    if let Some(v) = input.material {
        am.material = Set(v);
    }
    if let Some(v) = input.unit {
        am.unit = Set(v);
    }
    if let Some(v) = input.limit_over {
        am.limit_over = Set(v);
    }
    if let Some(v) = input.note {
        am.note = Set(Some(v).filter(|n| !n.is_empty()));
    }
    am.updated_at = Set(Utc::now().fixed_offset());
    am.updated_by = Set(Some(ctx.user_id));
    let updated = am.update(&txn).await?;
    record_user_logging(&txn, ctx, MODULE, Some(id), Some(snapshot(&current)?), Some(snapshot(&updated)?)).await?;
    txn.commit().await?;
    Ok(updated)
}

pub async fn delete(db: &DatabaseConnection, ctx: &AuditContext, id: i32) -> Result<material::Model, ServiceError> {
    let txn = db.begin().await?;
    let deleted = soft_delete_with_log::<Entity, _>(&txn, ctx, MODULE, id).await?;
    txn.commit().await?;
    info!(id, "material_deleted");
    Ok(deleted)
}

/// `quantity = quantity + delta` in one statement. A negative delta only
/// applies when enough stock is on hand, otherwise `InsufficientStock`.
pub async fn adjust_stock<C: ConnectionTrait>(db: &C, material_id: i32, delta: i32, actor: i32) -> Result<(), ServiceError> {
    let mut stmt = Entity::update_many()
        .col_expr(Column::Quantity, Expr::col(Column::Quantity).add(delta))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .col_expr(Column::UpdatedBy, Expr::value(Some(actor)))
        .filter(Column::Id.eq(material_id))
        .filter(Column::DeletedAt.is_null());
    if delta < 0 {
        stmt = stmt.filter(Column::Quantity.gte(-delta));
    }
    let res = stmt.exec(db).await?;
    if res.rows_affected == 0 {
        let current = get_data_by_id::<Entity, _>(db, MODULE, material_id).await?;
        return Err(ServiceError::InsufficientStock { material_id, available: current.quantity, requested: -delta });
    }
    Ok(())
}

/// Overwrite on-hand quantity with a counted value.
pub async fn set_stock<C: ConnectionTrait>(db: &C, material_id: i32, quantity: i32, actor: i32) -> Result<(), ServiceError> {
    let res = Entity::update_many()
        .col_expr(Column::Quantity, Expr::value(quantity))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .col_expr(Column::UpdatedBy, Expr::value(Some(actor)))
        .filter(Column::Id.eq(material_id))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found(MODULE, material_id));
    }
    Ok(())
}
