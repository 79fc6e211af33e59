//! Goods issued. Approving a document takes its approved lines out of stock;
//! any line exceeding stock fails the whole approval.

use chrono::Utc;
use common::pagination::empty_as_none;
use common::{metrics, ListData, ListQuery};
use models::export_material::{self, Column, Entity};
use models::export_material_order as order_line;
use models::material;
use models::soft_delete::SoftDelete;
use models::status::AcceptStatus;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::database::{clean, get_data_by_id, record_user_logging, snapshot, soft_delete_with_log, AuditContext};
use crate::errors::ServiceError;
use crate::material as material_service;
use crate::pagination::{fetch_list, order, Pagination};
use crate::warehouse::{approved_total, ensure_open, DocumentListQuery, DocumentWithOrders, OrderLineView, UpdateOrderLineInput};

pub const MODULE: &str = "exportMaterial";
pub const ORDER_MODULE: &str = "exportMaterialOrder";
pub const ORDER_BY: [&str; 3] = ["createdAt", "totalPaymentExport", "id"];

pub type ExportMaterialWithOrders = DocumentWithOrders<export_material::Model, order_line::Model>;

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportMaterialInput {
    #[validate(length(max = 255))]
    pub transporters: Option<String>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExportMaterialInput {
    #[validate(length(max = 255))]
    pub transporters: Option<String>,
    pub status: Option<AcceptStatus>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOrderListQuery {
    #[serde(flatten)]
    pub base: ListQuery,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub export_material_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportOrderInput {
    pub export_material_id: i32,
    pub material_id: i32,
    #[validate(range(min = 1, max = 1_000_000))]
    pub quantity: i32,
    #[validate(range(min = 0i64, max = 1_000_000_000_000i64))]
    pub price_per_unit: i64,
    pub status: Option<AcceptStatus>,
}

fn order_column(name: &str) -> Column {
    match name {
        "totalPaymentExport" => Column::TotalPaymentExport,
        "id" => Column::Id,
        _ => Column::CreatedAt,
    }
}

pub async fn list(db: &DatabaseConnection, q: &DocumentListQuery) -> Result<ListData<export_material::Model>, ServiceError> {
    q.base.validate()?;
    let order_by = q.base.order_by_or(&ORDER_BY).map_err(ServiceError::Validation)?;
    let mut select = Entity::find_active();
    if let Some(k) = q.base.keyword() {
        select = select.filter(Condition::any().add(Column::Transporters.contains(k)).add(Column::Note.contains(k)));
    }
    if let Some(status) = q.status {
        select = select.filter(Column::Status.eq(status));
    }
    let select = order(select, order_column(order_by), q.base.direction());
    fetch_list(db, select, Pagination::from(&q.base)).await
}

async fn lines_of<C: ConnectionTrait>(db: &C, export_id: i32) -> Result<Vec<OrderLineView<order_line::Model>>, ServiceError> {
    let rows = order_line::Entity::find_active()
        .filter(order_line::Column::ExportMaterialId.eq(export_id))
        .order_by_asc(order_line::Column::Id)
        .find_also_related(material::Entity)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(line, m)| OrderLineView { line, material: m.as_ref().map(|m| m.material.clone()), unit: m.map(|m| m.unit) })
        .collect())
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<ExportMaterialWithOrders, ServiceError> {
    let document = get_data_by_id::<Entity, _>(db, MODULE, id).await?;
    let orders = lines_of(db, id).await?;
    Ok(DocumentWithOrders { document, orders })
}

/// Store Σ price × quantity of the approved lines on the header.
pub async fn recompute_total<C: ConnectionTrait>(db: &C, export_id: i32, actor: i32) -> Result<i64, ServiceError> {
    let lines = order_line::Entity::find_active()
        .filter(order_line::Column::ExportMaterialId.eq(export_id))
        .all(db)
        .await?;
    let total = approved_total(lines.iter().map(|l| (l.status, l.line_total())))?;
    Entity::update_many()
        .col_expr(Column::TotalPaymentExport, Expr::value(total))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .col_expr(Column::UpdatedBy, Expr::value(Some(actor)))
        .filter(Column::Id.eq(export_id))
        .exec(db)
        .await?;
    debug!(export_id, total, "export total recomputed");
    Ok(total)
}

#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn create(db: &DatabaseConnection, ctx: &AuditContext, input: CreateExportMaterialInput) -> Result<export_material::Model, ServiceError> {
    let input = CreateExportMaterialInput {
        transporters: clean(input.transporters),
        note: clean(input.note),
    };
    input.validate()?;

    let txn = db.begin().await?;
    let now = Utc::now().fixed_offset();
    let created = export_material::ActiveModel {
        warehouse_staff_id: Set(ctx.user_id),
        transporters: Set(input.transporters),
        total_payment_export: Set(0),
        status: Set(AcceptStatus::WaitingApprove),
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
    info!(id = created.id, "export_material_created");
    Ok(created)
}

/// Header patch while waiting. Approval subtracts every approved line's
/// quantity from its material and settles the total; a short line rolls the
/// whole approval back.
#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn update(db: &DatabaseConnection, ctx: &AuditContext, id: i32, input: UpdateExportMaterialInput) -> Result<export_material::Model, ServiceError> {
    let input = UpdateExportMaterialInput {
        transporters: input.transporters.map(|v| v.trim().to_string()),
        note: input.note.map(|v| v.trim().to_string()),
        ..input
    };
    input.validate()?;

    let txn = db.begin().await?;
    let current = get_data_by_id::<Entity, _>(&txn, MODULE, id).await?;
    let next = input.status.unwrap_or(current.status);
    if !current.status.can_transition_to(next) {
        return Err(ServiceError::transition(current.status, next));
    }

    let mut am = current.clone().into_active_model();
    if let Some(v) = input.transporters {
        am.transporters = Set(Some(v).filter(|s| !s.is_empty()));
    }
    if let Some(v) = input.note {
        am.note = Set(Some(v).filter(|s| !s.is_empty()));
    }
    am.status = Set(next);
    am.updated_at = Set(Utc::now().fixed_offset());
    am.updated_by = Set(Some(ctx.user_id));
    am.update(&txn).await?;

    if next == AcceptStatus::Approve {
        let lines = order_line::Entity::find_active()
            .filter(order_line::Column::ExportMaterialId.eq(id))
            .filter(order_line::Column::Status.eq(AcceptStatus::Approve))
            .all(&txn)
            .await?;
        for line in &lines {
            if let Err(e) = material_service::adjust_stock(&txn, line.material_id, -line.quantity, ctx.user_id).await {
                if matches!(e, ServiceError::InsufficientStock { .. }) {
                    metrics::record_approval("export_material", "insufficient_stock");
                }
                return Err(e);
            }
        }
        recompute_total(&txn, id, ctx.user_id).await?;
    }
    let updated = get_data_by_id::<Entity, _>(&txn, MODULE, id).await?;
    record_user_logging(&txn, ctx, MODULE, Some(id), Some(snapshot(&current)?), Some(snapshot(&updated)?)).await?;
    txn.commit().await?;

    if current.status != updated.status {
        metrics::record_approval("export_material", &updated.status.to_string());
        info!(id, status = %updated.status, total = updated.total_payment_export, "export_material_closed");
    }
    Ok(updated)
}

/// Only waiting documents can be removed; their lines go with them.
pub async fn delete(db: &DatabaseConnection, ctx: &AuditContext, id: i32) -> Result<export_material::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = get_data_by_id::<Entity, _>(&txn, MODULE, id).await?;
    ensure_open(current.status, MODULE, id)?;
    order_line::Entity::update_many()
        .col_expr(order_line::Column::DeletedAt, Expr::value(Some(Utc::now().fixed_offset())))
        .col_expr(order_line::Column::DeletedBy, Expr::value(Some(ctx.user_id)))
        .filter(order_line::Column::ExportMaterialId.eq(id))
        .filter(order_line::Column::DeletedAt.is_null())
        .exec(&txn)
        .await?;
    let deleted = soft_delete_with_log::<Entity, _>(&txn, ctx, MODULE, id).await?;
    txn.commit().await?;
    info!(id, "export_material_deleted");
    Ok(deleted)
}

pub async fn list_orders(db: &DatabaseConnection, q: &ExportOrderListQuery) -> Result<ListData<order_line::Model>, ServiceError> {
    q.base.validate()?;
    let mut select = order_line::Entity::find_active();
    if let Some(parent) = q.export_material_id {
        select = select.filter(order_line::Column::ExportMaterialId.eq(parent));
    }
    let select = order(select, order_line::Column::Id, q.base.direction());
    fetch_list(db, select, Pagination::from(&q.base)).await
}

pub async fn get_order(db: &DatabaseConnection, id: i32) -> Result<order_line::Model, ServiceError> {
    get_data_by_id::<order_line::Entity, _>(db, ORDER_MODULE, id).await
}

#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id, export_id = input.export_material_id))]
pub async fn create_order(db: &DatabaseConnection, ctx: &AuditContext, input: CreateExportOrderInput) -> Result<order_line::Model, ServiceError> {
    input.validate()?;

    let txn = db.begin().await?;
    let parent = get_data_by_id::<Entity, _>(&txn, MODULE, input.export_material_id).await?;
    ensure_open(parent.status, MODULE, parent.id)?;
    get_data_by_id::<material::Entity, _>(&txn, material_service::MODULE, input.material_id).await?;
    let now = Utc::now().fixed_offset();
    let created = order_line::ActiveModel {
        export_material_id: Set(parent.id),
        material_id: Set(input.material_id),
        quantity: Set(input.quantity),
        price_per_unit: Set(input.price_per_unit),
        status: Set(input.status.unwrap_or(AcceptStatus::WaitingApprove)),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(Some(ctx.user_id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    recompute_total(&txn, parent.id, ctx.user_id).await?;
    record_user_logging(&txn, ctx, ORDER_MODULE, Some(created.id), None, Some(snapshot(&created)?)).await?;
    txn.commit().await?;
    Ok(created)
}

#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn update_order(db: &DatabaseConnection, ctx: &AuditContext, id: i32, input: UpdateOrderLineInput) -> Result<order_line::Model, ServiceError> {
    input.validate()?;

    let txn = db.begin().await?;
    let current = get_data_by_id::<order_line::Entity, _>(&txn, ORDER_MODULE, id).await?;
    let parent = get_data_by_id::<Entity, _>(&txn, MODULE, current.export_material_id).await?;
    ensure_open(parent.status, MODULE, parent.id)?;

    let mut am = current.clone().into_active_model();
    if let Some(v) = input.quantity {
        am.quantity = Set(v);
    }
    if let Some(v) = input.price_per_unit {
        am.price_per_unit = Set(v);
    }
    if let Some(v) = input.status {
        am.status = Set(v);
    }
    am.updated_at = Set(Utc::now().fixed_offset());
    am.updated_by = Set(Some(ctx.user_id));
    let updated = am.update(&txn).await?;
    recompute_total(&txn, parent.id, ctx.user_id).await?;
    record_user_logging(&txn, ctx, ORDER_MODULE, Some(id), Some(snapshot(&current)?), Some(snapshot(&updated)?)).await?;
    txn.commit().await?;
    Ok(updated)
}

pub async fn delete_order(db: &DatabaseConnection, ctx: &AuditContext, id: i32) -> Result<order_line::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = get_data_by_id::<order_line::Entity, _>(&txn, ORDER_MODULE, id).await?;
    let parent = get_data_by_id::<Entity, _>(&txn, MODULE, current.export_material_id).await?;
    ensure_open(parent.status, MODULE, parent.id)?;
    let deleted = soft_delete_with_log::<order_line::Entity, _>(&txn, ctx, ORDER_MODULE, id).await?;
    recompute_total(&txn, parent.id, ctx.user_id).await?;
    txn.commit().await?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, get_db, material_fixture};

    fn line(export_material_id: i32, material_id: i32, quantity: i32, price: i64) -> CreateExportOrderInput {
        CreateExportOrderInput {
            export_material_id,
            material_id,
            quantity,
            price_per_unit: price,
            status: Some(AcceptStatus::Approve),
        }
    }

    fn approve() -> UpdateExportMaterialInput {
        UpdateExportMaterialInput { status: Some(AcceptStatus::Approve), ..Default::default() }
    }

    #[tokio::test]
    async fn approval_decrements_stock_by_line_quantity() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let beef = material_fixture(&db, "Beef", 20).await?;
        let doc = create(&db, &ctx(), CreateExportMaterialInput::default()).await?;
        create_order(&db, &ctx(), line(doc.id, beef.id, 7, 150_000)).await?;

        let approved = update(&db, &ctx(), doc.id, approve()).await?;
        assert_eq!(approved.status, AcceptStatus::Approve);
        assert_eq!(approved.total_payment_export, 1_050_000);
        assert_eq!(material_service::get(&db, beef.id).await?.quantity, 13);
        Ok(())
    }

    #[tokio::test]
    async fn short_stock_rolls_back_every_line() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let beef = material_fixture(&db, "Beef", 20).await?;
        let salt = material_fixture(&db, "Salt", 2).await?;
        let doc = create(&db, &ctx(), CreateExportMaterialInput::default()).await?;
        create_order(&db, &ctx(), line(doc.id, beef.id, 5, 1)).await?;
        create_order(&db, &ctx(), line(doc.id, salt.id, 3, 1)).await?;

        let err = update(&db, &ctx(), doc.id, approve()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InsufficientStock { available: 2, requested: 3, .. }));
        assert_eq!(material_service::get(&db, beef.id).await?.quantity, 20);
        assert_eq!(material_service::get(&db, salt.id).await?.quantity, 2);
        assert_eq!(get(&db, doc.id).await?.document.status, AcceptStatus::WaitingApprove);
        Ok(())
    }

    #[tokio::test]
    async fn rejected_document_moves_no_stock() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let beef = material_fixture(&db, "Beef", 4).await?;
        let doc = create(&db, &ctx(), CreateExportMaterialInput::default()).await?;
        create_order(&db, &ctx(), line(doc.id, beef.id, 4, 10)).await?;
        let rejected = update(&db, &ctx(), doc.id, UpdateExportMaterialInput { status: Some(AcceptStatus::Reject), ..Default::default() }).await?;
        assert_eq!(rejected.status, AcceptStatus::Reject);
        assert_eq!(material_service::get(&db, beef.id).await?.quantity, 4);
        Ok(())
    }

    #[tokio::test]
    async fn oversized_price_is_rejected_before_any_write() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let beef = material_fixture(&db, "Beef", 20).await?;
        let doc = create(&db, &ctx(), CreateExportMaterialInput::default()).await?;

        let err = create_order(&db, &ctx(), line(doc.id, beef.id, 2, i64::MAX / 2 + 1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));
        let ok = create_order(&db, &ctx(), line(doc.id, beef.id, 2, 1_000)).await?;
        let err = update_order(&db, &ctx(), ok.id, UpdateOrderLineInput { price_per_unit: Some(i64::MAX), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));

        let reloaded = get(&db, doc.id).await?;
        assert_eq!(reloaded.document.total_payment_export, 2_000);
        assert_eq!(reloaded.orders.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn line_edits_recompute_total_while_waiting() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let beef = material_fixture(&db, "Beef", 50).await?;
        let doc = create(&db, &ctx(), CreateExportMaterialInput::default()).await?;
        let a = create_order(&db, &ctx(), line(doc.id, beef.id, 4, 10_000)).await?;
        let b = create_order(&db, &ctx(), line(doc.id, beef.id, 1, 5_000)).await?;
        assert_eq!(get(&db, doc.id).await?.document.total_payment_export, 45_000);

        let edited = update_order(&db, &ctx(), a.id, UpdateOrderLineInput { quantity: Some(2), ..Default::default() }).await?;
        assert_eq!(edited.quantity, 2);
        assert_eq!(get(&db, doc.id).await?.document.total_payment_export, 25_000);

        delete_order(&db, &ctx(), b.id).await?;
        let reloaded = get(&db, doc.id).await?;
        assert_eq!(reloaded.document.total_payment_export, 20_000);
        assert_eq!(reloaded.orders.len(), 1);
        assert!(matches!(get_order(&db, b.id).await, Err(ServiceError::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn closed_document_refuses_line_edits_and_delete() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let beef = material_fixture(&db, "Beef", 10).await?;
        let doc = create(&db, &ctx(), CreateExportMaterialInput::default()).await?;
        let l = create_order(&db, &ctx(), line(doc.id, beef.id, 3, 100)).await?;
        update(&db, &ctx(), doc.id, approve()).await?;

        let patch = UpdateOrderLineInput { quantity: Some(1), ..Default::default() };
        assert!(matches!(update_order(&db, &ctx(), l.id, patch).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(delete_order(&db, &ctx(), l.id).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(delete(&db, &ctx(), doc.id).await, Err(ServiceError::Conflict(_))));
        assert_eq!(get_order(&db, l.id).await?.quantity, 3);
        assert_eq!(material_service::get(&db, beef.id).await?.quantity, 7);
        Ok(())
    }

    #[tokio::test]
    async fn delete_waiting_document_hides_its_lines() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let beef = material_fixture(&db, "Beef", 10).await?;
        let doc = create(&db, &ctx(), CreateExportMaterialInput::default()).await?;
        let l = create_order(&db, &ctx(), line(doc.id, beef.id, 2, 100)).await?;
        delete(&db, &ctx(), doc.id).await?;
        assert!(matches!(get(&db, doc.id).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(get_order(&db, l.id).await, Err(ServiceError::NotFound { .. })));
        let q = ExportOrderListQuery { export_material_id: Some(doc.id), ..Default::default() };
        assert_eq!(list_orders(&db, &q).await?.total_items, 0);
        assert_eq!(material_service::get(&db, beef.id).await?.quantity, 10);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_by_status() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = create(&db, &ctx(), CreateExportMaterialInput::default()).await?;
        create(&db, &ctx(), CreateExportMaterialInput::default()).await?;
        update(&db, &ctx(), a.id, approve()).await?;
        let q = DocumentListQuery { status: Some(AcceptStatus::WaitingApprove), ..Default::default() };
        assert_eq!(list(&db, &q).await?.total_items, 1);
        Ok(())
    }
}
