//! Dining tables and the status they derive from their live bookings.

use chrono::Utc;
use common::{ListData, ListQuery};
use models::booking;
use models::soft_delete::SoftDelete;
use models::status::{BookingStatus, TableStatus};
use models::tables_restaurant::{self, Column, Entity};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use validator::Validate;

use common::pagination::empty_as_none;

use crate::database::{clean, get_data_by_id, record_user_logging, snapshot, soft_delete_with_log, AuditContext};
use crate::errors::ServiceError;
use crate::pagination::{fetch_list, keyword_filter, order, Pagination};

pub const MODULE: &str = "table";
pub const ORDER_BY: [&str; 4] = ["createdAt", "name", "numberSeat", "id"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListQuery {
    #[serde(flatten)]
    pub base: ListQuery,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<TableStatus>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 1, max = 100))]
    pub number_seat: i32,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub number_seat: Option<i32>,
    pub status: Option<TableStatus>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Status a table should show given its live bookings: a seated party wins,
/// then any waiting booking, otherwise the table is free.
pub fn derive_table_status(has_seated: bool, has_waiting: bool) -> TableStatus {
    match (has_seated, has_waiting) {
        (true, _) => TableStatus::Occupied,
        (false, true) => TableStatus::Booked,
        (false, false) => TableStatus::Ready,
    }
}

async fn count_bookings<C: ConnectionTrait>(db: &C, table_id: i32, status: BookingStatus) -> Result<u64, ServiceError> {
    Ok(booking::Entity::find_active()
        .filter(booking::Column::TableId.eq(table_id))
        .filter(booking::Column::Status.eq(status))
        .count(db)
        .await?)
}

pub async fn exists_waiting_booking<C: ConnectionTrait>(db: &C, table_id: i32) -> Result<bool, ServiceError> {
    Ok(count_bookings(db, table_id, BookingStatus::Waiting).await? > 0)
}

/// Recompute a table's status from its bookings and store it when it changed.
pub async fn sync_status_with_bookings<C: ConnectionTrait>(db: &C, table_id: i32, actor: i32) -> Result<TableStatus, ServiceError> {
    let has_seated = count_bookings(db, table_id, BookingStatus::Seated).await? > 0;
    let has_waiting = exists_waiting_booking(db, table_id).await?;
    let next = derive_table_status(has_seated, has_waiting);
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(next.to_string()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .col_expr(Column::UpdatedBy, Expr::value(Some(actor)))
        .filter(Column::Id.eq(table_id))
        .filter(Column::Status.ne(next))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await?;
    if res.rows_affected > 0 {
        debug!(table_id, status = %next, "table status synced");
    }
    Ok(next)
}

fn order_column(name: &str) -> Column {
    match name {
        "name" => Column::Name,
        "numberSeat" => Column::NumberSeat,
        "id" => Column::Id,
        _ => Column::CreatedAt,
    }
}

pub async fn list(db: &DatabaseConnection, q: &TableListQuery) -> Result<ListData<tables_restaurant::Model>, ServiceError> {
    q.base.validate()?;
    let order_by = q.base.order_by_or(&ORDER_BY).map_err(ServiceError::Validation)?;
    let mut select = keyword_filter(Entity::find_active(), Column::Name, &q.base);
    if let Some(status) = q.status {
        select = select.filter(Column::Status.eq(status));
    }
    let select = order(select, order_column(order_by), q.base.direction());
    fetch_list(db, select, Pagination::from(&q.base)).await
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<tables_restaurant::Model, ServiceError> {
    get_data_by_id::<Entity, _>(db, MODULE, id).await
}

/// New tables always start `ready`.
#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn create(db: &DatabaseConnection, ctx: &AuditContext, mut input: CreateTableInput) -> Result<tables_restaurant::Model, ServiceError> {
    input.name = input.name.trim().to_string();
    input.note = clean(input.note);
    input.validate()?;

    let txn = db.begin().await?;
    let now = Utc::now().fixed_offset();
    let created = tables_restaurant::ActiveModel {
        name: Set(input.name),
        number_seat: Set(input.number_seat),
        status: Set(TableStatus::Ready),
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
    info!(id = created.id, "table_created");
    Ok(created)
}

/// A requested `ready` is replaced by the status the table's live bookings imply.
#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn update(db: &DatabaseConnection, ctx: &AuditContext, id: i32, input: UpdateTableInput) -> Result<tables_restaurant::Model, ServiceError> {
    let input = UpdateTableInput { name: clean(input.name), note: input.note.map(|n| n.trim().to_string()), ..input };
    input.validate()?;

    let txn = db.begin().await?;
    let current = get_data_by_id::<Entity, _>(&txn, MODULE, id).await?;
    let mut am = current.clone().into_active_model();
    if let Some(v) = input.name {
        am.name = Set(v);
    }
    if let Some(v) = input.number_seat {
        am.number_seat = Set(v);
    }
    if let Some(v) = input.note {
        am.note = Set(Some(v).filter(|n| !n.is_empty()));
    }
    if let Some(status) = input.status {
        let status = if status == TableStatus::Ready {
            let has_seated = count_bookings(&txn, id, BookingStatus::Seated).await? > 0;
            derive_table_status(has_seated, exists_waiting_booking(&txn, id).await?)
        } else {
            status
        };
        am.status = Set(status);
    }
    am.updated_at = Set(Utc::now().fixed_offset());
    am.updated_by = Set(Some(ctx.user_id));
    let updated = am.update(&txn).await?;
    record_user_logging(&txn, ctx, MODULE, Some(id), Some(snapshot(&current)?), Some(snapshot(&updated)?)).await?;
    txn.commit().await?;
    Ok(updated)
}

pub async fn delete(db: &DatabaseConnection, ctx: &AuditContext, id: i32) -> Result<tables_restaurant::Model, ServiceError> {
    let txn = db.begin().await?;
    let deleted = soft_delete_with_log::<Entity, _>(&txn, ctx, MODULE, id).await?;
    txn.commit().await?;
    info!(id, "table_deleted");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking as booking_service;
    use crate::test_support::{ctx, get_db, table_fixture};

    #[test]
    fn derive_status_prefers_seated_then_waiting() {
        assert_eq!(derive_table_status(true, true), TableStatus::Occupied);
        assert_eq!(derive_table_status(true, false), TableStatus::Occupied);
        assert_eq!(derive_table_status(false, true), TableStatus::Booked);
        assert_eq!(derive_table_status(false, false), TableStatus::Ready);
    }

    #[tokio::test]
    async fn create_forces_ready() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = create(&db, &ctx(), CreateTableInput { name: " A1 ".into(), number_seat: 6, note: None }).await?;
        assert_eq!(t.status, TableStatus::Ready);
        assert_eq!(t.name, "A1");
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_by_status() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = table_fixture(&db, "A").await?;
        table_fixture(&db, "B").await?;
        update(&db, &ctx(), a.id, UpdateTableInput { status: Some(TableStatus::Occupied), ..Default::default() }).await?;
        let q = TableListQuery { status: Some(TableStatus::Occupied), ..Default::default() };
        let page = list(&db, &q).await?;
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id, a.id);
        Ok(())
    }

    fn booking_for(table_id: i32) -> booking_service::CreateBookingInput {
        booking_service::CreateBookingInput {
            table_id,
            name_customer: "Tran Thi B".into(),
            phone: "0907654321".into(),
            number_people: 2,
            arrival_time: Utc::now().fixed_offset(),
            note: None,
        }
    }

    fn patch_ready() -> UpdateTableInput {
        UpdateTableInput { status: Some(TableStatus::Ready), ..Default::default() }
    }

    #[tokio::test]
    async fn ready_request_stays_booked_while_booking_waits() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = table_fixture(&db, "W1").await?;
        booking_service::create(&db, &ctx(), booking_for(t.id)).await?;

        let updated = update(&db, &ctx(), t.id, patch_ready()).await?;
        assert_eq!(updated.status, TableStatus::Booked);
        assert_eq!(get(&db, t.id).await?.status, TableStatus::Booked);
        Ok(())
    }

    #[tokio::test]
    async fn ready_request_stays_occupied_while_party_seated() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = table_fixture(&db, "S1").await?;
        let b = booking_service::create(&db, &ctx(), booking_for(t.id)).await?;
        let seated = booking_service::UpdateBookingInput { status: Some(BookingStatus::Seated), ..Default::default() };
        booking_service::update(&db, &ctx(), b.id, seated).await?;

        let updated = update(&db, &ctx(), t.id, patch_ready()).await?;
        assert_eq!(updated.status, TableStatus::Occupied);

        let done = booking_service::UpdateBookingInput { status: Some(BookingStatus::Done), ..Default::default() };
        booking_service::update(&db, &ctx(), b.id, done).await?;
        assert_eq!(update(&db, &ctx(), t.id, patch_ready()).await?.status, TableStatus::Ready);
        Ok(())
    }

    #[tokio::test]
    async fn deleted_table_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = table_fixture(&db, "Z").await?;
        delete(&db, &ctx(), t.id).await?;
        assert!(matches!(get(&db, t.id).await, Err(ServiceError::NotFound { module: "table", .. })));
        assert!(matches!(delete(&db, &ctx(), t.id).await, Err(ServiceError::NotFound { .. })));
        Ok(())
    }
}
