//! Table bookings. Every mutation re-derives the status of the affected table(s)
//! in the same transaction.

use chrono::{DateTime, FixedOffset, Utc};
use common::pagination::empty_as_none;
use common::{metrics, ListData, ListQuery};
use models::booking::{self, Column, Entity};
use models::soft_delete::SoftDelete;
use models::status::BookingStatus;
use models::tables_restaurant;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, IntoActiveModel, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::database::{clean, get_data_by_id, record_user_logging, snapshot, soft_delete_with_log, AuditContext};
use crate::errors::ServiceError;
use crate::pagination::{fetch_list, order, Pagination};
use crate::table;

pub const MODULE: &str = "booking";
pub const ORDER_BY: [&str; 3] = ["createdAt", "arrivalTime", "id"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    #[serde(flatten)]
    pub base: ListQuery,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<BookingStatus>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub table_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingInput {
    pub table_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name_customer: String,
    pub phone: String,
    #[validate(range(min = 1, max = 100))]
    pub number_people: i32,
    pub arrival_time: DateTime<FixedOffset>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingInput {
    pub table_id: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub name_customer: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub number_people: Option<i32>,
    pub arrival_time: Option<DateTime<FixedOffset>>,
    pub status: Option<BookingStatus>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

fn order_column(name: &str) -> Column {
    match name {
        "arrivalTime" => Column::ArrivalTime,
        "id" => Column::Id,
        _ => Column::CreatedAt,
    }
}

pub async fn list(db: &DatabaseConnection, q: &BookingListQuery) -> Result<ListData<booking::Model>, ServiceError> {
    q.base.validate()?;
    let order_by = q.base.order_by_or(&ORDER_BY).map_err(ServiceError::Validation)?;
    let mut select = Entity::find_active();
    if let Some(k) = q.base.keyword() {
        select = select.filter(Condition::any().add(Column::NameCustomer.contains(k)).add(Column::Phone.contains(k)));
    }
    if let Some(status) = q.status {
        select = select.filter(Column::Status.eq(status));
    }
    if let Some(table_id) = q.table_id {
        select = select.filter(Column::TableId.eq(table_id));
    }
    let select = order(select, order_column(order_by), q.base.direction());
    fetch_list(db, select, Pagination::from(&q.base)).await
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<booking::Model, ServiceError> {
    get_data_by_id::<Entity, _>(db, MODULE, id).await
}

/// New bookings always start `waiting`, which books their table.
#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id, table_id = input.table_id))]
pub async fn create(db: &DatabaseConnection, ctx: &AuditContext, mut input: CreateBookingInput) -> Result<booking::Model, ServiceError> {
    input.name_customer = input.name_customer.trim().to_string();
    input.phone = input.phone.trim().to_string();
    input.note = clean(input.note);
    input.validate()?;
    booking::validate_phone(&input.phone)?;

    let txn = db.begin().await?;
    get_data_by_id::<tables_restaurant::Entity, _>(&txn, table::MODULE, input.table_id).await?;
    let now = Utc::now().fixed_offset();
    let created = booking::ActiveModel {
        table_id: Set(input.table_id),
        name_customer: Set(input.name_customer),
        phone: Set(input.phone),
        number_people: Set(input.number_people),
        arrival_time: Set(input.arrival_time),
        status: Set(BookingStatus::Waiting),
        note: Set(input.note),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(Some(ctx.user_id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    let table_status = table::sync_status_with_bookings(&txn, created.table_id, ctx.user_id).await?;
    record_user_logging(&txn, ctx, MODULE, Some(created.id), None, Some(snapshot(&created)?)).await?;
    txn.commit().await?;
    metrics::record_booking("create");
    info!(id = created.id, table_id = created.table_id, %table_status, "booking_created");
    Ok(created)
}

#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn update(db: &DatabaseConnection, ctx: &AuditContext, id: i32, input: UpdateBookingInput) -> Result<booking::Model, ServiceError> {
    let input = UpdateBookingInput {
        name_customer: clean(input.name_customer),
        phone: clean(input.phone),
        note: input.note.map(|n| n.trim().to_string()),
        ..input
    };
    input.validate()?;
    if let Some(phone) = &input.phone {
        booking::validate_phone(phone)?;
    }

    let txn = db.begin().await?;
    let current = get_data_by_id::<Entity, _>(&txn, MODULE, id).await?;
    if let Some(next) = input.status {
        if !current.status.can_transition_to(next) {
            return Err(ServiceError::transition(current.status, next));
        }
    }
    if let Some(table_id) = input.table_id {
        if table_id != current.table_id {
            get_data_by_id::<tables_restaurant::Entity, _>(&txn, table::MODULE, table_id).await?;
        }
    }

    let mut am = current.clone().into_active_model();
    if let Some(v) = input.table_id {
        am.table_id = Set(v);
    }
    if let Some(v) = input.name_customer {
        am.name_customer = Set(v);
    }
    if let Some(v) = input.phone {
        am.phone = Set(v);
    }
    if let Some(v) = input.number_people {
        am.number_people = Set(v);
    }
    if let Some(v) = input.arrival_time {
        am.arrival_time = Set(v);
    }
    if let Some(v) = input.status {
        am.status = Set(v);
    }
    if let Some(v) = input.note {
        am.note = Set(Some(v).filter(|n| !n.is_empty()));
    }
    am.updated_at = Set(Utc::now().fixed_offset());
    am.updated_by = Set(Some(ctx.user_id));
    let updated = am.update(&txn).await?;

    table::sync_status_with_bookings(&txn, updated.table_id, ctx.user_id).await?;
    if updated.table_id != current.table_id {
        table::sync_status_with_bookings(&txn, current.table_id, ctx.user_id).await?;
    }
    record_user_logging(&txn, ctx, MODULE, Some(id), Some(snapshot(&current)?), Some(snapshot(&updated)?)).await?;
    txn.commit().await?;
    metrics::record_booking("update");
    info!(id, status = %updated.status, "booking_updated");
    Ok(updated)
}

/// Soft delete; the table falls back to whatever its remaining bookings imply.
pub async fn delete(db: &DatabaseConnection, ctx: &AuditContext, id: i32) -> Result<booking::Model, ServiceError> {
    let txn = db.begin().await?;
    let deleted = soft_delete_with_log::<Entity, _>(&txn, ctx, MODULE, id).await?;
    table::sync_status_with_bookings(&txn, deleted.table_id, ctx.user_id).await?;
    txn.commit().await?;
    metrics::record_booking("delete");
    info!(id, table_id = deleted.table_id, "booking_deleted");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, get_db, table_fixture};
    use models::status::TableStatus;

    fn input(table_id: i32, name: &str) -> CreateBookingInput {
        CreateBookingInput {
            table_id,
            name_customer: name.into(),
            phone: "0901234567".into(),
            number_people: 2,
            arrival_time: Utc::now().fixed_offset(),
            note: None,
        }
    }

    async fn table_status(db: &DatabaseConnection, id: i32) -> Result<TableStatus, anyhow::Error> {
        Ok(table::get(db, id).await?.status)
    }

    #[tokio::test]
    async fn create_books_table_and_delete_frees_it() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = table_fixture(&db, "T1").await?;
        let b = create(&db, &ctx(), input(t.id, "An")).await?;
        assert_eq!(b.status, BookingStatus::Waiting);
        assert_eq!(table_status(&db, t.id).await?, TableStatus::Booked);

        delete(&db, &ctx(), b.id).await?;
        assert_eq!(table_status(&db, t.id).await?, TableStatus::Ready);
        Ok(())
    }

    #[tokio::test]
    async fn table_stays_booked_while_another_booking_waits() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = table_fixture(&db, "T2").await?;
        let first = create(&db, &ctx(), input(t.id, "An")).await?;
        create(&db, &ctx(), input(t.id, "Binh")).await?;
        update(&db, &ctx(), first.id, UpdateBookingInput { status: Some(BookingStatus::Canceled), ..Default::default() }).await?;
        assert_eq!(table_status(&db, t.id).await?, TableStatus::Booked);
        Ok(())
    }

    #[tokio::test]
    async fn seated_party_occupies_until_done() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = table_fixture(&db, "T3").await?;
        let b = create(&db, &ctx(), input(t.id, "Chi")).await?;
        update(&db, &ctx(), b.id, UpdateBookingInput { status: Some(BookingStatus::Seated), ..Default::default() }).await?;
        assert_eq!(table_status(&db, t.id).await?, TableStatus::Occupied);

        // a later waiting booking does not un-occupy the table
        let later = create(&db, &ctx(), input(t.id, "Dung")).await?;
        assert_eq!(table_status(&db, t.id).await?, TableStatus::Occupied);

        update(&db, &ctx(), b.id, UpdateBookingInput { status: Some(BookingStatus::Done), ..Default::default() }).await?;
        assert_eq!(table_status(&db, t.id).await?, TableStatus::Booked);

        delete(&db, &ctx(), later.id).await?;
        assert_eq!(table_status(&db, t.id).await?, TableStatus::Ready);
        Ok(())
    }

    #[tokio::test]
    async fn moving_booking_resyncs_both_tables() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let from = table_fixture(&db, "From").await?;
        let to = table_fixture(&db, "To").await?;
        let b = create(&db, &ctx(), input(from.id, "Em")).await?;
        update(&db, &ctx(), b.id, UpdateBookingInput { table_id: Some(to.id), ..Default::default() }).await?;
        assert_eq!(table_status(&db, from.id).await?, TableStatus::Ready);
        assert_eq!(table_status(&db, to.id).await?, TableStatus::Booked);
        Ok(())
    }

    #[tokio::test]
    async fn terminal_booking_cannot_reopen() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = table_fixture(&db, "T4").await?;
        let b = create(&db, &ctx(), input(t.id, "Giang")).await?;
        update(&db, &ctx(), b.id, UpdateBookingInput { status: Some(BookingStatus::Canceled), ..Default::default() }).await?;
        let err = update(&db, &ctx(), b.id, UpdateBookingInput { status: Some(BookingStatus::Waiting), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn booking_on_missing_table_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = create(&db, &ctx(), input(4242, "Hoa")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { module: "table", id: 4242 }));
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_by_table_and_keyword() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t1 = table_fixture(&db, "L1").await?;
        let t2 = table_fixture(&db, "L2").await?;
        create(&db, &ctx(), input(t1.id, "Khanh")).await?;
        create(&db, &ctx(), input(t2.id, "Khoa")).await?;
        create(&db, &ctx(), input(t2.id, "Linh")).await?;

        let q = BookingListQuery { table_id: Some(t2.id), ..Default::default() };
        assert_eq!(list(&db, &q).await?.total_items, 2);

        let q = BookingListQuery { base: ListQuery { keyword: Some("Kh".into()), ..Default::default() }, ..Default::default() };
        assert_eq!(list(&db, &q).await?.total_items, 2);
        Ok(())
    }
}
