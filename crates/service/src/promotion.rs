use chrono::Utc;
use common::pagination::empty_as_none;
use common::{ListData, ListQuery};
use models::promotion::{self, Column, Entity};
use models::soft_delete::SoftDelete;
use models::status::PromotionStatus;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::database::{clean, get_data_by_id, record_user_logging, snapshot, soft_delete_with_log, AuditContext};
use crate::errors::ServiceError;
use crate::pagination::{fetch_list, keyword_filter, order, Pagination};

pub const MODULE: &str = "promotion";
pub const ORDER_BY: [&str; 4] = ["createdAt", "name", "percent", "id"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionListQuery {
    #[serde(flatten)]
    pub base: ListQuery,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<PromotionStatus>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub percent: i32,
    pub status: Option<PromotionStatus>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromotionInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub percent: Option<i32>,
    pub status: Option<PromotionStatus>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

fn order_column(name: &str) -> Column {
    match name {
        "name" => Column::Name,
        "percent" => Column::Percent,
        "id" => Column::Id,
        _ => Column::CreatedAt,
    }
}

pub async fn list(db: &DatabaseConnection, q: &PromotionListQuery) -> Result<ListData<promotion::Model>, ServiceError> {
    q.base.validate()?;
    let order_by = q.base.order_by_or(&ORDER_BY).map_err(ServiceError::Validation)?;
    let mut select = keyword_filter(Entity::find_active(), Column::Name, &q.base);
    if let Some(status) = q.status {
        select = select.filter(Column::Status.eq(status));
    }
    let select = order(select, order_column(order_by), q.base.direction());
    fetch_list(db, select, Pagination::from(&q.base)).await
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<promotion::Model, ServiceError> {
    get_data_by_id::<Entity, _>(db, MODULE, id).await
}

#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn create(db: &DatabaseConnection, ctx: &AuditContext, mut input: CreatePromotionInput) -> Result<promotion::Model, ServiceError> {
    input.name = input.name.trim().to_string();
    input.note = clean(input.note);
    input.validate()?;
    promotion::validate_percent(input.percent)?;

    let txn = db.begin().await?;
    let now = Utc::now().fixed_offset();
    let created = promotion::ActiveModel {
        name: Set(input.name),
        percent: Set(input.percent),
        note: Set(input.note),
        status: Set(input.status.unwrap_or(PromotionStatus::Active)),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(Some(ctx.user_id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    record_user_logging(&txn, ctx, MODULE, Some(created.id), None, Some(snapshot(&created)?)).await?;
    txn.commit().await?;
    info!(id = created.id, percent = created.percent, "promotion_created");
    Ok(created)
}

#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn update(db: &DatabaseConnection, ctx: &AuditContext, id: i32, input: UpdatePromotionInput) -> Result<promotion::Model, ServiceError> {
    let input = UpdatePromotionInput { name: clean(input.name), note: input.note.map(|n| n.trim().to_string()), ..input };
    input.validate()?;
    if let Some(p) = input.percent {
        promotion::validate_percent(p)?;
    }

    let txn = db.begin().await?;
    let current = get_data_by_id::<Entity, _>(&txn, MODULE, id).await?;
    let mut am = current.clone().into_active_model();
    if let Some(v) = input.name {
        am.name = Set(v);
    }
    if let Some(v) = input.percent {
        am.percent = Set(v);
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
    record_user_logging(&txn, ctx, MODULE, Some(id), Some(snapshot(&current)?), Some(snapshot(&updated)?)).await?;
    txn.commit().await?;
    Ok(updated)
}

pub async fn delete(db: &DatabaseConnection, ctx: &AuditContext, id: i32) -> Result<promotion::Model, ServiceError> {
    let txn = db.begin().await?;
    let deleted = soft_delete_with_log::<Entity, _>(&txn, ctx, MODULE, id).await?;
    txn.commit().await?;
    info!(id, "promotion_deleted");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, get_db};

    #[tokio::test]
    async fn seeded_promotions_are_listed() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let page = list(&db, &PromotionListQuery::default()).await?;
        assert_eq!(page.total_items, 2);
        let q = PromotionListQuery { base: ListQuery { keyword: Some("Khai".into()), ..Default::default() }, ..Default::default() };
        let page = list(&db, &q).await?;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].percent, 50);
        Ok(())
    }

    #[tokio::test]
    async fn percent_out_of_range_is_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let input = CreatePromotionInput { name: "Tet".into(), percent: 120, status: None, note: None };
        assert!(matches!(create(&db, &ctx(), input).await, Err(ServiceError::Model(_))));
        Ok(())
    }

    #[tokio::test]
    async fn deactivate_then_filter_and_delete() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = create(&db, &ctx(), CreatePromotionInput { name: "Tet".into(), percent: 15, status: None, note: None }).await?;
        assert_eq!(p.status, PromotionStatus::Active);
        update(&db, &ctx(), p.id, UpdatePromotionInput { status: Some(PromotionStatus::Inactive), ..Default::default() }).await?;

        let q = PromotionListQuery { status: Some(PromotionStatus::Inactive), ..Default::default() };
        let page = list(&db, &q).await?;
        assert_eq!(page.items.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), vec!["Tet"]);

        delete(&db, &ctx(), p.id).await?;
        assert_eq!(list(&db, &q).await?.total_items, 0);
        Ok(())
    }
}
