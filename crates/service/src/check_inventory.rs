//! Stock-take documents. A check seeds one line per material; approving it
//! overwrites on-hand quantities with the counted values.

use chrono::Utc;
use common::pagination::empty_as_none;
use common::{metrics, ListData, ListQuery};
use models::check_inventory::{self, Column, Entity};
use models::check_inventory_detail as detail;
use models::material;
use models::soft_delete::SoftDelete;
use models::status::AcceptStatus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::database::{clean, get_data_by_id, record_user_logging, snapshot, AuditContext};
use crate::errors::ServiceError;
use crate::material as material_service;
use crate::pagination::{fetch_list, keyword_filter, order, Pagination};

pub const MODULE: &str = "checkInventory";
pub const DETAIL_MODULE: &str = "checkInventoryDetail";
pub const ORDER_BY: [&str; 2] = ["createdAt", "id"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInventoryListQuery {
    #[serde(flatten)]
    pub base: ListQuery,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<AcceptStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckInventoryInput {
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheckInventoryInput {
    pub status: Option<AcceptStatus>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheckInventoryDetailInput {
    #[validate(range(min = 0))]
    pub inventory_quantity: Option<i32>,
    #[validate(range(min = 0))]
    pub damaged_quantity: Option<i32>,
    pub status: Option<AcceptStatus>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Detail line with the material it counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInventoryDetailView {
    #[serde(flatten)]
    pub detail: detail::Model,
    pub material: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInventoryWithDetails {
    #[serde(flatten)]
    pub check: check_inventory::Model,
    pub details: Vec<CheckInventoryDetailView>,
}

fn order_column(name: &str) -> Column {
    match name {
        "id" => Column::Id,
        _ => Column::CreatedAt,
    }
}

pub async fn list(db: &DatabaseConnection, q: &CheckInventoryListQuery) -> Result<ListData<check_inventory::Model>, ServiceError> {
    q.base.validate()?;
    let order_by = q.base.order_by_or(&ORDER_BY).map_err(ServiceError::Validation)?;
    let mut select = keyword_filter(Entity::find_active(), Column::Note, &q.base);
    if let Some(status) = q.status {
        select = select.filter(Column::Status.eq(status));
    }
    let select = order(select, order_column(order_by), q.base.direction());
    fetch_list(db, select, Pagination::from(&q.base)).await
}

async fn details_of<C: ConnectionTrait>(db: &C, check_id: i32) -> Result<Vec<CheckInventoryDetailView>, ServiceError> {
    let rows = detail::Entity::find_active()
        .filter(detail::Column::CheckInventoryId.eq(check_id))
        .order_by_asc(detail::Column::Id)
        .find_also_related(material::Entity)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(d, m)| CheckInventoryDetailView {
            detail: d,
            material: m.as_ref().map(|m| m.material.clone()),
            unit: m.map(|m| m.unit),
        })
        .collect())
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<CheckInventoryWithDetails, ServiceError> {
    let check = get_data_by_id::<Entity, _>(db, MODULE, id).await?;
    let details = details_of(db, id).await?;
    Ok(CheckInventoryWithDetails { check, details })
}

/// Opens a new check with one zeroed line per live material. Only one check
/// may be waiting for approval at a time.
#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn create(db: &DatabaseConnection, ctx: &AuditContext, input: CreateCheckInventoryInput) -> Result<CheckInventoryWithDetails, ServiceError> {
    let input = CreateCheckInventoryInput { note: clean(input.note) };
    input.validate()?;

    let txn = db.begin().await?;
    let waiting = Entity::find_active().filter(Column::Status.eq(AcceptStatus::WaitingApprove)).count(&txn).await?;
    if waiting > 0 {
        return Err(ServiceError::WaitingCheckExists);
    }
    let now = Utc::now().fixed_offset();
    let check = check_inventory::ActiveModel {
        warehouse_staff_id: Set(ctx.user_id),
        status: Set(AcceptStatus::WaitingApprove),
        note: Set(input.note),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(Some(ctx.user_id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let materials = material::Entity::find_active().order_by_asc(material::Column::Id).all(&txn).await?;
    let lines: Vec<detail::ActiveModel> = materials
        .iter()
        .map(|m| detail::ActiveModel {
            check_inventory_id: Set(check.id),
            material_id: Set(m.id),
            inventory_quantity: Set(0),
            damaged_quantity: Set(0),
            status: Set(AcceptStatus::WaitingApprove),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(Some(ctx.user_id)),
            ..Default::default()
        })
        .collect();
    if !lines.is_empty() {
        detail::Entity::insert_many(lines).exec(&txn).await?;
    }
    record_user_logging(&txn, ctx, MODULE, Some(check.id), None, Some(snapshot(&check)?)).await?;
    let details = details_of(&txn, check.id).await?;
    txn.commit().await?;
    info!(id = check.id, lines = details.len(), "check_inventory_created");
    Ok(CheckInventoryWithDetails { check, details })
}

/// Status/note patch. Approval needs every line approved first and then
/// writes each counted quantity onto its material.
#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn update(db: &DatabaseConnection, ctx: &AuditContext, id: i32, input: UpdateCheckInventoryInput) -> Result<check_inventory::Model, ServiceError> {
    let input = UpdateCheckInventoryInput { note: input.note.map(|n| n.trim().to_string()), ..input };
    input.validate()?;

    let txn = db.begin().await?;
    let current = get_data_by_id::<Entity, _>(&txn, MODULE, id).await?;
    let next = input.status.unwrap_or(current.status);
    if !current.status.can_transition_to(next) {
        return Err(ServiceError::transition(current.status, next));
    }

    let approving = next == AcceptStatus::Approve;
    if approving {
        let lines = detail::Entity::find_active().filter(detail::Column::CheckInventoryId.eq(id)).all(&txn).await?;
        if lines.iter().any(|l| l.status != AcceptStatus::Approve) {
            metrics::record_approval("check_inventory", "incomplete");
            return Err(ServiceError::NotAllApproved(format!("{MODULE} {id}")));
        }
        for line in &lines {
            match material_service::set_stock(&txn, line.material_id, line.inventory_quantity, ctx.user_id).await {
                Ok(()) => {}
                Err(ServiceError::NotFound { .. }) => {
                    warn!(check_id = id, material_id = line.material_id, "material removed since the check opened; skipped");
                }
                Err(e) => return Err(e),
            }
        }
    }

    let mut am = current.clone().into_active_model();
    am.status = Set(next);
    if let Some(v) = input.note {
        am.note = Set(Some(v).filter(|n| !n.is_empty()));
    }
    am.updated_at = Set(Utc::now().fixed_offset());
    am.updated_by = Set(Some(ctx.user_id));
    let updated = am.update(&txn).await?;
    record_user_logging(&txn, ctx, MODULE, Some(id), Some(snapshot(&current)?), Some(snapshot(&updated)?)).await?;
    txn.commit().await?;

    if current.status != updated.status {
        metrics::record_approval("check_inventory", &updated.status.to_string());
        info!(id, status = %updated.status, "check_inventory_closed");
    }
    Ok(updated)
}

pub async fn list_details(db: &DatabaseConnection, check_id: i32) -> Result<Vec<CheckInventoryDetailView>, ServiceError> {
    get_data_by_id::<Entity, _>(db, MODULE, check_id).await?;
    details_of(db, check_id).await
}

pub async fn get_detail(db: &DatabaseConnection, id: i32) -> Result<detail::Model, ServiceError> {
    get_data_by_id::<detail::Entity, _>(db, DETAIL_MODULE, id).await
}

/// Record counted/damaged quantities or approve a single line. Lines are
/// frozen once their check leaves `waiting_approve`.
#[instrument(skip(db, ctx, input), fields(user_id = ctx.user_id))]
pub async fn update_detail(db: &DatabaseConnection, ctx: &AuditContext, id: i32, input: UpdateCheckInventoryDetailInput) -> Result<detail::Model, ServiceError> {
    let input = UpdateCheckInventoryDetailInput { note: input.note.map(|n| n.trim().to_string()), ..input };
    input.validate()?;

    let txn = db.begin().await?;
    let current = get_data_by_id::<detail::Entity, _>(&txn, DETAIL_MODULE, id).await?;
    let parent = get_data_by_id::<Entity, _>(&txn, MODULE, current.check_inventory_id).await?;
    if parent.status != AcceptStatus::WaitingApprove {
        return Err(ServiceError::Conflict(format!("{MODULE} {} is already {}", parent.id, parent.status)));
    }

    let mut am = current.clone().into_active_model();
    if let Some(v) = input.inventory_quantity {
        am.inventory_quantity = Set(v);
    }
    if let Some(v) = input.damaged_quantity {
        am.damaged_quantity = Set(v);
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
    record_user_logging(&txn, ctx, DETAIL_MODULE, Some(id), Some(snapshot(&current)?), Some(snapshot(&updated)?)).await?;
    txn.commit().await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, get_db, material_fixture};

    fn approve_line() -> UpdateCheckInventoryDetailInput {
        UpdateCheckInventoryDetailInput { status: Some(AcceptStatus::Approve), ..Default::default() }
    }

    fn approve() -> UpdateCheckInventoryInput {
        UpdateCheckInventoryInput { status: Some(AcceptStatus::Approve), note: None }
    }

    #[tokio::test]
    async fn create_seeds_one_line_per_material() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        material_fixture(&db, "Rice", 10).await?;
        material_fixture(&db, "Egg", 30).await?;
        let check = create(&db, &ctx(), CreateCheckInventoryInput::default()).await?;
        assert_eq!(check.check.status, AcceptStatus::WaitingApprove);
        assert_eq!(check.check.warehouse_staff_id, 1);
        assert_eq!(check.details.len(), 2);
        assert!(check.details.iter().all(|d| d.detail.inventory_quantity == 0 && d.unit.as_deref() == Some("kg")));
        Ok(())
    }

    #[tokio::test]
    async fn only_one_waiting_check_at_a_time() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let first = create(&db, &ctx(), CreateCheckInventoryInput::default()).await?;
        let err = create(&db, &ctx(), CreateCheckInventoryInput::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::WaitingCheckExists));

        update(&db, &ctx(), first.check.id, UpdateCheckInventoryInput { status: Some(AcceptStatus::Reject), note: None }).await?;
        create(&db, &ctx(), CreateCheckInventoryInput::default()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn approval_needs_every_line_and_leaves_stock_untouched() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let rice = material_fixture(&db, "Rice", 10).await?;
        material_fixture(&db, "Egg", 30).await?;
        let check = create(&db, &ctx(), CreateCheckInventoryInput::default()).await?;
        let first = &check.details[0];
        update_detail(
            &db,
            &ctx(),
            first.detail.id,
            UpdateCheckInventoryDetailInput { inventory_quantity: Some(7), status: Some(AcceptStatus::Approve), ..Default::default() },
        )
        .await?;

        let err = update(&db, &ctx(), check.check.id, approve()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotAllApproved(_)));
        let reloaded = get(&db, check.check.id).await?;
        assert_eq!(reloaded.check.status, AcceptStatus::WaitingApprove);
        assert_eq!(material_service::get(&db, rice.id).await?.quantity, 10);
        Ok(())
    }

    #[tokio::test]
    async fn approval_overwrites_quantities() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let rice = material_fixture(&db, "Rice", 10).await?;
        let egg = material_fixture(&db, "Egg", 30).await?;
        let check = create(&db, &ctx(), CreateCheckInventoryInput::default()).await?;
        for line in &check.details {
            let counted = if line.detail.material_id == rice.id { 4 } else { 28 };
            update_detail(
                &db,
                &ctx(),
                line.detail.id,
                UpdateCheckInventoryDetailInput { inventory_quantity: Some(counted), ..approve_line() },
            )
            .await?;
        }
        let approved = update(&db, &ctx(), check.check.id, approve()).await?;
        assert_eq!(approved.status, AcceptStatus::Approve);
        assert_eq!(material_service::get(&db, rice.id).await?.quantity, 4);
        assert_eq!(material_service::get(&db, egg.id).await?.quantity, 28);

        // closed documents are final and their lines frozen
        let err = update(&db, &ctx(), check.check.id, UpdateCheckInventoryInput { status: Some(AcceptStatus::Reject), note: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
        let err = update_detail(&db, &ctx(), check.details[0].detail.id, approve_line()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn details_of_missing_check_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = list_details(&db, 999).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { module: MODULE, id: 999 }));
        Ok(())
    }
}
