use axum::extract::{Path, Query, State};
use axum::Json;
use common::{ListData, SuccessBody};
use models::{check_inventory, check_inventory_detail};
use serde::Deserialize;
use service::auth::{Action, Resource};
use service::check_inventory::{
    self as checks, CheckInventoryDetailView, CheckInventoryListQuery, CheckInventoryWithDetails, CreateCheckInventoryInput,
    UpdateCheckInventoryDetailInput, UpdateCheckInventoryInput,
};

use crate::auth::{LoginUser, ServerState};
use crate::errors::ApiResult;
use crate::openapi::{ListQueryDoc, StatusFilterDoc};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailListQuery {
    pub check_inventory_id: i32,
}

#[utoipa::path(get, path = "/check-inventory", tag = "check-inventory", security(("bearer" = [])),
    params(ListQueryDoc, StatusFilterDoc),
    responses((status = 200, description = "Page of inventory checks")))]
pub async fn list(
    State(state): State<ServerState>,
    user: LoginUser,
    Query(q): Query<CheckInventoryListQuery>,
) -> ApiResult<Json<SuccessBody<ListData<check_inventory::Model>>>> {
    user.require(Resource::CheckInventory, Action::Read)?;
    Ok(user.ok(checks::list(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/check-inventory/{id}", tag = "check-inventory", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Inventory check id")),
    responses((status = 200, description = "Inventory check with its lines"), (status = 404, description = "Inventory check does not exist")))]
pub async fn get(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<CheckInventoryWithDetails>>> {
    user.require(Resource::CheckInventory, Action::Read)?;
    Ok(user.ok(checks::get(&state.db, id).await?))
}

#[utoipa::path(post, path = "/check-inventory", tag = "check-inventory", security(("bearer" = [])),
    responses((status = 200, description = "New check with one line per material"), (status = 409, description = "A check is already waiting for approval")))]
pub async fn create(
    State(state): State<ServerState>,
    user: LoginUser,
    Json(input): Json<CreateCheckInventoryInput>,
) -> ApiResult<Json<SuccessBody<CheckInventoryWithDetails>>> {
    user.require(Resource::CheckInventory, Action::Create)?;
    Ok(user.ok(checks::create(&state.db, &user.audit(), input).await?))
}

#[utoipa::path(patch, path = "/check-inventory/{id}", tag = "check-inventory", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Inventory check id")),
    responses(
        (status = 200, description = "Updated check; approval overwrites material quantities"),
        (status = 409, description = "Closed check or lines not all approved")
    ))]
pub async fn update(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateCheckInventoryInput>,
) -> ApiResult<Json<SuccessBody<check_inventory::Model>>> {
    user.require(Resource::CheckInventory, Action::Update)?;
    Ok(user.ok(checks::update(&state.db, &user.audit(), id, input).await?))
}

#[utoipa::path(get, path = "/check-inventory-detail", tag = "check-inventory", security(("bearer" = [])),
    params(("checkInventoryId" = i32, Query, description = "Parent inventory check")),
    responses((status = 200, description = "Lines of the check"), (status = 404, description = "Inventory check does not exist")))]
pub async fn list_details(
    State(state): State<ServerState>,
    user: LoginUser,
    Query(q): Query<DetailListQuery>,
) -> ApiResult<Json<SuccessBody<ListData<CheckInventoryDetailView>>>> {
    user.require(Resource::CheckInventory, Action::Read)?;
    let items = checks::list_details(&state.db, q.check_inventory_id).await?;
    let total = items.len() as u64;
    Ok(user.ok(ListData::new(items, total)))
}

#[utoipa::path(get, path = "/check-inventory-detail/{id}", tag = "check-inventory", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Line id")),
    responses((status = 200, description = "Line"), (status = 404, description = "Line does not exist")))]
pub async fn get_detail(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<SuccessBody<check_inventory_detail::Model>>> {
    user.require(Resource::CheckInventory, Action::Read)?;
    Ok(user.ok(checks::get_detail(&state.db, id).await?))
}

#[utoipa::path(patch, path = "/check-inventory-detail/{id}", tag = "check-inventory", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Line id")),
    responses((status = 200, description = "Updated line"), (status = 409, description = "The check is already closed")))]
pub async fn update_detail(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateCheckInventoryDetailInput>,
) -> ApiResult<Json<SuccessBody<check_inventory_detail::Model>>> {
    user.require(Resource::CheckInventory, Action::Update)?;
    Ok(user.ok(checks::update_detail(&state.db, &user.audit(), id, input).await?))
}
