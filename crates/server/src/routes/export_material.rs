use axum::extract::{Path, Query, State};
use axum::Json;
use common::types::IdOnly;
use common::{ListData, SuccessBody};
use models::{export_material, export_material_order};
use service::auth::{Action, Resource};
use service::export_material::{
    self as exports, CreateExportMaterialInput, CreateExportOrderInput, ExportMaterialWithOrders, ExportOrderListQuery,
    UpdateExportMaterialInput,
};
use service::warehouse::{DocumentListQuery, UpdateOrderLineInput};

use crate::auth::{LoginUser, ServerState};
use crate::errors::ApiResult;
use crate::openapi::{ListQueryDoc, StatusFilterDoc};

#[utoipa::path(get, path = "/export-material", tag = "export-material", security(("bearer" = [])),
    params(ListQueryDoc, StatusFilterDoc),
    responses((status = 200, description = "Page of export receipts")))]
pub async fn list(
    State(state): State<ServerState>,
    user: LoginUser,
    Query(q): Query<DocumentListQuery>,
) -> ApiResult<Json<SuccessBody<ListData<export_material::Model>>>> {
    user.require(Resource::ExportMaterial, Action::Read)?;
    Ok(user.ok(exports::list(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/export-material/{id}", tag = "export-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Export receipt id")),
    responses((status = 200, description = "Export receipt with its lines"), (status = 404, description = "Export receipt does not exist")))]
pub async fn get(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<ExportMaterialWithOrders>>> {
    user.require(Resource::ExportMaterial, Action::Read)?;
    Ok(user.ok(exports::get(&state.db, id).await?))
}

#[utoipa::path(post, path = "/export-material", tag = "export-material", security(("bearer" = [])),
    responses((status = 200, description = "Created export receipt")))]
pub async fn create(
    State(state): State<ServerState>,
    user: LoginUser,
    Json(input): Json<CreateExportMaterialInput>,
) -> ApiResult<Json<SuccessBody<export_material::Model>>> {
    user.require(Resource::ExportMaterial, Action::Create)?;
    Ok(user.ok(exports::create(&state.db, &user.audit(), input).await?))
}

#[utoipa::path(patch, path = "/export-material/{id}", tag = "export-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Export receipt id")),
    responses((status = 200, description = "Updated receipt; approval takes stock out"), (status = 409, description = "Receipt already closed")))]
pub async fn update(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateExportMaterialInput>,
) -> ApiResult<Json<SuccessBody<export_material::Model>>> {
    user.require(Resource::ExportMaterial, Action::Update)?;
    Ok(user.ok(exports::update(&state.db, &user.audit(), id, input).await?))
}

#[utoipa::path(delete, path = "/export-material/{id}", tag = "export-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Export receipt id")),
    responses((status = 200, description = "Deleted receipt"), (status = 409, description = "Receipt already closed")))]
pub async fn delete(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<IdOnly>>> {
    user.require(Resource::ExportMaterial, Action::Delete)?;
    Ok(user.deleted(exports::delete(&state.db, &user.audit(), id).await?.id))
}

#[utoipa::path(get, path = "/export-material-order", tag = "export-material", security(("bearer" = [])),
    params(ListQueryDoc, ("exportMaterialId" = Option<i32>, Query, description = "Parent receipt")),
    responses((status = 200, description = "Page of export lines")))]
pub async fn list_orders(
    State(state): State<ServerState>,
    user: LoginUser,
    Query(q): Query<ExportOrderListQuery>,
) -> ApiResult<Json<SuccessBody<ListData<export_material_order::Model>>>> {
    user.require(Resource::ExportMaterial, Action::Read)?;
    Ok(user.ok(exports::list_orders(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/export-material-order/{id}", tag = "export-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Line id")),
    responses((status = 200, description = "Export line"), (status = 404, description = "Line does not exist")))]
pub async fn get_order(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<SuccessBody<export_material_order::Model>>> {
    user.require(Resource::ExportMaterial, Action::Read)?;
    Ok(user.ok(exports::get_order(&state.db, id).await?))
}

#[utoipa::path(post, path = "/export-material-order", tag = "export-material", security(("bearer" = [])),
    responses((status = 200, description = "Created line; receipt total recomputed"), (status = 409, description = "Receipt already closed")))]
pub async fn create_order(
    State(state): State<ServerState>,
    user: LoginUser,
    Json(input): Json<CreateExportOrderInput>,
) -> ApiResult<Json<SuccessBody<export_material_order::Model>>> {
    user.require(Resource::ExportMaterial, Action::Create)?;
    Ok(user.ok(exports::create_order(&state.db, &user.audit(), input).await?))
}

#[utoipa::path(patch, path = "/export-material-order/{id}", tag = "export-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Line id")),
    responses((status = 200, description = "Updated line; receipt total recomputed"), (status = 409, description = "Receipt already closed")))]
pub async fn update_order(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateOrderLineInput>,
) -> ApiResult<Json<SuccessBody<export_material_order::Model>>> {
    user.require(Resource::ExportMaterial, Action::Update)?;
    Ok(user.ok(exports::update_order(&state.db, &user.audit(), id, input).await?))
}

#[utoipa::path(delete, path = "/export-material-order/{id}", tag = "export-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Line id")),
    responses((status = 200, description = "Deleted line; receipt total recomputed"), (status = 409, description = "Receipt already closed")))]
pub async fn delete_order(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<SuccessBody<IdOnly>>> {
    user.require(Resource::ExportMaterial, Action::Delete)?;
    Ok(user.deleted(exports::delete_order(&state.db, &user.audit(), id).await?.id))
}
