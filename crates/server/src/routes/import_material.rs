use axum::extract::{Path, Query, State};
use axum::Json;
use common::types::IdOnly;
use common::{ListData, SuccessBody};
use models::{import_material, import_material_order};
use service::auth::{Action, Resource};
use service::import_material::{
    self as imports, CreateImportMaterialInput, CreateImportOrderInput, ImportMaterialWithOrders, ImportOrderListQuery,
    UpdateImportMaterialInput,
};
use service::warehouse::{DocumentListQuery, UpdateOrderLineInput};

use crate::auth::{LoginUser, ServerState};
use crate::errors::ApiResult;
use crate::openapi::{ListQueryDoc, StatusFilterDoc};

#[utoipa::path(get, path = "/import-material", tag = "import-material", security(("bearer" = [])),
    params(ListQueryDoc, StatusFilterDoc),
    responses((status = 200, description = "Page of import receipts")))]
pub async fn list(
    State(state): State<ServerState>,
    user: LoginUser,
    Query(q): Query<DocumentListQuery>,
) -> ApiResult<Json<SuccessBody<ListData<import_material::Model>>>> {
    user.require(Resource::ImportMaterial, Action::Read)?;
    Ok(user.ok(imports::list(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/import-material/{id}", tag = "import-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Import receipt id")),
    responses((status = 200, description = "Import receipt with its lines"), (status = 404, description = "Import receipt does not exist")))]
pub async fn get(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<ImportMaterialWithOrders>>> {
    user.require(Resource::ImportMaterial, Action::Read)?;
    Ok(user.ok(imports::get(&state.db, id).await?))
}

#[utoipa::path(post, path = "/import-material", tag = "import-material", security(("bearer" = [])),
    responses((status = 200, description = "Created import receipt")))]
pub async fn create(
    State(state): State<ServerState>,
    user: LoginUser,
    Json(input): Json<CreateImportMaterialInput>,
) -> ApiResult<Json<SuccessBody<import_material::Model>>> {
    user.require(Resource::ImportMaterial, Action::Create)?;
    Ok(user.ok(imports::create(&state.db, &user.audit(), input).await?))
}

#[utoipa::path(patch, path = "/import-material/{id}", tag = "import-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Import receipt id")),
    responses((status = 200, description = "Updated receipt; approval adds stock"), (status = 409, description = "Receipt already closed")))]
pub async fn update(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateImportMaterialInput>,
) -> ApiResult<Json<SuccessBody<import_material::Model>>> {
    user.require(Resource::ImportMaterial, Action::Update)?;
    Ok(user.ok(imports::update(&state.db, &user.audit(), id, input).await?))
}

#[utoipa::path(delete, path = "/import-material/{id}", tag = "import-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Import receipt id")),
    responses((status = 200, description = "Deleted receipt"), (status = 409, description = "Receipt already closed")))]
pub async fn delete(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<IdOnly>>> {
    user.require(Resource::ImportMaterial, Action::Delete)?;
    Ok(user.deleted(imports::delete(&state.db, &user.audit(), id).await?.id))
}

#[utoipa::path(get, path = "/import-material-order", tag = "import-material", security(("bearer" = [])),
    params(ListQueryDoc, ("importMaterialId" = Option<i32>, Query, description = "Parent receipt")),
    responses((status = 200, description = "Page of import lines")))]
pub async fn list_orders(
    State(state): State<ServerState>,
    user: LoginUser,
    Query(q): Query<ImportOrderListQuery>,
) -> ApiResult<Json<SuccessBody<ListData<import_material_order::Model>>>> {
    user.require(Resource::ImportMaterial, Action::Read)?;
    Ok(user.ok(imports::list_orders(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/import-material-order/{id}", tag = "import-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Line id")),
    responses((status = 200, description = "Import line"), (status = 404, description = "Line does not exist")))]
pub async fn get_order(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<SuccessBody<import_material_order::Model>>> {
    user.require(Resource::ImportMaterial, Action::Read)?;
    Ok(user.ok(imports::get_order(&state.db, id).await?))
}

#[utoipa::path(post, path = "/import-material-order", tag = "import-material", security(("bearer" = [])),
    responses((status = 200, description = "Created line; receipt total recomputed"), (status = 409, description = "Receipt already closed")))]
pub async fn create_order(
    State(state): State<ServerState>,
    user: LoginUser,
    Json(input): Json<CreateImportOrderInput>,
) -> ApiResult<Json<SuccessBody<import_material_order::Model>>> {
    user.require(Resource::ImportMaterial, Action::Create)?;
    Ok(user.ok(imports::create_order(&state.db, &user.audit(), input).await?))
}

#[utoipa::path(patch, path = "/import-material-order/{id}", tag = "import-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Line id")),
    responses((status = 200, description = "Updated line; receipt total recomputed"), (status = 409, description = "Receipt already closed")))]
pub async fn update_order(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateOrderLineInput>,
) -> ApiResult<Json<SuccessBody<import_material_order::Model>>> {
    user.require(Resource::ImportMaterial, Action::Update)?;
    Ok(user.ok(imports::update_order(&state.db, &user.audit(), id, input).await?))
}

#[utoipa::path(delete, path = "/import-material-order/{id}", tag = "import-material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Line id")),
    responses((status = 200, description = "Deleted line; receipt total recomputed"), (status = 409, description = "Receipt already closed")))]
pub async fn delete_order(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<SuccessBody<IdOnly>>> {
    user.require(Resource::ImportMaterial, Action::Delete)?;
    Ok(user.deleted(imports::delete_order(&state.db, &user.audit(), id).await?.id))
}
