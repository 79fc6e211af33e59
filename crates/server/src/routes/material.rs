use axum::extract::{Path, Query, State};
use axum::Json;
use common::types::IdOnly;
use common::{ListData, ListQuery, SuccessBody};
use models::material::Model;
use service::auth::{Action, Resource};
use service::material::{self, CreateMaterialInput, MaterialDropdownItem, UpdateMaterialInput};

use crate::auth::{LoginUser, ServerState};
use crate::errors::ApiResult;
use crate::openapi::ListQueryDoc;

#[utoipa::path(get, path = "/material", tag = "material", security(("bearer" = [])),
    params(ListQueryDoc),
    responses((status = 200, description = "Page of materials")))]
pub async fn list(State(state): State<ServerState>, user: LoginUser, Query(q): Query<ListQuery>) -> ApiResult<Json<SuccessBody<ListData<Model>>>> {
    user.require(Resource::Material, Action::Read)?;
    Ok(user.ok(material::list(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/material/{id}", tag = "material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Material id")),
    responses((status = 200, description = "Material"), (status = 404, description = "Material does not exist")))]
pub async fn get(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Material, Action::Read)?;
    Ok(user.ok(material::get(&state.db, id).await?))
}

#[utoipa::path(post, path = "/material", tag = "material", security(("bearer" = [])),
    responses((status = 200, description = "Created material"), (status = 422, description = "Invalid input")))]
pub async fn create(State(state): State<ServerState>, user: LoginUser, Json(input): Json<CreateMaterialInput>) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Material, Action::Create)?;
    Ok(user.ok(material::create(&state.db, &user.audit(), input).await?))
}

#[utoipa::path(patch, path = "/material/{id}", tag = "material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Material id")),
    responses((status = 200, description = "Updated material"), (status = 404, description = "Material does not exist")))]
pub async fn update(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateMaterialInput>,
) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Material, Action::Update)?;
    Ok(user.ok(material::update(&state.db, &user.audit(), id, input).await?))
}

#[utoipa::path(delete, path = "/material/{id}", tag = "material", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Material id")),
    responses((status = 200, description = "Deleted material"), (status = 404, description = "Material does not exist")))]
pub async fn delete(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<IdOnly>>> {
    user.require(Resource::Material, Action::Delete)?;
    Ok(user.deleted(material::delete(&state.db, &user.audit(), id).await?.id))
}

/// Every live material, for select boxes.
#[utoipa::path(get, path = "/common/dropdown/material", tag = "material", security(("bearer" = [])),
    responses((status = 200, description = "All live materials")))]
pub async fn dropdown(State(state): State<ServerState>, user: LoginUser) -> ApiResult<Json<SuccessBody<ListData<MaterialDropdownItem>>>> {
    user.require(Resource::Material, Action::Read)?;
    let items = material::dropdown(&state.db).await?;
    let total = items.len() as u64;
    Ok(user.ok(ListData::new(items, total)))
}
