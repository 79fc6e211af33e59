use axum::extract::{Path, Query, State};
use axum::Json;
use common::types::IdOnly;
use common::{ListData, SuccessBody};
use models::tables_restaurant::Model;
use service::auth::{Action, Resource};
use service::table::{self, CreateTableInput, TableListQuery, UpdateTableInput};

use crate::auth::{LoginUser, ServerState};
use crate::errors::ApiResult;
use crate::openapi::{ListQueryDoc, StatusFilterDoc};

#[utoipa::path(get, path = "/table", tag = "table", security(("bearer" = [])),
    params(ListQueryDoc, StatusFilterDoc),
    responses((status = 200, description = "Page of tables")))]
pub async fn list(State(state): State<ServerState>, user: LoginUser, Query(q): Query<TableListQuery>) -> ApiResult<Json<SuccessBody<ListData<Model>>>> {
    user.require(Resource::Table, Action::Read)?;
    Ok(user.ok(table::list(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/table/{id}", tag = "table", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Table id")),
    responses((status = 200, description = "Table"), (status = 404, description = "Table does not exist")))]
pub async fn get(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Table, Action::Read)?;
    Ok(user.ok(table::get(&state.db, id).await?))
}

/// New tables start `ready` whatever the body says.
#[utoipa::path(post, path = "/table", tag = "table", security(("bearer" = [])),
    responses((status = 200, description = "Created table"), (status = 422, description = "Invalid input")))]
pub async fn create(State(state): State<ServerState>, user: LoginUser, Json(input): Json<CreateTableInput>) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Table, Action::Create)?;
    Ok(user.ok(table::create(&state.db, &user.audit(), input).await?))
}

#[utoipa::path(patch, path = "/table/{id}", tag = "table", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Table id")),
    responses((status = 200, description = "Updated table"), (status = 404, description = "Table does not exist")))]
pub async fn update(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateTableInput>,
) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Table, Action::Update)?;
    Ok(user.ok(table::update(&state.db, &user.audit(), id, input).await?))
}

#[utoipa::path(delete, path = "/table/{id}", tag = "table", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Table id")),
    responses((status = 200, description = "Deleted table"), (status = 404, description = "Table does not exist")))]
pub async fn delete(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<IdOnly>>> {
    user.require(Resource::Table, Action::Delete)?;
    Ok(user.deleted(table::delete(&state.db, &user.audit(), id).await?.id))
}
