use axum::extract::{Path, Query, State};
use axum::Json;
use common::types::IdOnly;
use common::{ListData, SuccessBody};
use models::promotion::Model;
use service::auth::{Action, Resource};
use service::promotion::{self, CreatePromotionInput, PromotionListQuery, UpdatePromotionInput};

use crate::auth::{LoginUser, ServerState};
use crate::errors::ApiResult;
use crate::openapi::{ListQueryDoc, StatusFilterDoc};

#[utoipa::path(get, path = "/promotion", tag = "promotion", security(("bearer" = [])),
    params(ListQueryDoc, StatusFilterDoc),
    responses((status = 200, description = "Page of promotions")))]
pub async fn list(State(state): State<ServerState>, user: LoginUser, Query(q): Query<PromotionListQuery>) -> ApiResult<Json<SuccessBody<ListData<Model>>>> {
    user.require(Resource::Promotion, Action::Read)?;
    Ok(user.ok(promotion::list(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/promotion/{id}", tag = "promotion", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Promotion id")),
    responses((status = 200, description = "Promotion"), (status = 404, description = "Promotion does not exist")))]
pub async fn get(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Promotion, Action::Read)?;
    Ok(user.ok(promotion::get(&state.db, id).await?))
}

#[utoipa::path(post, path = "/promotion", tag = "promotion", security(("bearer" = [])),
    responses((status = 200, description = "Created promotion"), (status = 422, description = "Invalid input")))]
pub async fn create(State(state): State<ServerState>, user: LoginUser, Json(input): Json<CreatePromotionInput>) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Promotion, Action::Create)?;
    Ok(user.ok(promotion::create(&state.db, &user.audit(), input).await?))
}

#[utoipa::path(patch, path = "/promotion/{id}", tag = "promotion", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Promotion id")),
    responses((status = 200, description = "Updated promotion"), (status = 404, description = "Promotion does not exist")))]
pub async fn update(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdatePromotionInput>,
) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Promotion, Action::Update)?;
    Ok(user.ok(promotion::update(&state.db, &user.audit(), id, input).await?))
}

#[utoipa::path(delete, path = "/promotion/{id}", tag = "promotion", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Promotion id")),
    responses((status = 200, description = "Deleted promotion"), (status = 404, description = "Promotion does not exist")))]
pub async fn delete(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<IdOnly>>> {
    user.require(Resource::Promotion, Action::Delete)?;
    Ok(user.deleted(promotion::delete(&state.db, &user.audit(), id).await?.id))
}
