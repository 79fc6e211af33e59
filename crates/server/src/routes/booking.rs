use axum::extract::{Path, Query, State};
use axum::Json;
use common::types::IdOnly;
use common::{ListData, SuccessBody};
use models::booking::Model;
use service::auth::{Action, Resource};
use service::booking::{self, BookingListQuery, CreateBookingInput, UpdateBookingInput};

use crate::auth::{LoginUser, ServerState};
use crate::errors::ApiResult;
use crate::openapi::{ListQueryDoc, StatusFilterDoc};

#[utoipa::path(get, path = "/booking", tag = "booking", security(("bearer" = [])),
    params(ListQueryDoc, StatusFilterDoc, ("tableId" = Option<i32>, Query, description = "Only bookings of this table")),
    responses((status = 200, description = "Page of bookings")))]
pub async fn list(State(state): State<ServerState>, user: LoginUser, Query(q): Query<BookingListQuery>) -> ApiResult<Json<SuccessBody<ListData<Model>>>> {
    user.require(Resource::Booking, Action::Read)?;
    Ok(user.ok(booking::list(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/booking/{id}", tag = "booking", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Booking id")),
    responses((status = 200, description = "Booking"), (status = 404, description = "Booking does not exist")))]
pub async fn get(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Booking, Action::Read)?;
    Ok(user.ok(booking::get(&state.db, id).await?))
}

/// Books the table: the new booking is `waiting`.
#[utoipa::path(post, path = "/booking", tag = "booking", security(("bearer" = [])),
    responses((status = 200, description = "Created booking"), (status = 404, description = "Table does not exist"), (status = 422, description = "Invalid input")))]
pub async fn create(State(state): State<ServerState>, user: LoginUser, Json(input): Json<CreateBookingInput>) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Booking, Action::Create)?;
    Ok(user.ok(booking::create(&state.db, &user.audit(), input).await?))
}

#[utoipa::path(patch, path = "/booking/{id}", tag = "booking", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Booking id")),
    responses((status = 200, description = "Updated booking"), (status = 404, description = "Booking does not exist"), (status = 409, description = "Status change not allowed")))]
pub async fn update(
    State(state): State<ServerState>,
    user: LoginUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateBookingInput>,
) -> ApiResult<Json<SuccessBody<Model>>> {
    user.require(Resource::Booking, Action::Update)?;
    Ok(user.ok(booking::update(&state.db, &user.audit(), id, input).await?))
}

#[utoipa::path(delete, path = "/booking/{id}", tag = "booking", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Booking id")),
    responses((status = 200, description = "Deleted booking"), (status = 404, description = "Booking does not exist")))]
pub async fn delete(State(state): State<ServerState>, user: LoginUser, Path(id): Path<i32>) -> ApiResult<Json<SuccessBody<IdOnly>>> {
    user.require(Resource::Booking, Action::Delete)?;
    Ok(user.deleted(booking::delete(&state.db, &user.audit(), id).await?.id))
}
