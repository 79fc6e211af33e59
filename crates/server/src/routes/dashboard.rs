use axum::extract::{Query, State};
use axum::Json;
use common::SuccessBody;
use service::auth::{Action, Resource};
use service::dashboard::{self, Chart, DashboardQuery, Summary};

use crate::auth::{LoginUser, ServerState};
use crate::errors::ApiResult;

#[utoipa::path(get, path = "/dashboard/import-export-chart", tag = "dashboard", security(("bearer" = [])),
    params(
        ("dateRangeType" = Option<String>, Query, description = "`month` (default) or `day`"),
        ("dateRanges" = Option<String>, Query, description = "`YYYY-MM-DD,YYYY-MM-DD`, both inclusive")
    ),
    responses((status = 200, description = "Import and export payments per month or day"), (status = 422, description = "Bad date range")))]
pub async fn import_export_chart(
    State(state): State<ServerState>,
    user: LoginUser,
    Query(q): Query<DashboardQuery>,
) -> ApiResult<Json<SuccessBody<Chart>>> {
    user.require(Resource::Dashboard, Action::Read)?;
    Ok(user.ok(dashboard::import_export_chart(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/dashboard/summary", tag = "dashboard", security(("bearer" = [])),
    params(("dateRanges" = Option<String>, Query, description = "`YYYY-MM-DD,YYYY-MM-DD`, both inclusive")),
    responses((status = 200, description = "Import/export counts and totals")))]
pub async fn summary(State(state): State<ServerState>, user: LoginUser, Query(q): Query<DashboardQuery>) -> ApiResult<Json<SuccessBody<Summary>>> {
    user.require(Resource::Dashboard, Action::Read)?;
    Ok(user.ok(dashboard::summary(&state.db, &q).await?))
}
