use axum::extract::State;
use axum::Json;
use common::SuccessBody;
use service::auth::domain::{AuthSession, AuthUser, LoginInput};

use crate::auth::{LoginUser, RequestLocale, ServerState};
use crate::errors::ApiResult;

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Access token and the user behind it"),
        (status = 401, description = "Email or password is incorrect"),
        (status = 422, description = "Invalid input")
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    locale: RequestLocale,
    Json(input): Json<LoginInput>,
) -> ApiResult<Json<SuccessBody<AuthSession>>> {
    let input = LoginInput { email: input.email.trim().to_lowercase(), password: input.password };
    let session = state.auth.login(input).await?;
    Ok(locale.ok(session))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses((status = 200, description = "Current user with permissions"), (status = 401, description = "Unauthorized"))
)]
pub async fn me(user: LoginUser) -> Json<SuccessBody<AuthUser>> {
    let data = user.user.clone();
    user.ok(data)
}
