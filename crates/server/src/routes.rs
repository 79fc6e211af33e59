pub mod auth;
pub mod booking;
pub mod check_inventory;
pub mod dashboard;
pub mod export_material;
pub mod import_material;
pub mod material;
pub mod promotion;
pub mod system;
pub mod table;

use std::time::Instant;

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use common::i18n::{keys, translate};
use common::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION};
use common::{ErrorBody, Locale};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::ServerState;
use crate::errors::PendingError;
use crate::openapi::ApiDoc;

const REJECTION_BODY_LIMIT: usize = 64 * 1024;

/// Render error envelopes in the caller's language. Plain-text extractor
/// rejections (bad JSON, bad query string, bad path id) are wrapped too.
pub async fn localize(State(state): State<ServerState>, req: Request, next: Next) -> Response {
    let header = req.headers().get(header::ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let locale = Locale::from_accept_language(header, state.default_locale);
    let resp = next.run(req).await;
    let status = resp.status();

    if let Some(pending) = resp.extensions().get::<PendingError>().cloned() {
        return (status, Json(pending.render(locale))).into_response();
    }

    let plain_text = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/plain"));
    if status.is_client_error() && plain_text {
        let text = match to_bytes(resp.into_body(), REJECTION_BODY_LIMIT).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => String::new(),
        };
        let status = if status == StatusCode::BAD_REQUEST { StatusCode::UNPROCESSABLE_ENTITY } else { status };
        let body = ErrorBody::new(status.as_u16(), translate(locale, keys::VALIDATION)).with_detail(None, text);
        return (status, Json(body)).into_response();
    }
    resp
}

/// Request counter and latency histogram.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let start = Instant::now();
    let resp = next.run(req).await;
    HTTP_REQUEST_DURATION.with_label_values(&[&method]).observe(start.elapsed().as_secs_f64());
    HTTP_REQUESTS_TOTAL.with_label_values(&[&method, resp.status().as_str()]).inc();
    resp
}

fn business_routes() -> Router<ServerState> {
    Router::new()
        .route("/material", get(material::list).post(material::create))
        .route("/material/:id", get(material::get).patch(material::update).delete(material::delete))
        .route("/common/dropdown/material", get(material::dropdown))
        .route("/table", get(table::list).post(table::create))
        .route("/table/:id", get(table::get).patch(table::update).delete(table::delete))
        .route("/booking", get(booking::list).post(booking::create))
        .route("/booking/:id", get(booking::get).patch(booking::update).delete(booking::delete))
        .route("/check-inventory", get(check_inventory::list).post(check_inventory::create))
        .route("/check-inventory/:id", get(check_inventory::get).patch(check_inventory::update))
        .route("/check-inventory-detail", get(check_inventory::list_details))
        .route("/check-inventory-detail/:id", get(check_inventory::get_detail).patch(check_inventory::update_detail))
        .route("/import-material", get(import_material::list).post(import_material::create))
        .route(
            "/import-material/:id",
            get(import_material::get).patch(import_material::update).delete(import_material::delete),
        )
        .route("/import-material-order", get(import_material::list_orders).post(import_material::create_order))
        .route(
            "/import-material-order/:id",
            get(import_material::get_order).patch(import_material::update_order).delete(import_material::delete_order),
        )
        .route("/export-material", get(export_material::list).post(export_material::create))
        .route(
            "/export-material/:id",
            get(export_material::get).patch(export_material::update).delete(export_material::delete),
        )
        .route("/export-material-order", get(export_material::list_orders).post(export_material::create_order))
        .route(
            "/export-material-order/:id",
            get(export_material::get_order).patch(export_material::update_order).delete(export_material::delete_order),
        )
        .route("/promotion", get(promotion::list).post(promotion::create))
        .route("/promotion/:id", get(promotion::get).patch(promotion::update).delete(promotion::delete))
        .route("/dashboard/import-export-chart", get(dashboard::import_export_chart))
        .route("/dashboard/summary", get(dashboard::summary))
}

/// Build the full application router.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me));

    public
        .merge(business_routes())
        .layer(middleware::from_fn_with_state(state.clone(), localize))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(track_metrics))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
