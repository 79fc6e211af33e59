use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use serde_json::{json, Value};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::repository::AuthRepository;
use service::auth::service::hash_password;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@back-office.local";
const ADMIN_PASSWORD: &str = "Adm1nPassw0rd";

fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = "api-flow-test-secret-0123".into();
    cfg.auth.bootstrap_admin_password = ADMIN_PASSWORD.into();
    cfg
}

async fn setup() -> anyhow::Result<(Router, sea_orm::DatabaseConnection)> {
    let cfg = test_config();
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    let state = server::build_state(db.clone(), &cfg);
    server::prepare(&state, &cfg).await?;
    Ok((server::build_app(state), db))
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    send_with_locale(app, method, uri, token, body, None).await
}

async fn send_with_locale(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    lang: Option<&str>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    if let Some(l) = lang {
        req = req.header("accept-language", l);
    }
    let req = match body {
        Some(b) => req.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

async fn login(app: &Router, email: &str, password: &str) -> anyhow::Result<String> {
    let (status, body) = send(app, "POST", "/auth/login", None, Some(json!({"email": email, "password": password}))).await?;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    Ok(body["data"]["accessToken"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn login_returns_token_and_permissions() -> anyhow::Result<()> {
    let (app, _db) = setup().await?;
    let (status, body) =
        send(&app, "POST", "/auth/login", None, Some(json!({"email": "ADMIN@back-office.local", "password": ADMIN_PASSWORD}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert!(!body["data"]["accessToken"].as_str().unwrap_or_default().is_empty());
    let perms = body["data"]["user"]["permissions"].as_array().cloned().unwrap_or_default();
    assert!(perms.iter().any(|p| p == "booking_create"));
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected() -> anyhow::Result<()> {
    let (app, _db) = setup().await?;
    let (status, body) =
        send(&app, "POST", "/auth/login", None, Some(json!({"email": ADMIN_EMAIL, "password": "not-the-password"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
    assert_eq!(body["message"], "Email or password is incorrect");
    Ok(())
}

#[tokio::test]
async fn protected_route_needs_token() -> anyhow::Result<()> {
    let (app, _db) = setup().await?;
    let (status, body) = send(&app, "GET", "/material", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
    assert!(body["errors"].is_array());
    Ok(())
}

#[tokio::test]
async fn booking_marks_table_booked_until_deleted() -> anyhow::Result<()> {
    let (app, _db) = setup().await?;
    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await?;

    let (status, table) = send(&app, "POST", "/table", Some(&token), Some(json!({"name": "T1", "numberSeat": 4}))).await?;
    assert_eq!(status, StatusCode::OK, "{table}");
    let table_id = table["data"]["id"].as_i64().unwrap_or_default();
    assert_eq!(table["data"]["status"], "ready");

    let booking = json!({
        "tableId": table_id,
        "nameCustomer": "Nguyen Van A",
        "phone": "0901234567",
        "numberPeople": 3,
        "arrivalTime": "2026-10-20T19:00:00+07:00"
    });
    let (status, created) = send(&app, "POST", "/booking", Some(&token), Some(booking)).await?;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["data"]["status"], "waiting");
    let booking_id = created["data"]["id"].as_i64().unwrap_or_default();

    let (_, table) = send(&app, "GET", &format!("/table/{table_id}"), Some(&token), None).await?;
    assert_eq!(table["data"]["status"], "booked");

    let (status, deleted) = send(&app, "DELETE", &format!("/booking/{booking_id}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["data"], json!({"id": booking_id}));
    let (_, table) = send(&app, "GET", &format!("/table/{table_id}"), Some(&token), None).await?;
    assert_eq!(table["data"]["status"], "ready");

    let (_, list) = send(&app, "GET", "/booking", Some(&token), None).await?;
    assert_eq!(list["data"]["totalItems"], 0);
    Ok(())
}

#[tokio::test]
async fn missing_booking_is_translated() -> anyhow::Result<()> {
    let (app, _db) = setup().await?;
    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await?;

    let (status, body) = send_with_locale(&app, "GET", "/booking/999", Some(&token), None, Some("vi-VN,vi;q=0.9")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Đặt bàn không tồn tại");

    let (status, body) = send(&app, "GET", "/booking/999", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking does not exist");
    Ok(())
}

#[tokio::test]
async fn malformed_body_becomes_validation_envelope() -> anyhow::Result<()> {
    let (app, _db) = setup().await?;
    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    let (status, body) = send(&app, "POST", "/table", Some(&token), Some(json!({"name": "T1"}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);
    assert_eq!(body["message"], "Invalid input");
    Ok(())
}

#[tokio::test]
async fn approved_export_takes_stock() -> anyhow::Result<()> {
    let (app, _db) = setup().await?;
    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await?;

    let (status, material) = send(
        &app,
        "POST",
        "/material",
        Some(&token),
        Some(json!({"material": "Rice", "unit": "kg", "limitOver": 5, "quantity": 20})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{material}");
    let material_id = material["data"]["id"].as_i64().unwrap_or_default();

    let (status, export) = send(&app, "POST", "/export-material", Some(&token), Some(json!({"note": "kitchen"}))).await?;
    assert_eq!(status, StatusCode::OK, "{export}");
    let export_id = export["data"]["id"].as_i64().unwrap_or_default();

    let line = json!({
        "exportMaterialId": export_id,
        "materialId": material_id,
        "quantity": 7,
        "pricePerUnit": 150000,
        "status": "approve"
    });
    let (status, body) = send(&app, "POST", "/export-material-order", Some(&token), Some(line)).await?;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) =
        send(&app, "PATCH", &format!("/export-material/{export_id}"), Some(&token), Some(json!({"status": "approve"}))).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "approve");

    let (_, material) = send(&app, "GET", &format!("/material/{material_id}"), Some(&token), None).await?;
    assert_eq!(material["data"]["quantity"], 13);

    // 已审批的单据不可再改
    let (status, _) =
        send(&app, "PATCH", &format!("/export-material/{export_id}"), Some(&token), Some(json!({"status": "reject"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn role_without_permission_is_forbidden() -> anyhow::Result<()> {
    let (app, db) = setup().await?;
    let repo = SeaOrmAuthRepository { db };
    let role_id = repo.ensure_role("waiter", &["booking_read".to_string()]).await?;
    repo.create_user("waiter@back-office.local", "Waiter", hash_password("Waiter123!")?, role_id).await?;
    let token = login(&app, "waiter@back-office.local", "Waiter123!").await?;

    let (status, _) = send(&app, "GET", "/booking", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", "/promotion", Some(&token), Some(json!({"name": "X", "percent": 10}))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);
    Ok(())
}
