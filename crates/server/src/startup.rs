use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use common::Locale;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthConfig;
use service::auth::AuthService;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::auth::ServerState;
use crate::errors::StartupError;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Assemble state from an open connection and validated config.
pub fn build_state(db: DatabaseConnection, cfg: &AppConfig) -> ServerState {
    let repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
    let auth = AuthService::new(
        repo,
        AuthConfig { jwt_secret: cfg.auth.jwt_secret.clone(), token_ttl_hours: cfg.auth.token_ttl_hours },
    );
    let locale = Locale::parse(&cfg.i18n.default_locale).unwrap_or_default();
    ServerState::new(db, auth, locale)
}

/// Router with every layer, as served.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Apply migrations and seed the admin account when configured.
pub async fn prepare(state: &ServerState, cfg: &AppConfig) -> Result<(), StartupError> {
    if cfg.database.run_migrations {
        migration::Migrator::up(&state.db, None)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;
        info!("migrations applied");
    }
    if cfg.auth.bootstrap_admin_password.is_empty() {
        warn!("BOOTSTRAP_ADMIN_PASSWORD not set, skipping admin bootstrap");
        return Ok(());
    }
    match state.auth.bootstrap_admin(&cfg.auth.bootstrap_admin_email, &cfg.auth.bootstrap_admin_password).await {
        Ok(Some(admin)) => info!(user_id = admin.id, email = %admin.email, "admin account created"),
        Ok(None) => {}
        Err(e) => return Err(StartupError::Database(e.to_string())),
    }
    Ok(())
}

/// Public entry: load config, connect, migrate and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    let state = build_state(db, &cfg);
    prepare(&state, &cfg).await?;

    let app = build_app(state);
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "back office listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            // 收到 Ctrl+C 后停止接收新连接
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
