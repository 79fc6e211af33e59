use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use common::i18n::{keys, translate};
use common::types::IdOnly;
use common::{Locale, SuccessBody};
use sea_orm::DatabaseConnection;
use service::auth::domain::AuthUser;
use service::auth::permissions::permission;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::{Action, AuthService, Resource};
use service::{AuditContext, ServiceError};
use axum::Json;
use tracing::{debug, warn};

use crate::errors::ApiError;

pub type Auth = AuthService<SeaOrmAuthRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<Auth>,
    /// Language used when `Accept-Language` names nothing we support.
    pub default_locale: Locale,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: Auth, default_locale: Locale) -> Self {
        Self { db, auth: Arc::new(auth), default_locale }
    }
}

/// Caller's language from `Accept-Language`.
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub Locale);

impl RequestLocale {
    pub fn resolve(parts: &Parts, fallback: Locale) -> Locale {
        let header = parts.headers.get(header::ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
        Locale::from_accept_language(header, fallback)
    }

    pub fn ok<T>(&self, data: T) -> Json<SuccessBody<T>> {
        Json(SuccessBody::ok(translate(self.0, keys::SUCCESS), data))
    }
}

#[async_trait]
impl FromRequestParts<ServerState> for RequestLocale {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        Ok(RequestLocale(Self::resolve(parts, state.default_locale)))
    }
}

/// Authenticated caller of a protected handler, resolved from
/// `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct LoginUser {
    pub user: AuthUser,
    pub locale: Locale,
    /// `METHOD /path`, written to the audit trail.
    pub route: String,
}

impl LoginUser {
    /// 403 unless the caller's role grants `<resource>_<action>`.
    pub fn require(&self, resource: Resource, action: Action) -> Result<(), ApiError> {
        if self.user.can(resource, action) {
            return Ok(());
        }
        let wanted = permission(resource, action);
        warn!(user_id = self.user.id, permission = %wanted, "permission denied");
        Err(ServiceError::Forbidden(wanted).into())
    }

    pub fn audit(&self) -> AuditContext {
        AuditContext::new(self.user.id, self.route.clone())
    }

    pub fn ok<T>(&self, data: T) -> Json<SuccessBody<T>> {
        RequestLocale(self.locale).ok(data)
    }

    pub fn deleted(&self, id: i32) -> Json<SuccessBody<IdOnly>> {
        Json(SuccessBody::ok(translate(self.locale, keys::DELETED), IdOnly { id }))
    }
}

fn bearer(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<ServerState> for LoginUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<LoginUser>() {
            return Ok(user.clone());
        }
        let Some(token) = bearer(parts) else {
            debug!(uri = %parts.uri, "missing bearer token");
            return Err(ServiceError::Unauthorized.into());
        };
        let user = state.auth.authenticate(token).await?;
        let login = LoginUser {
            user,
            locale: RequestLocale::resolve(parts, state.default_locale),
            route: format!("{} {}", parts.method, parts.uri.path()),
        };
        parts.extensions.insert(login.clone());
        Ok(login)
    }
}
