use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::i18n::{keys, translate};
use common::response::{ErrorBody, ErrorDetail};
use common::Locale;
use service::auth::errors::AuthError;
use service::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Error returned by handlers. The body is rendered in English here and
/// re-rendered in the caller's language by [`crate::routes::localize`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Untranslated error envelope parked in the response extensions.
#[derive(Debug, Clone)]
pub struct PendingError {
    pub code: u16,
    pub key: String,
    pub details: Vec<ErrorDetail>,
}

impl PendingError {
    fn new(status: StatusCode, key: impl Into<String>) -> Self {
        Self { code: status.as_u16(), key: key.into(), details: Vec::new() }
    }

    fn detail(mut self, key: Option<&str>, message: impl Into<String>) -> Self {
        self.details.push(ErrorDetail { key: key.map(str::to_string), message: message.into() });
        self
    }

    pub fn render(&self, locale: Locale) -> ErrorBody {
        ErrorBody { code: self.code, message: translate(locale, &self.key), errors: self.details.clone() }
    }
}

fn from_service(e: &ServiceError) -> PendingError {
    use ServiceError::*;
    match e {
        Validation(m) => PendingError::new(StatusCode::UNPROCESSABLE_ENTITY, keys::VALIDATION).detail(None, m.clone()),
        Invalid(errs) => {
            let body = ErrorBody::new(422, keys::VALIDATION).with_validation(errs);
            PendingError { details: body.errors, ..PendingError::new(StatusCode::UNPROCESSABLE_ENTITY, keys::VALIDATION) }
        }
        Model(models::errors::ModelError::Validation(m)) => {
            PendingError::new(StatusCode::UNPROCESSABLE_ENTITY, keys::VALIDATION).detail(None, m.clone())
        }
        NotFound { module, id } => {
            PendingError::new(StatusCode::NOT_FOUND, keys::item_not_exist(module)).detail(Some("id"), id.to_string())
        }
        Conflict(m) => PendingError::new(StatusCode::CONFLICT, keys::CONFLICT).detail(None, m.clone()),
        WaitingCheckExists => PendingError::new(StatusCode::CONFLICT, keys::WAITING_CHECK_EXISTS),
        NotAllApproved(m) => PendingError::new(StatusCode::CONFLICT, keys::NOT_ALL_APPROVED).detail(None, m.clone()),
        InvalidTransition { from, to } => {
            PendingError::new(StatusCode::CONFLICT, keys::INVALID_TRANSITION).detail(Some("status"), format!("{from} -> {to}"))
        }
        InsufficientStock { material_id, available, requested } => PendingError::new(StatusCode::CONFLICT, keys::INSUFFICIENT_STOCK)
            .detail(Some("materialId"), format!("material {material_id}: available {available}, requested {requested}")),
        Unauthorized => PendingError::new(StatusCode::UNAUTHORIZED, keys::UNAUTHORIZED),
        Forbidden(p) => PendingError::new(StatusCode::FORBIDDEN, keys::FORBIDDEN).detail(Some("permission"), p.clone()),
        Db(_) | Model(_) => {
            error!(error = %e, "request failed");
            PendingError::new(StatusCode::INTERNAL_SERVER_ERROR, keys::INTERNAL)
        }
    }
}

fn from_auth(e: &AuthError) -> PendingError {
    match e {
        AuthError::InvalidCredentials | AuthError::Inactive => {
            PendingError::new(StatusCode::UNAUTHORIZED, keys::INVALID_CREDENTIALS)
        }
        AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
            warn!(error = %e, "token rejected");
            PendingError::new(StatusCode::UNAUTHORIZED, keys::UNAUTHORIZED)
        }
        AuthError::Validation(m) => PendingError::new(StatusCode::UNPROCESSABLE_ENTITY, keys::VALIDATION).detail(None, m.clone()),
        AuthError::Conflict => PendingError::new(StatusCode::CONFLICT, keys::CONFLICT),
        AuthError::Hash(_) | AuthError::Repository(_) => {
            error!(error = %e, "auth failed");
            PendingError::new(StatusCode::INTERNAL_SERVER_ERROR, keys::INTERNAL)
        }
    }
}

impl ApiError {
    pub fn pending(&self) -> PendingError {
        match self {
            ApiError::Service(e) => from_service(e),
            ApiError::Auth(e) => from_auth(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let pending = self.pending();
        let status = StatusCode::from_u16(pending.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = (status, Json(pending.render(Locale::En))).into_response();
        resp.extensions_mut().insert(pending);
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
