use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("validation error: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    /// `module` is the camelCase module name used for message keys.
    #[error("{module} {id} not found")]
    NotFound { module: &'static str, id: i32 },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("an inventory check is already waiting for approval")]
    WaitingCheckExists,
    #[error("not every detail line of {0} is approved")]
    NotAllApproved(String),
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("insufficient stock for material {material_id}: have {available}, need {requested}")]
    InsufficientStock { material_id: i32, available: i32, requested: i32 },
    #[error("unauthorized")]
    Unauthorized,
    #[error("missing permission {0}")]
    Forbidden(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(module: &'static str, id: i32) -> Self { Self::NotFound { module, id } }

    pub fn transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition { from: from.to_string(), to: to.to_string() }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self { Self::Db(e.to_string()) }
}

impl From<crate::auth::errors::AuthError> for ServiceError {
    fn from(e: crate::auth::errors::AuthError) -> Self {
        use crate::auth::errors::AuthError;
        match e {
            e if e.is_auth_failure() => Self::Unauthorized,
            AuthError::Validation(m) => Self::Validation(m),
            AuthError::Conflict => Self::Conflict("user already exists".into()),
            other => Self::Db(other.to_string()),
        }
    }
}
