use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("user already exists")]
    Conflict,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user is not active")]
    Inactive,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token: {0}")]
    TokenInvalid(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict => 1002,
            AuthError::InvalidCredentials => 1004,
            AuthError::Inactive => 1005,
            AuthError::TokenExpired => 1102,
            AuthError::TokenInvalid(_) => 1103,
            AuthError::Hash(_) => 1101,
            AuthError::Repository(_) => 1200,
        }
    }

    /// Errors the caller can fix by logging in again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::Inactive | AuthError::TokenExpired | AuthError::TokenInvalid(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::AuthError;

    #[test]
    fn token_errors_are_auth_failures() {
        assert!(AuthError::TokenExpired.is_auth_failure());
        assert!(AuthError::TokenInvalid("bad sig".into()).is_auth_failure());
        assert!(!AuthError::Repository("down".into()).is_auth_failure());
        assert_eq!(AuthError::InvalidCredentials.code(), 1004);
    }
}
