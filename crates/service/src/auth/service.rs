use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::status::UserStatus;
use rand::rngs::OsRng;
use tracing::{info, debug, instrument, warn};
use validator::Validate;

use super::domain::{AuthSession, AuthUser, Claims, LoginInput};
use super::errors::AuthError;
use super::permissions::all_permissions;
use super::repository::AuthRepository;

pub const ADMIN_ROLE: &str = "admin";

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?
        .to_string())
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Create the `admin` role and its first user when no user exists yet.
    ///
    /// Returns `None` when users are already present.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig { jwt_secret: "secret-secret-secret".into(), token_ttl_hours: 1 });
    /// let admin = tokio_test::block_on(svc.bootstrap_admin("boss@example.com", "Passw0rd!")).unwrap();
    /// assert!(admin.is_some());
    /// let again = tokio_test::block_on(svc.bootstrap_admin("boss@example.com", "Passw0rd!")).unwrap();
    /// assert!(again.is_none());
    /// ```
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<Option<AuthUser>, AuthError> {
        if self.repo.count_users().await? > 0 {
            debug!("users present, skipping admin bootstrap");
            return Ok(None);
        }
        if password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        let role_id = self.repo.ensure_role(ADMIN_ROLE, &all_permissions()).await?;
        let hash = hash_password(password)?;
        let user = self.repo.create_user(email, "Administrator", hash, role_id).await?;
        info!(user_id = user.id, email = %user.email, "admin_bootstrapped");
        Ok(Some(user))
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret-secret-secret".into(), token_ttl_hours: 1 });
    /// let _ = tokio_test::block_on(svc.bootstrap_admin("u@e.com", "Passw0rd"));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.access_token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        input.validate().map_err(|e| AuthError::Validation(e.to_string()))?;
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            warn!(user_id = user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        if user.status != UserStatus::Active {
            return Err(AuthError::Inactive);
        }

        let (access_token, expires_at) = self.issue_token(user.id)?;
        self.repo.touch_last_login(user.id).await?;
        info!(user_id = user.id, "user_logged_in");
        Ok(AuthSession { user, access_token, expires_at })
    }

    fn issue_token(&self, user_id: i32) -> Result<(String, chrono::DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.cfg.token_ttl_hours);
        let claims = Claims { sub: user_id.to_string(), exp: expires_at.timestamp() as usize, iat: now.timestamp() as usize };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenInvalid(e.to_string()))?;
        Ok((token, expires_at))
    }

    /// Decode and check an HS256 token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid(e.to_string()),
            })
    }

    /// Resolve a bearer token to the live, active user behind it.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.verify_token(token)?;
        let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::TokenInvalid("bad subject".into()))?;
        let user = self.repo.find_user_by_id(user_id).await?.ok_or(AuthError::InvalidCredentials)?;
        if user.status != UserStatus::Active {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::{Action, Resource};
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> (Arc<MockAuthRepository>, AuthService<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "unit-test-secret-0123".into(), token_ttl_hours: 2 });
        (repo, svc)
    }

    #[tokio::test]
    async fn login_then_authenticate_roundtrip() -> Result<(), anyhow::Error> {
        let (_repo, svc) = svc();
        svc.bootstrap_admin("admin@example.com", "Secret123").await?;
        let session = svc.login(LoginInput { email: "admin@example.com".into(), password: "Secret123".into() }).await?;
        let user = svc.authenticate(&session.access_token).await?;
        assert_eq!(user.id, session.user.id);
        assert_eq!(user.role, ADMIN_ROLE);
        assert!(user.can(Resource::ExportMaterial, Action::Update));
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() -> Result<(), anyhow::Error> {
        let (_repo, svc) = svc();
        svc.bootstrap_admin("admin@example.com", "Secret123").await?;
        let err = svc.login(LoginInput { email: "admin@example.com".into(), password: "nope-nope".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        Ok(())
    }

    #[tokio::test]
    async fn inactive_user_cannot_login() -> Result<(), anyhow::Error> {
        let (repo, svc) = svc();
        let admin = svc.bootstrap_admin("admin@example.com", "Secret123").await?.expect("created");
        repo.set_status(admin.id, UserStatus::Inactive);
        let err = svc.login(LoginInput { email: "admin@example.com".into(), password: "Secret123".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Inactive));
        Ok(())
    }

    #[test]
    fn tampered_token_is_invalid() {
        let (_repo, svc) = svc();
        let (token, _) = svc.issue_token(1).unwrap();
        let other = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig { jwt_secret: "another-secret-4567890".into(), token_ttl_hours: 2 });
        assert!(matches!(other.verify_token(&token), Err(AuthError::TokenInvalid(_))));
        assert_eq!(svc.verify_token(&token).unwrap().sub, "1");
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let (_repo, svc) = svc();
        let past = (Utc::now() - Duration::hours(3)).timestamp() as usize;
        let claims = Claims { sub: "1".into(), exp: past, iat: past };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(b"unit-test-secret-0123")).unwrap();
        assert!(matches!(svc.verify_token(&token), Err(AuthError::TokenExpired)));
    }
}
