use async_trait::async_trait;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: i32) -> Result<Option<AuthUser>, AuthError>;
    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError>;
    async fn touch_last_login(&self, user_id: i32) -> Result<(), AuthError>;

    async fn count_users(&self) -> Result<u64, AuthError>;
    /// Role by name, created with `permissions` when missing.
    async fn ensure_role(&self, name: &str, permissions: &[String]) -> Result<i32, AuthError>;
    async fn create_user(&self, email: &str, full_name: &str, password_hash: String, role_id: i32) -> Result<AuthUser, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use models::status::UserStatus;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<i32, AuthUser>>,
        creds: Mutex<HashMap<i32, Credentials>>,
        roles: Mutex<HashMap<String, (i32, Vec<String>)>>,
    }

    fn poisoned<T>(_: T) -> AuthError { AuthError::Repository("mock lock poisoned".into()) }

    impl MockAuthRepository {
        /// Flip a user's status, e.g. to exercise the inactive-login path.
        pub fn set_status(&self, user_id: i32, status: UserStatus) {
            if let Ok(mut users) = self.users.lock() {
                if let Some(u) = users.get_mut(&user_id) {
                    u.status = status;
                }
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
        }

        async fn find_user_by_id(&self, id: i32) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.get(&id).cloned())
        }

        async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().map_err(poisoned)?;
            Ok(creds.get(&user_id).cloned())
        }

        async fn touch_last_login(&self, _user_id: i32) -> Result<(), AuthError> { Ok(()) }

        async fn count_users(&self) -> Result<u64, AuthError> {
            Ok(self.users.lock().map_err(poisoned)?.len() as u64)
        }

        async fn ensure_role(&self, name: &str, permissions: &[String]) -> Result<i32, AuthError> {
            let mut roles = self.roles.lock().map_err(poisoned)?;
            let next_id = roles.len() as i32 + 1;
            let (id, _) = roles.entry(name.to_string()).or_insert_with(|| (next_id, permissions.to_vec()));
            Ok(*id)
        }

        async fn create_user(&self, email: &str, full_name: &str, password_hash: String, role_id: i32) -> Result<AuthUser, AuthError> {
            let (role, permissions) = {
                let roles = self.roles.lock().map_err(poisoned)?;
                roles
                    .iter()
                    .find(|(_, (id, _))| *id == role_id)
                    .map(|(name, (_, perms))| (name.clone(), perms.clone()))
                    .ok_or_else(|| AuthError::Validation(format!("role {role_id} missing")))?
            };
            let mut users = self.users.lock().map_err(poisoned)?;
            if users.values().any(|u| u.email.eq_ignore_ascii_case(email)) {
                return Err(AuthError::Conflict);
            }
            let id = users.len() as i32 + 1;
            let user = AuthUser {
                id,
                email: email.to_string(),
                full_name: full_name.to_string(),
                role_id,
                role,
                status: UserStatus::Active,
                permissions,
            };
            users.insert(id, user.clone());
            self.creds.lock().map_err(poisoned)?.insert(id, Credentials { user_id: id, password_hash });
            Ok(user)
        }
    }
}
