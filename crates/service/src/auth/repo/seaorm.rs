use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};

use models::soft_delete::SoftDelete;
use models::status::UserStatus;
use models::{role, role_permission, user};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn repo_err(e: sea_orm::DbErr) -> AuthError { AuthError::Repository(e.to_string()) }

impl SeaOrmAuthRepository {
    async fn to_auth_user(&self, u: user::Model) -> Result<AuthUser, AuthError> {
        let role_name = role::Entity::find_by_id(u.role_id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .map(|r| r.name)
            .unwrap_or_default();
        let permissions = role_permission::Entity::find()
            .filter(role_permission::Column::RoleId.eq(u.role_id))
            .all(&self.db)
            .await
            .map_err(repo_err)?
            .into_iter()
            .map(|p| p.permission)
            .collect();
        Ok(AuthUser {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            role_id: u.role_id,
            role: role_name,
            status: u.status,
            permissions,
        })
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let found = user::Entity::find_active()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        match found {
            Some(u) => Ok(Some(self.to_auth_user(u).await?)),
            None => Ok(None),
        }
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<AuthUser>, AuthError> {
        let found = user::Entity::find_active()
            .filter(user::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        match found {
            Some(u) => Ok(Some(self.to_auth_user(u).await?)),
            None => Ok(None),
        }
    }

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
        let res = user::Entity::find_by_id(user_id).one(&self.db).await.map_err(repo_err)?;
        Ok(res.map(|u| Credentials { user_id: u.id, password_hash: u.password_hash }))
    }

    async fn touch_last_login(&self, user_id: i32) -> Result<(), AuthError> {
        let am = user::ActiveModel {
            id: Set(user_id),
            last_login_at: Set(Some(Utc::now().fixed_offset())),
            ..Default::default()
        };
        am.update(&self.db).await.map_err(repo_err)?;
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, AuthError> {
        user::Entity::find_active().count(&self.db).await.map_err(repo_err)
    }

    async fn ensure_role(&self, name: &str, permissions: &[String]) -> Result<i32, AuthError> {
        if let Some(r) = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(repo_err)?
        {
            return Ok(r.id);
        }
        let txn = self.db.begin().await.map_err(repo_err)?;
        let now = Utc::now().fixed_offset();
        let created = role::ActiveModel {
            name: Set(name.to_string()),
            description: Set(Some("all permissions".into())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(repo_err)?;
        if !permissions.is_empty() {
            let rows = permissions.iter().map(|p| role_permission::ActiveModel {
                role_id: Set(created.id),
                permission: Set(p.clone()),
                ..Default::default()
            });
            role_permission::Entity::insert_many(rows).exec(&txn).await.map_err(repo_err)?;
        }
        txn.commit().await.map_err(repo_err)?;
        Ok(created.id)
    }

    async fn create_user(&self, email: &str, full_name: &str, password_hash: String, role_id: i32) -> Result<AuthUser, AuthError> {
        user::validate_email(email).map_err(|e| AuthError::Validation(e.to_string()))?;
        user::validate_full_name(full_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        if self.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict);
        }
        let now = Utc::now().fixed_offset();
        let created = user::ActiveModel {
            email: Set(email.trim().to_lowercase()),
            full_name: Set(full_name.trim().to_string()),
            password_hash: Set(password_hash),
            role_id: Set(role_id),
            status: Set(UserStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;
        self.to_auth_user(created).await
    }
}
