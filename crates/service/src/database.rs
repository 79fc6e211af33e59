//! Shared data access: live-row lookup by id, soft delete and the audit trail.

use chrono::Utc;
use models::soft_delete::{self, SoftDelete};
use models::user_log;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde::Serialize;
use tracing::debug;

use crate::errors::ServiceError;

/// Who is acting and through which endpoint; carried into every audit row.
#[derive(Debug, Clone)]
pub struct AuditContext {
    pub user_id: i32,
    /// `METHOD /path`
    pub route: String,
}

impl AuditContext {
    pub fn new(user_id: i32, route: impl Into<String>) -> Self { Self { user_id, route: route.into() } }
}

/// Live row by id or `NotFound` tagged with `module`.
pub async fn get_data_by_id<E, C>(db: &C, module: &'static str, id: i32) -> Result<E::Model, ServiceError>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    soft_delete::find_active_by_id::<E, C>(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(module, id))
}

/// JSON snapshot of a row for the audit trail.
pub fn snapshot<T: Serialize>(value: &T) -> Result<serde_json::Value, ServiceError> {
    serde_json::to_value(value).map_err(|e| ServiceError::Validation(e.to_string()))
}

/// Write one `user_log` row with the before/after snapshots.
pub async fn record_user_logging<C: ConnectionTrait>(
    db: &C,
    ctx: &AuditContext,
    module: &str,
    record_id: Option<i32>,
    old_value: Option<serde_json::Value>,
    new_value: Option<serde_json::Value>,
) -> Result<(), ServiceError> {
    let row = user_log::ActiveModel {
        user_id: Set(ctx.user_id),
        route: Set(ctx.route.clone()),
        module: Set(module.to_string()),
        record_id: Set(record_id),
        old_value: Set(old_value),
        new_value: Set(new_value),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    row.insert(db).await?;
    debug!(module, ?record_id, user_id = ctx.user_id, "user_log written");
    Ok(())
}

/// Soft delete a live row, logging its last state.
pub async fn soft_delete_with_log<E, C>(
    db: &C,
    ctx: &AuditContext,
    module: &'static str,
    id: i32,
) -> Result<E::Model, ServiceError>
where
    E: SoftDelete,
    E::Model: Serialize,
    C: ConnectionTrait,
{
    let current = get_data_by_id::<E, C>(db, module, id).await?;
    if !soft_delete::soft_delete::<E, C>(db, id, Some(ctx.user_id)).await? {
        return Err(ServiceError::not_found(module, id));
    }
    record_user_logging(db, ctx, module, Some(id), Some(snapshot(&current)?), None).await?;
    Ok(current)
}

/// Trim and drop empty strings, the way form input arrives.
pub fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::clean;

    #[test]
    fn clean_trims_and_drops_blank() {
        assert_eq!(clean(Some("  note ".into())), Some("note".into()));
        assert_eq!(clean(Some("   ".into())), None);
        assert_eq!(clean(None), None);
    }
}
