//! Soft delete shared by every business table.
//!
//! Rows are never removed: `deleted_at`/`deleted_by` are stamped instead and
//! every read path filters on `deleted_at IS NULL`.
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Select,
};

use crate::errors::ModelError;

pub trait SoftDelete: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
    fn deleted_by_column() -> Self::Column;

    /// `SELECT ... WHERE deleted_at IS NULL`
    fn find_active() -> Select<Self> {
        Self::find().filter(Self::deleted_at_column().is_null())
    }
}

pub async fn find_active_by_id<E, C>(db: &C, id: i32) -> Result<Option<E::Model>, ModelError>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    E::find_active()
        .filter(E::id_column().eq(id))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Stamp `deleted_at`/`deleted_by`; returns whether a live row was hit.
pub async fn soft_delete<E, C>(db: &C, id: i32, actor: Option<i32>) -> Result<bool, ModelError>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let res = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(Utc::now().fixed_offset()))
        .col_expr(E::deleted_by_column(), Expr::value(actor))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_null())
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

/// Implement [`SoftDelete`] for entity modules carrying the audit columns.
#[macro_export]
macro_rules! impl_soft_delete {
    ($($module:ident),* $(,)?) => {$(
        impl $crate::soft_delete::SoftDelete for $crate::$module::Entity {
            fn id_column() -> Self::Column { $crate::$module::Column::Id }
            fn deleted_at_column() -> Self::Column { $crate::$module::Column::DeletedAt }
            fn deleted_by_column() -> Self::Column { $crate::$module::Column::DeletedBy }
        }
    )*};
}
