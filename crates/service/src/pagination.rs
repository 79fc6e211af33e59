//! Pagination utilities for service layer
//!
//! Turns a [`ListQuery`] into page/limit values and runs the paged query.

use common::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE, MAX_PAGE_SIZE};
use common::{ListData, ListQuery, OrderDirection};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait, QueryOrder, Select};

use crate::errors::ServiceError;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub per_page: u64,
}

impl Pagination {
    /// Clamp to sane defaults and return `(page_idx, per_page)` with a 0-based index
    pub fn normalize(self) -> (u64, u64) {
        let page = self.page.clamp(1, MAX_PAGE);
        let per_page = self.per_page.clamp(1, MAX_PAGE_SIZE);
        (page - 1, per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: DEFAULT_PAGE_SIZE } }
}

impl From<&ListQuery> for Pagination {
    fn from(q: &ListQuery) -> Self { Self { page: q.page(), per_page: q.limit() } }
}

pub fn order<E: EntityTrait>(select: Select<E>, column: E::Column, dir: OrderDirection) -> Select<E> {
    match dir {
        OrderDirection::Asc => select.order_by(column, Order::Asc),
        OrderDirection::Desc => select.order_by(column, Order::Desc),
    }
}

/// `%keyword%` match on one text column; no-op without a keyword.
pub fn keyword_filter<E: EntityTrait>(select: Select<E>, column: E::Column, q: &ListQuery) -> Select<E> {
    use sea_orm::QueryFilter;
    match q.keyword() {
        Some(k) => select.filter(column.contains(k)),
        None => select,
    }
}

/// Run `select` for one page and count the unpaged total.
pub async fn fetch_list<E, C>(db: &C, select: Select<E>, p: Pagination) -> Result<ListData<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let (page_idx, per_page) = p.normalize();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(ListData::new(items, total))
}
