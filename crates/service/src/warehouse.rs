//! Pieces shared by import and export documents.

use common::pagination::empty_as_none;
use common::ListQuery;
use models::status::AcceptStatus;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListQuery {
    #[serde(flatten)]
    pub base: ListQuery,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<AcceptStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderLineInput {
    #[validate(range(min = 1, max = 1_000_000))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0i64, max = 1_000_000_000_000i64))]
    pub price_per_unit: Option<i64>,
    pub status: Option<AcceptStatus>,
}

/// Order line plus the material it moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView<L> {
    #[serde(flatten)]
    pub line: L,
    pub material: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentWithOrders<H, L> {
    #[serde(flatten)]
    pub document: H,
    pub orders: Vec<OrderLineView<L>>,
}

/// Header and lines only change while the document waits for approval.
pub fn ensure_open(status: AcceptStatus, module: &str, id: i32) -> Result<(), ServiceError> {
    if status != AcceptStatus::WaitingApprove {
        return Err(ServiceError::Conflict(format!("{module} {id} is already {status}")));
    }
    Ok(())
}

/// Σ price × quantity over approved lines. A line total of `None` means the
/// product already overflowed.
pub fn approved_total(lines: impl IntoIterator<Item = (AcceptStatus, Option<i64>)>) -> Result<i64, ServiceError> {
    lines
        .into_iter()
        .filter(|(s, _)| *s == AcceptStatus::Approve)
        .try_fold(0i64, |acc, (_, line)| line.and_then(|l| acc.checked_add(l)))
        .ok_or_else(|| ServiceError::Validation("document total is out of range".into()))
}
