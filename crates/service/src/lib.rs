//! Service layer: back-office operations on top of `models`.
//! - Every mutation runs in one transaction and writes an audit row.
//! - Reads skip soft-deleted rows.
//! - Errors are [`errors::ServiceError`]; the HTTP layer maps them to envelopes.

pub mod errors;
pub mod auth;
pub mod database;
pub mod pagination;

pub mod material;
pub mod table;
pub mod booking;
pub mod check_inventory;
pub mod warehouse;
pub mod import_material;
pub mod export_material;
pub mod promotion;
pub mod dashboard;

#[cfg(test)]
pub mod test_support;

pub use database::AuditContext;
pub use errors::ServiceError;
