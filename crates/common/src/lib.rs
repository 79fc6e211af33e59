//! Cross-cutting helpers shared by the service and server crates.

pub mod types;
pub mod utils;
pub mod pagination;
pub mod response;
pub mod i18n;
pub mod metrics;

pub use i18n::Locale;
pub use pagination::{ListQuery, OrderDirection};
pub use response::{ErrorBody, ListData, SuccessBody};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok".into(), database: "up".into() };
        assert_eq!(h.status, "ok");
    }
}
