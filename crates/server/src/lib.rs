pub mod auth;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use startup::{build_app, build_state, prepare, run};
