//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Login, token verification, permission checks and first-start admin bootstrap.

pub mod domain;
pub mod errors;
pub mod permissions;
pub mod repository;
pub mod service;
pub mod repo;

pub use permissions::{Action, Resource};
pub use service::AuthService;
