//! Domain layer for the gitfolio service.
//!
//! Core data model, error taxonomy, and the port traits that the
//! infrastructure adapters and services implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{GitHubError, GitHubResult};
