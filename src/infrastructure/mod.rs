//! Infrastructure layer.
//!
//! Adapters and external integrations:
//! - GitHub REST API client (reqwest)
//! - HTTP API surface (axum)
//! - Configuration management (figment)
//!
//! Infrastructure implementations satisfy the port traits defined in the
//! domain layer.

pub mod config;
pub mod github;
pub mod http;
