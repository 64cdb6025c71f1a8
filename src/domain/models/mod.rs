//! Core data model: aggregated repository records and configuration.

pub mod config;
pub mod repository;

pub use config::{CacheConfig, Config, GitHubConfig, LoggingConfig, ServerConfig};
pub use repository::{RepositoryInfo, SearchResult};
