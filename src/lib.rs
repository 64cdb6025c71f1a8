//! Gitfolio - GitHub portfolio API
//!
//! Gitfolio serves read-only aggregated data about a GitHub account's
//! repositories through a small HTTP surface. A full aggregation pass is
//! expensive (several API calls per repository), so reads go through an
//! activity-gated cache: a decorator that checks a cheap "last activity"
//! signal, itself rate-limited, to decide whether the cached aggregate is
//! still valid, and otherwise recomputes it.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **Domain Layer** (`domain`): models, error taxonomy, and port traits
//! - **Service Layer** (`services`): the aggregator and the cache decorator
//! - **Infrastructure Layer** (`infrastructure`): GitHub REST adapter,
//!   axum HTTP surface, figment configuration

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{GitHubError, GitHubResult};
pub use domain::models::{
    CacheConfig, Config, GitHubConfig, LoggingConfig, RepositoryInfo, SearchResult, ServerConfig,
};
pub use domain::ports::{GitHubApi, PortfolioService, SearchFilter};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::github::{GitHubClientConfig, GitHubHttpClient};
pub use services::{CachedPortfolioService, PortfolioAggregator};
