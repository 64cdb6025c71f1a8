//! Port trait definitions (hexagonal architecture).
//!
//! Async trait interfaces the rest of the system is wired through:
//! - `GitHubApi`: raw GitHub REST operations, implemented by the reqwest
//!   adapter in the infrastructure layer
//! - `PortfolioService`: the aggregated read contract, implemented by the
//!   aggregator and by the activity-gated cache decorator wrapping it
//!
//! These traits keep the domain independent of specific HTTP client or
//! caching technology and make every seam mockable in tests.

pub mod github;
pub mod portfolio;

pub use github::{GitHubApi, GitHubRepo, RepoOwner, RepositorySearchPage};
pub use portfolio::{PortfolioService, SearchFilter};
