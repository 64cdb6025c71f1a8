//! Service layer: portfolio aggregation and the activity-gated cache.

pub mod aggregator;
pub mod cached;

pub use aggregator::PortfolioAggregator;
pub use cached::CachedPortfolioService;
