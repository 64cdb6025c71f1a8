//! Port trait for the aggregated portfolio read contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::GitHubResult;
use crate::domain::models::{RepositoryInfo, SearchResult};

/// Filters accepted by the search operation. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Case-insensitive substring match on repository name.
    pub name: Option<String>,
    /// Case-insensitive exact match on primary language.
    pub language: Option<String>,
    /// When present, search is scoped to this account's repositories;
    /// otherwise GitHub's native search is used.
    pub username: Option<String>,
}

impl SearchFilter {
    fn normalize(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }

    /// Build a filter, treating empty and whitespace-only values as absent.
    pub fn new(name: Option<String>, language: Option<String>, username: Option<String>) -> Self {
        Self {
            name: Self::normalize(name),
            language: Self::normalize(language),
            username: Self::normalize(username),
        }
    }
}

/// The aggregated read contract shared by the aggregator and the cache
/// decorator wrapping it. Composition over this trait is what lets the
/// cache present an identical surface to the HTTP layer.
#[async_trait]
pub trait PortfolioService: Send + Sync {
    /// Full portfolio snapshot for the configured account.
    async fn portfolio(&self) -> GitHubResult<Vec<RepositoryInfo>>;

    /// Repository search. Never cached.
    async fn search(&self, filter: &SearchFilter) -> GitHubResult<SearchResult>;

    /// Timestamp of the configured account's most recent activity.
    async fn last_activity(&self) -> GitHubResult<Option<DateTime<Utc>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filter_values_are_treated_as_absent() {
        let filter = SearchFilter::new(
            Some("  ".to_string()),
            Some(String::new()),
            Some("alice".to_string()),
        );
        assert!(filter.name.is_none());
        assert!(filter.language.is_none());
        assert_eq!(filter.username.as_deref(), Some("alice"));
    }
}
