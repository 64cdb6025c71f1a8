//! Aggregated repository records served by the portfolio API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One repository with its base metadata merged with the supplementary
/// facts fetched per repository (pull requests, languages, last commit).
///
/// Records are rebuilt wholesale on every aggregation pass and never
/// mutated in place. Serialized with camelCase field names, matching the
/// JSON contract consumed by the portfolio frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    pub name: String,
    pub description: Option<String>,
    /// Canonical web URL of the repository.
    pub url: String,
    pub homepage: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub open_issues: u32,
    /// Pull requests in any state, not just open ones.
    pub pull_requests: u32,
    /// Author date of the newest commit within the lookback window.
    /// Set to the Unix epoch when no commit was found.
    pub last_commit_date: DateTime<Utc>,
    /// Language name -> byte count.
    pub languages: HashMap<String, u64>,
    pub owner_login: String,
    pub owner_avatar_url: String,
}

/// Result of a repository search.
///
/// `total_count` is the upstream-reported total for unscoped searches and
/// may exceed `repositories.len()` when enrichment dropped items or the
/// upstream returned only the first page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub total_count: u64,
    pub repositories: Vec<RepositoryInfo>,
}
