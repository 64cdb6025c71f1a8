//! Port trait for the GitHub REST API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::errors::GitHubResult;

/// Repository as listed by GitHub, before enrichment.
///
/// Carries the base metadata the aggregator copies into a
/// [`RepositoryInfo`](crate::domain::models::RepositoryInfo) plus the
/// fields needed to drive the supplementary fetches (owner login, name)
/// and client-side search filtering (primary language).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub owner: RepoOwner,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub open_issues_count: u32,
    /// Primary language as reported by GitHub; `None` for empty repos.
    pub language: Option<String>,
}

/// Owning account of a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
    pub avatar_url: String,
}

/// One page of native search results.
///
/// `total_count` is GitHub's reported total for the whole query and can
/// exceed `items.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySearchPage {
    pub total_count: u64,
    pub items: Vec<GitHubRepo>,
}

/// Port trait for the upstream GitHub REST API.
///
/// Implementations must be `Send + Sync`; methods take `&self` so a single
/// client can serve concurrent requests. Every operation may fail with a
/// rate-limit or authorization condition, which implementations surface as
/// the corresponding [`GitHubError`](crate::domain::errors::GitHubError)
/// variants rather than generic failures.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// List all repositories owned by `username`.
    async fn list_user_repositories(&self, username: &str) -> GitHubResult<Vec<GitHubRepo>>;

    /// Count pull requests for a repository, in all states.
    async fn count_pull_requests(&self, owner: &str, repo: &str) -> GitHubResult<u32>;

    /// Per-language byte counts for a repository.
    async fn list_languages(&self, owner: &str, repo: &str)
        -> GitHubResult<HashMap<String, u64>>;

    /// Author date of the newest commit at or after `since`, if any.
    async fn latest_commit_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> GitHubResult<Option<DateTime<Utc>>>;

    /// Native free-text repository search.
    async fn search_repositories(&self, query: &str) -> GitHubResult<RepositorySearchPage>;

    /// Creation time of the most recent event performed by `username`,
    /// or `None` when the account has no recorded activity.
    async fn latest_user_event(&self, username: &str) -> GitHubResult<Option<DateTime<Utc>>>;
}
