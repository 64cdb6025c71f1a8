//! Portfolio aggregation over the raw GitHub API.
//!
//! For each repository of the configured account the aggregator merges the
//! base listing entry with three supplementary fetches: pull-request count
//! (all states), per-language byte counts, and the newest commit within a
//! fixed lookback window. A failure in any supplementary fetch drops that
//! one repository from the result; a failure of the initial listing aborts
//! the whole pass.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::errors::GitHubResult;
use crate::domain::models::{RepositoryInfo, SearchResult};
use crate::domain::ports::{GitHubApi, GitHubRepo, PortfolioService, SearchFilter};

/// Stateless aggregator implementing the portfolio read contract directly
/// against the GitHub API port.
pub struct PortfolioAggregator {
    api: Arc<dyn GitHubApi>,
    username: String,
    lookback: Duration,
}

impl PortfolioAggregator {
    /// Create an aggregator for `username` with a one-year commit lookback.
    pub fn new(api: Arc<dyn GitHubApi>, username: impl Into<String>) -> Self {
        Self::with_lookback(api, username, Duration::days(365))
    }

    /// Create with a custom commit lookback window.
    pub fn with_lookback(
        api: Arc<dyn GitHubApi>,
        username: impl Into<String>,
        lookback: Duration,
    ) -> Self {
        Self {
            api,
            username: username.into(),
            lookback,
        }
    }

    /// Fetch the supplementary facts for one repository and merge them with
    /// its base metadata. Any failing fetch fails the whole record; the
    /// caller decides whether to skip or propagate.
    async fn enrich_repository(&self, repo: &GitHubRepo) -> GitHubResult<RepositoryInfo> {
        let owner = repo.owner.login.as_str();
        debug!(repo = %repo.name, "fetching supplementary repository data");

        let pull_requests = self.api.count_pull_requests(owner, &repo.name).await?;
        let languages = self.api.list_languages(owner, &repo.name).await?;
        let since = Utc::now() - self.lookback;
        let last_commit = self
            .api
            .latest_commit_since(owner, &repo.name, since)
            .await?;

        Ok(RepositoryInfo {
            name: repo.name.clone(),
            description: repo.description.clone(),
            url: repo.html_url.clone(),
            homepage: repo.homepage.clone(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
            pull_requests,
            last_commit_date: last_commit.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            languages,
            owner_login: repo.owner.login.clone(),
            owner_avatar_url: repo.owner.avatar_url.clone(),
        })
    }

    /// Enrich a listed repository set, skipping (and logging) repositories
    /// whose supplementary fetches fail.
    async fn enrich_all(&self, repos: &[GitHubRepo]) -> Vec<RepositoryInfo> {
        let mut result = Vec::with_capacity(repos.len());
        for repo in repos {
            match self.enrich_repository(repo).await {
                Ok(info) => result.push(info),
                Err(err) => {
                    warn!(repo = %repo.name, error = %err,
                        "failed to enrich repository, skipping");
                }
            }
        }
        result
    }

    /// Enrich search hits. Same skip-on-failure policy, but without the
    /// commit lookup: search results only carry languages and PR counts.
    async fn enrich_search_hits(&self, repos: &[GitHubRepo]) -> Vec<RepositoryInfo> {
        let mut result = Vec::with_capacity(repos.len());
        for repo in repos {
            let owner = repo.owner.login.as_str();
            let enriched: GitHubResult<RepositoryInfo> = async {
                let languages = self.api.list_languages(owner, &repo.name).await?;
                let pull_requests = self.api.count_pull_requests(owner, &repo.name).await?;
                Ok(RepositoryInfo {
                    name: repo.name.clone(),
                    description: repo.description.clone(),
                    url: repo.html_url.clone(),
                    homepage: repo.homepage.clone(),
                    stars: repo.stargazers_count,
                    forks: repo.forks_count,
                    open_issues: repo.open_issues_count,
                    pull_requests,
                    last_commit_date: DateTime::<Utc>::UNIX_EPOCH,
                    languages,
                    owner_login: repo.owner.login.clone(),
                    owner_avatar_url: repo.owner.avatar_url.clone(),
                })
            }
            .await;

            match enriched {
                Ok(info) => result.push(info),
                Err(err) => {
                    warn!(repo = %repo.name, error = %err,
                        "failed to enrich search result, skipping");
                }
            }
        }
        result
    }

    fn matches_filter(repo: &GitHubRepo, filter: &SearchFilter) -> bool {
        let name_ok = filter.name.as_deref().is_none_or(|needle| {
            repo.name.to_lowercase().contains(&needle.to_lowercase())
        });
        let language_ok = filter.language.as_deref().is_none_or(|lang| {
            repo.language
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(lang))
        });
        name_ok && language_ok
    }

    fn build_query(filter: &SearchFilter) -> String {
        let mut query = String::new();
        if let Some(name) = &filter.name {
            query.push_str(name);
            query.push(' ');
        }
        if let Some(language) = &filter.language {
            query.push_str(&format!("language:{language} "));
        }
        query.trim().to_string()
    }
}

#[async_trait]
impl PortfolioService for PortfolioAggregator {
    async fn portfolio(&self) -> GitHubResult<Vec<RepositoryInfo>> {
        info!(username = %self.username, "fetching repository list");
        let repos = self.api.list_user_repositories(&self.username).await?;
        info!(count = repos.len(), "repository list fetched");

        let result = self.enrich_all(&repos).await;
        info!(count = result.len(), "portfolio aggregation complete");
        Ok(result)
    }

    async fn search(&self, filter: &SearchFilter) -> GitHubResult<SearchResult> {
        info!(
            name = filter.name.as_deref().unwrap_or("-"),
            language = filter.language.as_deref().unwrap_or("-"),
            username = filter.username.as_deref().unwrap_or("-"),
            "searching repositories"
        );

        let result = if let Some(username) = &filter.username {
            // Scoped mode: list the account's repositories and filter
            // client-side. The total count is the filtered count.
            let all = self.api.list_user_repositories(username).await?;
            let matched: Vec<GitHubRepo> = all
                .into_iter()
                .filter(|repo| Self::matches_filter(repo, filter))
                .collect();
            debug!(count = matched.len(), %username, "scoped search matched");

            let repositories = self.enrich_search_hits(&matched).await;
            SearchResult {
                total_count: matched.len() as u64,
                repositories,
            }
        } else {
            // Unscoped mode: delegate to GitHub's native search. The
            // upstream total may exceed the enriched item count.
            let page = self.api.search_repositories(&Self::build_query(filter)).await?;
            debug!(total = page.total_count, "native search returned");

            let repositories = self.enrich_search_hits(&page.items).await;
            SearchResult {
                total_count: page.total_count,
                repositories,
            }
        };

        info!(total = result.total_count, "repository search complete");
        Ok(result)
    }

    async fn last_activity(&self) -> GitHubResult<Option<DateTime<Utc>>> {
        info!(username = %self.username, "fetching last user activity");
        let activity = self.api.latest_user_event(&self.username).await?;
        match activity {
            Some(ts) => info!(timestamp = %ts, "last activity found"),
            None => info!("no recorded activity for user"),
        }
        Ok(activity)
    }
}
