//! reqwest-based GitHub REST API client.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client as ReqwestClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::{ApiCommit, ApiEvent, ApiPullRequest, ApiSearchResponse};
use crate::domain::errors::{GitHubError, GitHubResult};
use crate::domain::ports::{GitHubApi, GitHubRepo, RepositorySearchPage};

/// Configuration for the GitHub HTTP client.
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// GitHub REST API base URL.
    pub base_url: String,

    /// Personal access token; `None` means unauthenticated calls with
    /// lower rate limits.
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// Page size for list endpoints. A response shorter than this marks the
/// last page.
const PAGE_SIZE: usize = 100;

/// HTTP client for the GitHub REST API implementing the [`GitHubApi`] port.
///
/// Reuses one pooled reqwest client with the GitHub media-type and
/// user-agent headers baked in. Error responses are classified into the
/// domain taxonomy, including rate-limit detection via the
/// `x-ratelimit-remaining` header on 403 responses.
pub struct GitHubHttpClient {
    http_client: ReqwestClient,
    base_url: String,
}

impl GitHubHttpClient {
    /// Build a client from configuration.
    ///
    /// A missing token is logged as a warning but is not fatal.
    pub fn new(config: GitHubClientConfig) -> GitHubResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gitfolio"),
        );

        match &config.token {
            Some(token) => {
                let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| {
                        GitHubError::AuthorizationFailed(format!("invalid access token: {e}"))
                    })?;
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
                info!("GitHub client configured with an access token");
            }
            None => {
                warn!("no GitHub access token configured, requests will be rate-limited sooner");
            }
        }

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Perform a GET and decode the JSON body, classifying error statuses.
    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> GitHubResult<T> {
        let url = format!("{}{path_and_query}", self.base_url);
        debug!("GET {url}");

        let response = self.http_client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        let body = response.json::<T>().await?;
        Ok(body)
    }

    /// Fetch every page of a list endpoint, incrementing `page` until a
    /// page shorter than [`PAGE_SIZE`] signals the end.
    async fn get_json_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> GitHubResult<Vec<T>> {
        let url = format!("{}{path}", self.base_url);
        let mut items: Vec<T> = Vec::new();
        let mut page: u32 = 1;

        loop {
            debug!("GET {url} page={page}");
            let response = self
                .http_client
                .get(&url)
                .query(params)
                .query(&[
                    ("per_page", PAGE_SIZE.to_string()),
                    ("page", page.to_string()),
                ])
                .send()
                .await?;
            let response = Self::check_status(response).await?;
            let batch: Vec<T> = response.json().await?;

            let full_page = batch.len() == PAGE_SIZE;
            items.extend(batch);
            if !full_page {
                return Ok(items);
            }
            page += 1;
        }
    }

    async fn check_status(response: Response) -> GitHubResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // GitHub reports quota exhaustion as 403 with a zeroed
        // x-ratelimit-remaining header; secondary limits use 429.
        let rate_limited = status == StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "0");

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_string());

        warn!(status = %status, "GitHub API error response");
        Err(GitHubError::from_status(status.as_u16(), rate_limited, body))
    }
}

#[async_trait]
impl GitHubApi for GitHubHttpClient {
    async fn list_user_repositories(&self, username: &str) -> GitHubResult<Vec<GitHubRepo>> {
        self.get_json_paged(&format!("/users/{username}/repos"), &[("type", "owner")])
            .await
    }

    async fn count_pull_requests(&self, owner: &str, repo: &str) -> GitHubResult<u32> {
        let pulls: Vec<ApiPullRequest> = self
            .get_json_paged(&format!("/repos/{owner}/{repo}/pulls"), &[("state", "all")])
            .await?;
        Ok(pulls.len() as u32)
    }

    async fn list_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> GitHubResult<HashMap<String, u64>> {
        self.get_json(&format!("/repos/{owner}/{repo}/languages")).await
    }

    async fn latest_commit_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> GitHubResult<Option<DateTime<Utc>>> {
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let commits: Vec<ApiCommit> = self
            .get_json(&format!(
                "/repos/{owner}/{repo}/commits?since={since}&per_page=1"
            ))
            .await?;

        // The endpoint returns newest first; take the newest author date.
        let latest = commits
            .iter()
            .filter_map(|c| c.commit.author.as_ref().map(|a| a.date))
            .max();
        Ok(latest)
    }

    async fn search_repositories(&self, query: &str) -> GitHubResult<RepositorySearchPage> {
        // reqwest percent-encodes the value, so reserved characters in the
        // query (`#`, `&`, ...) survive intact.
        let url = format!("{}/search/repositories", self.base_url);
        debug!("GET {url} q={query}");

        let response = self.http_client.get(&url).query(&[("q", query)]).send().await?;
        let response = Self::check_status(response).await?;
        let page: ApiSearchResponse = response.json().await?;
        Ok(page.into())
    }

    async fn latest_user_event(&self, username: &str) -> GitHubResult<Option<DateTime<Utc>>> {
        let events: Vec<ApiEvent> = self
            .get_json(&format!("/users/{username}/events?per_page=1"))
            .await?;
        Ok(events.first().map(|e| e.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_without_token() {
        let client = GitHubHttpClient::new(GitHubClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn client_creation_with_token() {
        let config = GitHubClientConfig {
            token: Some("ghp_test123".to_string()),
            ..Default::default()
        };
        assert!(GitHubHttpClient::new(config).is_ok());
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let config = GitHubClientConfig {
            base_url: "https://api.github.com/".to_string(),
            ..Default::default()
        };
        let client = GitHubHttpClient::new(config).unwrap();
        assert_eq!(client.base_url, "https://api.github.com");
    }
}
