//! Wire types for GitHub REST API responses.
//!
//! Only the fields the service actually reads are declared; serde ignores
//! the rest of GitHub's payloads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::ports::{GitHubRepo, RepositorySearchPage};

/// `GET /search/repositories` response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiSearchResponse {
    pub total_count: u64,
    pub items: Vec<GitHubRepo>,
}

impl From<ApiSearchResponse> for RepositorySearchPage {
    fn from(response: ApiSearchResponse) -> Self {
        Self {
            total_count: response.total_count,
            items: response.items,
        }
    }
}

/// One element of `GET /repos/{owner}/{repo}/pulls`. The body is only
/// counted, so no fields are needed beyond the PR number.
#[derive(Debug, Deserialize)]
pub struct ApiPullRequest {
    pub number: u64,
}

/// One element of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Deserialize)]
pub struct ApiCommit {
    pub commit: ApiCommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiCommitDetail {
    pub author: Option<ApiCommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCommitAuthor {
    pub date: DateTime<Utc>,
}

/// One element of `GET /users/{username}/events`.
#[derive(Debug, Deserialize)]
pub struct ApiEvent {
    pub created_at: DateTime<Utc>,
}
