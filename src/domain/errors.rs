//! Domain errors for GitHub-backed portfolio operations.

use thiserror::Error;

/// Errors surfaced by the GitHub API and the services built on it.
///
/// The HTTP layer maps these onto response statuses: `RateLimitExceeded`
/// becomes 429, `AuthorizationFailed` becomes 401, everything else 500.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Upstream request quota exhausted.
    #[error("GitHub API rate limit exceeded")]
    RateLimitExceeded,

    /// Bad or missing credential.
    #[error("GitHub API authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Requested resource does not exist.
    #[error("GitHub resource not found: {0}")]
    NotFound(String),

    /// Upstream 5xx response.
    #[error("GitHub API server error (HTTP {status}): {body}")]
    ServerError { status: u16, body: String },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded.
    #[error("Failed to decode GitHub API response: {0}")]
    Deserialization(String),

    /// Anything the other variants do not cover.
    #[error("Unexpected GitHub API response (HTTP {status}): {body}")]
    Unexpected { status: u16, body: String },
}

pub type GitHubResult<T> = Result<T, GitHubError>;

impl GitHubError {
    /// Classify an HTTP error status.
    ///
    /// `rate_limited` carries the `x-ratelimit-remaining: 0` signal GitHub
    /// sets on 403 responses when the quota is exhausted.
    pub fn from_status(status: u16, rate_limited: bool, body: String) -> Self {
        match status {
            401 => GitHubError::AuthorizationFailed(body),
            403 if rate_limited => GitHubError::RateLimitExceeded,
            403 => GitHubError::AuthorizationFailed(body),
            404 => GitHubError::NotFound(body),
            429 => GitHubError::RateLimitExceeded,
            s if (500..600).contains(&s) => GitHubError::ServerError { status: s, body },
            s => GitHubError::Unexpected { status: s, body },
        }
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GitHubError::Deserialization(err.to_string())
        } else {
            GitHubError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_401_is_authorization() {
        let err = GitHubError::from_status(401, false, "bad credentials".into());
        assert!(matches!(err, GitHubError::AuthorizationFailed(_)));
    }

    #[test]
    fn from_status_403_with_exhausted_quota_is_rate_limit() {
        let err = GitHubError::from_status(403, true, "rate limit".into());
        assert!(matches!(err, GitHubError::RateLimitExceeded));
    }

    #[test]
    fn from_status_403_without_quota_signal_is_authorization() {
        let err = GitHubError::from_status(403, false, "forbidden".into());
        assert!(matches!(err, GitHubError::AuthorizationFailed(_)));
    }

    #[test]
    fn from_status_429_is_rate_limit() {
        let err = GitHubError::from_status(429, false, "slow down".into());
        assert!(matches!(err, GitHubError::RateLimitExceeded));
    }

    #[test]
    fn from_status_404_is_not_found() {
        let err = GitHubError::from_status(404, false, "missing".into());
        assert!(matches!(err, GitHubError::NotFound(_)));
    }

    #[test]
    fn from_status_5xx_is_server_error() {
        let err = GitHubError::from_status(502, false, "bad gateway".into());
        assert!(matches!(err, GitHubError::ServerError { status: 502, .. }));
    }

    #[test]
    fn from_status_other_is_unexpected() {
        let err = GitHubError::from_status(418, false, "teapot".into());
        assert!(matches!(err, GitHubError::Unexpected { status: 418, .. }));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            GitHubError::RateLimitExceeded.to_string(),
            "GitHub API rate limit exceeded"
        );
        assert_eq!(
            GitHubError::AuthorizationFailed("no token".into()).to_string(),
            "GitHub API authorization failed: no token"
        );
    }
}
