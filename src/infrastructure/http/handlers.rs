//! Endpoint handlers for the portfolio API.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::errors::GitHubError;
use crate::domain::models::{RepositoryInfo, SearchResult};
use crate::domain::ports::{PortfolioService, SearchFilter};

/// Shared application state handed to every request handler.
///
/// One instance is constructed at startup and cloned per request; the
/// service behind the `Arc` is the activity-gated cache wrapping the
/// aggregator.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn PortfolioService>,
}

/// Query parameters of `GET /api/github/search`. All optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub repository_name: Option<String>,
    pub language: Option<String>,
    pub username: Option<String>,
}

/// `GET /api/github/portfolio`
pub async fn get_portfolio(
    State(state): State<AppState>,
) -> Result<Json<Vec<RepositoryInfo>>, (StatusCode, String)> {
    info!("portfolio requested");
    match state.service.portfolio().await {
        Ok(portfolio) => {
            info!(count = portfolio.len(), "portfolio request served");
            Ok(Json(portfolio))
        }
        Err(err) => Err(map_error(&err, "Failed to fetch portfolio")),
    }
}

/// `GET /api/github/search`
pub async fn search_repositories(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResult>, (StatusCode, String)> {
    let filter = SearchFilter::new(params.repository_name, params.language, params.username);
    match state.service.search(&filter).await {
        Ok(result) => {
            info!(total = result.total_count, "search request served");
            Ok(Json(result))
        }
        Err(err) => Err(map_error(&err, "Failed to search repositories")),
    }
}

/// `GET /api/github/last-activity`
pub async fn get_last_activity(
    State(state): State<AppState>,
) -> Result<Json<Option<DateTime<Utc>>>, (StatusCode, String)> {
    match state.service.last_activity().await {
        Ok(activity) => Ok(Json(activity)),
        Err(err) => Err(map_error(&err, "Failed to fetch last activity")),
    }
}

/// Map a domain error to an HTTP status and message.
///
/// Rate-limit exhaustion maps to 429 and authorization failures to 401;
/// everything else becomes a 500 carrying the error message.
fn map_error(err: &GitHubError, context: &str) -> (StatusCode, String) {
    match err {
        GitHubError::RateLimitExceeded => {
            warn!(error = %err, "{context}: rate limited");
            (
                StatusCode::TOO_MANY_REQUESTS,
                "GitHub API rate limit exceeded. Try again later.".to_string(),
            )
        }
        GitHubError::AuthorizationFailed(_) => {
            error!(error = %err, "{context}: authorization failed");
            (
                StatusCode::UNAUTHORIZED,
                "GitHub API authorization failed. Check the configured token.".to_string(),
            )
        }
        _ => {
            error!(error = %err, "{context}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{context}: {err}"),
            )
        }
    }
}
