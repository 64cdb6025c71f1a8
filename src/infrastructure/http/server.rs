//! HTTP server construction and lifecycle.

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{get_last_activity, get_portfolio, search_repositories, AppState};

/// Build the API router.
///
/// Separated from [`serve`] so tests can drive the router in-process.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/github/portfolio", get(get_portfolio))
        .route("/api/github/search", get(search_repositories))
        .route("/api/github/last-activity", get(get_last_activity))
        .layer(TraceLayer::new_for_http())
        // The portfolio frontend is served from a different origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the API until the process is stopped.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {addr}"))?;

    info!("gitfolio API listening on {addr}");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
