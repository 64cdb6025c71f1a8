//! Gitfolio server entry point.

use anyhow::Result;
use chrono::Duration as ChronoDuration;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gitfolio::infrastructure::http::{serve, AppState};
use gitfolio::{
    CachedPortfolioService, Config, ConfigLoader, GitHubClientConfig, GitHubHttpClient,
    PortfolioAggregator, PortfolioService,
};

#[derive(Parser)]
#[command(name = "gitfolio", about = "GitHub portfolio API server", version)]
struct Cli {
    /// Path to a configuration file (default: gitfolio.yaml in the
    /// working directory, merged with GITFOLIO_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config);

    let client = GitHubHttpClient::new(GitHubClientConfig {
        base_url: config.github.api_url.clone(),
        token: config.github.token.clone(),
        ..Default::default()
    })?;

    let aggregator = PortfolioAggregator::with_lookback(
        Arc::new(client),
        config.github.username.clone(),
        ChronoDuration::days(i64::from(config.github.lookback_days)),
    );

    let cached = CachedPortfolioService::with_intervals(
        Arc::new(aggregator),
        Duration::from_secs(config.cache.ttl_secs),
        Duration::from_secs(config.cache.probe_interval_secs),
    );

    let state = AppState {
        service: Arc::new(cached) as Arc<dyn PortfolioService>,
    };

    serve(state, &config.server.host, config.server.port).await
}
