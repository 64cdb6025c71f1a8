//! Activity-gated cache decorator over the portfolio service.
//!
//! Wraps an inner [`PortfolioService`] behind the identical contract using
//! moka TTL caches, plus a cheap staleness probe: before serving a cached
//! portfolio, the decorator may consult the account's last-activity
//! timestamp and drop the cache when activity is newer than the last
//! refresh. The probe itself is rate-limited so bursts of portfolio reads
//! cost at most one activity fetch per interval.
//!
//! Search is deliberately never cached: results are too parameterized to
//! cache safely with a two-key cache.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::errors::GitHubResult;
use crate::domain::models::{RepositoryInfo, SearchResult};
use crate::domain::ports::{PortfolioService, SearchFilter};

/// Hard expiry for cached entries.
const CACHE_TTL_SECS: u64 = 600;

/// Minimum interval between staleness probes.
const PROBE_INTERVAL_SECS: u64 = 60;

const PORTFOLIO_CACHE_KEY: &str = "portfolio";
const LAST_ACTIVITY_CACHE_KEY: &str = "last_activity";

/// Caching decorator implementing the same read contract as the inner
/// service.
///
/// Holds two independent TTL entries (portfolio snapshot, last-activity
/// timestamp) and a refresh clock recording the last successful staleness
/// evaluation. The clock lives behind a tokio mutex so concurrent probes
/// cannot both pass the rate-limit check; cache reads themselves never
/// take the lock.
pub struct CachedPortfolioService<S: PortfolioService> {
    inner: Arc<S>,
    portfolio_cache: Cache<String, Arc<Vec<RepositoryInfo>>>,
    activity_cache: Cache<String, DateTime<Utc>>,
    /// Time of the last completed staleness evaluation. Reset to the Unix
    /// epoch on forced invalidation so the next probe is never skipped.
    last_refresh: Mutex<DateTime<Utc>>,
    probe_interval: ChronoDuration,
}

impl<S: PortfolioService> CachedPortfolioService<S> {
    /// Wrap `inner` with the default 10 minute TTL and 1 minute probe
    /// interval.
    pub fn new(inner: Arc<S>) -> Self {
        Self::with_intervals(
            inner,
            Duration::from_secs(CACHE_TTL_SECS),
            Duration::from_secs(PROBE_INTERVAL_SECS),
        )
    }

    /// Wrap with custom intervals. Used by tests to compress time.
    pub fn with_intervals(inner: Arc<S>, ttl: Duration, probe_interval: Duration) -> Self {
        let portfolio_cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        let activity_cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self {
            inner,
            portfolio_cache,
            activity_cache,
            last_refresh: Mutex::new(DateTime::<Utc>::UNIX_EPOCH),
            probe_interval: ChronoDuration::from_std(probe_interval)
                .unwrap_or_else(|_| ChronoDuration::seconds(PROBE_INTERVAL_SECS as i64)),
        }
    }

    /// Staleness probe, run as the first step of every portfolio read.
    ///
    /// Skips entirely when the probe interval has not elapsed. Otherwise
    /// fetches the current activity timestamp (through the activity cache)
    /// and compares it against the refresh clock:
    /// - no signal: cache untouched, clock advances to now
    /// - signal newer than the clock: both entries removed, clock reset to
    ///   the epoch so the next probe is never rate-limited away
    /// - signal not newer: cache untouched, clock advances to now
    ///
    /// Probe failures are absorbed: the existing cache is kept as-is and
    /// the clock is left alone, so the caller never sees a probe error.
    async fn check_for_updates(&self) {
        let mut last_refresh = self.last_refresh.lock().await;
        let now = Utc::now();

        if now.signed_duration_since(*last_refresh) < self.probe_interval {
            debug!("skipping update check, probed less than the interval ago");
            return;
        }

        info!("checking for new activity since last refresh");
        match self.cached_last_activity().await {
            Ok(None) => {
                info!("no recorded activity, keeping existing cache");
                *last_refresh = now;
            }
            Ok(Some(activity)) => {
                if activity > *last_refresh {
                    info!(
                        activity = %activity,
                        last_refresh = %*last_refresh,
                        "new activity detected, invalidating cache"
                    );
                    self.portfolio_cache.invalidate(PORTFOLIO_CACHE_KEY).await;
                    self.activity_cache.invalidate(LAST_ACTIVITY_CACHE_KEY).await;
                    // Force the next probe through the rate-limit gate.
                    *last_refresh = DateTime::<Utc>::UNIX_EPOCH;
                } else {
                    info!("no new activity since last refresh, cache still valid");
                    *last_refresh = now;
                }
            }
            Err(err) => {
                warn!(error = %err, "update check failed, keeping existing cache");
            }
        }
    }

    /// TTL-cached last-activity lookup shared by the probe and the public
    /// `last_activity` operation.
    ///
    /// Only present timestamps are cached. An absent signal is re-fetched
    /// on every call: caching it would hide newly appearing activity from
    /// the staleness probe for a whole TTL.
    async fn cached_last_activity(&self) -> GitHubResult<Option<DateTime<Utc>>> {
        if let Some(cached) = self.activity_cache.get(LAST_ACTIVITY_CACHE_KEY).await {
            debug!("returning last activity from cache");
            return Ok(Some(cached));
        }

        info!("no cached last activity, fetching");
        let activity = self.inner.last_activity().await?;
        if let Some(timestamp) = activity {
            self.activity_cache
                .insert(LAST_ACTIVITY_CACHE_KEY.to_string(), timestamp)
                .await;
        }
        Ok(activity)
    }
}

#[async_trait]
impl<S: PortfolioService + 'static> PortfolioService for CachedPortfolioService<S> {
    async fn portfolio(&self) -> GitHubResult<Vec<RepositoryInfo>> {
        self.check_for_updates().await;

        if let Some(cached) = self.portfolio_cache.get(PORTFOLIO_CACHE_KEY).await {
            info!(count = cached.len(), "returning portfolio from cache");
            return Ok((*cached).clone());
        }

        info!("no cached portfolio, fetching");
        let portfolio = self.inner.portfolio().await?;
        self.portfolio_cache
            .insert(PORTFOLIO_CACHE_KEY.to_string(), Arc::new(portfolio.clone()))
            .await;
        *self.last_refresh.lock().await = Utc::now();
        info!(count = portfolio.len(), "portfolio cached");

        Ok(portfolio)
    }

    async fn search(&self, filter: &SearchFilter) -> GitHubResult<SearchResult> {
        // Always live, never cached.
        debug!("forwarding search to inner service");
        self.inner.search(filter).await
    }

    async fn last_activity(&self) -> GitHubResult<Option<DateTime<Utc>>> {
        self.cached_last_activity().await
    }
}
