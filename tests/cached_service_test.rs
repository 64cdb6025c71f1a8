//! Behavioral tests for the activity-gated cache decorator.
//!
//! Intervals are compressed via `with_intervals` so that probe gating and
//! invalidation can be exercised with short sleeps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gitfolio::{
    CachedPortfolioService, GitHubError, GitHubResult, PortfolioService, RepositoryInfo,
    SearchFilter, SearchResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn record(name: &str) -> RepositoryInfo {
    RepositoryInfo {
        name: name.to_string(),
        description: None,
        url: format!("https://github.com/alice/{name}"),
        homepage: None,
        stars: 1,
        forks: 0,
        open_issues: 0,
        pull_requests: 2,
        last_commit_date: DateTime::<Utc>::UNIX_EPOCH,
        languages: HashMap::from([("Rust".to_string(), 1024)]),
        owner_login: "alice".to_string(),
        owner_avatar_url: "https://avatars.example/alice".to_string(),
    }
}

/// Scripted inner service counting every call.
#[derive(Default)]
struct ScriptedPortfolio {
    portfolio_calls: AtomicUsize,
    activity_calls: AtomicUsize,
    search_calls: AtomicUsize,
    activity: Mutex<Option<DateTime<Utc>>>,
    fail_activity: AtomicBool,
    fail_portfolio: AtomicBool,
}

impl ScriptedPortfolio {
    fn set_activity(&self, timestamp: Option<DateTime<Utc>>) {
        *self.activity.lock().unwrap() = timestamp;
    }
}

#[async_trait]
impl PortfolioService for ScriptedPortfolio {
    async fn portfolio(&self) -> GitHubResult<Vec<RepositoryInfo>> {
        self.portfolio_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_portfolio.load(Ordering::SeqCst) {
            return Err(GitHubError::RateLimitExceeded);
        }
        Ok(vec![record("alpha"), record("beta"), record("gamma")])
    }

    async fn search(&self, _filter: &SearchFilter) -> GitHubResult<SearchResult> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SearchResult {
            total_count: 1,
            repositories: vec![record("alpha")],
        })
    }

    async fn last_activity(&self) -> GitHubResult<Option<DateTime<Utc>>> {
        self.activity_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_activity.load(Ordering::SeqCst) {
            return Err(GitHubError::Network("events endpoint down".into()));
        }
        Ok(*self.activity.lock().unwrap())
    }
}

fn cached(
    inner: Arc<ScriptedPortfolio>,
    ttl: Duration,
    probe_interval: Duration,
) -> CachedPortfolioService<ScriptedPortfolio> {
    CachedPortfolioService::with_intervals(inner, ttl, probe_interval)
}

#[tokio::test]
async fn serves_cached_snapshot_within_ttl() {
    let inner = Arc::new(ScriptedPortfolio::default());
    let service = cached(inner.clone(), Duration::from_secs(60), Duration::from_secs(30));

    let first = service.portfolio().await.unwrap();
    let second = service.portfolio().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(inner.portfolio_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn probe_is_rate_limited_between_reads() {
    let inner = Arc::new(ScriptedPortfolio::default());
    inner.set_activity(Some(Utc::now() - chrono::Duration::hours(1)));
    let service = cached(inner.clone(), Duration::from_secs(60), Duration::from_secs(30));

    // Two reads well inside the probe interval: only the first probes.
    service.portfolio().await.unwrap();
    service.portfolio().await.unwrap();

    assert_eq!(inner.activity_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn new_activity_invalidates_both_entries() {
    let inner = Arc::new(ScriptedPortfolio::default());
    let service = cached(inner.clone(), Duration::from_secs(60), Duration::from_millis(50));

    // Cold fetch; no activity signal yet.
    service.portfolio().await.unwrap();
    assert_eq!(inner.portfolio_calls.load(Ordering::SeqCst), 1);

    // Activity appears after the refresh.
    inner.set_activity(Some(Utc::now()));
    tokio::time::sleep(Duration::from_millis(80)).await;

    // Probe detects the newer signal, drops the cache, and the read
    // performs exactly one fresh pass.
    service.portfolio().await.unwrap();
    assert_eq!(inner.portfolio_calls.load(Ordering::SeqCst), 2);

    // Immediately after the refresh the cache serves again.
    service.portfolio().await.unwrap();
    assert_eq!(inner.portfolio_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn absent_signal_preserves_cache() {
    let inner = Arc::new(ScriptedPortfolio::default());
    let service = cached(inner.clone(), Duration::from_secs(60), Duration::from_millis(20));

    let first = service.portfolio().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Probe runs again, still no signal: cache is preserved verbatim.
    let second = service.portfolio().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(inner.portfolio_calls.load(Ordering::SeqCst), 1);
    assert!(inner.activity_calls.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn probe_failure_never_reaches_the_caller() {
    let inner = Arc::new(ScriptedPortfolio::default());
    inner.fail_activity.store(true, Ordering::SeqCst);
    let service = cached(inner.clone(), Duration::from_secs(60), Duration::from_millis(20));

    // Cold read succeeds despite the failing probe.
    let first = service.portfolio().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Warm read: probe fails again, cache is served untouched.
    let second = service.portfolio().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(inner.portfolio_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn inner_failure_propagates_and_nothing_is_cached() {
    let inner = Arc::new(ScriptedPortfolio::default());
    inner.fail_portfolio.store(true, Ordering::SeqCst);
    let service = cached(inner.clone(), Duration::from_secs(60), Duration::from_secs(30));

    let err = service.portfolio().await.unwrap_err();
    assert!(matches!(err, GitHubError::RateLimitExceeded));

    // Once the inner service recovers, a fresh pass happens.
    inner.fail_portfolio.store(false, Ordering::SeqCst);
    service.portfolio().await.unwrap();
    assert_eq!(inner.portfolio_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn search_is_never_cached() {
    let inner = Arc::new(ScriptedPortfolio::default());
    let service = cached(inner.clone(), Duration::from_secs(60), Duration::from_secs(30));

    let filter = SearchFilter::new(Some("alpha".to_string()), None, None);
    service.search(&filter).await.unwrap();
    service.search(&filter).await.unwrap();

    assert_eq!(inner.search_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn last_activity_is_a_plain_ttl_cache() {
    let inner = Arc::new(ScriptedPortfolio::default());
    let timestamp = Utc::now() - chrono::Duration::minutes(5);
    inner.set_activity(Some(timestamp));
    let service = cached(inner.clone(), Duration::from_secs(60), Duration::from_secs(30));

    let first = service.last_activity().await.unwrap();
    let second = service.last_activity().await.unwrap();

    assert_eq!(first, Some(timestamp));
    assert_eq!(second, Some(timestamp));
    assert_eq!(inner.activity_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_cold_reads_both_get_consistent_snapshots() {
    let inner = Arc::new(ScriptedPortfolio::default());
    let service = Arc::new(cached(
        inner.clone(),
        Duration::from_secs(60),
        Duration::from_secs(30),
    ));

    let a = {
        let service = service.clone();
        tokio::spawn(async move { service.portfolio().await })
    };
    let b = {
        let service = service.clone();
        tokio::spawn(async move { service.portfolio().await })
    };

    let first = a.await.unwrap().unwrap();
    let second = b.await.unwrap().unwrap();

    // No single-flight coalescing: either caller may have triggered its
    // own pass, but both snapshots must be complete and identical.
    assert_eq!(first, second);
    assert!(inner.portfolio_calls.load(Ordering::SeqCst) >= 1);
}

/// The end-to-end scenario from the design notes, with compressed time:
/// cold fetch with no signal, a gated cache hit, then invalidation once
/// activity newer than the refresh clock appears.
#[tokio::test]
async fn cold_cache_invalidation_scenario() {
    let inner = Arc::new(ScriptedPortfolio::default());
    let service = cached(inner.clone(), Duration::from_secs(10), Duration::from_millis(100));

    // t=0: probe finds no signal (absorbed), portfolio fetched and cached.
    let first = service.portfolio().await.unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(inner.portfolio_calls.load(Ordering::SeqCst), 1);
    assert_eq!(inner.activity_calls.load(Ordering::SeqCst), 1);

    // Shortly after: probe skipped, identical snapshot from cache.
    let second = service.portfolio().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(inner.activity_calls.load(Ordering::SeqCst), 1);

    // Activity appears, and the probe interval elapses.
    inner.set_activity(Some(Utc::now()));
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Next read probes, invalidates, and fetches fresh.
    service.portfolio().await.unwrap();
    assert_eq!(inner.portfolio_calls.load(Ordering::SeqCst), 2);
    assert_eq!(inner.activity_calls.load(Ordering::SeqCst), 2);
}
