//! Integration tests for the radar service.
//!
//! Covers cache freshness, session resolution, and collaborator failures using
//! a counting pack history and a manually advanced clock.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use authority_common::{Error, RadarConfig, RequestContext, Result};
use authority_signals::radar::{Clock, PackHistory, SessionResolver};
use authority_signals::{IssueId, PackRecord, RadarService};

// ============================================================================
// Test Collaborators
// ============================================================================

/// Pack history that counts fetches and can be told to fail.
struct MockHistory {
    packs: Vec<PackRecord>,
    fail_with: Option<fn() -> Error>,
    fetch_count: AtomicU32,
    last_limit: Mutex<Option<usize>>,
}

impl MockHistory {
    fn new(packs: Vec<PackRecord>) -> Self {
        Self {
            packs,
            fail_with: None,
            fetch_count: AtomicU32::new(0),
            last_limit: Mutex::new(None),
        }
    }

    fn failing(fail_with: fn() -> Error) -> Self {
        Self {
            fail_with: Some(fail_with),
            ..Self::new(Vec::new())
        }
    }

    fn fetches(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PackHistory for MockHistory {
    async fn recent_packs(&self, _user_id: &str, limit: usize) -> Result<Vec<PackRecord>> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        *self.last_limit.lock().unwrap() = Some(limit);

        if let Some(fail_with) = self.fail_with {
            return Err(fail_with());
        }
        Ok(self.packs.iter().take(limit).cloned().collect())
    }
}

struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Session that counts lookups and resolves to a fixed answer.
struct FixedSession {
    user: Option<&'static str>,
    lookups: AtomicU32,
}

#[async_trait]
impl SessionResolver for FixedSession {
    async fn current_user(&self) -> Result<Option<String>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.user.map(str::to_string))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

/// A pack whose hooks are weak when `weak_hooks` is set.
fn pack(n: usize, weak_hooks: bool) -> PackRecord {
    let hooks = if weak_hooks { 6 } else { 17 };
    PackRecord {
        id: format!("pack-{n}"),
        title: format!("Pack {n}"),
        created_at: t0() - Duration::days(n as i64),
        artifact: Some(json!({"strategicClaims": [{"claim": "x"}]})),
        messaging_strength: Some(json!({
            "hookStrength": hooks,
            "claimRobustness": 16,
            "evidenceDepth": 16,
            "differentiationClarity": 16,
            "objectionCoverage": 16,
            "total": 64 + hooks
        })),
        authority_consistency: Some(json!({
            "thesisAlignment": 25,
            "positioningAlignment": 23,
            "toneMatch": 18,
            "claimThemeCoherence": 16,
            "driftWarnings": [],
            "total": 82
        })),
    }
}

fn service(history: Arc<MockHistory>, clock: Arc<ManualClock>) -> RadarService {
    RadarService::new(history, RadarConfig::default()).with_clock(clock)
}

// ============================================================================
// Cache Freshness
// ============================================================================

#[tokio::test]
async fn test_cache_hit_within_ttl_skips_fetch() {
    let history = Arc::new(MockHistory::new((0..10).map(|n| pack(n, n < 5)).collect()));
    let clock = Arc::new(ManualClock::at(t0()));
    let service = service(history.clone(), clock.clone());

    let first = service.radar_for_user("user-1").await.unwrap();
    clock.advance(Duration::minutes(5));
    let second = service.radar_for_user("user-1").await.unwrap();

    assert_eq!(history.fetches(), 1);
    assert_eq!(first, second);
    assert_eq!(second.radar.generated_at, t0());
}

#[tokio::test]
async fn test_stale_entry_is_recomputed_after_ttl() {
    let history = Arc::new(MockHistory::new((0..10).map(|n| pack(n, n < 5)).collect()));
    let clock = Arc::new(ManualClock::at(t0()));
    let service = service(history.clone(), clock.clone());

    service.radar_for_user("user-1").await.unwrap();
    clock.advance(Duration::minutes(20));
    let refreshed = service.radar_for_user("user-1").await.unwrap();

    assert_eq!(history.fetches(), 2);
    assert_eq!(refreshed.radar.generated_at, t0() + Duration::minutes(20));
}

#[tokio::test]
async fn test_cache_is_keyed_per_user() {
    let history = Arc::new(MockHistory::new((0..4).map(|n| pack(n, false)).collect()));
    let clock = Arc::new(ManualClock::at(t0()));
    let service = service(history.clone(), clock);

    service.radar_for_user("user-1").await.unwrap();
    service.radar_for_user("user-2").await.unwrap();
    service.radar_for_user("user-1").await.unwrap();

    assert_eq!(history.fetches(), 2);
}

#[tokio::test]
async fn test_invalidate_forces_recompute() {
    let history = Arc::new(MockHistory::new((0..4).map(|n| pack(n, false)).collect()));
    let clock = Arc::new(ManualClock::at(t0()));
    let service = service(history.clone(), clock);

    service.radar_for_user("user-1").await.unwrap();
    service.invalidate_user("user-1");
    service.radar_for_user("user-1").await.unwrap();

    assert_eq!(history.fetches(), 2);
}

#[tokio::test]
async fn test_fetch_is_limited_to_window() {
    let history = Arc::new(MockHistory::new((0..25).map(|n| pack(n, n < 5)).collect()));
    let clock = Arc::new(ManualClock::at(t0()));
    let service = service(history.clone(), clock);

    let outcome = service.radar_for_user("user-1").await.unwrap();

    assert_eq!(*history.last_limit.lock().unwrap(), Some(10));
    assert_eq!(outcome.analyzed, 10);

    let issue = &outcome.radar.issues[0];
    assert_eq!(issue.id, IssueId::WeakHooks);
    assert_eq!(issue.evidence.affected_packs, 5);
    assert_eq!(issue.evidence.examples, vec!["Pack 0", "Pack 1", "Pack 2"]);
}

// ============================================================================
// Session and Failures
// ============================================================================

#[tokio::test]
async fn test_missing_user_is_unauthorized_before_fetch() {
    let history = Arc::new(MockHistory::new((0..4).map(|n| pack(n, true)).collect()));
    let clock = Arc::new(ManualClock::at(t0()));
    let service = service(history.clone(), clock);
    let session = FixedSession {
        user: None,
        lookups: AtomicU32::new(0),
    };

    let err = service.radar_for_request(&session).await.unwrap_err();

    assert!(matches!(err, Error::Unauthorized(_)));
    assert_eq!(session.lookups.load(Ordering::Relaxed), 1);
    assert_eq!(history.fetches(), 0);
}

#[tokio::test]
async fn test_request_context_user_gets_radar() {
    let history = Arc::new(MockHistory::new((0..4).map(|n| pack(n, true)).collect()));
    let clock = Arc::new(ManualClock::at(t0()));
    let service = service(history.clone(), clock);
    let ctx = RequestContext::new("dashboard").with_user("user-7");

    let outcome = service.radar_for_context(&ctx).await.unwrap();

    assert_eq!(history.fetches(), 1);
    assert_eq!(outcome.analyzed, 4);
    assert_eq!(outcome.radar.issues[0].id, IssueId::WeakHooks);
}

#[tokio::test]
async fn test_history_failure_surfaces_as_external() {
    let history = Arc::new(MockHistory::failing(|| {
        Error::External("connection reset".into())
    }));
    let clock = Arc::new(ManualClock::at(t0()));
    let service = service(history.clone(), clock);

    let err = service.radar_for_user("user-1").await.unwrap_err();

    assert_eq!(err.status_code(), 502);
    assert!(err.to_string().starts_with("fetching recent packs: "));
    assert!(err.to_string().contains("connection reset"));

    // failures are not cached
    let _ = service.radar_for_user("user-1").await;
    assert_eq!(history.fetches(), 2);
}

#[tokio::test]
async fn test_history_unauthorized_keeps_status() {
    let history = Arc::new(MockHistory::failing(|| {
        Error::Unauthorized("session expired".into())
    }));
    let clock = Arc::new(ManualClock::at(t0()));
    let service = service(history.clone(), clock);

    let err = service.radar_for_user("user-1").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.status_code(), 401);
    match &err {
        Error::WithContext { context, source } => {
            assert_eq!(context, "fetching recent packs");
            assert!(matches!(**source, Error::Unauthorized(_)));
        }
        other => panic!("expected context-wrapped error, got {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());
}
