//! Request-facing radar entry points.
//!
//! [`RadarService`] owns the collaborators needed to turn a user id into a
//! radar: a pack history source, a cache, and a clock. The computation itself
//! stays in [`compute_weakness_radar`](super::compute_weakness_radar).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

use authority_common::{Error, RadarConfig, RequestContext, Result};

use super::cache::{InMemoryRadarCache, RadarCache};
use super::{compute_weakness_radar, RadarOutcome};
use crate::model::PackRecord;

// ============================================================================
// Collaborators
// ============================================================================

/// Source of "now" for cache freshness and `generatedAt`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Read access to a user's persisted packs.
#[async_trait]
pub trait PackHistory: Send + Sync {
    /// Up to `limit` of the user's packs, newest first.
    async fn recent_packs(&self, user_id: &str, limit: usize) -> Result<Vec<PackRecord>>;
}

/// Resolves the acting user for the current request.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn current_user(&self) -> Result<Option<String>>;
}

#[async_trait]
impl SessionResolver for RequestContext {
    async fn current_user(&self) -> Result<Option<String>> {
        Ok(self.acting_user().map(str::to_string))
    }
}

// ============================================================================
// Service
// ============================================================================

pub struct RadarService {
    packs: Arc<dyn PackHistory>,
    cache: Arc<dyn RadarCache>,
    clock: Arc<dyn Clock>,
    config: RadarConfig,
}

impl RadarService {
    /// Service with an in-memory cache and the system clock.
    pub fn new(packs: Arc<dyn PackHistory>, config: RadarConfig) -> Self {
        Self {
            packs,
            cache: Arc::new(InMemoryRadarCache::from_config(&config)),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn RadarCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    /// Cached radar for `user_id`, recomputed on miss or expiry.
    pub async fn radar_for_user(&self, user_id: &str) -> Result<RadarOutcome> {
        let now = self.clock.now();

        if let Some(cached) = self.cache.get(user_id, now) {
            debug!(user_id, "Radar cache hit");
            return Ok(cached);
        }

        let packs = self
            .packs
            .recent_packs(user_id, self.config.window_size)
            .await
            .map_err(|e| {
                warn!(user_id, error = %e, "Failed to fetch pack history");
                e.with_context("fetching recent packs")
            })?;

        let outcome = compute_weakness_radar(&packs, &self.config, now);
        info!(
            user_id,
            fetched = packs.len(),
            analyzed = outcome.analyzed,
            issues = outcome.radar.issues.len(),
            "Weakness radar recomputed"
        );

        self.cache.set(user_id, outcome.clone(), now);
        Ok(outcome)
    }

    /// Radar for whoever the session says is acting.
    ///
    /// Fails with [`Error::Unauthorized`] before any pack is fetched when no
    /// user is resolved.
    pub async fn radar_for_request(&self, session: &dyn SessionResolver) -> Result<RadarOutcome> {
        let user_id = session
            .current_user()
            .await?
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::Unauthorized("no acting user".into()))?;

        self.radar_for_user(&user_id).await
    }

    /// [`radar_for_request`](Self::radar_for_request) inside a span tagged
    /// with the context's trace id.
    pub async fn radar_for_context(&self, ctx: &RequestContext) -> Result<RadarOutcome> {
        self.radar_for_request(ctx)
            .instrument(ctx.span("weakness_radar"))
            .await
    }

    /// Drop the cached radar, e.g. after a new pack is scored.
    pub fn invalidate_user(&self, user_id: &str) {
        debug!(user_id, "Radar cache invalidated");
        self.cache.invalidate(user_id);
    }
}
