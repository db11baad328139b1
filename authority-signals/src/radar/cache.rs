//! Per-user radar cache.
//!
//! The cache is injected into [`RadarService`](super::RadarService) so a shared
//! backend can replace the in-process map. Time is passed in explicitly; the
//! cache never reads the wall clock.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

use authority_common::RadarConfig;

use super::RadarOutcome;

/// Largest TTL `chrono::Duration` can represent in seconds.
const MAX_TTL_SECS: u64 = (i64::MAX / 1000) as u64;

/// Keyed store of computed radars with a fixed time-to-live.
pub trait RadarCache: Send + Sync {
    /// Cached outcome for `user_id`, if present and not expired at `now`.
    fn get(&self, user_id: &str, now: DateTime<Utc>) -> Option<RadarOutcome>;

    /// Store `value`, expiring `ttl()` after `now`.
    fn set(&self, user_id: &str, value: RadarOutcome, now: DateTime<Utc>);

    fn invalidate(&self, user_id: &str);

    fn ttl(&self) -> Duration;
}

/// Cache entry with TTL
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(data: T, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// An entry is still valid at exactly `expires_at`.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Process-local radar cache.
pub struct InMemoryRadarCache {
    entries: RwLock<HashMap<String, CacheEntry<RadarOutcome>>>,
    ttl: Duration,
}

impl InMemoryRadarCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn from_config(config: &RadarConfig) -> Self {
        let secs = config.cache_ttl_secs.min(MAX_TTL_SECS) as i64;
        Self::new(Duration::seconds(secs))
    }

    /// Clear all expired entries
    pub fn clear_expired(&self, now: DateTime<Utc>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| !entry.is_expired(now));
        }
    }

    /// Clear all cache
    pub fn clear_all(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Get cache statistics
    pub fn stats(&self, now: DateTime<Utc>) -> CacheStats {
        let entries = self.entries.read().ok();
        let (total, expired) = entries
            .map(|e| {
                let total = e.len();
                let expired = e.values().filter(|entry| entry.is_expired(now)).count();
                (total, expired)
            })
            .unwrap_or((0, 0));

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

impl Default for InMemoryRadarCache {
    fn default() -> Self {
        Self::from_config(&RadarConfig::default())
    }
}

impl RadarCache for InMemoryRadarCache {
    fn get(&self, user_id: &str, now: DateTime<Utc>) -> Option<RadarOutcome> {
        let entries = self.entries.read().ok()?;

        entries.get(user_id).and_then(|entry| {
            if entry.is_expired(now) {
                None
            } else {
                Some(entry.data.clone())
            }
        })
    }

    fn set(&self, user_id: &str, value: RadarOutcome, now: DateTime<Utc>) {
        let entry = CacheEntry::new(value, now, self.ttl);

        if let Ok(mut entries) = self.entries.write() {
            entries.insert(user_id.to_string(), entry);
        }
    }

    fn invalidate(&self, user_id: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(user_id);
        }
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::WeaknessRadar;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn outcome(analyzed: usize) -> RadarOutcome {
        RadarOutcome {
            radar: WeaknessRadar {
                window_size: 10,
                generated_at: t0(),
                issues: Vec::new(),
            },
            analyzed,
        }
    }

    #[test]
    fn test_cache_set_get() {
        let cache = InMemoryRadarCache::default();
        cache.set("user-1", outcome(4), t0());

        let cached = cache.get("user-1", t0() + Duration::minutes(5));
        assert_eq!(cached.map(|o| o.analyzed), Some(4));
        assert!(cache.get("user-2", t0()).is_none());
    }

    #[test]
    fn test_cache_expiry_boundary() {
        let cache = InMemoryRadarCache::new(Duration::minutes(15));
        cache.set("user-1", outcome(4), t0());

        assert!(cache.get("user-1", t0() + Duration::minutes(15)).is_some());
        assert!(cache
            .get("user-1", t0() + Duration::minutes(15) + Duration::seconds(1))
            .is_none());
    }

    #[test]
    fn test_cache_overwrite_resets_expiry() {
        let cache = InMemoryRadarCache::new(Duration::minutes(15));
        cache.set("user-1", outcome(3), t0());
        cache.set("user-1", outcome(5), t0() + Duration::minutes(10));

        let cached = cache.get("user-1", t0() + Duration::minutes(20));
        assert_eq!(cached.map(|o| o.analyzed), Some(5));
    }

    #[test]
    fn test_cache_invalidate() {
        let cache = InMemoryRadarCache::default();
        cache.set("user-1", outcome(4), t0());
        cache.set("user-2", outcome(6), t0());

        cache.invalidate("user-1");
        assert!(cache.get("user-1", t0()).is_none());
        assert!(cache.get("user-2", t0()).is_some());
    }

    #[test]
    fn test_cache_stats_and_clear_expired() {
        let cache = InMemoryRadarCache::new(Duration::minutes(15));
        cache.set("old", outcome(3), t0());
        cache.set("fresh", outcome(3), t0() + Duration::minutes(10));

        let later = t0() + Duration::minutes(20);
        assert_eq!(
            cache.stats(later),
            CacheStats {
                total_entries: 2,
                expired_entries: 1,
                active_entries: 1,
            }
        );

        cache.clear_expired(later);
        assert_eq!(cache.stats(later).total_entries, 1);

        cache.clear_all();
        assert_eq!(cache.stats(later).total_entries, 0);
    }

    #[test]
    fn test_ttl_from_config() {
        let cache = InMemoryRadarCache::from_config(&RadarConfig {
            cache_ttl_secs: 120,
            ..Default::default()
        });
        assert_eq!(cache.ttl(), Duration::minutes(2));
    }
}
