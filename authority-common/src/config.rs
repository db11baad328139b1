//! Configuration for the authority signals engine.
//!
//! The configuration file lives at `~/.authority/config.json` and is optional.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (AUTHORITY_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `AUTHORITY_RADAR_WINDOW` → radar.window_size
//! - `AUTHORITY_RADAR_TTL` → radar.cache_ttl_secs (accepts "15m", "900s", "900")
//! - `AUTHORITY_LOG_LEVEL` → observability.log_level
//! - `AUTHORITY_LOG_FORMAT` → observability.log_format

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::util::parse_duration_secs;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".authority"),
        |dirs| dirs.home_dir().join(".authority"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Radar Configuration
// ============================================================================

/// Weakness radar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Number of most recent packs examined per user
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// How long a computed radar stays fresh in the cache
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Minimum analyzed packs before any issue can be reported
    #[serde(default = "default_min_analyzed")]
    pub min_analyzed: usize,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            cache_ttl_secs: default_cache_ttl_secs(),
            min_analyzed: default_min_analyzed(),
        }
    }
}

fn default_window_size() -> usize {
    10
}

fn default_cache_ttl_secs() -> u64 {
    15 * 60
}

fn default_min_analyzed() -> usize {
    3
}

// ============================================================================
// Insight Guard Configuration
// ============================================================================

/// Insight guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Chunks shorter than this are never treated as claims
    #[serde(default = "default_min_claim_chars")]
    pub min_claim_chars: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            min_claim_chars: default_min_claim_chars(),
        }
    }
}

fn default_min_claim_chars() -> usize {
    18
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub radar: RadarConfig,

    #[serde(default)]
    pub guard: GuardConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config from {}: {e}", path.display()))
        })
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(window) = lookup("AUTHORITY_RADAR_WINDOW") {
            match window.trim().parse() {
                Ok(w) => self.radar.window_size = w,
                Err(_) => tracing::warn!(value = %window, "Ignoring invalid AUTHORITY_RADAR_WINDOW"),
            }
        }

        if let Some(ttl) = lookup("AUTHORITY_RADAR_TTL") {
            let parsed = ttl
                .trim()
                .parse::<u64>()
                .or_else(|_| parse_duration_secs(&ttl));
            match parsed {
                Ok(secs) => self.radar.cache_ttl_secs = secs,
                Err(e) => tracing::warn!(value = %ttl, error = %e, "Ignoring invalid AUTHORITY_RADAR_TTL"),
            }
        }

        if let Some(level) = lookup("AUTHORITY_LOG_LEVEL") {
            self.observability.log_level = level;
        }

        if let Some(format) = lookup("AUTHORITY_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }
}
