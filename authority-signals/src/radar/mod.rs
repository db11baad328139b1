//! Weakness radar.
//!
//! Aggregates a rolling window of a user's persisted pack scores into ranked,
//! evidence-backed issues. The computation is a pure function of the pack list
//! and the generation timestamp; caching and fetching live in [`service`].
//!
//! # Detectors
//!
//! | Issue | Fails when | Gate |
//! |-------|------------|------|
//! | LOW_DIFFERENTIATION | differentiationClarity < 12 | 40% |
//! | WEAK_HOOKS | hookStrength < 12 | 40% |
//! | THESIS_DRIFT | thesisAlignment <= 10 | 30% |
//! | POSITIONING_DRIFT | positioningAlignment <= 8 | 30% |
//! | TONE_MISMATCH | toneMatch <= 10 | 30% |
//! | REPETITION_RISK | a "repetition risk" drift warning | 30% |
//! | EVIDENCE_SHALLOW | evidenceDepth < 12 | 40% |

pub mod cache;
mod detectors;
pub mod service;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use cache::{CacheStats, InMemoryRadarCache, RadarCache};
pub use detectors::compute_weakness_radar;
pub use service::{Clock, PackHistory, RadarService, SessionResolver, SystemClock};

// ============================================================================
// Issue Taxonomy
// ============================================================================

/// Fixed issue taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueId {
    LowDifferentiation,
    WeakHooks,
    ThesisDrift,
    PositioningDrift,
    ToneMismatch,
    RepetitionRisk,
    EvidenceShallow,
}

impl IssueId {
    pub fn title(&self) -> &'static str {
        match self {
            Self::LowDifferentiation => "Differentiation is blurry",
            Self::WeakHooks => "Hooks are not landing",
            Self::ThesisDrift => "Packs drift from your core thesis",
            Self::PositioningDrift => "Positioning is slipping",
            Self::ToneMismatch => "Tone does not match your voice",
            Self::RepetitionRisk => "Claims are repeating",
            Self::EvidenceShallow => "Evidence is thin",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::LowDifferentiation => {
                "Name the default alternative your audience uses and state plainly how your approach differs from it."
            }
            Self::WeakHooks => {
                "Open with a specific tension or counterintuitive number instead of a general statement."
            }
            Self::ThesisDrift => {
                "Anchor each pack's thesis and claims to the vocabulary of your core thesis before generating."
            }
            Self::PositioningDrift => {
                "Tie every differentiation line back to your positioning statement, using its own terms."
            }
            Self::ToneMismatch => {
                "Review your declared tone and edit claims and narrative so the language matches it."
            }
            Self::RepetitionRisk => {
                "Rotate in new source material or angles; recent packs reuse the same claim phrasing."
            }
            Self::EvidenceShallow => {
                "Back claims with concrete metrics, named examples, or cited results in the proof assets."
            }
        }
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowDifferentiation => write!(f, "LOW_DIFFERENTIATION"),
            Self::WeakHooks => write!(f, "WEAK_HOOKS"),
            Self::ThesisDrift => write!(f, "THESIS_DRIFT"),
            Self::PositioningDrift => write!(f, "POSITIONING_DRIFT"),
            Self::ToneMismatch => write!(f, "TONE_MISMATCH"),
            Self::RepetitionRisk => write!(f, "REPETITION_RISK"),
            Self::EvidenceShallow => write!(f, "EVIDENCE_SHALLOW"),
        }
    }
}

/// Issue severity, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// `>= 0.5` high, `>= 0.35` medium, otherwise low.
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 0.5 {
            Self::High
        } else if rate >= 0.35 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

// ============================================================================
// Radar Output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueEvidence {
    pub affected_packs: usize,
    /// Share of analyzed packs affected, rounded to 2 decimals
    pub rate: f64,
    /// Up to three affected pack titles, newest first
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessRadarIssue {
    pub id: IssueId,
    pub title: String,
    pub severity: Severity,
    pub evidence: IssueEvidence,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessRadar {
    pub window_size: usize,
    pub generated_at: DateTime<Utc>,
    pub issues: Vec<WeaknessRadarIssue>,
}

/// A radar plus the number of packs it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarOutcome {
    pub radar: WeaknessRadar,
    pub analyzed: usize,
}
