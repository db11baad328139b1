//! Radar computation: window, defensive blob parsing, detectors, ranking.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use authority_common::util::round2;
use authority_common::RadarConfig;

use super::{IssueEvidence, IssueId, RadarOutcome, Severity, WeaknessRadar, WeaknessRadarIssue};
use crate::model::{MessagingStrength, PackRecord};

/// Issues below this rate are dropped regardless of detector gate.
const GLOBAL_RATE_FLOOR: f64 = 0.25;

const MAX_EXAMPLES: usize = 3;

const UNTITLED: &str = "Untitled pack";

/// Persisted consistency scores, read with float tolerance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsistencySnapshot {
    thesis_alignment: f64,
    positioning_alignment: f64,
    tone_match: f64,
    #[allow(dead_code)]
    claim_theme_coherence: f64,
    #[serde(default)]
    drift_warnings: Vec<String>,
    total: f64,
}

/// One analyzed pack with whatever scores survived parsing.
struct ParsedPack<'a> {
    title: &'a str,
    strength: Option<MessagingStrength>,
    consistency: Option<ConsistencySnapshot>,
}

struct Detector {
    id: IssueId,
    gate: f64,
    fails: fn(&ParsedPack<'_>) -> bool,
}

fn low_differentiation(p: &ParsedPack<'_>) -> bool {
    p.strength
        .as_ref()
        .is_some_and(|s| s.differentiation_clarity < 12.0)
}

fn weak_hooks(p: &ParsedPack<'_>) -> bool {
    p.strength.as_ref().is_some_and(|s| s.hook_strength < 12.0)
}

fn thesis_drift(p: &ParsedPack<'_>) -> bool {
    p.consistency
        .as_ref()
        .is_some_and(|c| c.thesis_alignment <= 10.0)
}

fn positioning_drift(p: &ParsedPack<'_>) -> bool {
    p.consistency
        .as_ref()
        .is_some_and(|c| c.positioning_alignment <= 8.0)
}

fn tone_mismatch(p: &ParsedPack<'_>) -> bool {
    p.consistency.as_ref().is_some_and(|c| c.tone_match <= 10.0)
}

fn repetition_risk(p: &ParsedPack<'_>) -> bool {
    p.consistency.as_ref().is_some_and(|c| {
        c.drift_warnings
            .iter()
            .any(|w| w.to_lowercase().contains("repetition risk"))
    })
}

fn evidence_shallow(p: &ParsedPack<'_>) -> bool {
    p.strength.as_ref().is_some_and(|s| s.evidence_depth < 12.0)
}

const DETECTORS: [Detector; 7] = [
    Detector {
        id: IssueId::LowDifferentiation,
        gate: 0.40,
        fails: low_differentiation,
    },
    Detector {
        id: IssueId::WeakHooks,
        gate: 0.40,
        fails: weak_hooks,
    },
    Detector {
        id: IssueId::ThesisDrift,
        gate: 0.30,
        fails: thesis_drift,
    },
    Detector {
        id: IssueId::PositioningDrift,
        gate: 0.30,
        fails: positioning_drift,
    },
    Detector {
        id: IssueId::ToneMismatch,
        gate: 0.30,
        fails: tone_mismatch,
    },
    Detector {
        id: IssueId::RepetitionRisk,
        gate: 0.30,
        fails: repetition_risk,
    },
    Detector {
        id: IssueId::EvidenceShallow,
        gate: 0.40,
        fails: evidence_shallow,
    },
];

// ============================================================================
// Defensive Parsing
// ============================================================================

/// Unwrap a blob that may be inline JSON or a string holding encoded JSON.
fn decode_blob(blob: Option<&Value>) -> Option<Value> {
    match blob? {
        Value::Null => None,
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(_) => None,
        },
        other => Some(other.clone()),
    }
}

fn usable_total(total: f64) -> bool {
    total.is_finite() && total != 0.0
}

fn parse_strength(pack: &PackRecord) -> Option<MessagingStrength> {
    let value = decode_blob(pack.messaging_strength.as_ref())?;
    match serde_json::from_value::<MessagingStrength>(value) {
        Ok(strength) if usable_total(strength.total) => Some(strength),
        Ok(_) => None,
        Err(e) => {
            warn!(pack_id = %pack.id, error = %e, "Ignoring malformed messaging strength");
            None
        }
    }
}

fn parse_consistency(pack: &PackRecord) -> Option<ConsistencySnapshot> {
    let value = decode_blob(pack.authority_consistency.as_ref())?;
    match serde_json::from_value::<ConsistencySnapshot>(value) {
        Ok(snapshot) if usable_total(snapshot.total) => Some(snapshot),
        Ok(_) => None,
        Err(e) => {
            warn!(pack_id = %pack.id, error = %e, "Ignoring malformed authority consistency");
            None
        }
    }
}

fn has_artifact(pack: &PackRecord) -> bool {
    decode_blob(pack.artifact.as_ref()).is_some()
}

// ============================================================================
// Computation
// ============================================================================

/// Compute the radar over the newest `config.window_size` packs.
///
/// `packs` must already be sorted newest first. Fewer than
/// `config.min_analyzed` packs with an artifact yields no issues.
pub fn compute_weakness_radar(
    packs: &[PackRecord],
    config: &RadarConfig,
    generated_at: DateTime<Utc>,
) -> RadarOutcome {
    let window = &packs[..packs.len().min(config.window_size)];
    let analyzed_packs: Vec<&PackRecord> = window.iter().filter(|p| has_artifact(p)).collect();
    let analyzed = analyzed_packs.len();

    if analyzed < config.min_analyzed || analyzed == 0 {
        debug!(analyzed, window = window.len(), "Not enough analyzed packs for radar");
        return RadarOutcome {
            radar: WeaknessRadar {
                window_size: config.window_size,
                generated_at,
                issues: Vec::new(),
            },
            analyzed,
        };
    }

    let parsed: Vec<ParsedPack<'_>> = analyzed_packs
        .iter()
        .map(|pack| ParsedPack {
            title: pack.title.trim(),
            strength: parse_strength(pack),
            consistency: parse_consistency(pack),
        })
        .collect();

    let mut issues: Vec<(f64, WeaknessRadarIssue)> = DETECTORS
        .iter()
        .filter_map(|detector| run_detector(detector, &parsed, analyzed))
        .filter(|(rate, _)| *rate >= GLOBAL_RATE_FLOOR)
        .collect();

    issues.sort_by(|(a_rate, a), (b_rate, b)| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b_rate.total_cmp(a_rate))
    });

    debug!(
        analyzed,
        issues = issues.len(),
        "Weakness radar computed"
    );

    RadarOutcome {
        radar: WeaknessRadar {
            window_size: config.window_size,
            generated_at,
            issues: issues.into_iter().map(|(_, issue)| issue).collect(),
        },
        analyzed,
    }
}

/// Run one detector; returns the unrounded rate alongside the issue.
fn run_detector(
    detector: &Detector,
    parsed: &[ParsedPack<'_>],
    analyzed: usize,
) -> Option<(f64, WeaknessRadarIssue)> {
    let failing: Vec<&ParsedPack<'_>> = parsed.iter().filter(|p| (detector.fails)(p)).collect();
    let rate = failing.len() as f64 / analyzed as f64;

    if failing.is_empty() || rate < detector.gate {
        return None;
    }

    let examples = failing
        .iter()
        .take(MAX_EXAMPLES)
        .map(|p| {
            if p.title.is_empty() {
                UNTITLED.to_string()
            } else {
                p.title.to_string()
            }
        })
        .collect();

    Some((
        rate,
        WeaknessRadarIssue {
            id: detector.id,
            title: detector.id.title().to_string(),
            severity: Severity::from_rate(rate),
            evidence: IssueEvidence {
                affected_packs: failing.len(),
                rate: round2(rate),
                examples,
            },
            recommendation: detector.id.recommendation().to_string(),
        },
    ))
}
