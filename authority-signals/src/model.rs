//! Data model shared by the scorers.
//!
//! Inbound artifacts deserialize leniently: any missing field defaults to
//! empty so a partially generated artifact still scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Voice Profile
// ============================================================================

/// Declared voice of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tone {
    Measured,
    Bold,
    Direct,
    Academic,
    Friendly,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measured => write!(f, "MEASURED"),
            Self::Bold => write!(f, "BOLD"),
            Self::Direct => write!(f, "DIRECT"),
            Self::Academic => write!(f, "ACADEMIC"),
            Self::Friendly => write!(f, "FRIENDLY"),
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MEASURED" => Ok(Self::Measured),
            "BOLD" => Ok(Self::Bold),
            "DIRECT" => Ok(Self::Direct),
            "ACADEMIC" => Ok(Self::Academic),
            "FRIENDLY" => Ok(Self::Friendly),
            other => Err(format!("unknown tone: {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for Tone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How a profile's tone field resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneSetting {
    /// Field blank or absent
    Unset,
    /// Field set to something outside the known enumeration
    Unrecognized,
    Declared(Tone),
}

/// User-declared voice and positioning. Read-only here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthorityProfileContext {
    pub core_thesis: String,
    pub positioning: String,
    pub target_audience: String,
    /// Raw tone value as stored; see [`AuthorityProfileContext::tone_setting`]
    pub tone: String,
    pub tone_notes: String,
}

impl AuthorityProfileContext {
    pub fn tone_setting(&self) -> ToneSetting {
        if self.tone.trim().is_empty() {
            return ToneSetting::Unset;
        }
        match self.tone.parse() {
            Ok(tone) => ToneSetting::Declared(tone),
            Err(_) => ToneSetting::Unrecognized,
        }
    }
}

// ============================================================================
// Strategic Authority Map
// ============================================================================

/// Core thesis block, shared by the SAM and the insight artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreThesis {
    pub statement: String,
    pub supporting_themes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategicClaim {
    pub claim: String,
    pub why_it_matters: String,
    pub differentiation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeArc {
    pub setup: String,
    pub tension: String,
    pub resolution: String,
}

impl NarrativeArc {
    /// Setup, tension, and resolution joined with spaces.
    pub fn text(&self) -> String {
        [&self.setup, &self.tension, &self.resolution]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofAssets {
    pub metrics: Vec<String>,
}

/// Structured artifact produced by one pack generation. Immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategicAuthorityMap {
    pub core_thesis: CoreThesis,
    pub strategic_claims: Vec<StrategicClaim>,
    pub narrative_arc: NarrativeArc,
    pub proof_assets: ProofAssets,
    pub objections: Vec<String>,
}

impl StrategicAuthorityMap {
    pub fn claim_texts(&self) -> impl Iterator<Item = &str> {
        self.strategic_claims.iter().map(|c| c.claim.as_str())
    }

    pub fn differentiation_texts(&self) -> impl Iterator<Item = &str> {
        self.strategic_claims
            .iter()
            .map(|c| c.differentiation.as_str())
    }

    pub fn why_it_matters_texts(&self) -> impl Iterator<Item = &str> {
        self.strategic_claims.iter().map(|c| c.why_it_matters.as_str())
    }

    /// Every free-text field of the map, joined with newlines.
    pub fn full_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.core_thesis.statement.as_str()];
        for claim in &self.strategic_claims {
            parts.push(&claim.claim);
            parts.push(&claim.why_it_matters);
            parts.push(&claim.differentiation);
        }
        parts.push(&self.narrative_arc.setup);
        parts.push(&self.narrative_arc.tension);
        parts.push(&self.narrative_arc.resolution);
        parts.extend(self.proof_assets.metrics.iter().map(String::as_str));
        parts.extend(self.objections.iter().map(String::as_str));

        parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Scores
// ============================================================================

/// Messaging strength sub-scores, produced by a sibling scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingStrength {
    pub hook_strength: f64,
    pub claim_robustness: f64,
    pub evidence_depth: f64,
    pub differentiation_clarity: f64,
    pub objection_coverage: f64,
    pub total: f64,
}

/// How closely a pack matches the user's declared voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityConsistency {
    /// 0-25
    pub thesis_alignment: u32,
    /// 0-25
    pub positioning_alignment: u32,
    /// 0-20
    pub tone_match: u32,
    /// 0-20
    pub claim_theme_coherence: u32,
    /// Deduplicated, at most [`AuthorityConsistency::MAX_WARNINGS`]
    pub drift_warnings: Vec<String>,
    /// Sum of the four sub-scores
    pub total: u32,
}

impl AuthorityConsistency {
    pub const MAX_THESIS: u32 = 25;
    pub const MAX_POSITIONING: u32 = 25;
    pub const MAX_TONE: u32 = 20;
    pub const MAX_THEME: u32 = 20;
    pub const MAX_TOTAL: u32 = 100;
    pub const MAX_WARNINGS: usize = 5;

    /// Re-clamp every sub-score, recompute the total, and dedup/truncate warnings.
    pub fn validated(mut self) -> Self {
        self.thesis_alignment = self.thesis_alignment.min(Self::MAX_THESIS);
        self.positioning_alignment = self.positioning_alignment.min(Self::MAX_POSITIONING);
        self.tone_match = self.tone_match.min(Self::MAX_TONE);
        self.claim_theme_coherence = self.claim_theme_coherence.min(Self::MAX_THEME);
        self.total = (self.thesis_alignment
            + self.positioning_alignment
            + self.tone_match
            + self.claim_theme_coherence)
            .min(Self::MAX_TOTAL);

        let mut seen = Vec::with_capacity(self.drift_warnings.len());
        for warning in self.drift_warnings {
            let warning = warning.trim().to_string();
            if !warning.is_empty() && !seen.contains(&warning) {
                seen.push(warning);
            }
        }
        seen.truncate(Self::MAX_WARNINGS);
        self.drift_warnings = seen;
        self
    }
}

// ============================================================================
// Pack History
// ============================================================================

/// A persisted pack as fetched for the weakness radar.
///
/// The three JSON payloads are untrusted: each may be absent, `null`, a JSON
/// string holding encoded JSON, or an inline value of the wrong shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub artifact: Option<serde_json::Value>,
    #[serde(default)]
    pub messaging_strength: Option<serde_json::Value>,
    #[serde(default)]
    pub authority_consistency: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_parses_case_insensitively() {
        assert_eq!("bold".parse::<Tone>().unwrap(), Tone::Bold);
        assert_eq!(" Academic ".parse::<Tone>().unwrap(), Tone::Academic);
        assert!("loud".parse::<Tone>().is_err());

        let tone: Tone = serde_json::from_str("\"friendly\"").unwrap();
        assert_eq!(tone, Tone::Friendly);
        assert_eq!(serde_json::to_string(&Tone::Direct).unwrap(), "\"DIRECT\"");
    }

    #[test]
    fn profile_tone_setting() {
        let mut profile = AuthorityProfileContext::default();
        assert_eq!(profile.tone_setting(), ToneSetting::Unset);

        profile.tone = "MEASURED".into();
        assert_eq!(profile.tone_setting(), ToneSetting::Declared(Tone::Measured));

        profile.tone = "whimsical".into();
        assert_eq!(profile.tone_setting(), ToneSetting::Unrecognized);
    }

    #[test]
    fn sam_deserializes_partial_json() {
        let sam: StrategicAuthorityMap = serde_json::from_str(
            r#"{
                "coreThesis": {"statement": "Pricing is positioning"},
                "strategicClaims": [{"claim": "Discounts erode trust"}]
            }"#,
        )
        .unwrap();

        assert_eq!(sam.core_thesis.statement, "Pricing is positioning");
        assert_eq!(sam.strategic_claims.len(), 1);
        assert!(sam.strategic_claims[0].differentiation.is_empty());
        assert!(sam.objections.is_empty());
    }

    #[test]
    fn narrative_text_skips_blank_parts() {
        let arc = NarrativeArc {
            setup: "We grew fast.".into(),
            tension: "  ".into(),
            resolution: "Then we focused.".into(),
        };
        assert_eq!(arc.text(), "We grew fast. Then we focused.");
    }

    #[test]
    fn validated_clamps_and_recomputes_total() {
        let raw = AuthorityConsistency {
            thesis_alignment: 40,
            positioning_alignment: 25,
            tone_match: 99,
            claim_theme_coherence: 12,
            drift_warnings: vec![
                "theme drift".into(),
                "theme drift".into(),
                "a".into(),
                "b".into(),
                "c".into(),
                "d".into(),
                "e".into(),
            ],
            total: 500,
        }
        .validated();

        assert_eq!(raw.thesis_alignment, 25);
        assert_eq!(raw.tone_match, 20);
        assert_eq!(raw.total, 25 + 25 + 20 + 12);
        assert_eq!(raw.drift_warnings, vec!["theme drift", "a", "b", "c", "d"]);
    }

    #[test]
    fn consistency_serializes_camel_case() {
        let value = AuthorityConsistency {
            thesis_alignment: 25,
            positioning_alignment: 16,
            tone_match: 18,
            claim_theme_coherence: 12,
            drift_warnings: vec![],
            total: 71,
        };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["thesisAlignment"], 25);
        assert_eq!(json["claimThemeCoherence"], 12);
        assert_eq!(json["driftWarnings"], serde_json::json!([]));
    }
}
