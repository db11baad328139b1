//! Insight guard.
//!
//! Gates publishing or regenerating an asset: every line that asserts a
//! specific, checkable claim must trace back to an extracted insight. Narrative
//! lines without a claim signal are not checked.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use authority_common::util::truncate_with_ellipsis;
use authority_common::GuardConfig;

use crate::topics::{section_aligns_with_topics, TopicIndex};

/// Claim verb, a percent sign, or a number of two or more digits.
static CLAIM_SIGNAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(is|are|was|were|will|drives|leads|causes|means|shows|proves|reduces|increases|decreases|cuts|boosts|creates|prevents|results)\b|%|\d{2,}",
    )
    .unwrap()
});

/// Outcome of checking an asset against a topic index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetValidation {
    /// True when no claim went unsupported
    pub ok: bool,
    /// Claim lines with no topic or keyword match, trimmed, in input order
    pub unsupported: Vec<String>,
}

/// Claim checker with a configurable minimum claim length.
#[derive(Debug, Clone)]
pub struct InsightGuard {
    min_claim_chars: usize,
}

impl Default for InsightGuard {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

impl InsightGuard {
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            min_claim_chars: config.min_claim_chars,
        }
    }

    /// True if the chunk is long enough and carries a claim signal.
    pub fn is_candidate_claim(&self, chunk: &str) -> bool {
        chunk.chars().count() >= self.min_claim_chars && CLAIM_SIGNAL.is_match(chunk)
    }

    pub fn validate(&self, content: &str, index: &TopicIndex) -> AssetValidation {
        let mut checked = 0usize;
        let mut unsupported = Vec::new();

        for chunk in content.lines().map(str::trim).filter(|c| !c.is_empty()) {
            if !self.is_candidate_claim(chunk) {
                continue;
            }
            checked += 1;

            if !section_aligns_with_topics(chunk, index) {
                debug!(claim = %truncate_with_ellipsis(chunk, 60), "Unsupported claim");
                unsupported.push(chunk.to_string());
            }
        }

        debug!(
            checked,
            unsupported = unsupported.len(),
            topics = index.topics.len(),
            "Asset content validated"
        );

        AssetValidation {
            ok: unsupported.is_empty(),
            unsupported,
        }
    }
}

/// Check `content` with the default claim length.
pub fn validate_asset_content(content: &str, index: &TopicIndex) -> AssetValidation {
    InsightGuard::default().validate(content, index)
}
