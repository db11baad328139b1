//! Topic indexer.
//!
//! Builds a normalized topic index from the insights extracted for a pack.
//! The index is derived per call and never persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::model::CoreThesis;
use crate::text::normalize;

/// Minimum character length of a derived keyword.
pub const MIN_KEYWORD_CHARS: usize = 4;

/// Normalized topics and the keywords derived from them.
///
/// Every element is lowercase, alphanumeric-plus-space, whitespace-collapsed,
/// and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicIndex {
    pub topics: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
}

impl TopicIndex {
    /// Normalize and dedup candidate strings into an index.
    pub fn from_candidates<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Self {
        let topics: BTreeSet<String> = candidates
            .into_iter()
            .map(normalize)
            .filter(|t| !t.is_empty())
            .collect();

        let keywords = topics
            .iter()
            .flat_map(|t| t.split(' '))
            .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS)
            .map(str::to_string)
            .collect();

        Self { topics, keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

// ============================================================================
// Insight Fields
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub headline: String,
    pub positioning_sentence: String,
    pub key_insights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookPhrases {
    pub linkedin: Vec<String>,
    pub twitter: Vec<String>,
    pub contrarian: Vec<String>,
}

/// The insight-bearing fields of a generated pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightFields {
    pub core_thesis: CoreThesis,
    pub strong_claims: Vec<String>,
    pub data_backed_angles: Vec<String>,
    pub frameworks: Vec<String>,
    pub executive_summary: ExecutiveSummary,
    pub hooks: HookPhrases,
}

impl InsightFields {
    /// Build from an untrusted JSON artifact.
    ///
    /// Each field accepts a string or an array; non-string array items and
    /// fields of any other shape are ignored.
    pub fn from_json(value: &Value) -> Self {
        let at = |path: &[&str]| -> Vec<String> {
            let mut node = value;
            for key in path {
                match node.get(*key) {
                    Some(next) => node = next,
                    None => return Vec::new(),
                }
            }
            strings_of(node)
        };

        Self {
            core_thesis: CoreThesis {
                statement: at(&["coreThesis", "statement"]).join(" "),
                supporting_themes: at(&["coreThesis", "supportingThemes"]),
            },
            strong_claims: at(&["strongClaims"]),
            data_backed_angles: at(&["dataBackedAngles"]),
            frameworks: at(&["frameworks"]),
            executive_summary: ExecutiveSummary {
                headline: at(&["executiveSummary", "headline"]).join(" "),
                positioning_sentence: at(&["executiveSummary", "positioningSentence"]).join(" "),
                key_insights: at(&["executiveSummary", "keyInsights"]),
            },
            hooks: HookPhrases {
                linkedin: at(&["hooks", "linkedin"]),
                twitter: at(&["hooks", "twitter"]),
                contrarian: at(&["hooks", "contrarian"]),
            },
        }
    }

    fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.core_thesis.statement.as_str())
            .chain(self.core_thesis.supporting_themes.iter().map(String::as_str))
            .chain(self.strong_claims.iter().map(String::as_str))
            .chain(self.data_backed_angles.iter().map(String::as_str))
            .chain(self.frameworks.iter().map(String::as_str))
            .chain(std::iter::once(self.executive_summary.headline.as_str()))
            .chain(std::iter::once(
                self.executive_summary.positioning_sentence.as_str(),
            ))
            .chain(self.executive_summary.key_insights.iter().map(String::as_str))
            .chain(self.hooks.linkedin.iter().map(String::as_str))
            .chain(self.hooks.twitter.iter().map(String::as_str))
            .chain(self.hooks.contrarian.iter().map(String::as_str))
            .filter(|s| !s.trim().is_empty())
    }
}

fn strings_of(node: &Value) -> Vec<String> {
    match node {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Index every insight the pack extracted from its source material.
pub fn build_insight_topic_index(fields: &InsightFields) -> TopicIndex {
    TopicIndex::from_candidates(fields.candidates())
}

/// Index only the thesis statement and its supporting themes.
pub fn build_thesis_topic_index(thesis: &CoreThesis) -> TopicIndex {
    TopicIndex::from_candidates(
        std::iter::once(thesis.statement.as_str())
            .chain(thesis.supporting_themes.iter().map(String::as_str)),
    )
}

/// True if the normalized `text` contains any topic or keyword as a substring.
pub fn section_aligns_with_topics(text: &str, index: &TopicIndex) -> bool {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return false;
    }

    index.topics.iter().any(|t| normalized.contains(t.as_str()))
        || index.keywords.iter().any(|k| normalized.contains(k.as_str()))
}
