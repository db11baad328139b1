//! Authority consistency scorer.
//!
//! Compares a freshly generated strategic authority map against the user's
//! declared voice profile and their prior maps. Four sub-scores, each from a
//! fixed tier table:
//!
//! | Sub-score | Max | Compares |
//! |-----------|-----|----------|
//! | Thesis alignment | 25 | profile thesis vs. map thesis + claims |
//! | Positioning alignment | 25 | profile positioning vs. map thesis + differentiation |
//! | Tone match | 20 | declared tone vs. map language |
//! | Claim-theme coherence | 20 | current claims vs. prior claims |
//!
//! Everything is token overlap over the shared [`crate::text`] primitives, so
//! identical inputs always produce identical scores.

mod tone;

use tracing::debug;

use crate::model::{AuthorityConsistency, AuthorityProfileContext, StrategicAuthorityMap};
use crate::text::{
    bigram_set, contains_any_phrase, normalize, overlap, token_set, token_set_of, top_terms,
};

const COMPARATIVE_PHRASES: &[&str] = &[
    "instead of",
    "unlike",
    "most",
    "typical",
    "vs",
    "versus",
    "compared to",
    "rather than",
    "whereas",
];

const GENERIC_DIFFERENTIATION: &[&str] = &[
    "different",
    "unique",
    "better",
    "best",
    "innovative",
    "cutting edge",
];

const GENERIC_OBJECTIONS: &[&str] = &[
    "too expensive",
    "no time",
    "not sure",
    "too busy",
    "not a priority",
    "we already have",
    "need to think about it",
    "is it worth it",
];

/// Number of most frequent claim tokens compared for theme coherence.
const THEME_TERMS: usize = 12;

/// Unigram ratio above which the bigram repetition check runs.
const REPETITION_GATE: f64 = 0.55;

/// Bigram overlap at which claims count as repeated.
const REPETITION_BIGRAM_RATIO: f64 = 0.35;

/// Neutral score when there is nothing to compare against.
const NEUTRAL_ALIGNMENT: u32 = 12;

pub const WARN_NO_THESIS: &str = "no thesis set";
pub const WARN_THESIS_DRIFT: &str = "thesis drift: claims share few terms with your core thesis";
pub const WARN_NO_POSITIONING: &str = "no positioning set";
pub const WARN_POSITIONING_DRIFT: &str =
    "positioning drift: differentiation does not echo your positioning";
pub const WARN_GENERIC_POSITIONING: &str = "positioning drift: overly generic";
pub const WARN_THEME_DRIFT: &str = "theme drift: claims diverge from your recent packs";
pub const WARN_REPETITION: &str = "repetition risk: claims reuse phrasing from recent packs";
pub const WARN_GENERIC_OBJECTIONS: &str = "generic objections detected";

/// Score `sam` against the profile and prior maps.
///
/// Returns `None` when there is no map to score.
pub fn calculate_authority_consistency(
    profile: &AuthorityProfileContext,
    sam: Option<&StrategicAuthorityMap>,
    prior_sams: &[StrategicAuthorityMap],
) -> Option<AuthorityConsistency> {
    let sam = sam?;
    let mut warnings: Vec<String> = Vec::new();

    let thesis_alignment = score_thesis(profile, sam, &mut warnings);
    let positioning_alignment = score_positioning(profile, sam, &mut warnings);

    let tone = tone::score_tone(profile.tone_setting(), sam);
    if let Some(warning) = tone.warning {
        warnings.push(warning.to_string());
    }

    let claim_theme_coherence = score_theme(sam, prior_sams, &mut warnings);

    if !profile.positioning.trim().is_empty()
        && sam
            .differentiation_texts()
            .any(|d| contains_any_phrase(&normalize(d), GENERIC_DIFFERENTIATION))
    {
        warnings.push(WARN_GENERIC_POSITIONING.to_string());
    }

    if sam
        .objections
        .iter()
        .any(|o| contains_any_phrase(&normalize(o), GENERIC_OBJECTIONS))
    {
        warnings.push(WARN_GENERIC_OBJECTIONS.to_string());
    }

    let result = AuthorityConsistency {
        thesis_alignment,
        positioning_alignment,
        tone_match: tone.score,
        claim_theme_coherence,
        drift_warnings: warnings,
        total: thesis_alignment + positioning_alignment + tone.score + claim_theme_coherence,
    }
    .validated();

    debug!(
        total = result.total,
        thesis = result.thesis_alignment,
        positioning = result.positioning_alignment,
        tone = result.tone_match,
        theme = result.claim_theme_coherence,
        warnings = result.drift_warnings.len(),
        priors = prior_sams.len(),
        "Authority consistency scored"
    );

    Some(result)
}

fn score_thesis(
    profile: &AuthorityProfileContext,
    sam: &StrategicAuthorityMap,
    warnings: &mut Vec<String>,
) -> u32 {
    if profile.core_thesis.trim().is_empty() {
        warnings.push(WARN_NO_THESIS.to_string());
        return NEUTRAL_ALIGNMENT;
    }

    let declared = token_set(&profile.core_thesis);
    let generated = token_set_of(
        std::iter::once(sam.core_thesis.statement.as_str()).chain(sam.claim_texts()),
    );
    let o = overlap(&declared, &generated);

    if o.count >= 6 || o.ratio >= 0.45 {
        25
    } else if o.count >= 3 || o.ratio >= 0.25 {
        18
    } else {
        warnings.push(WARN_THESIS_DRIFT.to_string());
        10
    }
}

fn score_positioning(
    profile: &AuthorityProfileContext,
    sam: &StrategicAuthorityMap,
    warnings: &mut Vec<String>,
) -> u32 {
    if profile.positioning.trim().is_empty() {
        warnings.push(WARN_NO_POSITIONING.to_string());
        return NEUTRAL_ALIGNMENT;
    }

    let declared = token_set(&profile.positioning);
    let generated = token_set_of(
        std::iter::once(sam.core_thesis.statement.as_str()).chain(sam.differentiation_texts()),
    );
    let o = overlap(&declared, &generated);

    let base = if o.count >= 5 || o.ratio >= 0.4 {
        23
    } else if o.count >= 2 || o.ratio >= 0.2 {
        16
    } else {
        warnings.push(WARN_POSITIONING_DRIFT.to_string());
        8
    };

    let contrasts_on_positioning = sam.differentiation_texts().any(|d| {
        contains_any_phrase(&normalize(d), COMPARATIVE_PHRASES)
            && !token_set(d).is_disjoint(&declared)
    });

    if contrasts_on_positioning {
        (base + 2).min(AuthorityConsistency::MAX_POSITIONING)
    } else {
        base
    }
}

fn score_theme(
    sam: &StrategicAuthorityMap,
    prior_sams: &[StrategicAuthorityMap],
    warnings: &mut Vec<String>,
) -> u32 {
    let prior_claims: Vec<&str> = prior_sams.iter().flat_map(|p| p.claim_texts()).collect();
    if prior_claims.is_empty() {
        return NEUTRAL_ALIGNMENT;
    }

    let current = top_terms(sam.claim_texts(), THEME_TERMS);
    let prior = top_terms(prior_claims.iter().copied(), THEME_TERMS);
    let ratio = overlap(&current, &prior).ratio;

    let score = if ratio >= 0.45 {
        20
    } else if ratio >= 0.25 {
        16
    } else if ratio >= 0.12 {
        10
    } else {
        warnings.push(WARN_THEME_DRIFT.to_string());
        6
    };

    // Only closely related packs are checked for phrase-level reuse.
    if ratio >= REPETITION_GATE {
        let bigrams = overlap(
            &bigram_set(sam.claim_texts()),
            &bigram_set(prior_claims.iter().copied()),
        );
        if bigrams.ratio >= REPETITION_BIGRAM_RATIO {
            warnings.push(WARN_REPETITION.to_string());
        }
    }

    score
}
