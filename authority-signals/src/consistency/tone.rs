//! Tone match sub-score, keyed on the profile's declared tone.

use crate::model::{StrategicAuthorityMap, Tone, ToneSetting};
use crate::text::{contains_stem, count_stems, count_words, normalize, words};

/// Matched at word start, so inflected forms count.
const HYPE_STEMS: &[&str] = &[
    "game changer",
    "revolution",
    "disrupt",
    "10x",
    "skyrocket",
    "unprecedented",
    "guarantee",
    "secret weapon",
];

const BOLD_WORDS: &[&str] = &[
    "must", "never", "always", "wrong", "stop", "dead", "myth", "broken", "truth",
];

const EXECUTION_WORDS: &[&str] = &[
    "step",
    "steps",
    "playbook",
    "checklist",
    "process",
    "implement",
    "execute",
    "workflow",
    "template",
    "action",
    "plan",
    "roadmap",
];

/// Matched at word start, so plurals count.
const FRAMEWORK_STEMS: &[&str] = &[
    "framework",
    "model",
    "principle",
    "research",
    "evidence",
    "theory",
    "theories",
    "study",
    "studies",
];

const FIRST_PERSON: &[&str] = &["i", "me", "my", "mine", "we", "us", "our", "ours"];

const MIN_NARRATIVE_CHARS: usize = 80;

/// Sub-score plus an optional warning.
pub(crate) struct ToneScore {
    pub score: u32,
    pub warning: Option<&'static str>,
}

impl ToneScore {
    fn clean(score: u32) -> Self {
        Self { score, warning: None }
    }

    fn warn(score: u32, warning: &'static str) -> Self {
        Self {
            score,
            warning: Some(warning),
        }
    }
}

pub(crate) fn score_tone(setting: ToneSetting, sam: &StrategicAuthorityMap) -> ToneScore {
    let tone = match setting {
        ToneSetting::Unset => return ToneScore::warn(10, "no tone set"),
        ToneSetting::Unrecognized => return ToneScore::clean(10),
        ToneSetting::Declared(tone) => tone,
    };

    let text = sam.full_text();

    match tone {
        Tone::Measured => {
            let normalized = normalize(&text);
            if HYPE_STEMS.iter().any(|stem| contains_stem(&normalized, stem)) {
                ToneScore::warn(10, "tone mismatch: hype language in a measured voice")
            } else {
                ToneScore::clean(18)
            }
        }
        Tone::Bold => match count_words(&text, BOLD_WORDS) {
            0 => ToneScore::warn(8, "tone mismatch: no assertive language for a bold voice"),
            1 => ToneScore::clean(14),
            _ => ToneScore::clean(20),
        },
        Tone::Direct => {
            let numeric = !sam.proof_assets.metrics.is_empty()
                || text.chars().any(|c| c.is_ascii_digit());
            let execution = count_words(&text, EXECUTION_WORDS) > 0;
            match (numeric, execution) {
                (true, true) => ToneScore::clean(20),
                (true, false) | (false, true) => ToneScore::clean(14),
                (false, false) => {
                    ToneScore::warn(8, "tone mismatch: no metrics or execution steps for a direct voice")
                }
            }
        }
        Tone::Academic => {
            let why = sam.why_it_matters_texts().collect::<Vec<_>>().join(" ");
            match count_stems(&why, FRAMEWORK_STEMS) {
                0 => ToneScore::warn(8, "tone mismatch: no frameworks or evidence for an academic voice"),
                1 => ToneScore::clean(14),
                _ => ToneScore::clean(20),
            }
        }
        Tone::Friendly => {
            let narrative = sam.narrative_arc.text();
            let personal = words(&narrative)
                .iter()
                .any(|w| FIRST_PERSON.contains(&w.as_str()));
            if narrative.chars().count() >= MIN_NARRATIVE_CHARS && personal {
                ToneScore::clean(18)
            } else {
                ToneScore::warn(10, "tone mismatch: narrative lacks a personal story for a friendly voice")
            }
        }
    }
}
