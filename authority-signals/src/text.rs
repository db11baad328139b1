//! Text primitives shared by the topic indexer and the consistency scorer.
//!
//! Everything here is stateless: normalize, tokenize, build sets, and measure
//! overlap. Sets are `BTreeSet` so iteration order (and therefore every score
//! built on top) is deterministic.

use std::collections::{BTreeSet, HashMap};

/// Words too common to carry meaning in an overlap comparison.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "your", "you", "are", "was", "were",
    "will", "have", "has", "had", "into", "our", "their", "they", "them", "its", "not", "but",
    "can", "more", "less", "than", "about", "what", "when", "how", "why", "who", "all", "any",
    "each", "most", "also", "just", "only", "very", "been", "being", "does", "did", "doing",
    "out", "over", "under", "then", "there", "these", "those", "which", "while", "would",
    "should", "could", "because", "such", "too", "where", "every", "other",
];

/// Minimum length of a significant token.
const MIN_TOKEN_CHARS: usize = 3;

/// Normalize free text for substring and token comparisons.
///
/// Lowercases, replaces every character that is not alphanumeric or
/// whitespace with a space, collapses whitespace runs, and trims.
/// Normalizing an already-normalized string returns it unchanged.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All normalized words, in order, including short and stop words.
pub fn words(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_significant(word: &str) -> bool {
    word.chars().count() >= MIN_TOKEN_CHARS && !STOP_WORDS.contains(&word)
}

/// Significant tokens, in order, with repeats.
pub fn tokens(text: &str) -> Vec<String> {
    words(text).into_iter().filter(|w| is_significant(w)).collect()
}

/// Set of significant tokens.
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokens(text).into_iter().collect()
}

/// Set of significant tokens across several texts.
pub fn token_set_of<'a>(texts: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    texts.into_iter().flat_map(tokens).collect()
}

/// Shared-token measurement between two sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Number of shared elements
    pub count: usize,
    /// `count / min(|a|, |b|)`, or 0 when either side is empty
    pub ratio: f64,
}

/// Measure overlap between two sets.
pub fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Overlap {
    let count = a.intersection(b).count();
    let smaller = a.len().min(b.len());
    let ratio = if smaller == 0 {
        0.0
    } else {
        count as f64 / smaller as f64
    };
    Overlap { count, ratio }
}

/// The `k` most frequent significant tokens across `texts`.
///
/// Ties are broken alphabetically so the result never depends on hash order.
pub fn top_terms<'a>(texts: impl IntoIterator<Item = &'a str>, k: usize) -> BTreeSet<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for token in tokens(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(a_term, a_count), (b_term, b_count)| {
        b_count.cmp(a_count).then_with(|| a_term.cmp(b_term))
    });

    ranked.into_iter().take(k).map(|(term, _)| term).collect()
}

/// Adjacent significant-token pairs of each text, joined by a space.
///
/// Pairs never span two texts.
pub fn bigram_set<'a>(texts: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for text in texts {
        let toks = tokens(text);
        for pair in toks.windows(2) {
            out.insert(format!("{} {}", pair[0], pair[1]));
        }
    }
    out
}

/// Whole-phrase match against already-normalized text.
///
/// `phrase` is normalized before matching, so "compared to" and "vs." work.
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    let phrase = normalize(phrase);
    if phrase.is_empty() || normalized.is_empty() {
        return false;
    }
    format!(" {normalized} ").contains(&format!(" {phrase} "))
}

/// True if any phrase in `phrases` appears in the normalized text.
pub fn contains_any_phrase(normalized: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(normalized, p))
}

/// Match `stem` at the start of a word in already-normalized text.
///
/// Inflections match ("disrupt" finds "disruptive"); mid-word hits do not.
pub fn contains_stem(normalized: &str, stem: &str) -> bool {
    let stem = normalize(stem);
    if stem.is_empty() || normalized.is_empty() {
        return false;
    }
    format!(" {normalized}").contains(&format!(" {stem}"))
}

/// Words in `text` that start with any of the given stems.
pub fn count_stems(text: &str, stems: &[&str]) -> usize {
    words(text)
        .iter()
        .filter(|w| stems.iter().any(|stem| w.starts_with(stem)))
        .count()
}

/// Total occurrences of the given single words in `text`.
pub fn count_words(text: &str, vocabulary: &[&str]) -> usize {
    words(text)
        .iter()
        .filter(|w| vocabulary.contains(&w.as_str()))
        .count()
}
