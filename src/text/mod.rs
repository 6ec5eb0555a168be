//! Lexical helpers shared by the rerank fallback and the answer verifier.
//!
//! Everything here is pure and deterministic: verification scores must be
//! reproducible for identical input, so no randomness and no model calls.


use std::collections::HashSet;
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with", "at", "by",
    "from", "as", "into", "through", "during", "before", "after", "above", "below", "between",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "each", "few", "more", "most", "other", "some", "such", "nor", "only", "own", "same",
    "so", "than", "too", "very", "just", "and", "but", "if", "or", "because", "until", "while",
    "what", "which", "who", "whom", "this", "that", "these", "those", "am", "it", "its",
];

/// Tokens that flag a negated statement. "no"/"not"/"never"/"cannot" come
/// from the contradiction scan; "denies"/"negative"/"without" are common in
/// clinical notes and carry the same polarity signal.
const NEGATION_MARKERS: &[&str] = &[
    "no", "not", "never", "cannot", "can't", "without", "denies", "negative",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Lowercased alphanumeric tokens with stop words removed.
pub fn content_words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !stop_words().contains(w))
        .map(str::to_string)
        .collect()
}

/// Like [`content_words`] but deduplicated into a set.
pub fn content_word_set(text: &str) -> HashSet<String> {
    content_words(text).into_iter().collect()
}

/// Splits on `.`, `!`, `?` only when followed by whitespace or end of input,
/// so decimal values ("2.5 mg") survive intact.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|next| next.is_whitespace());
            if at_boundary {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                current.clear();
            }
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

/// Fraction of `needle`'s content tokens present in `haystack`.
/// Returns 0.0 when the needle has no content tokens.
pub fn token_recall(needle: &str, haystack: &HashSet<String>) -> f32 {
    let tokens = content_words(needle);
    if tokens.is_empty() {
        return 0.0;
    }
    let matches = tokens.iter().filter(|t| haystack.contains(*t)).count();
    matches as f32 / tokens.len() as f32
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f32 / union as f32
}

/// Blended overlap score in [0, 1]: recall of `query` terms in `text`
/// weighted 0.6, jaccard weighted 0.4. Recall dominates so a short query
/// fully covered by a long passage still scores high.
pub fn overlap_score(query: &str, text: &str) -> f32 {
    let query_set = content_word_set(query);
    if query_set.is_empty() {
        return 0.0;
    }
    let text_set = content_word_set(text);

    let matches = query_set.intersection(&text_set).count();
    let recall = matches as f32 / query_set.len() as f32;
    let score = 0.6 * recall + 0.4 * jaccard(&query_set, &text_set);

    score.clamp(0.0, 1.0)
}

/// Numeric tokens (integers and decimals), e.g. `["7.2", "120"]`.
pub fn numeric_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty() && t.chars().any(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// True when the text contains a negation marker as a standalone token.
pub fn has_negation(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .any(|w| NEGATION_MARKERS.contains(&w))
}
