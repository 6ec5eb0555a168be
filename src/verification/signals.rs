//! The four verification signals as independent pure functions.
//!
//! Each takes plain data and returns a score in `[0, 1]`; the combination
//! into a confidence value lives in the verifier so any one signal can be
//! re-tuned or replaced without touching the others.

use std::collections::HashSet;

use crate::text;

use super::types::DomainDescriptor;

/// Minimum content-token jaccard for two sentences to be considered
/// statements about the same thing during the contradiction scan.
const CONTRADICTION_OVERLAP: f32 = 0.6;

/// Per-sentence support: the index of the best supporting passage for each
/// sentence that clears `match_threshold`, and the fraction of supported
/// sentences.
///
/// A sentence with zero supporting tokens contributes 0, never negative.
pub(super) fn grounding(
    sentences: &[String],
    passage_token_sets: &[HashSet<String>],
    match_threshold: f32,
) -> (f32, Vec<Option<usize>>) {
    if sentences.is_empty() {
        return (0.0, Vec::new());
    }

    let matches: Vec<Option<usize>> = sentences
        .iter()
        .map(|sentence| {
            let mut best: Option<(usize, f32)> = None;
            for (idx, tokens) in passage_token_sets.iter().enumerate() {
                let support = text::token_recall(sentence, tokens);
                // Strictly-greater keeps the earliest passage on ties,
                // which keeps evidence deterministic.
                if best.is_none_or(|(_, s)| support > s) {
                    best = Some((idx, support));
                }
            }
            best.filter(|(_, support)| *support >= match_threshold)
                .map(|(idx, _)| idx)
        })
        .collect();

    let supported = matches.iter().filter(|m| m.is_some()).count();
    let score = supported as f32 / sentences.len() as f32;

    (score.clamp(0.0, 1.0), matches)
}

/// 1 − contradictions / sentence_count, floored at 0.
///
/// Contradiction signals, each counted once per offending sentence or pair:
/// - two answer sentences about the same subject with opposite polarity,
/// - a negated answer sentence when no source passage carries a negation,
/// - an answer sentence whose numeric values appear nowhere in the sources
///   even though the sources do state numbers.
pub(super) fn consistency(sentences: &[String], passages: &[&str]) -> f32 {
    if sentences.is_empty() {
        return 1.0;
    }

    let mut contradictions = 0usize;

    let token_sets: Vec<HashSet<String>> = sentences
        .iter()
        .map(|s| text::content_word_set(s))
        .collect();
    let negated: Vec<bool> = sentences.iter().map(|s| text::has_negation(s)).collect();

    for i in 0..sentences.len() {
        for j in (i + 1)..sentences.len() {
            if negated[i] != negated[j]
                && text::jaccard(&token_sets[i], &token_sets[j]) >= CONTRADICTION_OVERLAP
            {
                contradictions += 1;
            }
        }
    }

    if !passages.is_empty() {
        let any_source_negated = passages.iter().any(|p| text::has_negation(p));
        let source_numbers: HashSet<String> = passages
            .iter()
            .flat_map(|p| text::numeric_tokens(p))
            .collect();

        for (sentence, is_negated) in sentences.iter().zip(&negated) {
            if *is_negated && !any_source_negated {
                contradictions += 1;
            }

            let sentence_numbers = text::numeric_tokens(sentence);
            if !sentence_numbers.is_empty()
                && !source_numbers.is_empty()
                && sentence_numbers.iter().all(|n| !source_numbers.contains(n))
            {
                contradictions += 1;
            }
        }
    }

    (1.0 - contradictions as f32 / sentences.len() as f32).clamp(0.0, 1.0)
}

/// Lexical similarity between query and answer as whole strings.
pub(super) fn relevance(query: &str, answer: &str) -> f32 {
    text::overlap_score(query, answer).clamp(0.0, 1.0)
}

/// Fraction of answer sentences carrying at least one domain term.
/// An empty descriptor disables the check (scores 1.0).
pub(super) fn domain_fit(sentences: &[String], descriptor: &DomainDescriptor) -> f32 {
    if descriptor.terms.is_empty() {
        return 1.0;
    }
    if sentences.is_empty() {
        return 0.0;
    }

    let in_domain = sentences
        .iter()
        .filter(|sentence| {
            text::content_words(sentence)
                .iter()
                .any(|token| descriptor.terms.contains(token))
        })
        .count();

    (in_domain as f32 / sentences.len() as f32).clamp(0.0, 1.0)
}

/// Wraps every answer token (5+ characters) found in `chunk_text` with
/// `**..**`, preserving everything else byte for byte.
pub(super) fn highlight(chunk_text: &str, answer_tokens: &HashSet<String>) -> String {
    let mut highlighted = String::with_capacity(chunk_text.len());
    let mut token = String::new();

    let flush = |token: &mut String, out: &mut String| {
        if !token.is_empty() {
            if token.chars().count() >= 5 && answer_tokens.contains(&token.to_lowercase()) {
                out.push_str("**");
                out.push_str(token);
                out.push_str("**");
            } else {
                out.push_str(token);
            }
            token.clear();
        }
    };

    for c in chunk_text.chars() {
        if c.is_alphanumeric() {
            token.push(c);
        } else {
            flush(&mut token, &mut highlighted);
            highlighted.push(c);
        }
    }
    flush(&mut token, &mut highlighted);

    highlighted
}
