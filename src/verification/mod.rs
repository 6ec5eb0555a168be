//! Post-generation answer verification.
//!
//! Scores a generated answer along four independent dimensions (grounding
//! in the retrieved passages, internal/source consistency, relevance to the
//! query, and domain fit) and combines them into one auditable confidence
//! value with a pass/fail decision plus the exact supporting evidence.
//!
//! "Answer unsupported" is a result, not an error: callers get a report
//! with `meets_threshold = false` and decide what to do with it.
//! Verification is fully deterministic: identical input yields identical
//! scores.

pub mod error;
mod signals;
pub mod types;


pub use error::VerifyError;
pub use types::{DomainDescriptor, Evidence, SignalWeights, VerificationReport};

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::retrieval::RetrievedCandidate;
use crate::text;

/// Default minimum confidence for `meets_threshold`.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Default content-token recall a sentence needs against some passage to
/// count as grounded.
pub const DEFAULT_SENTENCE_MATCH_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub confidence_threshold: f32,
    pub sentence_match_threshold: f32,
    pub weights: SignalWeights,
    pub domain: DomainDescriptor,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            sentence_match_threshold: DEFAULT_SENTENCE_MATCH_THRESHOLD,
            weights: SignalWeights::default(),
            domain: DomainDescriptor::medical(),
        }
    }
}

impl VerifierConfig {
    pub fn validate(&self) -> Result<(), VerifyError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(VerifyError::InvalidConfig {
                reason: format!(
                    "confidence_threshold must be in [0, 1], got {}",
                    self.confidence_threshold
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.sentence_match_threshold) {
            return Err(VerifyError::InvalidConfig {
                reason: format!(
                    "sentence_match_threshold must be in [0, 1], got {}",
                    self.sentence_match_threshold
                ),
            });
        }
        self.weights.validate()
    }
}

/// Verifies generated answers against their retrieved evidence.
pub struct AnswerVerifier {
    config: VerifierConfig,
}

impl AnswerVerifier {
    pub fn new(config: VerifierConfig) -> Result<Self, VerifyError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Scores `answer` against `passages` for `query`.
    ///
    /// A non-empty answer with an empty passage set is a data-consistency
    /// violation upstream; it is logged and comes back as a zero-grounding
    /// report rather than an error.
    pub fn verify(
        &self,
        query: &str,
        answer: &str,
        passages: &[RetrievedCandidate],
    ) -> Result<VerificationReport, VerifyError> {
        if query.trim().is_empty() {
            return Err(VerifyError::InvalidInput {
                reason: "query cannot be empty".to_string(),
            });
        }

        if passages.is_empty() && !answer.trim().is_empty() {
            warn!("Verifying a non-empty answer against an empty passage set");
        }

        let sentences = text::split_sentences(answer);
        let passage_texts: Vec<&str> = passages.iter().map(|p| p.metadata.text.as_str()).collect();
        let passage_token_sets: Vec<HashSet<String>> = passage_texts
            .iter()
            .map(|t| text::content_word_set(t))
            .collect();

        let (grounding_score, sentence_matches) = signals::grounding(
            &sentences,
            &passage_token_sets,
            self.config.sentence_match_threshold,
        );
        let consistency_score = signals::consistency(&sentences, &passage_texts);
        let relevance_score = signals::relevance(query, answer);
        let domain_score = signals::domain_fit(&sentences, &self.config.domain);

        let weights = &self.config.weights;
        let confidence_score = (weights.grounding * grounding_score
            + weights.consistency * consistency_score
            + weights.relevance * relevance_score
            + weights.domain * domain_score)
            .clamp(0.0, 1.0);

        let meets_threshold = confidence_score >= self.config.confidence_threshold;

        debug!(
            grounding = grounding_score,
            consistency = consistency_score,
            relevance = relevance_score,
            domain = domain_score,
            "Verification signals computed"
        );

        let evidence = self.collect_evidence(answer, passages, &sentence_matches);

        info!(
            confidence = confidence_score,
            meets_threshold,
            evidence = evidence.len(),
            "Answer verification complete"
        );

        Ok(VerificationReport {
            confidence_score,
            grounding_score,
            consistency_score,
            relevance_score,
            domain_score,
            meets_threshold,
            evidence,
        })
    }

    /// One evidence entry per supporting passage, in passage order.
    fn collect_evidence(
        &self,
        answer: &str,
        passages: &[RetrievedCandidate],
        sentence_matches: &[Option<usize>],
    ) -> Vec<Evidence> {
        let supporting: HashSet<usize> = sentence_matches.iter().flatten().copied().collect();

        // Only answer words of 5+ characters are highlighted; shorter
        // tokens are mostly filler and would mark half the chunk.
        let answer_tokens: HashSet<String> = text::content_words(answer)
            .into_iter()
            .filter(|t| t.chars().count() >= 5)
            .collect();

        passages
            .iter()
            .enumerate()
            .filter(|(idx, _)| supporting.contains(idx))
            .map(|(_, passage)| Evidence {
                page_number: passage.metadata.page_number,
                exact_chunk: passage.metadata.text.clone(),
                bbox: passage.metadata.bbox,
                highlighted: signals::highlight(&passage.metadata.text, &answer_tokens),
            })
            .collect()
    }
}
