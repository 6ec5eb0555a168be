//! Cross-encoder relevance scoring for the precision rerank pass.
//!
//! Two backends implement the [`RerankClient`] contract:
//!
//! - [`HttpReranker`] calls a text-embeddings-inference style `/rerank`
//!   endpoint hosting a real cross-encoder model. Scores are model-specific
//!   logits or probabilities; only their ordering matters.
//! - [`LexicalReranker`] is a deterministic word-overlap scorer in `[0, 1]`
//!   for deployments without a model service and for tests.
//!
//! The backend is chosen once at startup from configuration; a backend is
//! never swapped in at runtime to mask a failure.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::RerankError;

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text;

/// Default per-call timeout.
pub const DEFAULT_RERANK_TIMEOUT: Duration = Duration::from_secs(10);

/// Contract consumed by the retriever: higher score = more relevant.
#[async_trait]
pub trait RerankClient: Send + Sync {
    /// Scores one (query, passage) pair.
    async fn score(&self, query: &str, passage: &str) -> Result<f32, RerankError>;
}

#[derive(Debug, Clone)]
pub struct HttpRerankerConfig {
    /// Full URL of the rerank endpoint, e.g. `http://localhost:8087/rerank`.
    pub endpoint: String,
    pub timeout: Duration,
}

impl HttpRerankerConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_RERANK_TIMEOUT,
        }
    }

    pub fn validate(&self) -> Result<(), RerankError> {
        if self.endpoint.trim().is_empty() {
            return Err(RerankError::InvalidConfig {
                reason: "rerank endpoint cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    texts: Vec<&'a str>,
}

#[derive(Deserialize)]
struct RerankResult {
    index: usize,
    score: f32,
}

/// Cross-encoder backend over HTTP.
pub struct HttpReranker {
    http: reqwest::Client,
    config: HttpRerankerConfig,
}

impl std::fmt::Debug for HttpReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReranker")
            .field("endpoint", &self.config.endpoint)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl HttpReranker {
    pub fn new(config: HttpRerankerConfig) -> Result<Self, RerankError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RerankError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl RerankClient for HttpReranker {
    async fn score(&self, query: &str, passage: &str) -> Result<f32, RerankError> {
        debug!(
            query_len = query.len(),
            passage_len = passage.len(),
            "Scoring query-passage pair"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&RerankRequest {
                query,
                texts: vec![passage],
            })
            .send()
            .await
            .map_err(|e| RerankError::RequestFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RerankError::RequestFailed {
                message: format!("rerank endpoint returned {}", response.status()),
            });
        }

        let results: Vec<RerankResult> =
            response
                .json()
                .await
                .map_err(|e| RerankError::MalformedResponse {
                    message: e.to_string(),
                })?;

        results
            .iter()
            .find(|r| r.index == 0)
            .map(|r| r.score)
            .ok_or_else(|| RerankError::MalformedResponse {
                message: "response contained no score for the submitted pair".to_string(),
            })
    }
}

/// Deterministic lexical relevance backend.
///
/// Blends recall of query terms with jaccard overlap and squashes through
/// a sigmoid centered at 0.5, yielding scores in `[0, 1]` that separate
/// related from unrelated text well enough for ordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalReranker;

impl LexicalReranker {
    pub fn new() -> Self {
        Self
    }

    fn compute(query: &str, passage: &str) -> f32 {
        let query_words: HashSet<String> = text::content_word_set(query);

        if query_words.is_empty() {
            // Degenerate query (all stop words); fall back to length affinity.
            let len_ratio = (query.len().min(passage.len()) as f32)
                / (query.len().max(passage.len()).max(1) as f32);
            return len_ratio * 0.3;
        }

        let passage_words: HashSet<String> = text::content_word_set(passage);

        let matches = query_words.intersection(&passage_words).count();
        let recall = matches as f32 / query_words.len() as f32;
        let jaccard = text::jaccard(&query_words, &passage_words);

        let base_score = 0.6 * recall + 0.4 * jaccard;
        let normalized = 1.0 / (1.0 + (-8.0 * (base_score - 0.5)).exp());

        normalized.clamp(0.0, 1.0)
    }
}

#[async_trait]
impl RerankClient for LexicalReranker {
    async fn score(&self, query: &str, passage: &str) -> Result<f32, RerankError> {
        let score = Self::compute(query, passage);
        debug!(score, "Computed lexical relevance score");
        Ok(score)
    }
}
