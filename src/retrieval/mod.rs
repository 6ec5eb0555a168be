//! Two-stage passage retrieval: broad similarity search, precision rerank.
//!
//! The vector store is over-fetched by a configurable factor so threshold
//! filtering and reranking have enough candidates to work with, then the
//! survivors are re-scored pairwise by the cross-encoder and truncated to
//! `top_k`. An empty result after threshold filtering is a valid outcome
//! ("no grounding available"), distinct from a dependency failure, which
//! always surfaces as an error.

pub mod error;


pub use error::RetrievalError;

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::embedding::EmbeddingClient;
use crate::reranking::RerankClient;
use crate::vectordb::{PassageMeta, VectorStore};

/// Default number of passages handed to generation.
pub const DEFAULT_TOP_K: usize = 5;

/// Default minimum cosine similarity for a candidate to survive filtering.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

/// Default over-fetch multiplier for the raw similarity search.
pub const DEFAULT_OVERFETCH_FACTOR: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct RetrievalConfig {
    pub top_k: usize,
    /// Interpreted on the store's cosine scale, `[-1, 1]`.
    pub similarity_threshold: f32,
    pub overfetch_factor: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.top_k == 0 {
            return Err(RetrievalError::InvalidConfig {
                reason: "top_k must be greater than zero".to_string(),
            });
        }
        if self.overfetch_factor == 0 {
            return Err(RetrievalError::InvalidConfig {
                reason: "overfetch_factor must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn raw_limit(&self) -> u64 {
        (self.top_k * self.overfetch_factor) as u64
    }
}

/// A passage selected for a query. Ephemeral: built fresh per request,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedCandidate {
    pub chunk_id: String,
    /// Cosine similarity from the vector store, `[-1, 1]`.
    pub similarity_score: f32,
    /// Cross-encoder output; scale is model-specific, ordering is what counts.
    pub rerank_score: f32,
    pub metadata: PassageMeta,
}

/// Read-path retrieval over the embedding, store, and rerank collaborators.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingClient>,
    store: Arc<dyn VectorStore>,
    reranker: Arc<dyn RerankClient>,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        store: Arc<dyn VectorStore>,
        reranker: Arc<dyn RerankClient>,
        config: RetrievalConfig,
    ) -> Result<Self, RetrievalError> {
        config.validate()?;
        Ok(Self {
            embedder,
            store,
            reranker,
            config,
        })
    }

    pub fn config(&self) -> RetrievalConfig {
        self.config
    }

    /// Retrieves up to `top_k` passages for `query`, optionally restricted
    /// to `document_scope`.
    ///
    /// Ordering: descending `rerank_score`, ties broken by descending
    /// `similarity_score`, then ascending `chunk_id` so results are fully
    /// deterministic.
    pub async fn retrieve(
        &self,
        query: &str,
        document_scope: Option<&[String]>,
    ) -> Result<Vec<RetrievedCandidate>, RetrievalError> {
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }

        let query_vector = self.embedder.embed(query).await?;

        let raw_matches = self
            .store
            .search(query_vector, self.config.raw_limit(), document_scope)
            .await?;
        let raw_count = raw_matches.len();

        let survivors: Vec<_> = raw_matches
            .into_iter()
            .filter(|m| m.score >= self.config.similarity_threshold)
            .collect();

        debug!(
            raw = raw_count,
            above_threshold = survivors.len(),
            threshold = self.config.similarity_threshold,
            "Filtered similarity candidates"
        );

        if survivors.is_empty() {
            info!(raw = raw_count, "No candidates above similarity threshold");
            return Ok(Vec::new());
        }

        let mut candidates = Vec::with_capacity(survivors.len());
        for m in survivors {
            let rerank_score = self.reranker.score(query, &m.meta.text).await?;
            candidates.push(RetrievedCandidate {
                chunk_id: m.chunk_id,
                similarity_score: m.score,
                rerank_score,
                metadata: m.meta,
            });
        }

        candidates.sort_by(|a, b| {
            b.rerank_score
                .partial_cmp(&a.rerank_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.similarity_score
                        .partial_cmp(&a.similarity_score)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });

        candidates.truncate(self.config.top_k);

        info!(
            retained = candidates.len(),
            top_rerank_score = candidates.first().map(|c| c.rerank_score),
            "Retrieval complete"
        );

        Ok(candidates)
    }
}
