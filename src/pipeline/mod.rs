//! Document ingestion (write path) and query answering (read path).
//!
//! Each query is one linear task: moderate input → retrieve → generate →
//! moderate output → verify → assemble. The components are stateless and
//! shared behind `Arc`, so concurrent queries are fully independent;
//! ingestion of distinct documents may run concurrently with queries,
//! while same-document ingestion must be serialized by the caller.
//!
//! Transient dependency failures are retried with bounded exponential
//! backoff and, once exhausted, surface as errors; they are never
//! conflated with the valid "no supporting evidence" outcome.

pub mod error;
pub mod retry;
pub mod types;


pub use error::PipelineError;
pub use retry::RetryPolicy;
pub use types::{IndexSummary, QueryRequest, QueryResponse, QueryStatus, SourceRef};

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, info, instrument, warn};

use crate::chunking::{Chunker, ChunkingConfig, PageText};
use crate::embedding::EmbeddingClient;
use crate::generation::{LlmClient, prompts};
use crate::moderation::{ModerationGate, ModerationStage};
use crate::retrieval::{RetrievedCandidate, Retriever};
use crate::vectordb::{PassagePoint, VectorStore, WriteConsistency};
use crate::verification::AnswerVerifier;

use retry::with_retry;

/// Write path: chunk, embed, and index documents.
pub struct DocumentIndexer {
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingClient>,
    store: Arc<dyn VectorStore>,
    retry: RetryPolicy,
}

impl DocumentIndexer {
    pub fn new(
        chunking: ChunkingConfig,
        embedder: Arc<dyn EmbeddingClient>,
        store: Arc<dyn VectorStore>,
        retry: RetryPolicy,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            chunker: Chunker::new(chunking)?,
            embedder,
            store,
            retry,
        })
    }

    /// Chunks and indexes one document.
    ///
    /// Passages are upserted with strong write consistency so the document
    /// only becomes searchable once fully ingested.
    #[instrument(skip(self, document_id, pages), fields(pages = pages.len()))]
    pub async fn index_document(
        &self,
        document_id: Option<String>,
        document_name: &str,
        pages: &[PageText],
    ) -> Result<IndexSummary, PipelineError> {
        let document_id = document_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let passages = self.chunker.chunk(&document_id, pages);
        debug!(
            document_id = %document_id,
            chunks = passages.len(),
            "Document chunked"
        );

        // Passages of one document embed concurrently; the upsert below is
        // still a single strong write, so partially embedded documents are
        // never searchable.
        let vectors = try_join_all(passages.iter().map(|passage| {
            with_retry(
                self.retry,
                "embed_passage",
                move || self.embedder.embed(&passage.text),
                |e| e.is_transient(),
            )
        }))
        .await?;

        let points: Vec<PassagePoint> = passages
            .iter()
            .zip(vectors)
            .map(|(passage, vector)| PassagePoint::from_passage(passage, document_name, vector))
            .collect();

        if !points.is_empty() {
            with_retry(
                self.retry,
                "upsert_passages",
                || self.store.upsert(points.clone(), WriteConsistency::Strong),
                |_| true,
            )
            .await?;
        }

        let summary = IndexSummary {
            document_id,
            document_name: document_name.to_string(),
            pages: pages.len(),
            chunks_indexed: passages.len(),
            ingested_at: chrono::Utc::now().timestamp(),
        };

        info!(
            document_id = %summary.document_id,
            chunks = summary.chunks_indexed,
            "Document indexed"
        );

        Ok(summary)
    }

    /// Deletes a document and every vector derived from it.
    pub async fn delete_document(&self, document_id: &str) -> Result<(), PipelineError> {
        with_retry(
            self.retry,
            "delete_document",
            || self.store.delete_document(document_id),
            |_| true,
        )
        .await?;

        info!(document_id, "Document deleted");
        Ok(())
    }
}

/// Read path: answer one query against the indexed corpus.
pub struct QueryPipeline {
    moderation: ModerationGate,
    retriever: Retriever,
    llm: Arc<dyn LlmClient>,
    verifier: AnswerVerifier,
    retry: RetryPolicy,
}

impl QueryPipeline {
    pub fn new(
        moderation: ModerationGate,
        retriever: Retriever,
        llm: Arc<dyn LlmClient>,
        verifier: AnswerVerifier,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            moderation,
            retriever,
            llm,
            verifier,
            retry,
        }
    }

    /// Runs the full grounded-answer pipeline for one query.
    #[instrument(skip(self, request), fields(query_len = request.query.len()))]
    pub async fn answer(&self, request: QueryRequest) -> Result<QueryResponse, PipelineError> {
        let query = request.query.trim().to_string();
        if query.is_empty() {
            return Err(PipelineError::InvalidRequest {
                reason: "query cannot be empty".to_string(),
            });
        }
        if request.top_k == Some(0) {
            return Err(PipelineError::InvalidRequest {
                reason: "top_k must be greater than zero".to_string(),
            });
        }

        if self
            .moderation
            .screen(&query, ModerationStage::Input)
            .await
            .is_flagged()
        {
            info!("Query rejected by input moderation");
            return Ok(QueryResponse::refusal(
                query,
                ModerationStage::Input.violation_message().to_string(),
                QueryStatus::InputRejected,
            ));
        }

        let scope = request.document_ids.as_deref();
        let mut candidates = with_retry(
            self.retry,
            "retrieve",
            || self.retriever.retrieve(&query, scope),
            |e| e.is_transient(),
        )
        .await?;

        if let Some(top_k) = request.top_k {
            candidates.truncate(top_k);
        }

        if candidates.is_empty() {
            info!("No grounding available for query");
            return Ok(QueryResponse::refusal(
                query,
                prompts::NO_GROUNDING_ANSWER.to_string(),
                QueryStatus::NoGrounding,
            ));
        }

        debug!(candidates = candidates.len(), "Generating grounded answer");
        let answer = with_retry(
            self.retry,
            "generate",
            || self.llm.generate(&query, &candidates),
            |e| e.is_transient(),
        )
        .await?;

        if self
            .moderation
            .screen(&answer, ModerationStage::Output)
            .await
            .is_flagged()
        {
            warn!("Generated answer rejected by output moderation");
            return Ok(QueryResponse::refusal(
                query,
                ModerationStage::Output.violation_message().to_string(),
                QueryStatus::OutputRejected,
            ));
        }

        let report = self.verifier.verify(&query, &answer, &candidates)?;

        let status = if report.meets_threshold {
            QueryStatus::Answered
        } else {
            QueryStatus::LowConfidence
        };

        info!(
            confidence = report.confidence_score,
            ?status,
            sources = candidates.len(),
            "Query processed"
        );

        Ok(Self::assemble(query, answer, status, report, &candidates))
    }

    fn assemble(
        query: String,
        answer: String,
        status: QueryStatus,
        report: crate::verification::VerificationReport,
        candidates: &[RetrievedCandidate],
    ) -> QueryResponse {
        let mut page_numbers: Vec<u32> = report.evidence.iter().map(|e| e.page_number).collect();
        page_numbers.sort_unstable();
        page_numbers.dedup();

        QueryResponse {
            query,
            answer,
            status,
            confidence_score: report.confidence_score,
            page_numbers,
            evidence: report.evidence.clone(),
            sources: candidates.iter().map(SourceRef::from).collect(),
            context_used: candidates.len(),
            verification: Some(report),
        }
    }
}
