use serde::{Deserialize, Serialize};

use crate::retrieval::RetrievedCandidate;
use crate::verification::{Evidence, VerificationReport};

/// A question to answer, optionally restricted to specific documents.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Restrict retrieval to these documents.
    #[serde(default)]
    pub document_ids: Option<Vec<String>>,
    /// Cap on returned passages, bounded above by the configured top_k.
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            document_ids: None,
            top_k: None,
        }
    }
}

/// How a query run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Verified answer at or above the confidence threshold.
    Answered,
    /// A complete answer whose confidence fell below the threshold;
    /// the caller decides whether to show it.
    LowConfidence,
    /// Retrieval found no passages above the similarity threshold.
    /// This is a processed request, not a failure.
    NoGrounding,
    /// The query was flagged by input moderation.
    InputRejected,
    /// The generated answer was flagged by output moderation.
    OutputRejected,
}

/// One retained candidate, as exposed to callers.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    pub document: String,
    pub page_number: u32,
    pub chunk_id: String,
    pub similarity_score: f32,
    pub rerank_score: f32,
}

impl From<&RetrievedCandidate> for SourceRef {
    fn from(candidate: &RetrievedCandidate) -> Self {
        Self {
            document: candidate.metadata.document_name.clone(),
            page_number: candidate.metadata.page_number,
            chunk_id: candidate.chunk_id.clone(),
            similarity_score: candidate.similarity_score,
            rerank_score: candidate.rerank_score,
        }
    }
}

/// The assembled result of one query run.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub answer: String,
    pub status: QueryStatus,
    pub confidence_score: f32,
    /// Pages cited by the evidence, deduplicated, ascending.
    pub page_numbers: Vec<u32>,
    pub evidence: Vec<Evidence>,
    /// Full verification report; absent for refusals where no
    /// verification ran.
    pub verification: Option<VerificationReport>,
    pub sources: Vec<SourceRef>,
    /// Number of passages handed to generation.
    pub context_used: usize,
}

impl QueryResponse {
    /// A refusal or no-grounding response with zero confidence.
    pub(super) fn refusal(query: String, answer: String, status: QueryStatus) -> Self {
        Self {
            query,
            answer,
            status,
            confidence_score: 0.0,
            page_numbers: Vec::new(),
            evidence: Vec::new(),
            verification: None,
            sources: Vec::new(),
            context_used: 0,
        }
    }
}

/// Result of ingesting one document.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub document_id: String,
    pub document_name: String,
    pub pages: usize,
    pub chunks_indexed: usize,
    /// Unix timestamp (seconds) of ingestion.
    pub ingested_at: i64,
}
