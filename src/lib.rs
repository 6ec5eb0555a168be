//! Attest library crate (used by the server binary and integration tests).
//!
//! Grounded question answering over ingested medical documents: extracted
//! page text is chunked into addressable passages, queries retrieve and
//! rerank the most relevant passages, an external LLM generates a
//! context-constrained answer, and an independent verifier scores that
//! answer along four dimensions before anything reaches the caller.
//!
//! # Public API Surface
//!
//! ## Core Pipeline
//! - [`Chunker`], [`ChunkingConfig`], [`Passage`] - passage production
//! - [`Retriever`], [`RetrievalConfig`], [`RetrievedCandidate`] - two-stage retrieval
//! - [`AnswerVerifier`], [`VerifierConfig`], [`VerificationReport`] - answer verification
//! - [`DocumentIndexer`], [`QueryPipeline`], [`QueryResponse`] - orchestration
//!
//! ## Collaborator Contracts
//! - [`EmbeddingClient`] / [`OpenAiEmbedder`] - text embedding
//! - [`VectorStore`] / [`QdrantStore`] - vector persistence and search
//! - [`RerankClient`] / [`HttpReranker`], [`LexicalReranker`] - cross-encoder scoring
//! - [`LlmClient`] / [`OpenAiGenerator`] - grounded answer generation
//! - [`ModerationClient`] / [`OpenAiModerator`], [`ModerationGate`] - safety screening
//!
//! Each contract has exactly one implementation active per process,
//! selected from [`Config`] at startup.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod chunking;
pub mod config;
pub mod embedding;
pub mod gateway;
pub mod generation;
pub mod hashing;
pub mod moderation;
pub mod pipeline;
pub mod reranking;
pub mod retrieval;
pub mod text;
pub mod vectordb;
pub mod verification;

pub use chunking::{
    BBox, Chunker, ChunkingConfig, ChunkingError, ExtractionType, PageText, Passage, TextSpan,
};
pub use config::{Config, ConfigError};
pub use embedding::{EmbedderConfig, EmbeddingClient, EmbeddingError, OpenAiEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingClient;
pub use gateway::{GatewayError, GatewayState, create_router};
pub use generation::{
    GenerationError, GeneratorConfig, LlmClient, OpenAiGenerator,
    prompts::{NO_GROUNDING_ANSWER, NOT_IN_DOCUMENTS, OFF_TOPIC},
};
#[cfg(any(test, feature = "mock"))]
pub use generation::MockLlm;
pub use moderation::{
    ModerationClient, ModerationError, ModerationGate, ModerationStage, ModerationVerdict,
    ModeratorConfig, OpenAiModerator, Screening,
};
#[cfg(any(test, feature = "mock"))]
pub use moderation::MockModeration;
pub use pipeline::{
    DocumentIndexer, IndexSummary, PipelineError, QueryPipeline, QueryRequest, QueryResponse,
    QueryStatus, RetryPolicy, SourceRef,
};
pub use reranking::{
    HttpReranker, HttpRerankerConfig, LexicalReranker, RerankClient, RerankError,
};
pub use retrieval::{RetrievalConfig, RetrievalError, RetrievedCandidate, Retriever};
pub use vectordb::{
    DEFAULT_COLLECTION_NAME, PassageMeta, PassagePoint, QdrantStore, StoreMatch, VectorDbError,
    VectorStore, WriteConsistency,
};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorStore;
pub use verification::{
    AnswerVerifier, DomainDescriptor, Evidence, SignalWeights, VerificationReport, VerifierConfig,
    VerifyError,
};
