//! Query/passage embedding via the external embedding service.
//!
//! The embedding function is an opaque remote call: this module only fixes
//! the contract (deterministic text → fixed-width vector) and provides the
//! OpenAI-backed implementation plus a deterministic in-memory mock.

pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingClient;

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::embeddings::CreateEmbeddingRequestArgs;
use async_trait::async_trait;
use tracing::debug;

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default embedding width for [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Default per-call timeout.
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(15);

/// Contract consumed by the retriever and the indexer.
///
/// Implementations must be deterministic for identical input and must use
/// the same model/version at indexing time and query time.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embeds one text into a fixed-width vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Width of the vectors produced by [`EmbeddingClient::embed`].
    fn dimension(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// OpenAI-compatible API base, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub dimension: usize,
    pub timeout: Duration,
}

impl EmbedderConfig {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_EMBEDDING_DIM,
            timeout: DEFAULT_EMBED_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }
}

/// Embedding client backed by an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    config: EmbedderConfig,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("api_base", &self.config.api_base)
            .field("model", &self.config.model)
            .field("dimension", &self.config.dimension)
            .finish()
    }
}

impl OpenAiEmbedder {
    pub fn new(config: EmbedderConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.api_base.clone())
            .with_api_key(config.api_key.clone());

        Self {
            client: Client::with_config(openai_config),
            config,
        }
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        debug!(
            model = %self.config.model,
            text_len = text.len(),
            "Requesting embedding"
        );

        let request = CreateEmbeddingRequestArgs::default()
            .model(self.config.model.clone())
            .input(text)
            .build()
            .map_err(|e| EmbeddingError::RequestFailed {
                message: e.to_string(),
            })?;

        let response = tokio::time::timeout(
            self.config.timeout,
            self.client.embeddings().create(request),
        )
        .await
        .map_err(|_| EmbeddingError::RequestFailed {
            message: format!("timed out after {:?}", self.config.timeout),
        })?
        .map_err(|e| EmbeddingError::RequestFailed {
            message: e.to_string(),
        })?;

        let vector = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyResponse)?;

        if vector.len() != self.config.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.len(),
            });
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}
