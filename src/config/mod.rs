//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `ATTEST_*` environment
//! variables. The struct is built once at startup and passed explicitly to
//! each component constructor; core logic never reads the environment.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;

use crate::chunking::ChunkingConfig;
use crate::retrieval::RetrievalConfig;
use crate::verification::{DomainDescriptor, SignalWeights, VerifierConfig};

/// Default OpenAI-compatible API base.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default Qdrant URL used when `ATTEST_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Passage collection name.
    pub collection: String,

    /// OpenAI-compatible API base for embeddings, generation, moderation.
    pub api_base: String,

    /// API key for the model endpoints.
    pub api_key: String,

    /// Embedding model name and vector width. Indexing and querying must
    /// use the same model or similarity scores are meaningless.
    pub embedding_model: String,
    pub embedding_dimension: usize,

    /// Generation model name and sampling parameters.
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,

    /// Cross-encoder rerank endpoint. When unset, the deterministic
    /// lexical rerank backend is used instead.
    pub rerank_endpoint: Option<String>,

    /// Chunking window parameters, in characters.
    pub chunk_size: usize,
    pub chunk_overlap: usize,

    /// Retrieval parameters.
    pub top_k: usize,
    pub similarity_threshold: f32,
    pub overfetch_factor: usize,

    /// Verification parameters.
    pub confidence_threshold: f32,
    pub sentence_match_threshold: f32,
    pub weight_grounding: f32,
    pub weight_consistency: f32,
    pub weight_relevance: f32,
    pub weight_domain: f32,

    /// Content moderation toggle. Default: enabled.
    pub moderation_enabled: bool,

    /// Bounded-backoff retry policy for transient dependency failures.
    pub retry_attempts: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let weights = SignalWeights::default();
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: crate::vectordb::DEFAULT_COLLECTION_NAME.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            embedding_model: crate::embedding::DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dimension: crate::embedding::DEFAULT_EMBEDDING_DIM,
            llm_model: crate::generation::DEFAULT_LLM_MODEL.to_string(),
            llm_temperature: crate::generation::DEFAULT_TEMPERATURE,
            llm_max_tokens: crate::generation::DEFAULT_MAX_TOKENS,
            rerank_endpoint: None,
            chunk_size: crate::chunking::DEFAULT_CHUNK_SIZE,
            chunk_overlap: crate::chunking::DEFAULT_CHUNK_OVERLAP,
            top_k: crate::retrieval::DEFAULT_TOP_K,
            similarity_threshold: crate::retrieval::DEFAULT_SIMILARITY_THRESHOLD,
            overfetch_factor: crate::retrieval::DEFAULT_OVERFETCH_FACTOR,
            confidence_threshold: crate::verification::DEFAULT_CONFIDENCE_THRESHOLD,
            sentence_match_threshold: crate::verification::DEFAULT_SENTENCE_MATCH_THRESHOLD,
            weight_grounding: weights.grounding,
            weight_consistency: weights.consistency,
            weight_relevance: weights.relevance,
            weight_domain: weights.domain,
            moderation_enabled: true,
            retry_attempts: 3,
            retry_base_delay_ms: 250,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "ATTEST_PORT";
    const ENV_BIND_ADDR: &'static str = "ATTEST_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "ATTEST_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "ATTEST_COLLECTION";
    const ENV_API_BASE: &'static str = "ATTEST_API_BASE";
    const ENV_API_KEY: &'static str = "ATTEST_API_KEY";
    const ENV_EMBEDDING_MODEL: &'static str = "ATTEST_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIMENSION: &'static str = "ATTEST_EMBEDDING_DIMENSION";
    const ENV_LLM_MODEL: &'static str = "ATTEST_LLM_MODEL";
    const ENV_LLM_TEMPERATURE: &'static str = "ATTEST_LLM_TEMPERATURE";
    const ENV_LLM_MAX_TOKENS: &'static str = "ATTEST_LLM_MAX_TOKENS";
    const ENV_RERANK_ENDPOINT: &'static str = "ATTEST_RERANK_ENDPOINT";
    const ENV_CHUNK_SIZE: &'static str = "ATTEST_CHUNK_SIZE";
    const ENV_CHUNK_OVERLAP: &'static str = "ATTEST_CHUNK_OVERLAP";
    const ENV_TOP_K: &'static str = "ATTEST_TOP_K";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "ATTEST_SIMILARITY_THRESHOLD";
    const ENV_OVERFETCH_FACTOR: &'static str = "ATTEST_OVERFETCH_FACTOR";
    const ENV_CONFIDENCE_THRESHOLD: &'static str = "ATTEST_CONFIDENCE_THRESHOLD";
    const ENV_SENTENCE_MATCH_THRESHOLD: &'static str = "ATTEST_SENTENCE_MATCH_THRESHOLD";
    const ENV_WEIGHT_GROUNDING: &'static str = "ATTEST_WEIGHT_GROUNDING";
    const ENV_WEIGHT_CONSISTENCY: &'static str = "ATTEST_WEIGHT_CONSISTENCY";
    const ENV_WEIGHT_RELEVANCE: &'static str = "ATTEST_WEIGHT_RELEVANCE";
    const ENV_WEIGHT_DOMAIN: &'static str = "ATTEST_WEIGHT_DOMAIN";
    const ENV_MODERATION_ENABLED: &'static str = "ATTEST_MODERATION_ENABLED";
    const ENV_RETRY_ATTEMPTS: &'static str = "ATTEST_RETRY_ATTEMPTS";
    const ENV_RETRY_BASE_DELAY_MS: &'static str = "ATTEST_RETRY_BASE_DELAY_MS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            port: Self::parse_port_from_env(defaults.port)?,
            bind_addr: Self::parse_bind_addr_from_env(defaults.bind_addr)?,
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection: Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection),
            api_base: Self::parse_string_from_env(Self::ENV_API_BASE, defaults.api_base),
            api_key: Self::parse_string_from_env(Self::ENV_API_KEY, defaults.api_key),
            embedding_model: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_MODEL,
                defaults.embedding_model,
            ),
            embedding_dimension: Self::parse_number_from_env(
                Self::ENV_EMBEDDING_DIMENSION,
                defaults.embedding_dimension,
            ),
            llm_model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model),
            llm_temperature: Self::parse_number_from_env(
                Self::ENV_LLM_TEMPERATURE,
                defaults.llm_temperature,
            ),
            llm_max_tokens: Self::parse_number_from_env(
                Self::ENV_LLM_MAX_TOKENS,
                defaults.llm_max_tokens,
            ),
            rerank_endpoint: Self::parse_optional_string_from_env(Self::ENV_RERANK_ENDPOINT),
            chunk_size: Self::parse_number_from_env(Self::ENV_CHUNK_SIZE, defaults.chunk_size),
            chunk_overlap: Self::parse_number_from_env(
                Self::ENV_CHUNK_OVERLAP,
                defaults.chunk_overlap,
            ),
            top_k: Self::parse_number_from_env(Self::ENV_TOP_K, defaults.top_k),
            similarity_threshold: Self::parse_number_from_env(
                Self::ENV_SIMILARITY_THRESHOLD,
                defaults.similarity_threshold,
            ),
            overfetch_factor: Self::parse_number_from_env(
                Self::ENV_OVERFETCH_FACTOR,
                defaults.overfetch_factor,
            ),
            confidence_threshold: Self::parse_number_from_env(
                Self::ENV_CONFIDENCE_THRESHOLD,
                defaults.confidence_threshold,
            ),
            sentence_match_threshold: Self::parse_number_from_env(
                Self::ENV_SENTENCE_MATCH_THRESHOLD,
                defaults.sentence_match_threshold,
            ),
            weight_grounding: Self::parse_number_from_env(
                Self::ENV_WEIGHT_GROUNDING,
                defaults.weight_grounding,
            ),
            weight_consistency: Self::parse_number_from_env(
                Self::ENV_WEIGHT_CONSISTENCY,
                defaults.weight_consistency,
            ),
            weight_relevance: Self::parse_number_from_env(
                Self::ENV_WEIGHT_RELEVANCE,
                defaults.weight_relevance,
            ),
            weight_domain: Self::parse_number_from_env(
                Self::ENV_WEIGHT_DOMAIN,
                defaults.weight_domain,
            ),
            moderation_enabled: Self::parse_bool_from_env(
                Self::ENV_MODERATION_ENABLED,
                defaults.moderation_enabled,
            ),
            retry_attempts: Self::parse_number_from_env(
                Self::ENV_RETRY_ATTEMPTS,
                defaults.retry_attempts,
            ),
            retry_base_delay_ms: Self::parse_number_from_env(
                Self::ENV_RETRY_BASE_DELAY_MS,
                defaults.retry_base_delay_ms,
            ),
        })
    }

    /// Validates every component's parameters without constructing anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chunking_config()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                reason: e.to_string(),
            })?;
        self.retrieval_config()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                reason: e.to_string(),
            })?;
        self.verifier_config()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn chunking_config(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)
    }

    pub fn retrieval_config(&self) -> RetrievalConfig {
        RetrievalConfig {
            top_k: self.top_k,
            similarity_threshold: self.similarity_threshold,
            overfetch_factor: self.overfetch_factor,
        }
    }

    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            confidence_threshold: self.confidence_threshold,
            sentence_match_threshold: self.sentence_match_threshold,
            weights: SignalWeights {
                grounding: self.weight_grounding,
                consistency: self.weight_consistency,
                relevance: self.weight_relevance,
                domain: self.weight_domain,
            },
            domain: DomainDescriptor::medical(),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_number_from_env<T: std::str::FromStr + Copy>(var_name: &str, default: T) -> T {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        env::var(var_name)
            .ok()
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(default)
    }
}
