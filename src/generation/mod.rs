//! Grounded answer generation via the external LLM service.
//!
//! The model is constrained by [`prompts`] to answer strictly from the
//! retrieved passages; everything else about the call is opaque. Output
//! verification happens downstream regardless of how well the model obeys.

pub mod error;
pub mod prompts;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::GenerationError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockLlm;

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::CreateChatCompletionRequest;
use async_trait::async_trait;
use tracing::debug;

use crate::retrieval::RetrievedCandidate;

/// Default generation model.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4-turbo";

/// Default sampling temperature; low because extraction should be literal.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Default per-call timeout.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Contract consumed by the query pipeline.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates an answer to `query` grounded in `passages`.
    async fn generate(
        &self,
        query: &str,
        passages: &[RetrievedCandidate],
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// OpenAI-compatible API base, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl GeneratorConfig {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// LLM client backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    config: GeneratorConfig,
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("api_base", &self.config.api_base)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
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
impl LlmClient for OpenAiGenerator {
    async fn generate(
        &self,
        query: &str,
        passages: &[RetrievedCandidate],
    ) -> Result<String, GenerationError> {
        let context = prompts::build_context(passages);
        let user_prompt = prompts::build_user_prompt(query, &context);

        debug!(
            model = %self.config.model,
            context_len = context.len(),
            passages = passages.len(),
            "Requesting grounded answer"
        );

        let request: CreateChatCompletionRequest = serde_json::from_value(serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": prompts::SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt},
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        }))
        .map_err(|e| GenerationError::RequestFailed {
            message: format!("failed to build chat request: {e}"),
        })?;

        let response = tokio::time::timeout(
            self.config.timeout,
            self.client.chat().create(request),
        )
        .await
        .map_err(|_| GenerationError::RequestFailed {
            message: format!("timed out after {:?}", self.config.timeout),
        })?
        .map_err(|e| GenerationError::RequestFailed {
            message: e.to_string(),
        })?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if answer.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        debug!(answer_len = answer.len(), "Answer generated");

        Ok(answer)
    }
}
