//! Content safety screening for queries and generated answers.
//!
//! The classifier is an external pass/fail collaborator. The gate wraps it
//! with the deployment policy: screen raw query text before retrieval and
//! the generated answer before verification, and FAIL OPEN when the
//! service itself errors: availability is deliberately favored over
//! screening coverage, and every skipped check is logged at warn level.

pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::ModerationError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockModeration;

use std::sync::Arc;
use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::moderations::CreateModerationRequestArgs;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Default per-call timeout.
pub const DEFAULT_MODERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Refusal shown when the user's query is flagged.
pub const INPUT_VIOLATION_MESSAGE: &str = "I cannot process this request because it contains \
     content that violates our usage policies. Please rephrase your question.";

/// Refusal shown when the generated answer is flagged.
pub const OUTPUT_VIOLATION_MESSAGE: &str = "The generated response was withheld because it \
     violated our usage policies. Please try rephrasing your question.";

/// Classifier verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationVerdict {
    pub flagged: bool,
    /// Names of the violated categories, empty when not flagged.
    pub categories: Vec<String>,
}

impl ModerationVerdict {
    pub fn clean() -> Self {
        Self {
            flagged: false,
            categories: Vec::new(),
        }
    }
}

/// Pass/fail classifier contract.
#[async_trait]
pub trait ModerationClient: Send + Sync {
    async fn classify(&self, text: &str) -> Result<ModerationVerdict, ModerationError>;
}

/// Which pipeline stage a screening belongs to, for logging and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationStage {
    Input,
    Output,
}

impl ModerationStage {
    pub fn violation_message(self) -> &'static str {
        match self {
            ModerationStage::Input => INPUT_VIOLATION_MESSAGE,
            ModerationStage::Output => OUTPUT_VIOLATION_MESSAGE,
        }
    }
}

/// Screening outcome after the fail-open policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    Allowed,
    Flagged(ModerationVerdict),
}

impl Screening {
    pub fn is_flagged(&self) -> bool {
        matches!(self, Screening::Flagged(_))
    }
}

/// Applies the screening policy around a [`ModerationClient`].
pub struct ModerationGate {
    client: Arc<dyn ModerationClient>,
    enabled: bool,
}

impl ModerationGate {
    pub fn new(client: Arc<dyn ModerationClient>) -> Self {
        Self {
            client,
            enabled: true,
        }
    }

    /// A gate that allows everything without calling the classifier.
    pub fn disabled(client: Arc<dyn ModerationClient>) -> Self {
        Self {
            client,
            enabled: false,
        }
    }

    /// Screens `text`; a classifier error allows the text through (fail
    /// open) and logs the skipped check.
    pub async fn screen(&self, text: &str, stage: ModerationStage) -> Screening {
        if !self.enabled || text.trim().len() < 2 {
            return Screening::Allowed;
        }

        match self.client.classify(text).await {
            Ok(verdict) if verdict.flagged => {
                warn!(?stage, categories = ?verdict.categories, "Content flagged by moderation");
                Screening::Flagged(verdict)
            }
            Ok(_) => {
                debug!(?stage, "Content passed moderation");
                Screening::Allowed
            }
            Err(e) => {
                warn!(?stage, error = %e, "Moderation unavailable, failing open");
                Screening::Allowed
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModeratorConfig {
    /// OpenAI-compatible API base, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ModeratorConfig {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_MODERATION_TIMEOUT,
        }
    }
}

/// Classifier backed by the OpenAI moderation endpoint.
pub struct OpenAiModerator {
    client: Client<OpenAIConfig>,
    config: ModeratorConfig,
}

impl std::fmt::Debug for OpenAiModerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiModerator")
            .field("api_base", &self.config.api_base)
            .finish()
    }
}

impl OpenAiModerator {
    pub fn new(config: ModeratorConfig) -> Self {
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
impl ModerationClient for OpenAiModerator {
    async fn classify(&self, text: &str) -> Result<ModerationVerdict, ModerationError> {
        let request = CreateModerationRequestArgs::default()
            .input(text)
            .build()
            .map_err(|e| ModerationError::RequestFailed {
                message: e.to_string(),
            })?;

        let response = tokio::time::timeout(
            self.config.timeout,
            self.client.moderations().create(request),
        )
        .await
        .map_err(|_| ModerationError::RequestFailed {
            message: format!("timed out after {:?}", self.config.timeout),
        })?
        .map_err(|e| ModerationError::RequestFailed {
            message: e.to_string(),
        })?;

        let result = response
            .results
            .into_iter()
            .next()
            .ok_or(ModerationError::EmptyResponse)?;

        // Category names are read from the serialized form so the verdict
        // carries the wire names ("hate/threatening", ...) regardless of
        // how the client library models them.
        let categories = serde_json::to_value(&result.categories)
            .ok()
            .and_then(|v| v.as_object().cloned())
            .map(|obj| {
                obj.into_iter()
                    .filter(|(_, set)| set.as_bool() == Some(true))
                    .map(|(name, _)| name)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ModerationVerdict {
            flagged: result.flagged,
            categories,
        })
    }
}
