//! Canned-answer LLM for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{GenerationError, LlmClient, prompts};
use crate::retrieval::RetrievedCandidate;
use crate::text;

/// Returns a fixed answer when configured with one, otherwise echoes the
/// first sentence of the top passage, enough for pipeline tests to get a
/// grounded answer without a model.
#[derive(Default)]
pub struct MockLlm {
    canned: Option<String>,
    fail: AtomicBool,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(answer: impl Into<String>) -> Self {
        Self {
            canned: Some(answer.into()),
            fail: AtomicBool::new(false),
        }
    }

    /// An LLM whose every call fails transiently.
    pub fn failing() -> Self {
        Self {
            canned: None,
            fail: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(
        &self,
        _query: &str,
        passages: &[RetrievedCandidate],
    ) -> Result<String, GenerationError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GenerationError::RequestFailed {
                message: "mock llm configured to fail".to_string(),
            });
        }

        if let Some(answer) = &self.canned {
            return Ok(answer.clone());
        }

        let first_sentence = passages
            .first()
            .and_then(|p| text::split_sentences(&p.metadata.text).into_iter().next());

        Ok(first_sentence.unwrap_or_else(|| prompts::NOT_IN_DOCUMENTS.to_string()))
    }
}
