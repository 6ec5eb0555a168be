//! Term-list moderation classifier for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{ModerationClient, ModerationError, ModerationVerdict};

/// Flags any text containing one of the configured terms.
#[derive(Default)]
pub struct MockModeration {
    flagged_terms: Vec<String>,
    fail: AtomicBool,
}

impl MockModeration {
    /// A classifier that never flags anything.
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn with_flagged_terms(terms: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            flagged_terms: terms.into_iter().map(|t| t.into().to_lowercase()).collect(),
            fail: AtomicBool::new(false),
        }
    }

    /// A classifier whose every call fails, to exercise fail-open handling.
    pub fn failing() -> Self {
        Self {
            flagged_terms: Vec::new(),
            fail: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl ModerationClient for MockModeration {
    async fn classify(&self, text: &str) -> Result<ModerationVerdict, ModerationError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ModerationError::RequestFailed {
                message: "mock moderation configured to fail".to_string(),
            });
        }

        let lower = text.to_lowercase();
        let hit = self.flagged_terms.iter().any(|t| lower.contains(t));

        if hit {
            Ok(ModerationVerdict {
                flagged: true,
                categories: vec!["harassment".to_string()],
            })
        } else {
            Ok(ModerationVerdict::clean())
        }
    }
}
