//! Deterministic in-memory embedder for tests and examples.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{EmbeddingClient, EmbeddingError};

/// Hashed bag-of-words embedder: each lowercased token increments one
/// dimension, then the vector is L2-normalized. Texts sharing vocabulary
/// produce genuinely similar vectors, so retrieval behaves realistically
/// in tests without a model service.
pub struct MockEmbeddingClient {
    dimension: usize,
    fail: AtomicBool,
}

impl MockEmbeddingClient {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fail: AtomicBool::new(false),
        }
    }

    /// An embedder whose every call fails transiently, for error-path tests.
    pub fn failing(dimension: usize) -> Self {
        Self {
            dimension,
            fail: AtomicBool::new(true),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() % self.dimension as u64) as usize
    }
}

#[async_trait]
impl EmbeddingClient for MockEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::RequestFailed {
                message: "mock embedder configured to fail".to_string(),
            });
        }

        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let mut vector = vec![0.0f32; self.dimension];
        let lower = text.to_lowercase();
        for token in lower.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            vector[self.bucket(token)] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
