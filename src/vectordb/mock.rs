//! In-memory vector store for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::client::VectorStore;
use super::error::VectorDbError;
use super::model::{PassagePoint, StoreMatch};
use crate::vectordb::WriteConsistency;

/// HashMap-backed store with exact cosine scoring, matching the Qdrant
/// backend's `[-1, 1]` similarity scale.
#[derive(Default)]
pub struct MockVectorStore {
    points: RwLock<HashMap<String, PassagePoint>>,
    fail_searches: RwLock<bool>,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self) -> usize {
        self.points.read().len()
    }

    pub fn contains_chunk(&self, chunk_id: &str) -> bool {
        self.points.read().contains_key(chunk_id)
    }

    /// Makes subsequent searches fail, for transient-error tests.
    pub fn set_fail_searches(&self, fail: bool) {
        *self.fail_searches.write() = fail;
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn ensure_collection(&self) -> Result<(), VectorDbError> {
        Ok(())
    }

    async fn upsert(
        &self,
        points: Vec<PassagePoint>,
        _consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        let mut store = self.points.write();
        for point in points {
            store.insert(point.chunk_id.clone(), point);
        }
        Ok(())
    }

    async fn search(
        &self,
        query: Vec<f32>,
        limit: u64,
        document_scope: Option<&[String]>,
    ) -> Result<Vec<StoreMatch>, VectorDbError> {
        if *self.fail_searches.read() {
            return Err(VectorDbError::SearchFailed {
                collection: "mock".to_string(),
                message: "mock store configured to fail".to_string(),
            });
        }

        let store = self.points.read();

        let mut results: Vec<StoreMatch> = store
            .values()
            .filter(|p| {
                document_scope.is_none_or(|scope| {
                    scope.iter().any(|id| *id == p.meta.document_id)
                })
            })
            .map(|p| StoreMatch {
                chunk_id: p.chunk_id.clone(),
                score: cosine_similarity(&query, &p.vector),
                meta: p.meta.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });

        results.truncate(limit as usize);
        Ok(results)
    }

    async fn delete_chunks(&self, chunk_ids: &[String]) -> Result<(), VectorDbError> {
        let mut store = self.points.write();
        for id in chunk_ids {
            store.remove(id);
        }
        Ok(())
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), VectorDbError> {
        let mut store = self.points.write();
        store.retain(|_, p| p.meta.document_id != document_id);
        Ok(())
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
