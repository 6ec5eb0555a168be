use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
    PointsIdsList, ScoredPoint, SearchPointsBuilder, UpsertPointsBuilder, Value,
    VectorParamsBuilder,
};

use super::error::VectorDbError;
use super::model::{PassageMeta, PassagePoint, StoreMatch};
use crate::chunking::{BBox, ExtractionType};
use crate::hashing::point_id_for_chunk;
use crate::vectordb::WriteConsistency;

/// Store contract consumed by the indexer and the retriever.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creates the passage collection if missing.
    async fn ensure_collection(&self) -> Result<(), VectorDbError>;

    /// Upserts passage points.
    async fn upsert(
        &self,
        points: Vec<PassagePoint>,
        consistency: WriteConsistency,
    ) -> Result<(), VectorDbError>;

    /// Searches by vector similarity, optionally restricted to a set of
    /// document ids. Results are ordered by descending similarity.
    async fn search(
        &self,
        query: Vec<f32>,
        limit: u64,
        document_scope: Option<&[String]>,
    ) -> Result<Vec<StoreMatch>, VectorDbError>;

    /// Deletes individual chunks by chunk id.
    async fn delete_chunks(&self, chunk_ids: &[String]) -> Result<(), VectorDbError>;

    /// Deletes every chunk belonging to a document.
    async fn delete_document(&self, document_id: &str) -> Result<(), VectorDbError>;
}

#[derive(Clone)]
/// Qdrant-backed passage store.
pub struct QdrantStore {
    client: Qdrant,
    url: String,
    collection: String,
    vector_size: u64,
}

impl QdrantStore {
    /// Creates a store client for `url`.
    pub async fn new(
        url: &str,
        collection: impl Into<String>,
        vector_size: u64,
    ) -> Result<Self, VectorDbError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.into(),
            vector_size,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn payload_for(point: &PassagePoint) -> HashMap<String, Value> {
        let meta = &point.meta;
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert("chunk_id".to_string(), point.chunk_id.clone().into());
        payload.insert("document_id".to_string(), meta.document_id.clone().into());
        payload.insert(
            "document_name".to_string(),
            meta.document_name.clone().into(),
        );
        payload.insert("text".to_string(), meta.text.clone().into());
        payload.insert("page_number".to_string(), (meta.page_number as i64).into());
        payload.insert("chunk_index".to_string(), (meta.chunk_index as i64).into());
        payload.insert(
            "extraction_type".to_string(),
            match meta.extraction_type {
                ExtractionType::Text => "text".to_string(),
                ExtractionType::Ocr => "ocr".to_string(),
            }
            .into(),
        );
        if let Some(bbox) = meta.bbox {
            payload.insert("bbox_x0".to_string(), (bbox.x0 as f64).into());
            payload.insert("bbox_y0".to_string(), (bbox.y0 as f64).into());
            payload.insert("bbox_x1".to_string(), (bbox.x1 as f64).into());
            payload.insert("bbox_y1".to_string(), (bbox.y1 as f64).into());
        }
        payload
    }

    fn match_from_scored_point(point: ScoredPoint) -> Option<StoreMatch> {
        let payload = point.payload;

        let chunk_id = payload.get("chunk_id")?.as_str()?.to_string();

        let bbox = match (
            payload.get("bbox_x0").and_then(|v| v.as_double()),
            payload.get("bbox_y0").and_then(|v| v.as_double()),
            payload.get("bbox_x1").and_then(|v| v.as_double()),
            payload.get("bbox_y1").and_then(|v| v.as_double()),
        ) {
            (Some(x0), Some(y0), Some(x1), Some(y1)) => Some(BBox {
                x0: x0 as f32,
                y0: y0 as f32,
                x1: x1 as f32,
                y1: y1 as f32,
            }),
            _ => None,
        };

        let meta = PassageMeta {
            document_id: payload.get("document_id")?.as_str()?.to_string(),
            document_name: payload
                .get("document_name")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_default(),
            text: payload.get("text")?.as_str()?.to_string(),
            page_number: payload.get("page_number")?.as_integer()? as u32,
            chunk_index: payload
                .get("chunk_index")
                .and_then(|v| v.as_integer())
                .unwrap_or(0) as u32,
            bbox,
            extraction_type: match payload
                .get("extraction_type")
                .and_then(|v| v.as_str())
                .map(|s| s.as_str())
            {
                Some("ocr") => ExtractionType::Ocr,
                _ => ExtractionType::Text,
            },
        };

        Some(StoreMatch {
            chunk_id,
            score: point.score,
            meta,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn ensure_collection(&self) -> Result<(), VectorDbError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        if !exists {
            let vectors_config = VectorParamsBuilder::new(self.vector_size, Distance::Cosine);

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection)
                        .vectors_config(vectors_config)
                        .on_disk_payload(true),
                )
                .await
                .map_err(|e| VectorDbError::CreateCollectionFailed {
                    collection: self.collection.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(())
    }

    async fn upsert(
        &self,
        points: Vec<PassagePoint>,
        consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        if points.is_empty() {
            return Ok(());
        }

        for point in &points {
            if point.vector.len() as u64 != self.vector_size {
                return Err(VectorDbError::InvalidDimension {
                    expected: self.vector_size as usize,
                    actual: point.vector.len(),
                });
            }
        }

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let payload = Self::payload_for(&p);
                PointStruct::new(point_id_for_chunk(&p.chunk_id), p.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(&self.collection, qdrant_points)
                    .wait(consistency.into()),
            )
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn search(
        &self,
        query: Vec<f32>,
        limit: u64,
        document_scope: Option<&[String]>,
    ) -> Result<Vec<StoreMatch>, VectorDbError> {
        let mut search_builder =
            SearchPointsBuilder::new(&self.collection, query, limit).with_payload(true);

        if let Some(scope) = document_scope {
            let conditions: Vec<Condition> = scope
                .iter()
                .map(|id| Condition::matches("document_id", id.clone()))
                .collect();
            search_builder = search_builder.filter(Filter::should(conditions));
        }

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        let results = search_result
            .result
            .into_iter()
            .filter_map(Self::match_from_scored_point)
            .collect();

        Ok(results)
    }

    async fn delete_chunks(&self, chunk_ids: &[String]) -> Result<(), VectorDbError> {
        if chunk_ids.is_empty() {
            return Ok(());
        }

        let points_selector = PointsIdsList {
            ids: chunk_ids
                .iter()
                .map(|id| point_id_for_chunk(id).into())
                .collect(),
        };

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(points_selector)
                    .wait(true),
            )
            .await
            .map_err(|e| VectorDbError::DeleteFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), VectorDbError> {
        let filter = Filter::must([Condition::matches(
            "document_id",
            document_id.to_string(),
        )]);

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(filter)
                    .wait(true),
            )
            .await
            .map_err(|e| VectorDbError::DeleteFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}
