use serde::{Deserialize, Serialize};

use crate::chunking::{BBox, ExtractionType, Passage};

/// Passage metadata carried alongside every vector.
///
/// A copy of the owning [`Passage`]'s fields (plus the human-readable
/// document name) stored as point payload, so search results are
/// self-describing and no secondary lookup is needed on the read path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageMeta {
    pub document_id: String,
    /// Display name of the owning document (file name at upload time).
    pub document_name: String,
    pub text: String,
    pub page_number: u32,
    pub chunk_index: u32,
    pub bbox: Option<BBox>,
    pub extraction_type: ExtractionType,
}

/// A vector plus provenance, ready for upsert.
#[derive(Debug, Clone)]
pub struct PassagePoint {
    pub chunk_id: String,
    pub vector: Vec<f32>,
    pub meta: PassageMeta,
}

impl PassagePoint {
    pub fn from_passage(passage: &Passage, document_name: &str, vector: Vec<f32>) -> Self {
        Self {
            chunk_id: passage.chunk_id.clone(),
            vector,
            meta: PassageMeta {
                document_id: passage.document_id.clone(),
                document_name: document_name.to_string(),
                text: passage.text.clone(),
                page_number: passage.page_number,
                chunk_index: passage.chunk_index,
                bbox: passage.bbox,
                extraction_type: passage.extraction_type,
            },
        }
    }
}

/// One similarity-search hit.
///
/// `score` is cosine similarity in `[-1, 1]` for both the Qdrant backend
/// (collections are created with cosine distance) and the in-memory mock;
/// similarity thresholds are interpreted on that scale.
#[derive(Debug, Clone)]
pub struct StoreMatch {
    pub chunk_id: String,
    pub score: f32,
    pub meta: PassageMeta,
}
