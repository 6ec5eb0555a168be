use serde::{Deserialize, Serialize};

use crate::chunking::PageText;

/// Body of `POST /v1/documents`.
///
/// Pages arrive pre-extracted: PDF parsing and OCR happen upstream, this
/// service only chunks, embeds, and indexes the text it is given.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Stable id to index under; generated when absent.
    #[serde(default)]
    pub document_id: Option<String>,
    pub document_name: String,
    pub pages: Vec<PageText>,
}

/// Body of `DELETE /v1/documents/{id}` responses.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub document_id: String,
    pub deleted: bool,
}

/// Body of `GET /healthz` responses.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
