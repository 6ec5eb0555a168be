use axum::{Json, extract::Path, extract::State};
use tracing::{info, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{DeleteResponse, HealthResponse, IngestRequest};
use crate::gateway::state::GatewayState;
use crate::pipeline::{IndexSummary, QueryRequest, QueryResponse};

#[instrument(skip(state, request))]
pub async fn query_handler(
    State(state): State<GatewayState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, GatewayError> {
    let response = state.pipeline.answer(request).await?;
    Ok(Json(response))
}

#[instrument(skip(state, request), fields(document_name = %request.document_name))]
pub async fn ingest_handler(
    State(state): State<GatewayState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IndexSummary>, GatewayError> {
    if request.document_name.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "document_name cannot be empty".to_string(),
        ));
    }
    if request.pages.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "document must contain at least one page".to_string(),
        ));
    }

    let summary = state
        .indexer
        .index_document(request.document_id, &request.document_name, &request.pages)
        .await?;

    info!(
        document_id = %summary.document_id,
        chunks = summary.chunks_indexed,
        "Ingest complete"
    );

    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn delete_document_handler(
    State(state): State<GatewayState>,
    Path(document_id): Path<String>,
) -> Result<Json<DeleteResponse>, GatewayError> {
    state.indexer.delete_document(&document_id).await?;

    Ok(Json(DeleteResponse {
        document_id,
        deleted: true,
    }))
}

pub async fn healthz_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
