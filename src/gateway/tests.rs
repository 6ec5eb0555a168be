use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use super::*;
use crate::chunking::ChunkingConfig;
use crate::embedding::MockEmbeddingClient;
use crate::generation::MockLlm;
use crate::moderation::{MockModeration, ModerationGate};
use crate::pipeline::{DocumentIndexer, QueryPipeline, RetryPolicy};
use crate::reranking::LexicalReranker;
use crate::retrieval::{RetrievalConfig, Retriever};
use crate::vectordb::MockVectorStore;
use crate::verification::{AnswerVerifier, VerifierConfig};

const DIM: usize = 256;

fn test_router(llm: MockLlm, store: Arc<MockVectorStore>) -> Router {
    let embedder = Arc::new(MockEmbeddingClient::new(DIM));

    let retriever = Retriever::new(
        embedder.clone(),
        store.clone(),
        Arc::new(LexicalReranker::new()),
        RetrievalConfig {
            similarity_threshold: 0.15,
            ..RetrievalConfig::default()
        },
    )
    .unwrap();

    let pipeline = QueryPipeline::new(
        ModerationGate::new(Arc::new(MockModeration::permissive())),
        retriever,
        Arc::new(llm),
        AnswerVerifier::new(VerifierConfig::default()).unwrap(),
        RetryPolicy::none(),
    );

    let indexer = DocumentIndexer::new(
        ChunkingConfig::default(),
        embedder,
        store,
        RetryPolicy::none(),
    )
    .unwrap();

    create_router(GatewayState::new(Arc::new(pipeline), Arc::new(indexer)))
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_reports_ok() {
    let router = test_router(MockLlm::new(), Arc::new(MockVectorStore::new()));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn ingest_then_query_round_trip() {
    let store = Arc::new(MockVectorStore::new());
    let router = test_router(
        MockLlm::with_answer("The diagnosis is Type 2 Diabetes."),
        store.clone(),
    );

    let ingest = json_request(
        "POST",
        "/v1/documents",
        serde_json::json!({
            "document_id": "record-1",
            "document_name": "record.pdf",
            "pages": [
                {
                    "page_number": 1,
                    "text": "Diagnosis: Type 2 Diabetes. Metformin 500 mg prescribed.",
                    "extraction_type": "text"
                }
            ]
        }),
    );

    let response = router.clone().oneshot(ingest).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["document_id"], "record-1");
    assert_eq!(body["chunks_indexed"], 1);
    assert_eq!(store.point_count(), 1);

    let query = json_request(
        "POST",
        "/v1/query",
        serde_json::json!({"query": "What is the diagnosis?"}),
    );

    let response = router.oneshot(query).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "answered");
    assert_eq!(body["answer"], "The diagnosis is Type 2 Diabetes.");
    assert_eq!(body["page_numbers"][0], 1);
    assert!(body["verification"]["meets_threshold"].as_bool().unwrap());
}

#[tokio::test]
async fn ingest_rejects_empty_pages() {
    let router = test_router(MockLlm::new(), Arc::new(MockVectorStore::new()));

    let request = json_request(
        "POST",
        "/v1/documents",
        serde_json::json!({
            "document_name": "empty.pdf",
            "pages": []
        }),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn empty_query_returns_bad_request() {
    let router = test_router(MockLlm::new(), Arc::new(MockVectorStore::new()));

    let request = json_request("POST", "/v1/query", serde_json::json!({"query": "  "}));

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn query_without_corpus_is_processed_not_failed() {
    let router = test_router(MockLlm::new(), Arc::new(MockVectorStore::new()));

    let request = json_request(
        "POST",
        "/v1/query",
        serde_json::json!({"query": "What is the diagnosis?"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "no_grounding");
    assert_eq!(body["confidence_score"], 0.0);
}

#[tokio::test]
async fn dependency_failure_maps_to_bad_gateway() {
    let store = Arc::new(MockVectorStore::new());
    store.set_fail_searches(true);
    let router = test_router(MockLlm::new(), store);

    let request = json_request(
        "POST",
        "/v1/query",
        serde_json::json!({"query": "What is the diagnosis?"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response_json(response).await;
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn delete_document_removes_vectors() {
    let store = Arc::new(MockVectorStore::new());
    let router = test_router(MockLlm::new(), store.clone());

    let ingest = json_request(
        "POST",
        "/v1/documents",
        serde_json::json!({
            "document_id": "gone-soon",
            "document_name": "gone.pdf",
            "pages": [
                {"page_number": 1, "text": "temporary content", "extraction_type": "text"}
            ]
        }),
    );
    router.clone().oneshot(ingest).await.unwrap();
    assert_eq!(store.point_count(), 1);

    let response = router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/documents/gone-soon")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["deleted"], true);
    assert_eq!(store.point_count(), 0);
}
