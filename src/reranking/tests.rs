use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{
    HttpReranker, HttpRerankerConfig, LexicalReranker, RerankClient, RerankError,
};

#[tokio::test]
async fn lexical_scores_are_in_unit_range() {
    let reranker = LexicalReranker::new();

    for (query, passage) in [
        ("what is the diagnosis", "Diagnosis: Type 2 Diabetes"),
        ("", "anything"),
        ("the a of", "stop words only query"),
        ("unrelated", "completely different content"),
    ] {
        let score = reranker.score(query, passage).await.unwrap();
        assert!((0.0..=1.0).contains(&score), "{query:?} -> {score}");
    }
}

#[tokio::test]
async fn lexical_relevant_passage_outscores_irrelevant() {
    let reranker = LexicalReranker::new();

    let relevant = reranker
        .score(
            "what medication was prescribed",
            "The patient was prescribed metformin medication twice daily",
        )
        .await
        .unwrap();
    let irrelevant = reranker
        .score(
            "what medication was prescribed",
            "The weather on admission day was sunny",
        )
        .await
        .unwrap();

    assert!(relevant > irrelevant);
}

#[tokio::test]
async fn lexical_scoring_is_deterministic() {
    let reranker = LexicalReranker::new();
    let a = reranker.score("query text", "candidate passage").await.unwrap();
    let b = reranker.score("query text", "candidate passage").await.unwrap();
    assert_eq!(a, b);
}

#[test]
fn http_config_rejects_empty_endpoint() {
    let err = HttpReranker::new(HttpRerankerConfig::new("")).unwrap_err();
    assert!(matches!(err, RerankError::InvalidConfig { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn http_reranker_parses_tei_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rerank"))
        .and(body_partial_json(serde_json::json!({
            "query": "what is the diagnosis"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"index": 0, "score": 0.92}])),
        )
        .mount(&server)
        .await;

    let reranker =
        HttpReranker::new(HttpRerankerConfig::new(format!("{}/rerank", server.uri()))).unwrap();

    let score = reranker
        .score("what is the diagnosis", "Diagnosis: Type 2 Diabetes")
        .await
        .unwrap();

    assert_eq!(score, 0.92);
}

#[tokio::test]
async fn http_reranker_propagates_server_errors_as_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rerank"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let reranker =
        HttpReranker::new(HttpRerankerConfig::new(format!("{}/rerank", server.uri()))).unwrap();

    let err = reranker.score("query", "passage").await.unwrap_err();
    assert!(matches!(err, RerankError::RequestFailed { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn http_reranker_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rerank"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let reranker =
        HttpReranker::new(HttpRerankerConfig::new(format!("{}/rerank", server.uri()))).unwrap();

    let err = reranker.score("query", "passage").await.unwrap_err();
    assert!(matches!(err, RerankError::MalformedResponse { .. }));
}

#[tokio::test]
async fn http_reranker_rejects_missing_score() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rerank"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let reranker =
        HttpReranker::new(HttpRerankerConfig::new(format!("{}/rerank", server.uri()))).unwrap();

    let err = reranker.score("query", "passage").await.unwrap_err();
    assert!(matches!(err, RerankError::MalformedResponse { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_transient() {
    let reranker =
        HttpReranker::new(HttpRerankerConfig::new("http://127.0.0.1:1/rerank")).unwrap();

    let err = reranker.score("query", "passage").await.unwrap_err();
    assert!(err.is_transient());
}
