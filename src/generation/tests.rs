use super::mock::MockLlm;
use super::{GenerationError, LlmClient, prompts};
use crate::chunking::ExtractionType;
use crate::retrieval::RetrievedCandidate;
use crate::vectordb::PassageMeta;

fn candidate(text: &str, document_name: &str, page: u32) -> RetrievedCandidate {
    RetrievedCandidate {
        chunk_id: format!("{document_name}_p{page}_c0"),
        similarity_score: 0.8,
        rerank_score: 0.9,
        metadata: PassageMeta {
            document_id: document_name.to_string(),
            document_name: format!("{document_name}.pdf"),
            text: text.to_string(),
            page_number: page,
            chunk_index: 0,
            bbox: None,
            extraction_type: ExtractionType::Text,
        },
    }
}

#[test]
fn context_labels_each_source_with_document_and_page() {
    let passages = vec![
        candidate("Diagnosis: Type 2 Diabetes.", "record", 1),
        candidate("Metformin 500 mg prescribed.", "record", 2),
    ];

    let context = prompts::build_context(&passages);

    assert!(context.contains("[Source 1: record.pdf (Page 1)]"));
    assert!(context.contains("[Source 2: record.pdf (Page 2)]"));
    assert!(context.contains("Diagnosis: Type 2 Diabetes."));
    assert!(context.contains("\n---\n"));
}

#[test]
fn context_skips_empty_passages() {
    let passages = vec![
        candidate("   ", "record", 1),
        candidate("Actual content.", "record", 2),
    ];

    let context = prompts::build_context(&passages);

    assert!(!context.contains("Source 1"));
    assert!(context.contains("Actual content."));
}

#[test]
fn user_prompt_embeds_query_context_and_sentinels() {
    let prompt = prompts::build_user_prompt("What is the diagnosis?", "CONTEXT BLOCK");

    assert!(prompt.contains("QUESTION: What is the diagnosis?"));
    assert!(prompt.contains("CONTEXT BLOCK"));
    assert!(prompt.contains(prompts::NOT_IN_DOCUMENTS));
    assert!(prompt.contains(prompts::OFF_TOPIC));
}

#[tokio::test]
async fn mock_returns_canned_answer() {
    let llm = MockLlm::with_answer("The diagnosis is Type 2 Diabetes.");
    let answer = llm
        .generate("query", &[candidate("whatever", "doc", 1)])
        .await
        .unwrap();
    assert_eq!(answer, "The diagnosis is Type 2 Diabetes.");
}

#[tokio::test]
async fn mock_derives_answer_from_top_passage() {
    let llm = MockLlm::new();
    let answer = llm
        .generate(
            "query",
            &[candidate("Diagnosis: Type 2 Diabetes. More text.", "doc", 1)],
        )
        .await
        .unwrap();
    assert_eq!(answer, "Diagnosis: Type 2 Diabetes.");
}

#[tokio::test]
async fn mock_without_passages_uses_sentinel() {
    let llm = MockLlm::new();
    let answer = llm.generate("query", &[]).await.unwrap();
    assert_eq!(answer, prompts::NOT_IN_DOCUMENTS);
}

#[tokio::test]
async fn failing_mock_is_transient() {
    let llm = MockLlm::failing();
    let err = llm.generate("query", &[]).await.unwrap_err();
    assert!(matches!(err, GenerationError::RequestFailed { .. }));
    assert!(err.is_transient());
}
