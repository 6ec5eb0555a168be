use super::mock::{MockVectorStore, cosine_similarity};
use super::model::{PassageMeta, PassagePoint};
use super::{VectorStore, WriteConsistency};
use crate::chunking::ExtractionType;

fn meta(document_id: &str, page: u32, text: &str) -> PassageMeta {
    PassageMeta {
        document_id: document_id.to_string(),
        document_name: format!("{document_id}.pdf"),
        text: text.to_string(),
        page_number: page,
        chunk_index: 0,
        bbox: None,
        extraction_type: ExtractionType::Text,
    }
}

fn point(chunk_id: &str, document_id: &str, vector: Vec<f32>) -> PassagePoint {
    PassagePoint {
        chunk_id: chunk_id.to_string(),
        vector,
        meta: meta(document_id, 1, "passage text"),
    }
}

#[test]
fn cosine_similarity_identical_vectors() {
    let v = vec![0.5, 0.5, 0.0];
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
}

#[test]
fn cosine_similarity_orthogonal_vectors() {
    let a = vec![1.0, 0.0];
    let b = vec![0.0, 1.0];
    assert_eq!(cosine_similarity(&a, &b), 0.0);
}

#[test]
fn cosine_similarity_opposite_vectors_is_negative() {
    let a = vec![1.0, 0.0];
    let b = vec![-1.0, 0.0];
    assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
}

#[test]
fn cosine_similarity_mismatched_lengths() {
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
}

#[tokio::test]
async fn upsert_and_search_orders_by_similarity() {
    let store = MockVectorStore::new();

    store
        .upsert(
            vec![
                point("a_p1_c0", "a", vec![1.0, 0.0]),
                point("a_p1_c1", "a", vec![0.0, 1.0]),
                point("a_p1_c2", "a", vec![0.7, 0.7]),
            ],
            WriteConsistency::Strong,
        )
        .await
        .unwrap();

    let results = store.search(vec![1.0, 0.0], 10, None).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].chunk_id, "a_p1_c0");
    assert!(results[0].score >= results[1].score);
    assert!(results[1].score >= results[2].score);
}

#[tokio::test]
async fn search_respects_limit() {
    let store = MockVectorStore::new();
    let points = (0..10)
        .map(|i| point(&format!("a_p1_c{i}"), "a", vec![1.0, i as f32 / 10.0]))
        .collect();
    store.upsert(points, WriteConsistency::Strong).await.unwrap();

    let results = store.search(vec![1.0, 0.0], 3, None).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn search_scopes_to_documents() {
    let store = MockVectorStore::new();
    store
        .upsert(
            vec![
                point("a_p1_c0", "a", vec![1.0, 0.0]),
                point("b_p1_c0", "b", vec![1.0, 0.0]),
            ],
            WriteConsistency::Strong,
        )
        .await
        .unwrap();

    let scope = vec!["b".to_string()];
    let results = store
        .search(vec![1.0, 0.0], 10, Some(&scope))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].meta.document_id, "b");
}

#[tokio::test]
async fn upsert_overwrites_same_chunk_id() {
    let store = MockVectorStore::new();
    store
        .upsert(
            vec![point("a_p1_c0", "a", vec![1.0, 0.0])],
            WriteConsistency::Strong,
        )
        .await
        .unwrap();
    store
        .upsert(
            vec![point("a_p1_c0", "a", vec![0.0, 1.0])],
            WriteConsistency::Strong,
        )
        .await
        .unwrap();

    assert_eq!(store.point_count(), 1);
}

#[tokio::test]
async fn delete_chunks_removes_points() {
    let store = MockVectorStore::new();
    store
        .upsert(
            vec![
                point("a_p1_c0", "a", vec![1.0, 0.0]),
                point("a_p1_c1", "a", vec![0.0, 1.0]),
            ],
            WriteConsistency::Strong,
        )
        .await
        .unwrap();

    store
        .delete_chunks(&["a_p1_c0".to_string()])
        .await
        .unwrap();

    assert_eq!(store.point_count(), 1);
    assert!(!store.contains_chunk("a_p1_c0"));
    assert!(store.contains_chunk("a_p1_c1"));
}

#[tokio::test]
async fn delete_document_cascades_to_all_chunks() {
    let store = MockVectorStore::new();
    store
        .upsert(
            vec![
                point("a_p1_c0", "a", vec![1.0, 0.0]),
                point("a_p2_c0", "a", vec![0.0, 1.0]),
                point("b_p1_c0", "b", vec![1.0, 1.0]),
            ],
            WriteConsistency::Strong,
        )
        .await
        .unwrap();

    store.delete_document("a").await.unwrap();

    assert_eq!(store.point_count(), 1);
    assert!(store.contains_chunk("b_p1_c0"));
}

#[tokio::test]
async fn failing_store_returns_search_error() {
    let store = MockVectorStore::new();
    store.set_fail_searches(true);

    let err = store.search(vec![1.0], 5, None).await.unwrap_err();
    assert!(err.to_string().contains("failed to search"));
}

#[test]
fn write_consistency_maps_to_wait_flag() {
    assert!(bool::from(WriteConsistency::Strong));
    assert!(!bool::from(WriteConsistency::Eventual));
}
