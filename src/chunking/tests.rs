use super::*;

fn page(number: u32, text: &str) -> PageText {
    PageText {
        page_number: number,
        text: text.to_string(),
        extraction_type: ExtractionType::Text,
        spans: Vec::new(),
    }
}

fn chunker(size: usize, overlap: usize) -> Chunker {
    Chunker::new(ChunkingConfig::new(size, overlap)).unwrap()
}

#[test]
fn rejects_zero_size() {
    let err = Chunker::new(ChunkingConfig::new(0, 0)).unwrap_err();
    assert!(matches!(err, ChunkingError::InvalidChunkSize { size: 0 }));
}

#[test]
fn rejects_overlap_equal_to_size() {
    let err = Chunker::new(ChunkingConfig::new(100, 100)).unwrap_err();
    assert!(matches!(
        err,
        ChunkingError::InvalidOverlap {
            overlap: 100,
            size: 100
        }
    ));
}

#[test]
fn rejects_overlap_larger_than_size() {
    assert!(Chunker::new(ChunkingConfig::new(10, 50)).is_err());
}

#[test]
fn short_page_yields_single_chunk() {
    let passages = chunker(500, 100).chunk("doc", &[page(1, "short text")]);

    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].text, "short text");
    assert_eq!(passages[0].chunk_id, "doc_p1_c0");
    assert_eq!(passages[0].chunk_index, 0);
    assert_eq!(passages[0].page_number, 1);
}

#[test]
fn empty_page_yields_no_chunks() {
    let passages = chunker(500, 100).chunk("doc", &[page(1, "")]);
    assert!(passages.is_empty());
}

#[test]
fn windows_advance_by_stride_and_keep_tail() {
    // 10 chars, size 5, overlap 2 -> stride 3 -> [0..5), [3..8), [6..10)
    let passages = chunker(5, 2).chunk("doc", &[page(1, "abcdefghij")]);

    let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["abcde", "defgh", "ghij"]);
}

#[test]
fn chunk_count_matches_window_arithmetic() {
    // count = ceil((len - overlap) / (size - overlap))
    for (len, size, overlap) in [(10, 5, 2), (100, 30, 10), (500, 500, 0), (7, 3, 1)] {
        let text: String = "x".repeat(len);
        let passages = chunker(size, overlap).chunk("doc", &[page(1, &text)]);
        let expected = (len - overlap).div_ceil(size - overlap);
        assert_eq!(passages.len(), expected, "len={len} size={size} overlap={overlap}");
    }
}

#[test]
fn non_overlapping_portions_reconstruct_original() {
    let text = "The quick brown fox jumps over the lazy dog repeatedly until dusk";
    let passages = chunker(20, 7).chunk("doc", &[page(1, text)]);

    // Every chunk after the first repeats exactly `overlap` characters of
    // its predecessor; dropping them reassembles the page verbatim.
    let mut rebuilt = String::new();
    for (i, passage) in passages.iter().enumerate() {
        if i == 0 {
            rebuilt.push_str(&passage.text);
        } else {
            rebuilt.extend(passage.text.chars().skip(7));
        }
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn chunk_index_contiguous_per_page() {
    let long = "a".repeat(1200);
    let pages = [page(1, &long), page(2, &long)];
    let passages = chunker(500, 100).chunk("doc", &pages);

    for page_number in [1, 2] {
        let indices: Vec<u32> = passages
            .iter()
            .filter(|p| p.page_number == page_number)
            .map(|p| p.chunk_index)
            .collect();
        let expected: Vec<u32> = (0..indices.len() as u32).collect();
        assert_eq!(indices, expected);
        assert!(passages
            .iter()
            .filter(|p| p.page_number == page_number)
            .all(|p| p.page_number >= 1));
    }
}

#[test]
fn chunk_ids_encode_document_page_and_index() {
    let long = "a".repeat(800);
    let passages = chunker(500, 100).chunk("report-7", &[page(3, &long)]);

    assert_eq!(passages[0].chunk_id, "report-7_p3_c0");
    assert_eq!(passages[1].chunk_id, "report-7_p3_c1");
}

#[test]
fn multibyte_text_splits_on_char_boundaries() {
    let text = "μεταφορά δεδομένων από ιατρικό φάκελο ασθενούς";
    let passages = chunker(10, 3).chunk("doc", &[page(1, text)]);

    assert!(!passages.is_empty());
    for passage in &passages {
        assert!(passage.text.chars().count() <= 10);
        assert!(!passage.text.is_empty());
    }
}

#[test]
fn inherits_extraction_type() {
    let mut p = page(1, "scanned content here");
    p.extraction_type = ExtractionType::Ocr;
    let passages = chunker(500, 100).chunk("doc", &[p]);
    assert_eq!(passages[0].extraction_type, ExtractionType::Ocr);
}

#[test]
fn bbox_is_union_of_overlapping_spans() {
    let mut p = page(1, "abcdefghij");
    p.spans = vec![
        TextSpan {
            start: 0,
            end: 5,
            bbox: BBox {
                x0: 10.0,
                y0: 10.0,
                x1: 50.0,
                y1: 20.0,
            },
        },
        TextSpan {
            start: 5,
            end: 10,
            bbox: BBox {
                x0: 10.0,
                y0: 22.0,
                x1: 80.0,
                y1: 32.0,
            },
        },
    ];

    let passages = chunker(8, 2).chunk("doc", &[p]);

    // First window [0..8) covers both spans.
    let bbox = passages[0].bbox.unwrap();
    assert_eq!(bbox.x0, 10.0);
    assert_eq!(bbox.y0, 10.0);
    assert_eq!(bbox.x1, 80.0);
    assert_eq!(bbox.y1, 32.0);
}

#[test]
fn bbox_absent_without_span_data() {
    let passages = chunker(500, 100).chunk("doc", &[page(1, "no spans")]);
    assert!(passages[0].bbox.is_none());
}
