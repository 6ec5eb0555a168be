//! Splits extracted page text into overlapping, metadata-tagged passages.
//!
//! Passages are the unit of retrieval: each one carries full provenance
//! (document, page, position, extraction type, optional bounding box) so
//! verification can cite exact locations later. The chunker is stateless
//! and reentrant; persistence belongs to the indexing layer.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ChunkingError;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default window width in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive windows in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Provenance of extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionType {
    /// Native text layer.
    Text,
    /// Optical character recognition output.
    Ocr,
}

/// Axis-aligned rectangle in source-page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Smallest rectangle covering both inputs.
    pub fn union(self, other: BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A located run of characters on a page, in character offsets.
///
/// Span data is optional: OCR output and some text extractors cannot
/// localize characters, in which case pages ship without spans and the
/// resulting passages carry no bbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Inclusive start, character offset into the page text.
    pub start: usize,
    /// Exclusive end, character offset into the page text.
    pub end: usize,
    pub bbox: BBox,
}

/// One page of extracted text as delivered by the (external) PDF pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number.
    pub page_number: u32,
    pub text: String,
    pub extraction_type: ExtractionType,
    /// Character-level localization, when the extractor provides it.
    #[serde(default)]
    pub spans: Vec<TextSpan>,
}

/// An addressable chunk of document text with full provenance.
///
/// Immutable once emitted; deleted only when the owning document is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// `{document_id}_p{page}_c{index}`, globally unique and stable.
    pub chunk_id: String,
    pub document_id: String,
    pub text: String,
    /// 1-based source page.
    pub page_number: u32,
    /// 0-based position within this page's chunk sequence.
    pub chunk_index: u32,
    /// Union of the span rectangles this chunk covers, absent when the
    /// extraction cannot localize text.
    pub bbox: Option<BBox>,
    pub extraction_type: ExtractionType,
}

/// Window size and overlap, both in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    pub fn new(size: usize, overlap: usize) -> Self {
        Self { size, overlap }
    }

    pub fn validate(&self) -> Result<(), ChunkingError> {
        if self.size == 0 {
            return Err(ChunkingError::InvalidChunkSize { size: self.size });
        }
        if self.overlap >= self.size {
            return Err(ChunkingError::InvalidOverlap {
                overlap: self.overlap,
                size: self.size,
            });
        }
        Ok(())
    }

    fn stride(&self) -> usize {
        self.size - self.overlap
    }
}

/// Sliding-window chunker.
#[derive(Debug)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Rejects an invalid config before any page is touched.
    pub fn new(config: ChunkingConfig) -> Result<Self, ChunkingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }

    /// Chunks every page of a document, in page order.
    ///
    /// Per page the window advances by `size - overlap` characters; the
    /// final window may be shorter than `size` and is always kept when
    /// non-empty. `chunk_index` restarts at 0 on every page.
    pub fn chunk(&self, document_id: &str, pages: &[PageText]) -> Vec<Passage> {
        let mut passages = Vec::new();

        for page in pages {
            let before = passages.len();
            self.chunk_page(document_id, page, &mut passages);
            debug!(
                document_id,
                page_number = page.page_number,
                chunks = passages.len() - before,
                "Chunked page"
            );
        }

        passages
    }

    fn chunk_page(&self, document_id: &str, page: &PageText, out: &mut Vec<Passage>) {
        // Byte offset of every character, plus one-past-the-end, so char
        // windows map onto valid UTF-8 slice boundaries.
        let mut offsets: Vec<usize> = page.text.char_indices().map(|(i, _)| i).collect();
        offsets.push(page.text.len());
        let total_chars = offsets.len() - 1;

        if total_chars == 0 {
            return;
        }

        let mut chunk_index: u32 = 0;
        let mut start = 0usize;

        loop {
            let end = (start + self.config.size).min(total_chars);
            let text = &page.text[offsets[start]..offsets[end]];

            out.push(Passage {
                chunk_id: format!(
                    "{}_p{}_c{}",
                    document_id, page.page_number, chunk_index
                ),
                document_id: document_id.to_string(),
                text: text.to_string(),
                page_number: page.page_number,
                chunk_index,
                bbox: bbox_for_range(&page.spans, start, end),
                extraction_type: page.extraction_type,
            });

            chunk_index += 1;

            if start + self.config.size >= total_chars {
                break;
            }
            start += self.config.stride();
        }
    }
}

/// Union bounding box of all spans overlapping `[start, end)`, or `None`
/// when no span data covers the range.
fn bbox_for_range(spans: &[TextSpan], start: usize, end: usize) -> Option<BBox> {
    spans
        .iter()
        .filter(|span| span.start < end && span.end > start)
        .map(|span| span.bbox)
        .reduce(BBox::union)
}
