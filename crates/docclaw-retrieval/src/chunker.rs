//! Overlapping-window text splitter.

use docclaw_core::error::{DocclawError, Result};

/// Splits text into fixed-size character windows with a configured overlap.
///
/// Window boundaries are measured in characters, so multi-byte input never
/// splits mid-codepoint.
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    /// Create a chunker.
    ///
    /// `chunk_size` must be positive and `chunk_overlap` strictly smaller
    /// than `chunk_size` — this keeps the window step positive, which is
    /// what guarantees termination of [`split_text`](Self::split_text).
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DocclawError::Config(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(DocclawError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split one text into ordered overlapping windows.
    ///
    /// Starting at position 0, each window covers `min(chunk_size, remaining)`
    /// characters; the start advances by `chunk_size - chunk_overlap`.
    /// Windows containing only whitespace are skipped.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            if window.chars().any(|c| !c.is_whitespace()) {
                chunks.push(window);
            }
            start += step;
        }

        chunks
    }

    /// Split several documents, preserving document order: all chunks of
    /// document *i* precede those of document *i + 1*.
    pub fn split_documents<S: AsRef<str>>(&self, documents: &[S]) -> Vec<String> {
        documents
            .iter()
            .flat_map(|doc| self.split_text(doc.as_ref()))
            .collect()
    }
}
