//! PDF text extraction.
//!
//! Reads the document bytes and extracts per-page text in document order.
//! Extraction either runs to completion or fails outright; there is no
//! partial output. A failed file is skipped by the caller, never a crash of
//! the broader service.

use std::path::Path;

use crate::error::AnalysisError;

/// Per-page text plus the byte size of the source file.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub pages: Vec<String>,
    pub byte_size: u64,
}

impl ExtractedDocument {
    pub fn num_pages(&self) -> usize {
        self.pages.len()
    }
}

/// Extract page-level text from a PDF on disk.
pub fn extract_document(path: &Path) -> Result<ExtractedDocument, AnalysisError> {
    let bytes = std::fs::read(path).map_err(|e| {
        AnalysisError::Extraction(format!("failed to read {}: {}", path.display(), e))
    })?;

    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
        AnalysisError::Extraction(format!("failed to parse {}: {}", path.display(), e))
    })?;

    Ok(ExtractedDocument {
        pages,
        byte_size: bytes.len() as u64,
    })
}

/// Collapse runs of whitespace into single spaces and truncate to
/// `max_chars`, respecting character boundaries. Used for metadata and
/// section previews.
pub fn normalize_preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max_chars).collect()
}
