//! Overlapping boundary-preferring text chunker.
//!
//! Splits a document's extracted page text into [`TextChunk`]s of at most
//! `chunk_size` characters. Splitting prefers the coarsest boundary
//! available within the size budget (paragraph break, then line break, then
//! sentence terminator, then space) and only falls back to a hard character
//! cut when the window holds no boundary at all, so chunks are not severed
//! mid-sentence when avoidable.
//!
//! Adjacent chunks share a fixed-size overlap so that a keyword straddling
//! a chunk boundary is still visible to the classifier. Output is a pure
//! function of the input text and the chunking parameters.

use std::path::Path;

use crate::config::ChunkingConfig;
use crate::error::AnalysisError;
use crate::models::TextChunk;

/// Preferred split boundaries, coarsest first. The empty-string fallback of
/// a hard character cut is implicit.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ".", " "];

/// Separator inserted between pages when concatenating page text.
const PAGE_JOIN: &str = "\n\n";

/// Chunk a document's per-page text. Pages are concatenated in document
/// order; each chunk records the 1-based page containing its first
/// character. Fails if the document has no extractable text.
pub fn chunk_pages(
    pages: &[String],
    source_path: &Path,
    config: &ChunkingConfig,
) -> Result<Vec<TextChunk>, AnalysisError> {
    let mut text = String::new();
    let mut page_starts: Vec<(usize, usize)> = Vec::new();

    for (i, page) in pages.iter().enumerate() {
        if !text.is_empty() {
            text.push_str(PAGE_JOIN);
        }
        page_starts.push((text.len(), i + 1));
        text.push_str(page);
    }

    if text.trim().is_empty() {
        return Err(AnalysisError::Extraction(format!(
            "no extractable text in {}",
            source_path.display()
        )));
    }

    let spans = split_spans(&text, config.chunk_size, config.overlap);
    let total = spans.len();

    Ok(spans
        .into_iter()
        .enumerate()
        .map(|(index, (start, end))| TextChunk {
            content: text[start..end].to_string(),
            source_path: source_path.to_path_buf(),
            chunk_index: index,
            total_chunks: total,
            page: page_for_offset(&page_starts, start),
        })
        .collect())
}

/// Compute byte spans covering `text`. Each span is at most `chunk_size`
/// bytes, and each span after the first starts up to `overlap` bytes before
/// the end of its predecessor.
fn split_spans(text: &str, chunk_size: usize, overlap: usize) -> Vec<(usize, usize)> {
    let len = text.len();
    let mut spans = Vec::new();
    let mut start = 0usize;

    loop {
        let mut hard_end = floor_boundary(text, (start + chunk_size).min(len));
        if hard_end <= start {
            // chunk_size smaller than one character; take the next char whole
            hard_end = ceil_boundary(text, start + 1);
        }

        if hard_end >= len {
            spans.push((start, len));
            break;
        }

        let cut = find_cut(text, start, hard_end);
        spans.push((start, cut));

        let next = ceil_boundary(text, cut.saturating_sub(overlap));
        // Overlap must never stall the walk: fall forward to the cut itself
        // if backing off would revisit the current start.
        start = if next > start { next } else { cut };
    }

    spans
}

/// Pick the cut position inside `[start, hard_end)`: the latest occurrence
/// of the coarsest separator present in the window, else a hard cut at
/// `hard_end`. The cut falls after the separator so the chunk keeps its
/// terminator. A coarse boundary wins even when it leaves the chunk short.
fn find_cut(text: &str, start: usize, hard_end: usize) -> usize {
    let window = &text[start..hard_end];

    for sep in SEPARATORS {
        if let Some(pos) = window.rfind(sep) {
            return start + pos + sep.len();
        }
    }

    hard_end
}

fn page_for_offset(page_starts: &[(usize, usize)], offset: usize) -> Option<usize> {
    page_starts
        .iter()
        .rev()
        .find(|(start, _)| *start <= offset)
        .map(|(_, page)| *page)
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i.min(text.len())
}
