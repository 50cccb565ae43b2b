//! Keyword-frequency content classification.
//!
//! Scores a document's chunk text against the configured category table:
//! every keyword occurrence in the lowercased concatenation of all chunk
//! text counts, whole-corpus frequency rather than chunk presence. Also
//! extracts positional section previews and, when a query is supplied, a
//! chunk-order list of query matches. Pure computation, no I/O.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::models::{
    CategoryScore, CategorySummary, KeywordMatch, QueryAnalysis, QueryMatch, SectionPreview,
    TextChunk,
};

/// Relevance score at which confidence saturates to 1.0. The normalization
/// deliberately ignores document length; a 2-page and a 500-page document
/// with ten hits both saturate.
const CONFIDENCE_SATURATION: f64 = 10.0;

/// Score every configured category against the full chunk text. The output
/// preserves category enumeration order.
pub fn classify(
    chunks: &[TextChunk],
    config: &AnalysisConfig,
) -> Result<Vec<CategorySummary>, AnalysisError> {
    check_chunk_metadata(chunks)?;

    let content_text = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    Ok(config
        .categories
        .iter()
        .map(|category| {
            let mut matches = Vec::new();
            let mut relevance_score = 0usize;

            for keyword in &category.keywords {
                let count = content_text.matches(keyword.to_lowercase().as_str()).count();
                if count > 0 {
                    matches.push(KeywordMatch {
                        keyword: keyword.clone(),
                        count,
                    });
                    relevance_score += count;
                }
            }

            CategorySummary {
                category: category.name.clone(),
                score: CategoryScore {
                    relevance_score,
                    keyword_matches: matches,
                    confidence: confidence(relevance_score),
                },
            }
        })
        .collect())
}

/// `min(score / 10.0, 1.0)`. Saturating by design; see the category table
/// configuration for what feeds it.
pub fn confidence(relevance_score: usize) -> f64 {
    (relevance_score as f64 / CONFIDENCE_SATURATION).min(1.0)
}

/// Preview the first `section_scan_chunks` chunks that are long enough to
/// look like prose sections. Positional, not relevance-ranked.
pub fn extract_sections(chunks: &[TextChunk], config: &AnalysisConfig) -> Vec<SectionPreview> {
    chunks
        .iter()
        .take(config.section_scan_chunks)
        .filter(|c| c.content.len() > config.section_min_len)
        .map(|c| SectionPreview {
            chunk_index: c.chunk_index,
            page: c.page,
            preview: format!("{}...", truncate_chars(&c.content, config.section_preview_len)),
            length: c.content.len(),
        })
        .collect()
}

/// Scan every chunk for a case-insensitive substring match of the whole
/// query. Returns `None` for an empty query. Match order equals chunk
/// order.
pub fn query_analysis(
    chunks: &[TextChunk],
    query: &str,
    config: &AnalysisConfig,
) -> Option<QueryAnalysis> {
    if query.is_empty() {
        return None;
    }

    let query_lower = query.to_lowercase();
    let relevant_chunks = chunks
        .iter()
        .filter(|c| c.content.to_lowercase().contains(&query_lower))
        .map(|c| QueryMatch {
            chunk_index: c.chunk_index,
            relevance_snippet: format!(
                "{}...",
                truncate_chars(&c.content, config.query_snippet_len)
            ),
        })
        .collect();

    Some(QueryAnalysis {
        query: query.to_string(),
        relevant_chunks,
    })
}

/// Chunk metadata is produced by the chunker and should always be
/// consistent; a violation here is a logic bug, not a document problem.
fn check_chunk_metadata(chunks: &[TextChunk]) -> Result<(), AnalysisError> {
    let total = chunks.len();
    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.chunk_index != i || chunk.total_chunks != total {
            return Err(AnalysisError::Classification(format!(
                "inconsistent chunk metadata at position {}: index {}, total {} (expected {})",
                i, chunk.chunk_index, chunk.total_chunks, total
            )));
        }
    }
    Ok(())
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
