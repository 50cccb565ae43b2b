//! Core data models for Paper Lens.
//!
//! These types represent the chunks, scores, and analysis results that flow
//! through the extraction, classification, and caching pipeline. Everything
//! exposed to callers serializes to a plain JSON tree so the surrounding
//! tool layer can log it or inject it into model context verbatim.

use std::path::PathBuf;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A contiguous span of extracted document text, the unit of classification
/// input. Produced once per (document, chunking-parameters) pair and
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextChunk {
    pub content: String,
    pub source_path: PathBuf,
    /// 0-based position within the parent document.
    pub chunk_index: usize,
    /// Total number of chunks in the parent document.
    pub total_chunks: usize,
    /// 1-based page containing the chunk's first character. Page boundaries
    /// do not have to align with chunk boundaries.
    pub page: Option<usize>,
}

/// One keyword's occurrence count within a document, recorded only when the
/// count is positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub count: usize,
}

/// Classification result for one topical category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    /// Sum of keyword occurrence counts across the document's full text.
    pub relevance_score: usize,
    pub keyword_matches: Vec<KeywordMatch>,
    /// `min(relevance_score / 10.0, 1.0)`, a saturating normalization
    /// rather than a probability.
    pub confidence: f64,
}

/// A named category paired with its score. The surrounding `Vec` preserves
/// the configured category enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    #[serde(flatten)]
    pub score: CategoryScore,
}

/// Serialize the category summaries as a JSON object keyed by category
/// name, in the configured enumeration order, so consumers can index
/// `content_summary["architecture"]` directly.
fn serialize_category_map<S>(summary: &[CategorySummary], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(summary.len()))?;
    for entry in summary {
        map.serialize_entry(&entry.category, &entry.score)?;
    }
    map.end()
}

/// Positional preview of an early document section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPreview {
    pub chunk_index: usize,
    pub page: Option<usize>,
    pub preview: String,
    /// Length of the full chunk the preview was cut from.
    pub length: usize,
}

/// A chunk matching the caller's query string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMatch {
    pub chunk_index: usize,
    pub relevance_snippet: String,
}

/// Query-specific sub-analysis. Match order equals chunk order; there is no
/// relevance ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnalysis {
    pub query: String,
    pub relevant_chunks: Vec<QueryMatch>,
}

/// Basic document metadata, recomputed on every request rather than cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub file_path: PathBuf,
    pub file_size: u64,
    pub num_pages: usize,
    /// Whitespace-normalized preview of the first page.
    pub preview: String,
    /// ISO-8601 timestamp of when extraction ran.
    pub extraction_time: String,
}

/// The unit of cached value: a complete categorized analysis of one
/// document for one query. Never partially updated; always replaced
/// wholesale when the source file changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub source_file: PathBuf,
    pub metadata: DocumentMetadata,
    pub total_chunks: usize,
    /// Per-category scores, serialized as a map keyed by category name.
    #[serde(serialize_with = "serialize_category_map")]
    pub content_summary: Vec<CategorySummary>,
    pub extracted_sections: Vec<SectionPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_analysis: Option<QueryAnalysis>,
    pub analysis_status: String,
}

impl AnalysisResult {
    /// Look up one category's score by name.
    pub fn category(&self, name: &str) -> Option<&CategoryScore> {
        self.content_summary
            .iter()
            .find(|s| s.category == name)
            .map(|s| &s.score)
    }
}

/// What `analyze` hands back to the tool layer: either a completed analysis
/// or a structured error value. Failures never cross the public boundary as
/// a raised fault; callers inspect the `error` field instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Completed(AnalysisResult),
    Failed { error: String },
}

impl AnalysisOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AnalysisOutcome::Completed(_))
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Completed(r) => Some(r),
            AnalysisOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Completed(_) => None,
            AnalysisOutcome::Failed { error } => Some(error),
        }
    }
}
