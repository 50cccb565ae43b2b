//! The analysis façade used by the surrounding tool layer.
//!
//! Coordinates discovery, resolution, extraction, chunking, classification,
//! and the two-tier cache. Every document-specific failure is captured here
//! and folded into the returned [`AnalysisOutcome`]; calling agents inspect
//! an error string instead of handling a raised fault.
//!
//! Methods take `&self` and the service is safe to share across threads
//! (wrap in `Arc`); the cache locks are never held across the slow
//! extraction and classification work.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::cache::{AnalysisCache, CacheStats};
use crate::chunk::chunk_pages;
use crate::classify::{classify, extract_sections, query_analysis};
use crate::config::Config;
use crate::discover;
use crate::error::AnalysisError;
use crate::extract::{extract_document, normalize_preview};
use crate::models::{
    AnalysisOutcome, AnalysisResult, DocumentMetadata, TextChunk,
};

pub struct PdfAnalysisService {
    config: Config,
    cache: AnalysisCache,
}

impl PdfAnalysisService {
    /// Construct a service with its own cache. Build one per process and
    /// share it; the cache contract assumes a single shared instance.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache: AnalysisCache::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All matching documents under the corpus root, lexicographically
    /// sorted. Re-scans on every call; an absent root is an empty corpus.
    pub fn find_documents(&self) -> Vec<PathBuf> {
        discover::find_documents(&self.config.corpus).unwrap_or_default()
    }

    /// Map an identifier (possibly empty, possibly a partial filename) to a
    /// concrete path. See [`discover::resolve`] for the tier order.
    pub fn resolve(&self, identifier: &str) -> Option<PathBuf> {
        discover::resolve(identifier, &self.find_documents())
    }

    /// Analyze a document: resolve, consult the cache, and on a miss chunk,
    /// classify, and store. Returns a structured value in all cases.
    pub fn analyze(&self, identifier: &str, query: &str) -> AnalysisOutcome {
        let path = match self.resolve(identifier) {
            Some(path) => path,
            None => {
                return AnalysisOutcome::Failed {
                    error: self.not_found_message(identifier),
                }
            }
        };

        if let Some(hit) = self.cache.get_analysis(&path, query) {
            return AnalysisOutcome::Completed(hit);
        }

        match self.compute_analysis(&path, query) {
            Ok(result) => {
                self.cache.put_analysis(&path, query, result.clone());
                AnalysisOutcome::Completed(result)
            }
            Err(e) => AnalysisOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    /// Basic metadata for a document. Always recomputed; metadata and
    /// cached analysis are independent facets.
    pub fn extract_metadata(&self, identifier: &str) -> Result<DocumentMetadata, AnalysisError> {
        let path = self
            .resolve(identifier)
            .ok_or_else(|| AnalysisError::NotFound(self.not_found_message(identifier)))?;
        self.metadata_for(&path)
    }

    /// The document's chunk list, served from the chunk cache when the file
    /// is unchanged.
    pub fn chunks(&self, identifier: &str) -> Result<Vec<TextChunk>, AnalysisError> {
        let path = self
            .resolve(identifier)
            .ok_or_else(|| AnalysisError::NotFound(self.not_found_message(identifier)))?;
        self.chunks_for(&path)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn compute_analysis(&self, path: &Path, query: &str) -> Result<AnalysisResult, AnalysisError> {
        let metadata = self.metadata_for(path)?;
        let chunks = self.chunks_for(path)?;

        let content_summary = classify(&chunks, &self.config.analysis)?;
        let extracted_sections = extract_sections(&chunks, &self.config.analysis);
        let query_analysis = query_analysis(&chunks, query, &self.config.analysis);

        Ok(AnalysisResult {
            source_file: path.to_path_buf(),
            metadata,
            total_chunks: chunks.len(),
            content_summary,
            extracted_sections,
            query_analysis,
            analysis_status: "completed".to_string(),
        })
    }

    fn chunks_for(&self, path: &Path) -> Result<Vec<TextChunk>, AnalysisError> {
        if let Some(chunks) = self.cache.get_chunks(path) {
            return Ok(chunks);
        }

        let document = extract_document(path)?;
        let chunks = chunk_pages(&document.pages, path, &self.config.chunking)?;
        self.cache.put_chunks(path, chunks.clone());
        Ok(chunks)
    }

    fn metadata_for(&self, path: &Path) -> Result<DocumentMetadata, AnalysisError> {
        let document = extract_document(path)?;
        let preview = document
            .pages
            .first()
            .map(|page| normalize_preview(page, self.config.analysis.metadata_preview_len))
            .unwrap_or_default();

        Ok(DocumentMetadata {
            file_path: path.to_path_buf(),
            file_size: document.byte_size,
            num_pages: document.num_pages(),
            preview,
            extraction_time: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
        })
    }

    fn not_found_message(&self, identifier: &str) -> String {
        let available = self.find_documents();
        if available.is_empty() {
            return format!(
                "no documents found under {}",
                self.config.corpus.root.display()
            );
        }

        let names: Vec<String> = available
            .iter()
            .take(5)
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect();
        let suffix = if available.len() > 5 { ", ..." } else { "" };

        format!(
            "no document matched '{}'. Available: {}{}",
            identifier,
            names.join(", "),
            suffix
        )
    }
}
