//! Error taxonomy for document analysis.
//!
//! Failures are captured at the [`crate::service::PdfAnalysisService`]
//! boundary and folded into the returned value; nothing here is expected to
//! cross into the calling tool layer as a raised fault.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No document matched the supplied identifier, or the search root is
    /// empty. Recoverable; the caller can retry with a different identifier.
    #[error("{0}")]
    NotFound(String),

    /// The document exists but could not be read or parsed. The file is
    /// skipped; no retry.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Pure in-memory classification failed (malformed chunk metadata).
    /// Treated as a logic bug and propagated rather than swallowed.
    #[error("classification failed: {0}")]
    Classification(String),
}
