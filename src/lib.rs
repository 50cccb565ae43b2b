//! # Paper Lens
//!
//! A local-first PDF content-analysis cache for research-paper tooling.
//!
//! Paper Lens discovers research-paper PDFs under a configured root,
//! extracts and chunks their text, scores the text against a configurable
//! category/keyword table, and memoizes both the chunked representation
//! and the finished analysis, keyed by file identity (path + mtime) and
//! query, with cross-call reuse and explicit invalidation.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌─────────────┐   ┌─────────────┐
//! │ Discovery │──▶│  Extraction  │──▶│  Chunking   │
//! │ (resolve) │   │ (pdf text)  │   │ (overlap)   │
//! └───────────┘   └─────────────┘   └──────┬──────┘
//!                                          │
//!                   ┌──────────────┐  ┌────▼────────┐
//!                   │ AnalysisCache│◀─│ Classifier  │
//!                   │ (two tiers)  │  │ (keywords)  │
//!                   └──────────────┘  └─────────────┘
//! ```
//!
//! The façade is [`service::PdfAnalysisService`]: `find_documents`,
//! `resolve`, `analyze`, `extract_metadata`, plus cache introspection.
//! Failures surface as structured values, never as faults crossing the
//! public boundary.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Error taxonomy |
//! | [`extract`] | PDF text extraction |
//! | [`chunk`] | Overlapping boundary-preferring chunker |
//! | [`classify`] | Keyword-frequency classification |
//! | [`cache`] | Two-tier in-memory cache |
//! | [`discover`] | Corpus discovery and identifier resolution |
//! | [`service`] | The analysis façade |

pub mod cache;
pub mod chunk;
pub mod classify;
pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod models;
pub mod service;

pub use cache::{AnalysisCache, CacheStats};
pub use config::Config;
pub use error::AnalysisError;
pub use models::{AnalysisOutcome, AnalysisResult, TextChunk};
pub use service::PdfAnalysisService;
