//! Two-tier in-memory analysis cache.
//!
//! Tier one memoizes chunked documents keyed by (path, mtime); tier two
//! memoizes finished analyses keyed by (chunk key, query digest). The split
//! exists because chunking is query-independent and expensive (file I/O
//! plus text processing) while classification must be redone per distinct
//! query; caching chunks separately avoids re-parsing the source document
//! for every new query against the same file.
//!
//! An entry is valid if and only if recomputing the document's current
//! (path, mtime) digest yields the same key. On mismatch the stale entry is
//! evicted eagerly before the miss is reported. Failure to stat the file
//! degrades to a miss (with eviction), never a hard error.
//!
//! Both tables sit behind `std::sync::RwLock`, held only for the duration
//! of the table access itself, never across chunking or classification, so
//! unrelated documents never serialize behind one computation. Concurrent
//! identical requests may compute redundantly; the second write simply
//! overwrites the first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::{AnalysisResult, TextChunk};

struct ChunkEntry {
    path: PathBuf,
    chunks: Vec<TextChunk>,
}

struct AnalysisEntry {
    path: PathBuf,
    query_digest: String,
    result: AnalysisResult,
}

/// Entry counts for both tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub chunk_entries: usize,
    pub analysis_entries: usize,
}

/// Shared in-process cache. Methods take `&self`; wrap in `Arc` to share
/// across threads.
pub struct AnalysisCache {
    chunks: RwLock<HashMap<String, ChunkEntry>>,
    analyses: RwLock<HashMap<String, AnalysisEntry>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
            analyses: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached chunk list for `path`, or `None` on a miss or when
    /// the file's mtime no longer matches the time recorded at cache-write.
    /// Stale entries for the path are evicted before `None` is returned.
    pub fn get_chunks(&self, path: &Path) -> Option<Vec<TextChunk>> {
        let Some(key) = file_chunk_key(path) else {
            self.evict_chunks_for(path);
            return None;
        };

        {
            let table = self.chunks.read().unwrap();
            if let Some(entry) = table.get(&key) {
                return Some(entry.chunks.clone());
            }
        }

        self.evict_chunks_for(path);
        None
    }

    /// Store `chunks` under the file's current (path, mtime) key,
    /// unconditionally replacing whatever was there. A file that cannot be
    /// stat'ed cannot be keyed and is silently not cached.
    pub fn put_chunks(&self, path: &Path, chunks: Vec<TextChunk>) {
        let Some(key) = file_chunk_key(path) else {
            return;
        };

        let mut table = self.chunks.write().unwrap();
        table.retain(|_, entry| entry.path != path);
        table.insert(
            key,
            ChunkEntry {
                path: path.to_path_buf(),
                chunks,
            },
        );
    }

    /// Return the cached analysis for (path, query), with the same
    /// staleness semantics as [`get_chunks`](Self::get_chunks). An empty
    /// query is a distinct, valid key from any non-empty query.
    pub fn get_analysis(&self, path: &Path, query: &str) -> Option<AnalysisResult> {
        let digest = query_digest(query);

        let Some(chunk_key) = file_chunk_key(path) else {
            self.evict_analyses_for(path, &digest);
            return None;
        };
        let key = analysis_key(&chunk_key, &digest);

        {
            let table = self.analyses.read().unwrap();
            if let Some(entry) = table.get(&key) {
                return Some(entry.result.clone());
            }
        }

        self.evict_analyses_for(path, &digest);
        None
    }

    /// Store a finished analysis under the current composite key,
    /// unconditionally replacing whatever was there (last write wins).
    pub fn put_analysis(&self, path: &Path, query: &str, result: AnalysisResult) {
        let Some(chunk_key) = file_chunk_key(path) else {
            return;
        };
        let digest = query_digest(query);
        let key = analysis_key(&chunk_key, &digest);

        let mut table = self.analyses.write().unwrap();
        table.retain(|_, entry| !(entry.path == path && entry.query_digest == digest));
        table.insert(
            key,
            AnalysisEntry {
                path: path.to_path_buf(),
                query_digest: digest,
                result,
            },
        );
    }

    /// Empty both tables.
    pub fn clear(&self) {
        self.chunks.write().unwrap().clear();
        self.analyses.write().unwrap().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            chunk_entries: self.chunks.read().unwrap().len(),
            analysis_entries: self.analyses.read().unwrap().len(),
        }
    }

    fn evict_chunks_for(&self, path: &Path) {
        let mut table = self.chunks.write().unwrap();
        table.retain(|_, entry| entry.path != path);
    }

    fn evict_analyses_for(&self, path: &Path, query_digest: &str) {
        let mut table = self.analyses.write().unwrap();
        table.retain(|_, entry| !(entry.path == path && entry.query_digest == query_digest));
    }
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Digest combining a document's path and modification time. Keys are not
/// adversarial, so collision resistance beyond SHA-256-of-the-obvious is
/// not a goal; mtime (nanosecond precision where the platform offers it)
/// stands in for content identity.
pub fn chunk_key(path: &Path, mtime: SystemTime) -> String {
    let nanos = mtime
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i128)
        .unwrap_or_else(|e| -(e.duration().as_nanos() as i128));

    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hasher.update(b"|");
    hasher.update(nanos.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Composite key for the analysis tier.
pub fn analysis_key(chunk_key: &str, query_digest: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(chunk_key.as_bytes());
    hasher.update(b"|");
    hasher.update(query_digest.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn query_digest(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Key the file's current identity, or `None` if it cannot be stat'ed
/// (vanished mid-request, permissions). Callers treat `None` as a miss.
fn file_chunk_key(path: &Path) -> Option<String> {
    let metadata = std::fs::metadata(path).ok()?;
    let mtime = metadata.modified().ok()?;
    Some(chunk_key(path, mtime))
}
