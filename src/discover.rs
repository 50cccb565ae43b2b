//! Document discovery and identifier resolution.
//!
//! Walks the corpus root for files matching the configured include globs
//! and maps caller-supplied identifiers (possibly partial filenames) onto
//! concrete paths. The corpus is re-scanned on every lookup because
//! directory contents can change between calls.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::CorpusConfig;

/// Recursively find all matching documents under the corpus root, in
/// lexicographic path order. An absent root or an empty corpus yields an
/// empty list, not an error.
pub fn find_documents(config: &CorpusConfig) -> Result<Vec<PathBuf>> {
    let root = &config.root;
    if !root.exists() {
        return Ok(Vec::new());
    }

    let include_set = build_globset(&config.include_globs)?;
    let exclude_set = build_globset(&config.exclude_globs)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            continue;
        }
        if !include_set.is_match(&rel_str) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();

    Ok(files)
}

/// Resolve an identifier against a discovered file list.
///
/// An empty identifier resolves to the first file. Otherwise three tiers
/// are tried in order, each returning its first match: exact filename,
/// case-insensitive filename substring, case-insensitive full-path
/// substring. An exact match always beats a substring match, so
/// `report.pdf` resolves to `report.pdf` even when `report_v2.pdf` also
/// exists.
pub fn resolve(identifier: &str, files: &[PathBuf]) -> Option<PathBuf> {
    if files.is_empty() {
        return None;
    }

    if identifier.is_empty() {
        return Some(files[0].clone());
    }

    // Tier 1: exact filename match
    if let Some(path) = files.iter().find(|p| file_name(p) == identifier) {
        return Some(path.clone());
    }

    let needle = identifier.to_lowercase();

    // Tier 2: filename substring match
    if let Some(path) = files
        .iter()
        .find(|p| file_name(p).to_lowercase().contains(&needle))
    {
        return Some(path.clone());
    }

    // Tier 3: full-path substring match
    files
        .iter()
        .find(|p| p.to_string_lossy().to_lowercase().contains(&needle))
        .cloned()
}

fn file_name(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
