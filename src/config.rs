use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            chunking: ChunkingConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    /// Root directory searched (recursively) for documents.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./papers")
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.pdf".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Target chunk length in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters shared between adjacent chunks so keyword matches are not
    /// lost at a chunk boundary.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_overlap() -> usize {
    200
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// How many leading chunks are scanned for section previews.
    #[serde(default = "default_section_scan_chunks")]
    pub section_scan_chunks: usize,
    /// Minimum chunk length for a section preview to be emitted.
    #[serde(default = "default_section_min_len")]
    pub section_min_len: usize,
    #[serde(default = "default_section_preview_len")]
    pub section_preview_len: usize,
    /// Snippet length for query-match previews.
    #[serde(default = "default_query_snippet_len")]
    pub query_snippet_len: usize,
    /// Preview length for document metadata.
    #[serde(default = "default_metadata_preview_len")]
    pub metadata_preview_len: usize,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            section_scan_chunks: default_section_scan_chunks(),
            section_min_len: default_section_min_len(),
            section_preview_len: default_section_preview_len(),
            query_snippet_len: default_query_snippet_len(),
            metadata_preview_len: default_metadata_preview_len(),
            categories: default_categories(),
        }
    }
}

fn default_section_scan_chunks() -> usize {
    10
}

fn default_section_min_len() -> usize {
    200
}

fn default_section_preview_len() -> usize {
    200
}

fn default_query_snippet_len() -> usize {
    300
}

fn default_metadata_preview_len() -> usize {
    300
}

/// A named topical bucket with its keyword set. Keywords are matched as
/// case-insensitive substrings over the whole document text.
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

/// The stock category table for research-paper analysis. Enumeration order
/// here fixes the order of `content_summary` in every result.
fn default_categories() -> Vec<CategoryConfig> {
    let table: &[(&str, &[&str])] = &[
        (
            "architecture",
            &[
                "architecture",
                "model",
                "framework",
                "structure",
                "design",
                "network",
                "layer",
            ],
        ),
        (
            "methodology",
            &[
                "method",
                "approach",
                "algorithm",
                "technique",
                "procedure",
                "pipeline",
            ],
        ),
        (
            "preprocessing",
            &[
                "preprocessing",
                "preprocess",
                "data preparation",
                "cleaning",
                "normalization",
                "feature",
            ],
        ),
        (
            "hyperparameters",
            &[
                "hyperparameter",
                "parameter",
                "learning rate",
                "batch size",
                "epoch",
                "optimizer",
            ],
        ),
        (
            "dependencies",
            &[
                "import",
                "library",
                "package",
                "requirement",
                "dependency",
                "framework",
            ],
        ),
        (
            "implementation",
            &["code", "implementation", "function", "class", "module", "script"],
        ),
        (
            "evaluation",
            &[
                "evaluation",
                "metrics",
                "performance",
                "accuracy",
                "validation",
                "testing",
            ],
        ),
        (
            "results",
            &[
                "results",
                "findings",
                "conclusion",
                "outcome",
                "performance",
                "benchmark",
            ],
        ),
    ];

    table
        .iter()
        .map(|(name, keywords)| CategoryConfig {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;

    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }

    if config.chunking.overlap >= config.chunking.chunk_size {
        anyhow::bail!("chunking.overlap must be smaller than chunking.chunk_size");
    }

    if config.corpus.include_globs.is_empty() {
        anyhow::bail!("corpus.include_globs must not be empty");
    }

    if config.analysis.categories.is_empty() {
        anyhow::bail!("analysis.categories must not be empty");
    }

    for category in &config.analysis.categories {
        if category.name.trim().is_empty() {
            anyhow::bail!("analysis.categories entries must have a name");
        }
        if category.keywords.iter().any(|k| k.trim().is_empty()) {
            anyhow::bail!(
                "category '{}' contains an empty keyword",
                category.name
            );
        }
    }

    Ok(())
}
