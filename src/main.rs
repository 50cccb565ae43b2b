//! # Paper Lens CLI (`plens`)
//!
//! The `plens` binary exposes the analysis service on the command line:
//! corpus listing, identifier resolution, categorized content analysis,
//! metadata extraction, and chunk inspection.
//!
//! ## Usage
//!
//! ```bash
//! plens --config ./config/plens.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `plens list` | List all documents discovered under the corpus root |
//! | `plens resolve <identifier>` | Show which file an identifier maps to |
//! | `plens analyze [identifier]` | Run the categorized content analysis |
//! | `plens metadata [identifier]` | Extract basic document metadata |
//! | `plens chunks [identifier]` | Print a document's text chunks |
//!
//! Commands that take an identifier accept an exact filename, a partial
//! (case-insensitive) filename, or a path fragment; with no identifier the
//! first document in the corpus is used.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use paper_lens::config::{self, Config};
use paper_lens::models::AnalysisOutcome;
use paper_lens::service::PdfAnalysisService;

/// Paper Lens CLI: categorized PDF content analysis with caching.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; when the file does not exist, built-in defaults are used (corpus
/// root `./papers`, the stock research-paper category table).
#[derive(Parser)]
#[command(
    name = "plens",
    about = "Paper Lens — categorized PDF content analysis with caching",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/plens.toml")]
    config: PathBuf,

    /// Override the corpus root from the config file.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List all documents discovered under the corpus root.
    ///
    /// Output is lexicographically sorted. An absent or empty corpus
    /// prints nothing and exits successfully.
    List,

    /// Resolve an identifier to a concrete document path.
    ///
    /// Tries an exact filename match, then a case-insensitive filename
    /// substring, then a case-insensitive path substring.
    Resolve {
        /// Document identifier (filename or fragment).
        identifier: String,
    },

    /// Analyze a document's content against the category table.
    ///
    /// Prints relevance scores, confidence, keyword matches, section
    /// previews, and (with --query) matching chunks.
    Analyze {
        /// Document identifier; the first corpus document when omitted.
        #[arg(default_value = "")]
        identifier: String,

        /// Query string matched case-insensitively against every chunk.
        #[arg(long, default_value = "")]
        query: String,

        /// Print the full analysis as JSON instead of a summary table.
        #[arg(long)]
        json: bool,
    },

    /// Extract basic metadata (page count, size, preview) from a document.
    Metadata {
        /// Document identifier; the first corpus document when omitted.
        #[arg(default_value = "")]
        identifier: String,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a document's text chunks.
    Chunks {
        /// Document identifier; the first corpus document when omitted.
        #[arg(default_value = "")]
        identifier: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        Config::default()
    };
    if let Some(root) = cli.root {
        cfg.corpus.root = root;
    }

    let service = PdfAnalysisService::new(cfg);

    match cli.command {
        Commands::List => {
            for path in service.find_documents() {
                println!("{}", path.display());
            }
        }
        Commands::Resolve { identifier } => match service.resolve(&identifier) {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!("Error: no document matched '{}'", identifier);
                std::process::exit(1);
            }
        },
        Commands::Analyze {
            identifier,
            query,
            json,
        } => {
            let outcome = service.analyze(&identifier, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
            if !outcome.is_completed() {
                std::process::exit(1);
            }
        }
        Commands::Metadata { identifier, json } => match service.extract_metadata(&identifier) {
            Ok(metadata) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&metadata)?);
                } else {
                    println!("file:        {}", metadata.file_path.display());
                    println!("size:        {} bytes", metadata.file_size);
                    println!("pages:       {}", metadata.num_pages);
                    println!("extracted:   {}", metadata.extraction_time);
                    println!("preview:     {}", metadata.preview);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Chunks { identifier } => match service.chunks(&identifier) {
            Ok(chunks) => {
                if let Some(first) = chunks.first() {
                    println!("Source: {}", first.source_path.display());
                }
                for chunk in &chunks {
                    let page = chunk
                        .page
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    println!(
                        "[chunk {}/{} page {}]",
                        chunk.chunk_index, chunk.total_chunks, page
                    );
                    println!("{}", chunk.content);
                    println!();
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

/// Human-readable analysis summary, one category per row.
fn print_outcome(outcome: &AnalysisOutcome) {
    let result = match outcome {
        AnalysisOutcome::Completed(r) => r,
        AnalysisOutcome::Failed { error } => {
            eprintln!("Error: {}", error);
            return;
        }
    };

    println!("Paper Lens — Content Analysis");
    println!("=============================");
    println!();
    println!("  Source:   {}", result.source_file.display());
    println!("  Pages:    {}", result.metadata.num_pages);
    println!("  Size:     {} bytes", result.metadata.file_size);
    println!("  Chunks:   {}", result.total_chunks);
    println!();
    println!(
        "  {:<18} {:>6} {:>11}   {}",
        "CATEGORY", "SCORE", "CONFIDENCE", "KEYWORDS"
    );
    println!("  {}", "-".repeat(72));
    for summary in &result.content_summary {
        let keywords: Vec<String> = summary
            .score
            .keyword_matches
            .iter()
            .map(|m| format!("{} ({})", m.keyword, m.count))
            .collect();
        println!(
            "  {:<18} {:>6} {:>11.2}   {}",
            summary.category,
            summary.score.relevance_score,
            summary.score.confidence,
            keywords.join(", ")
        );
    }

    if !result.extracted_sections.is_empty() {
        println!();
        println!("  Sections:");
        for section in &result.extracted_sections {
            let page = section
                .page
                .map(|p| p.to_string())
                .unwrap_or_else(|| "?".to_string());
            println!(
                "  [chunk {} page {} len {}] {}",
                section.chunk_index, page, section.length, section.preview
            );
        }
    }

    if let Some(qa) = &result.query_analysis {
        println!();
        println!("  Query '{}': {} matching chunks", qa.query, qa.relevant_chunks.len());
        for m in &qa.relevant_chunks {
            println!("  [chunk {}] {}", m.chunk_index, m.relevance_snippet);
        }
    }
}
