//! End-to-end tests for the analysis service over a real PDF corpus.
//!
//! Builds minimal valid PDFs by hand (body objects first, then an xref with
//! correct byte offsets) so pdf-extract can parse them without fixture
//! files.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use paper_lens::config::Config;
use paper_lens::models::AnalysisOutcome;
use paper_lens::service::PdfAnalysisService;

/// Build a minimal multi-page PDF with one line of text per page.
fn minimal_pdf(page_texts: &[&str]) -> Vec<u8> {
    let n = page_texts.len();
    // Object numbering: 1 catalog, 2 pages, 3 font, then per page i:
    // 4+2i page object, 5+2i content stream.
    let mut objects: Vec<String> = Vec::new();

    objects.push("1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n".to_string());

    let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
    objects.push(format!(
        "2 0 obj << /Type /Pages /Kids [{}] /Count {} >> endobj\n",
        kids.join(" "),
        n
    ));

    objects.push(
        "3 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n".to_string(),
    );

    for (i, text) in page_texts.iter().enumerate() {
        let page_num = 4 + 2 * i;
        let content_num = 5 + 2 * i;
        objects.push(format!(
            "{} 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 3 0 R >> >> >> endobj\n",
            page_num, content_num
        ));
        let stream = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET\n", text);
        objects.push(format!(
            "{} 0 obj << /Length {} >> stream\n{}endstream endobj\n",
            content_num,
            stream.len(),
            stream
        ));
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::new();
    for obj in &objects {
        offsets.push(out.len());
        out.extend_from_slice(obj.as_bytes());
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer << /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        )
        .as_bytes(),
    );
    out
}

fn write_pdf(dir: &Path, name: &str, page_texts: &[&str]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, minimal_pdf(page_texts)).unwrap();
    path
}

fn service_for(root: &Path) -> PdfAnalysisService {
    let mut config = Config::default();
    config.corpus.root = root.to_path_buf();
    PdfAnalysisService::new(config)
}

#[test]
fn empty_corpus_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let service = service_for(tmp.path());
    assert!(service.find_documents().is_empty());
    assert_eq!(service.resolve(""), None);

    let missing = service_for(&tmp.path().join("does_not_exist"));
    assert!(missing.find_documents().is_empty());
}

#[test]
fn discovery_is_recursive_and_sorted() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("sub")).unwrap();
    write_pdf(tmp.path(), "b.pdf", &["beta"]);
    write_pdf(&tmp.path().join("sub"), "a.pdf", &["alpha"]);
    fs::write(tmp.path().join("notes.txt"), "not a pdf").unwrap();

    let service = service_for(tmp.path());
    let found = service.find_documents();
    assert_eq!(found.len(), 2);
    assert!(found[0].ends_with("b.pdf"));
    assert!(found[1].ends_with("sub/a.pdf"));
}

#[test]
fn exact_match_beats_substring_on_disk() {
    let tmp = TempDir::new().unwrap();
    write_pdf(tmp.path(), "report.pdf", &["report one"]);
    write_pdf(tmp.path(), "report_v2.pdf", &["report two"]);

    let service = service_for(tmp.path());
    let resolved = service.resolve("report.pdf").unwrap();
    assert!(resolved.ends_with("report.pdf"));
    assert!(!resolved.ends_with("report_v2.pdf"));
}

#[test]
fn analyze_scores_keyword_frequency_end_to_end() {
    let tmp = TempDir::new().unwrap();
    // "architecture" appears exactly 4 times across 3 pages; no keyword of
    // any other category appears anywhere.
    write_pdf(
        tmp.path(),
        "paper.pdf",
        &[
            "The architecture is described here. The architecture spans pages.",
            "More architecture notes appear on this page.",
            "Final architecture remarks are given.",
        ],
    );

    let service = service_for(tmp.path());
    let outcome = service.analyze("paper.pdf", "");
    let result = outcome.result().expect("analysis should complete");

    assert_eq!(result.analysis_status, "completed");
    assert_eq!(result.metadata.num_pages, 3);
    assert!(result.total_chunks >= 1);

    let arch = result.category("architecture").unwrap();
    assert_eq!(arch.relevance_score, 4);
    assert!((arch.confidence - 0.4).abs() < 1e-9);
    assert_eq!(arch.keyword_matches.len(), 1);
    assert_eq!(arch.keyword_matches[0].keyword, "architecture");
    assert_eq!(arch.keyword_matches[0].count, 4);

    let method = result.category("methodology").unwrap();
    assert_eq!(method.relevance_score, 0);
    assert_eq!(method.confidence, 0.0);

    // Category order follows the configured table.
    assert_eq!(result.content_summary[0].category, "architecture");
    assert_eq!(result.content_summary.len(), 8);
}

#[test]
fn analyze_is_idempotent_and_cached() {
    let tmp = TempDir::new().unwrap();
    write_pdf(tmp.path(), "paper.pdf", &["architecture appears once here"]);

    let service = service_for(tmp.path());
    let first = service.analyze("paper.pdf", "");
    assert!(first.is_completed());
    let stats_after_first = service.cache_stats();
    assert_eq!(stats_after_first.chunk_entries, 1);
    assert_eq!(stats_after_first.analysis_entries, 1);

    let second = service.analyze("paper.pdf", "");
    // Served from cache: identical value, no recomputation observable in
    // the stats.
    assert_eq!(first, second);
    assert_eq!(service.cache_stats(), stats_after_first);
}

#[test]
fn distinct_queries_share_the_chunk_cache() {
    let tmp = TempDir::new().unwrap();
    write_pdf(tmp.path(), "paper.pdf", &["the architecture of the system"]);

    let service = service_for(tmp.path());
    assert!(service.analyze("paper.pdf", "").is_completed());
    assert!(service.analyze("paper.pdf", "architecture").is_completed());

    let stats = service.cache_stats();
    assert_eq!(stats.chunk_entries, 1, "chunking is query-independent");
    assert_eq!(stats.analysis_entries, 2, "one analysis per distinct query");
}

#[test]
fn query_analysis_reports_matching_chunks() {
    let tmp = TempDir::new().unwrap();
    write_pdf(
        tmp.path(),
        "paper.pdf",
        &["the Transformer encoder drives the predictions made here"],
    );

    let service = service_for(tmp.path());
    let outcome = service.analyze("paper.pdf", "transformer ENCODER");
    let result = outcome.result().unwrap();

    let qa = result.query_analysis.as_ref().unwrap();
    assert_eq!(qa.query, "transformer ENCODER");
    assert_eq!(qa.relevant_chunks.len(), 1);
    assert_eq!(qa.relevant_chunks[0].chunk_index, 0);

    // An empty query produces no query block at all.
    let plain = service.analyze("paper.pdf", "");
    assert!(plain.result().unwrap().query_analysis.is_none());
}

#[test]
fn rewriting_the_file_invalidates_cached_analysis() {
    let tmp = TempDir::new().unwrap();
    let path = write_pdf(tmp.path(), "paper.pdf", &["architecture mentioned once"]);

    let service = service_for(tmp.path());
    let before = service.analyze("paper.pdf", "");
    assert_eq!(
        before.result().unwrap().category("architecture").unwrap().relevance_score,
        1
    );

    std::thread::sleep(std::time::Duration::from_millis(5));
    fs::write(
        &path,
        minimal_pdf(&["architecture and architecture again, architecture thrice"]),
    )
    .unwrap();

    let after = service.analyze("paper.pdf", "");
    assert_eq!(
        after.result().unwrap().category("architecture").unwrap().relevance_score,
        3,
        "stale cached analysis must not be served after the file changed"
    );
    let stats = service.cache_stats();
    assert_eq!(stats.chunk_entries, 1);
    assert_eq!(stats.analysis_entries, 1);
}

#[test]
fn clear_cache_forces_recomputation_paths() {
    let tmp = TempDir::new().unwrap();
    write_pdf(tmp.path(), "paper.pdf", &["some architecture text"]);

    let service = service_for(tmp.path());
    assert!(service.analyze("paper.pdf", "").is_completed());
    service.clear_cache();
    let stats = service.cache_stats();
    assert_eq!(stats.chunk_entries, 0);
    assert_eq!(stats.analysis_entries, 0);

    assert!(service.analyze("paper.pdf", "").is_completed());
    assert_eq!(service.cache_stats().analysis_entries, 1);
}

#[test]
fn unresolvable_identifier_is_a_structured_error() {
    let tmp = TempDir::new().unwrap();
    write_pdf(tmp.path(), "alpha.pdf", &["alpha text"]);

    let service = service_for(tmp.path());
    let outcome = service.analyze("zzz_does_not_exist", "");
    let error = outcome.error().expect("should be a failure value");
    assert!(error.contains("zzz_does_not_exist"));
    assert!(error.contains("alpha.pdf"), "failure should list available files");
}

#[test]
fn corrupt_pdf_is_a_structured_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.pdf"), b"definitely not a pdf").unwrap();

    let service = service_for(tmp.path());
    let outcome = service.analyze("broken.pdf", "");
    assert!(outcome.error().is_some());
}

#[test]
fn metadata_is_always_recomputed() {
    let tmp = TempDir::new().unwrap();
    write_pdf(
        tmp.path(),
        "paper.pdf",
        &["first page preview text", "second page"],
    );

    let service = service_for(tmp.path());
    assert!(service.analyze("paper.pdf", "").is_completed());

    let metadata = service.extract_metadata("paper.pdf").unwrap();
    assert_eq!(metadata.num_pages, 2);
    assert!(metadata.file_size > 0);
    assert!(metadata.preview.contains("first page preview text"));

    // Metadata is not a cache tier; requesting it does not grow the cache.
    assert_eq!(service.cache_stats().analysis_entries, 1);
}

#[test]
fn results_serialize_to_a_plain_json_tree() {
    let tmp = TempDir::new().unwrap();
    write_pdf(tmp.path(), "paper.pdf", &["architecture here"]);

    let service = service_for(tmp.path());
    let outcome = service.analyze("paper.pdf", "architecture");
    let value = serde_json::to_value(&outcome).unwrap();

    assert!(value.get("content_summary").unwrap().is_object());
    assert!(value["content_summary"]["architecture"]["relevance_score"].is_number());
    assert_eq!(value["analysis_status"], "completed");
    assert!(value["metadata"]["num_pages"].is_number());
    assert!(value["query_analysis"]["relevant_chunks"].is_array());

    let failed = service.analyze("nope", "");
    let err_value = serde_json::to_value(&failed).unwrap();
    assert!(err_value.get("error").unwrap().is_string());
}

#[test]
fn content_summary_is_a_map_in_category_order() {
    let tmp = TempDir::new().unwrap();
    write_pdf(tmp.path(), "paper.pdf", &["architecture and methodology"]);

    let service = service_for(tmp.path());
    let outcome = service.analyze("paper.pdf", "");
    let json = serde_json::to_string(outcome.result().unwrap()).unwrap();

    // Keys come out as an object, in the configured enumeration order.
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["content_summary"].is_object());
    assert_eq!(value["content_summary"]["architecture"]["relevance_score"], 1);
    assert_eq!(value["content_summary"]["methodology"]["relevance_score"], 1);

    let arch = json.find("\"architecture\"").unwrap();
    let meth = json.find("\"methodology\"").unwrap();
    let results = json.find("\"results\"").unwrap();
    assert!(arch < meth && meth < results);
}

#[test]
fn outcome_shape_matches_for_failures() {
    let tmp = TempDir::new().unwrap();
    let service = service_for(tmp.path());
    match service.analyze("anything", "") {
        AnalysisOutcome::Failed { error } => {
            assert!(error.contains("no documents found"));
        }
        AnalysisOutcome::Completed(_) => panic!("empty corpus must not complete"),
    }
}
