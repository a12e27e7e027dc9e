// End-to-end tests: corpus in, per-category term lists out.
//
// These run the whole pipeline on small corpora whose scores can be worked
// out by hand, including the JSON-lines reader and the text renderer.

use std::collections::HashSet;
use std::io::Write;

use chisel::config::RunConfig;
use chisel::contingency::counts::ContingencyCounts;
use chisel::corpus::{reader, stopwords, Document};
use chisel::error::Error;
use chisel::output::{self, OutputFormat};
use chisel::pipeline::chi_squared::{inspect, run};
use chisel::runtime::local::LocalSubstrate;
use chisel::selection::SelectionReport;

fn doc(id: &str, category: &str, text: &str) -> Document {
    Document::new(id, category, text).unwrap()
}

/// Two electronics reviews and one book review.
fn small_corpus() -> Vec<Document> {
    vec![
        doc("d1", "electronics", "alpha beta"),
        doc("d2", "electronics", "alpha"),
        doc("d3", "books", "beta gamma"),
    ]
}

fn select(documents: &[Document], k: usize) -> SelectionReport {
    let config = RunConfig::new(HashSet::new(), k);
    run(&LocalSubstrate::new(2).unwrap(), documents, &config).unwrap()
}

fn ranked(report: &SelectionReport, category: &str) -> Vec<(String, f64)> {
    report
        .category(category)
        .unwrap_or_else(|| panic!("no result for {category}"))
        .terms
        .iter()
        .map(|t| (t.term.clone(), t.score))
        .collect()
}

fn pairs(expected: &[(&str, f64)]) -> Vec<(String, f64)> {
    expected.iter().map(|(t, s)| (t.to_string(), *s)).collect()
}

// ============================================================
// Worked example
// ============================================================

#[test]
fn small_corpus_scores_by_hand() {
    let report = select(&small_corpus(), 10);

    assert_eq!(
        ranked(&report, "electronics"),
        pairs(&[("alpha", 3.0), ("beta", 0.75)])
    );
    assert_eq!(
        ranked(&report, "books"),
        pairs(&[("gamma", 3.0), ("beta", 0.75)])
    );
    assert_eq!(
        report.vocabulary.as_deref(),
        Some(&["alpha".to_string(), "beta".to_string(), "gamma".to_string()][..])
    );
    assert_eq!(report.documents, 3);
}

#[test]
fn categories_are_reported_in_order() {
    let report = select(&small_corpus(), 10);
    let names: Vec<&str> = report.categories.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, vec!["books", "electronics"]);
}

#[test]
fn perfectly_associated_term_scores_corpus_size() {
    let docs = vec![
        doc("d1", "kitchen", "kettle lid"),
        doc("d2", "kitchen", "kettle spout"),
        doc("d3", "garden", "spade lid"),
        doc("d4", "garden", "spade rake"),
    ];
    let report = select(&docs, 10);

    let kitchen = ranked(&report, "kitchen");
    assert_eq!(kitchen[0], ("kettle".to_string(), 4.0));
    let garden = ranked(&report, "garden");
    assert_eq!(garden[0], ("spade".to_string(), 4.0));
}

// ============================================================
// K boundaries
// ============================================================

#[test]
fn k_zero_reports_every_category_empty() {
    let report = select(&small_corpus(), 0);
    assert_eq!(report.categories.len(), 2);
    assert!(report.categories.iter().all(|c| c.terms.is_empty()));
}

#[test]
fn k_one_keeps_only_the_best_term() {
    let report = select(&small_corpus(), 1);
    assert_eq!(ranked(&report, "electronics"), pairs(&[("alpha", 3.0)]));
    assert_eq!(ranked(&report, "books"), pairs(&[("gamma", 3.0)]));
}

#[test]
fn k_beyond_vocabulary_keeps_every_scored_term() {
    let report = select(&small_corpus(), 75);
    assert_eq!(ranked(&report, "electronics").len(), 2);
    assert_eq!(ranked(&report, "books").len(), 2);
}

#[test]
fn vocabulary_can_be_skipped() {
    let config = RunConfig::new(HashSet::new(), 5).with_vocabulary(false);
    let report = run(&LocalSubstrate::new(1).unwrap(), &small_corpus(), &config).unwrap();
    assert!(report.vocabulary.is_none());
    assert_eq!(report.categories.len(), 2);
}

#[test]
fn empty_corpus_selects_nothing() {
    let report = select(&[], 5);
    assert!(report.categories.is_empty());
    assert_eq!(report.vocabulary, Some(Vec::new()));
}

// ============================================================
// Reading and stopwords
// ============================================================

#[test]
fn jsonl_corpus_runs_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"reviewerID": "R1", "asin": "P1", "category": "electronics", "reviewText": "Alpha beta"}}"#
    )
    .unwrap();
    writeln!(
        file,
        r#"{{"reviewerID": "R2", "asin": "P2", "category": "electronics", "reviewText": "ALPHA!"}}"#
    )
    .unwrap();
    writeln!(file, "{{not json").unwrap();
    writeln!(file).unwrap();
    writeln!(
        file,
        r#"{{"reviewerID": "R3", "asin": "P3", "category": "books", "reviewText": "beta, gamma"}}"#
    )
    .unwrap();
    // The same review delivered twice
    writeln!(
        file,
        r#"{{"reviewerID": "R3", "asin": "P3", "category": "books", "reviewText": "beta, gamma"}}"#
    )
    .unwrap();

    let read = reader::read_path(file.path()).unwrap();
    assert_eq!(read.documents.len(), 3);
    assert_eq!(read.repeated, 1);
    assert_eq!(read.rejected.len(), 1);

    let report = select(&read.documents, 10);
    assert_eq!(
        ranked(&report, "electronics"),
        pairs(&[("alpha", 3.0), ("beta", 0.75)])
    );
    assert_eq!(
        ranked(&report, "books"),
        pairs(&[("gamma", 3.0), ("beta", 0.75)])
    );
}

#[test]
fn reused_review_id_is_rejected_not_fatal() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for (reviewer, asin, category, text) in [
        ("R1", "P1", "books", "plot"),
        ("R2", "P2", "music", "plot"),
        ("R2", "P2", "books", "other"),
    ] {
        writeln!(
            file,
            r#"{{"reviewerID": "{reviewer}", "asin": "{asin}", "category": "{category}", "reviewText": "{text}"}}"#
        )
        .unwrap();
    }

    let read = reader::read_path(file.path()).unwrap();
    assert_eq!(read.documents.len(), 2);
    assert_eq!(read.rejected.len(), 1);
    assert!(matches!(
        read.rejected[0],
        Error::MalformedRecord { line: Some(3), .. }
    ));

    let report = select(&read.documents, 10);
    assert_eq!(ranked(&report, "books"), pairs(&[("plot", 0.0)]));
    assert_eq!(ranked(&report, "music"), pairs(&[("plot", 0.0)]));
}

#[test]
fn conflicting_documents_passed_directly_are_skipped() {
    let docs = vec![
        doc("R1/P1", "books", "plot"),
        doc("R2/P2", "music", "plot"),
        doc("R2/P2", "books", "other"),
    ];
    let report = select(&docs, 10);
    assert_eq!(report.categories.len(), 2);
    assert!(!report
        .vocabulary
        .unwrap()
        .iter()
        .any(|term| term == "other"));
}

#[test]
fn stopwords_never_appear_in_results() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Beta").unwrap();

    let config = RunConfig::new(stopwords::load(file.path()).unwrap(), 10);
    let report = run(&LocalSubstrate::new(2).unwrap(), &small_corpus(), &config).unwrap();

    assert_eq!(ranked(&report, "electronics"), pairs(&[("alpha", 3.0)]));
    assert_eq!(ranked(&report, "books"), pairs(&[("gamma", 3.0)]));
    assert!(!report
        .vocabulary
        .unwrap()
        .iter()
        .any(|term| term == "beta"));
}

// ============================================================
// Rendering
// ============================================================

#[test]
fn text_output_lists_categories_then_vocabulary() {
    let report = select(&small_corpus(), 10);
    let text = output::render(&report, OutputFormat::Text).unwrap();
    assert_eq!(
        text,
        "books gamma=3 beta=0.75\nelectronics alpha=3 beta=0.75\nalpha beta gamma\n"
    );
}

#[test]
fn json_output_round_trips_the_report() {
    let report = select(&small_corpus(), 10);
    let json = output::render(&report, OutputFormat::Json).unwrap();
    let parsed: SelectionReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.categories, report.categories);
    assert_eq!(parsed.vocabulary, report.vocabulary);
}

#[test]
fn report_is_written_to_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("terms.txt");
    let report = select(&small_corpus(), 1);

    output::write_report(&report, OutputFormat::Text, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("books gamma=3\n"), "{written}");
}

// ============================================================
// Inspection
// ============================================================

#[test]
fn inspect_reports_one_cell() {
    let config = RunConfig::new(HashSet::new(), 10);
    let substrate = LocalSubstrate::new(2).unwrap();

    let cell = inspect(&substrate, &small_corpus(), &config, "books", "Beta")
        .unwrap()
        .unwrap();
    assert_eq!(cell.counts, ContingencyCounts { n: 3, n_c: 1, n_t: 2, n_ct: 1 });
    assert_eq!((cell.table.a, cell.table.b, cell.table.c, cell.table.d), (1, 1, 0, 1));
    assert_eq!(cell.score, 0.75);
}

#[test]
fn inspect_missing_cell_is_none() {
    let config = RunConfig::new(HashSet::new(), 10);
    let substrate = LocalSubstrate::new(1).unwrap();

    assert!(inspect(&substrate, &small_corpus(), &config, "books", "alpha")
        .unwrap()
        .is_none());
    assert!(inspect(&substrate, &small_corpus(), &config, "toys", "beta")
        .unwrap()
        .is_none());
}
