// Chi-squared selection pipeline.
//
// Stage 1 (count):   document -> (key, unit set) grouped by ContingencyKey
// Stage 2 (fan-out): group    -> (cell, tagged count) grouped by TermPair
// Stage 3 (select):  cell     -> (category, top-K) and (vocabulary, terms)
//
// Each stage consumes the complete grouped output of the one before it; the
// substrate returning from `run_stage` is the barrier. The run configuration
// is handed to the stages that need it, and nothing else is shared.

use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::contingency::counts::{ContingencyCounts, PartialCounts};
use crate::contingency::key::{ContingencyKey, TermPair};
use crate::contingency::stages::{CountStage, FanOutStage};
use crate::corpus::{Document, DocumentIndex};
use crate::error::{Error, Result};
use crate::runtime::traits::{Grouped, Substrate};
use crate::scoring::chi_squared::ContingencyTable;
use crate::selection::stage::{SelectStage, Selection, SelectionKey};
use crate::selection::{CategoryResult, SelectionReport};

const STAGES: u64 = 3;

fn progress_bar(config: &RunConfig) -> ProgressBar {
    if !config.progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(STAGES);
    if let Ok(style) = ProgressStyle::default_bar().template("  Stages [{bar:30}] {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}

/// Drop documents that reuse an earlier document's id with a different
/// category or text. Identical repeats stay; counting unions them away.
fn consistent_documents(documents: &[Document]) -> Cow<'_, [Document]> {
    let mut index = DocumentIndex::default();
    let mut conflicting = Vec::new();
    for (position, document) in documents.iter().enumerate() {
        if let Err(e) = index.admit(document, None) {
            warn!(position, error = %e, "Skipping document with a conflicting id");
            conflicting.push(position);
        }
    }

    if conflicting.is_empty() {
        return Cow::Borrowed(documents);
    }
    Cow::Owned(
        documents
            .iter()
            .enumerate()
            .filter(|(position, _)| conflicting.binary_search(position).is_err())
            .map(|(_, document)| document.clone())
            .collect(),
    )
}

/// Run the counting stages and return the tagged counts per cell.
fn tagged_counts<S: Substrate>(
    substrate: &S,
    documents: &[Document],
    config: &RunConfig,
    pb: &ProgressBar,
) -> Result<Grouped<TermPair, PartialCounts>> {
    let documents = consistent_documents(documents);

    pb.set_message("count");
    let groups = substrate.run_stage(&CountStage::new(config), &documents[..])?;
    pb.inc(1);

    let groups: Vec<_> = groups.into_iter().collect();
    pb.set_message("fan-out");
    let cells = substrate.run_stage(&FanOutStage, &groups)?;
    pb.inc(1);

    Ok(cells)
}

/// Assembled counts for every cell whose term co-occurs with its category.
pub fn contingency_counts<S: Substrate>(
    substrate: &S,
    documents: &[Document],
    config: &RunConfig,
) -> Result<BTreeMap<TermPair, ContingencyCounts>> {
    let pb = progress_bar(config);
    let cells = tagged_counts(substrate, documents, config, &pb)?;
    pb.finish_and_clear();

    let mut assembled = BTreeMap::new();
    for (pair, partial) in cells {
        if let Some(counts) = partial.assemble(&pair)? {
            assembled.insert(pair, counts);
        }
    }
    Ok(assembled)
}

/// Counts, table and score of one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellInspection {
    pub pair: TermPair,
    pub counts: ContingencyCounts,
    pub table: ContingencyTable,
    pub score: f64,
}

/// Look up a single (category, term) cell. The term is case-folded the way
/// the tokenizer folds document text; the category must match exactly.
/// Returns `Ok(None)` when the term never occurs in the category.
pub fn inspect<S: Substrate>(
    substrate: &S,
    documents: &[Document],
    config: &RunConfig,
    category: &str,
    term: &str,
) -> Result<Option<CellInspection>> {
    let pair = TermPair::new(category, term.trim().to_ascii_lowercase());
    let counts = contingency_counts(substrate, documents, config)?;

    let Some(cell) = counts.get(&pair).copied() else {
        return Ok(None);
    };
    let table = ContingencyTable::from_counts(&cell)
        .map_err(|e| Error::invariant(ContingencyKey::from(&pair), e.to_string()))?;

    Ok(Some(CellInspection {
        score: table.chi_squared(),
        pair,
        counts: cell,
        table,
    }))
}

/// Run the full pipeline: top-K terms per category plus the vocabulary.
pub fn run<S: Substrate>(
    substrate: &S,
    documents: &[Document],
    config: &RunConfig,
) -> Result<SelectionReport> {
    info!(
        documents = documents.len(),
        k = config.k,
        count_unit = %config.count_unit,
        stopwords = config.stopwords.len(),
        "Starting chi-squared selection"
    );

    let pb = progress_bar(config);
    let cells: Vec<_> = tagged_counts(substrate, documents, config, &pb)?
        .into_iter()
        .collect();

    pb.set_message("select");
    let selected = substrate.run_stage(&SelectStage::new(config), &cells)?;
    pb.inc(1);
    pb.finish_and_clear();

    let mut categories = Vec::new();
    let mut vocabulary = config.vocabulary.then(Vec::new);
    for (key, selection) in selected {
        match (key, selection) {
            (SelectionKey::Category(category), Selection::Ranked(top)) => {
                categories.push(CategoryResult {
                    category,
                    terms: top.into_sorted_vec(),
                });
            }
            (SelectionKey::Vocabulary, Selection::Vocabulary(terms)) => {
                vocabulary = Some(terms.into_iter().collect());
            }
            (key, _) => {
                return Err(Error::invariant(
                    ContingencyKey::total(),
                    format!("selection key {key:?} holds the wrong kind of value"),
                ));
            }
        }
    }

    info!(
        categories = categories.len(),
        vocabulary = vocabulary.as_ref().map_or(0, Vec::len),
        "Selection complete"
    );

    Ok(SelectionReport {
        categories,
        vocabulary,
        k: config.k,
        count_unit: config.count_unit,
        documents: documents.len(),
        generated_at: chrono::Utc::now(),
    })
}
