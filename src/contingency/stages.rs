// Counting stages.
//
// CountStage: emit + group/dedup. Each unit (a document, or one token
// occurrence) contributes its identity under four keys: (*, *), (c, *),
// (*, t) and (c, t). Every contribution also names the cells its group
// must later be fanned out to.
//
// FanOutStage: redistribute each group's final count to its target cells,
// tagged with which count it is. Grouping by cell leaves at most four tagged
// counts per cell, which `PartialCounts::assemble` turns into the table.
//
// This is one fan-out primitive for all four counts: a key's fixed slots
// say which dimensions are held fixed, its targets say where the count goes.

use std::sync::Arc;

use super::counts::PartialCounts;
use super::key::{ContingencyKey, CountKind, TermPair};
use super::partial::{Partial, UnitId};
use super::CountUnit;
use crate::config::RunConfig;
use crate::corpus::Document;
use crate::error::{Error, Result};
use crate::runtime::traits::Stage;
use crate::text::tokenizer::{TermSet, Tokenizer};

pub struct CountStage {
    tokenizer: Tokenizer,
    count_unit: CountUnit,
}

impl CountStage {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(Arc::clone(&config.stopwords)),
            count_unit: config.count_unit,
        }
    }

    /// The counted units of a document and the terms each one carries.
    fn units(&self, document: &Document) -> Vec<(UnitId, TermSet)> {
        match self.count_unit {
            CountUnit::Document => vec![(
                UnitId::new(Arc::clone(document.id()), 0),
                self.tokenizer.tokenize(document.text()),
            )],
            CountUnit::Occurrence => self
                .tokenizer
                .tokens(document.text())
                .into_iter()
                .enumerate()
                .map(|(ordinal, token)| {
                    (
                        UnitId::new(Arc::clone(document.id()), ordinal),
                        TermSet::from([token]),
                    )
                })
                .collect(),
        }
    }
}

impl Stage for CountStage {
    type Input = Document;
    type Key = ContingencyKey;
    type Value = Partial;

    fn name(&self) -> &'static str {
        "count"
    }

    fn emit(&self, document: &Document, out: &mut Vec<(ContingencyKey, Partial)>) -> Result<()> {
        let category = document.category();

        for (unit, terms) in self.units(document) {
            let cells: Vec<TermPair> = terms
                .iter()
                .map(|term| TermPair::new(category, term.as_str()))
                .collect();

            out.push((
                ContingencyKey::total(),
                Partial::new(unit.clone(), cells.iter().cloned()),
            ));
            out.push((
                ContingencyKey::category(category),
                Partial::new(unit.clone(), cells.iter().cloned()),
            ));
            for cell in cells {
                out.push((
                    ContingencyKey::term(cell.term.as_str()),
                    Partial::new(unit.clone(), [cell.clone()]),
                ));
                out.push((ContingencyKey::from(&cell), Partial::new(unit.clone(), [cell])));
            }
        }
        Ok(())
    }

    fn merge(&self, _key: &ContingencyKey, acc: &mut Partial, incoming: Partial) -> Result<()> {
        acc.merge(incoming);
        Ok(())
    }
}

pub struct FanOutStage;

impl Stage for FanOutStage {
    type Input = (ContingencyKey, Partial);
    type Key = TermPair;
    type Value = PartialCounts;

    fn name(&self) -> &'static str {
        "fan-out"
    }

    fn emit(
        &self,
        (key, partial): &(ContingencyKey, Partial),
        out: &mut Vec<(TermPair, PartialCounts)>,
    ) -> Result<()> {
        if !key.is_well_formed() {
            return Err(Error::invariant(key.clone(), "empty category or term in key"));
        }
        let count = partial.count();
        if count == 0 {
            return Err(Error::invariant(key.clone(), "group has no units"));
        }

        let kind = key.kind();
        if kind == CountKind::Joint && partial.targets.len() != 1 {
            return Err(Error::invariant(
                key.clone(),
                format!("joint group fans out to {} cells", partial.targets.len()),
            ));
        }

        for target in &partial.targets {
            if !key.covers(target) {
                return Err(Error::invariant(
                    key.clone(),
                    format!("fan-out target {target} lies outside the key"),
                ));
            }
            out.push((target.clone(), PartialCounts::single(kind, count)));
        }
        Ok(())
    }

    fn merge(&self, pair: &TermPair, acc: &mut PartialCounts, incoming: PartialCounts) -> Result<()> {
        acc.merge(pair, incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn stage(unit: CountUnit) -> CountStage {
        CountStage::new(&RunConfig::new(HashSet::new(), 5).with_count_unit(unit))
    }

    #[test]
    fn test_document_emits_four_kinds() {
        let doc = Document::new("d1", "books", "plot twist").unwrap();
        let mut out = Vec::new();
        stage(CountUnit::Document).emit(&doc, &mut out).unwrap();

        // (*,*), (c,*), then (*,t) and (c,t) for each of two terms
        assert_eq!(out.len(), 6);
        assert_eq!(out[0].0, ContingencyKey::total());
        assert_eq!(out[0].1.targets.len(), 2);
        assert_eq!(out[1].0, ContingencyKey::category("books"));
        assert!(out.contains(&(
            ContingencyKey::joint("books", "plot"),
            Partial::new(UnitId::new(Arc::from("d1"), 0), [TermPair::new("books", "plot")]),
        )));
    }

    #[test]
    fn test_document_without_terms_still_counts_toward_marginals() {
        let doc = Document::new("d1", "books", "!!").unwrap();
        let mut out = Vec::new();
        stage(CountUnit::Document).emit(&doc, &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|(_, p)| p.targets.is_empty()));
    }

    #[test]
    fn test_occurrence_unit_emits_per_token() {
        let doc = Document::new("d1", "books", "plot plot").unwrap();
        let mut out = Vec::new();
        stage(CountUnit::Occurrence).emit(&doc, &mut out).unwrap();
        // two occurrences, four contributions each
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn test_fan_out_rejects_target_outside_key() {
        let partial = Partial::new(
            UnitId::new(Arc::from("d1"), 0),
            [TermPair::new("music", "plot")],
        );
        let mut out = Vec::new();
        let err = FanOutStage
            .emit(&(ContingencyKey::category("books"), partial), &mut out)
            .unwrap_err();
        assert!(matches!(err, Error::InvariantViolation { .. }));
    }

    #[test]
    fn test_fan_out_rejects_empty_slot() {
        let partial = Partial::new(
            UnitId::new(Arc::from("d1"), 0),
            [TermPair::new("", "plot")],
        );
        let mut out = Vec::new();
        let err = FanOutStage
            .emit(&(ContingencyKey::joint("", "plot"), partial), &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("empty category or term"), "{err}");
    }

    #[test]
    fn test_fan_out_tags_counts() {
        let mut partial = Partial::new(
            UnitId::new(Arc::from("d1"), 0),
            [TermPair::new("books", "plot")],
        );
        partial.merge(Partial::new(
            UnitId::new(Arc::from("d2"), 0),
            [TermPair::new("music", "plot")],
        ));
        let mut out = Vec::new();
        FanOutStage
            .emit(&(ContingencyKey::term("plot"), partial), &mut out)
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!(out
            .iter()
            .all(|(_, counts)| counts.get(CountKind::Term) == Some(2)));
    }
}
