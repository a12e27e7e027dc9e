// Score-and-select stage.
//
// Assembles each cell's counts, scores it, and emits the score under its
// category key as a one-entry TopK. A second key collects the vocabulary.
// Both values merge associatively (bounded top-K, set union), so the
// substrate may combine them locally before the final merge.

use std::collections::BTreeSet;

use super::top_k::{ScoredTerm, TopK};
use crate::config::RunConfig;
use crate::contingency::counts::PartialCounts;
use crate::contingency::key::{ContingencyKey, TermPair};
use crate::error::{Error, Result};
use crate::runtime::traits::Stage;
use crate::scoring::chi_squared;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SelectionKey {
    Category(String),
    Vocabulary,
}

#[derive(Debug, Clone)]
pub enum Selection {
    Ranked(TopK),
    Vocabulary(BTreeSet<String>),
}

pub struct SelectStage {
    k: usize,
    vocabulary: bool,
}

impl SelectStage {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            k: config.k,
            vocabulary: config.vocabulary,
        }
    }
}

impl Stage for SelectStage {
    type Input = (TermPair, PartialCounts);
    type Key = SelectionKey;
    type Value = Selection;

    fn name(&self) -> &'static str {
        "select"
    }

    fn emit(
        &self,
        (pair, partial): &(TermPair, PartialCounts),
        out: &mut Vec<(SelectionKey, Selection)>,
    ) -> Result<()> {
        let Some(counts) = partial.assemble(pair)? else {
            return Ok(());
        };
        let score = chi_squared::score(&counts)
            .map_err(|e| Error::invariant(ContingencyKey::from(pair), e.to_string()))?;

        out.push((
            SelectionKey::Category(pair.category.clone()),
            Selection::Ranked(TopK::single(
                self.k,
                ScoredTerm::new(pair.term.as_str(), score),
            )),
        ));
        if self.vocabulary {
            out.push((
                SelectionKey::Vocabulary,
                Selection::Vocabulary(BTreeSet::from([pair.term.clone()])),
            ));
        }
        Ok(())
    }

    fn merge(&self, key: &SelectionKey, acc: &mut Selection, incoming: Selection) -> Result<()> {
        match (acc, incoming) {
            (Selection::Ranked(acc), Selection::Ranked(incoming)) => acc.merge(incoming),
            (Selection::Vocabulary(acc), Selection::Vocabulary(incoming)) => acc.extend(incoming),
            _ => {
                let key = match key {
                    SelectionKey::Category(category) => ContingencyKey::category(category.as_str()),
                    SelectionKey::Vocabulary => ContingencyKey::total(),
                };
                return Err(Error::invariant(
                    key,
                    "ranked terms and vocabulary grouped under one key",
                ));
            }
        }
        Ok(())
    }
}
