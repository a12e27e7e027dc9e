// Bounded top-K selection.
//
// Keeps at most K entries in an ordered set whose first element is always the
// weakest. Offering a term inserts it and evicts the weakest when over
// capacity, so memory per category is bounded by K no matter how large the
// vocabulary is.
//
// Merging two selections is just offering one into the other. Because the
// order is total (score descending, then term ascending) and re-offering an
// identical entry is a no-op, top-K over the union of two top-K'd subsets
// equals top-K over the full set, and a re-delivered entry changes nothing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A term and its score within one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
}

impl ScoredTerm {
    pub fn new(term: impl Into<String>, score: f64) -> Self {
        Self {
            term: term.into(),
            score,
        }
    }
}

/// Ordering wrapper: greater means better.
#[derive(Debug, Clone)]
struct Ranked(ScoredTerm);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .score
            .total_cmp(&other.0.score)
            .then_with(|| other.0.term.cmp(&self.0.term))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

#[derive(Debug, Clone)]
pub struct TopK {
    k: usize,
    kept: BTreeSet<Ranked>,
}

impl TopK {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            kept: BTreeSet::new(),
        }
    }

    pub fn single(k: usize, term: ScoredTerm) -> Self {
        let mut top = Self::new(k);
        top.offer(term);
        top
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    pub fn offer(&mut self, term: ScoredTerm) {
        if self.k == 0 {
            return;
        }
        self.kept.insert(Ranked(term));
        if self.kept.len() > self.k {
            self.kept.pop_first();
        }
    }

    /// Fold another selection into this one. The capacity of `self` wins.
    pub fn merge(&mut self, other: TopK) {
        for ranked in other.kept {
            self.offer(ranked.0);
        }
    }

    /// Best first.
    pub fn into_sorted_vec(self) -> Vec<ScoredTerm> {
        self.kept.into_iter().rev().map(|ranked| ranked.0).collect()
    }
}

/// Select the `k` best terms, best first.
pub fn select(terms: impl IntoIterator<Item = ScoredTerm>, k: usize) -> Vec<ScoredTerm> {
    let mut top = TopK::new(k);
    for term in terms {
        top.offer(term);
    }
    top.into_sorted_vec()
}
