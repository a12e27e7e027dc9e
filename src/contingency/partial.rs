// Partial aggregate carried by every contingency group.
//
// A group's count is the cardinality of a set of unit identities, never a
// running sum. Merging two partials is a set union, so it is associative,
// commutative and idempotent: the same document counted by two map tasks, or
// delivered twice by the substrate, still counts once. Per-document term
// dedup and cross-worker dedup are the same operation.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::key::TermPair;

/// Identity of one counted unit: a document, or one token occurrence inside a
/// document when counting occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    pub document: Arc<str>,
    /// Token position for occurrence units, 0 for whole documents
    pub ordinal: usize,
}

impl UnitId {
    pub fn new(document: Arc<str>, ordinal: usize) -> Self {
        Self { document, ordinal }
    }
}

/// Units seen under one key, plus the (category, term) cells the group's
/// count must be fanned out to once grouping is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partial {
    pub units: BTreeSet<UnitId>,
    pub targets: BTreeSet<TermPair>,
}

impl Partial {
    pub fn new(unit: UnitId, targets: impl IntoIterator<Item = TermPair>) -> Self {
        Self {
            units: BTreeSet::from([unit]),
            targets: targets.into_iter().collect(),
        }
    }

    pub fn merge(&mut self, other: Partial) {
        self.units.extend(other.units);
        self.targets.extend(other.targets);
    }

    pub fn count(&self) -> u64 {
        self.units.len() as u64
    }
}
