// Grouping keys for the contingency counter.
//
// A key fixes zero, one, or both dimensions of the 2x2 table. `None` in a
// slot is the marginal sentinel: "aggregate over every value of this
// dimension". One key shape covers all four counts, so the counter needs a
// single emit/group/fan-out mechanism instead of one chain per count.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the four contingency counts a key aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CountKind {
    /// (⟂, ⟂): every unit in the corpus
    Total,
    /// (c, ⟂): units in category c
    Category,
    /// (⟂, t): units containing term t
    Term,
    /// (c, t): units in c containing t
    Joint,
}

impl CountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountKind::Total => "N",
            CountKind::Category => "N_c",
            CountKind::Term => "N_t",
            CountKind::Joint => "N_ct",
        }
    }
}

impl fmt::Display for CountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (category, term) cell of the table, the unit that eventually gets scored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TermPair {
    pub category: String,
    pub term: String,
}

impl TermPair {
    pub fn new(category: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            term: term.into(),
        }
    }
}

impl fmt::Display for TermPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.category, self.term)
    }
}

/// Grouping key with optional marginal slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContingencyKey {
    pub category: Option<String>,
    pub term: Option<String>,
}

impl ContingencyKey {
    pub fn total() -> Self {
        Self {
            category: None,
            term: None,
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            term: None,
        }
    }

    pub fn term(term: impl Into<String>) -> Self {
        Self {
            category: None,
            term: Some(term.into()),
        }
    }

    pub fn joint(category: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            term: Some(term.into()),
        }
    }

    pub fn kind(&self) -> CountKind {
        match (&self.category, &self.term) {
            (None, None) => CountKind::Total,
            (Some(_), None) => CountKind::Category,
            (None, Some(_)) => CountKind::Term,
            (Some(_), Some(_)) => CountKind::Joint,
        }
    }

    /// True when `pair` lies inside the slice of the table this key
    /// aggregates over. Fixed slots must match; marginal slots match anything.
    pub fn covers(&self, pair: &TermPair) -> bool {
        self.category.as_ref().is_none_or(|c| *c == pair.category)
            && self.term.as_ref().is_none_or(|t| *t == pair.term)
    }

    /// A fixed slot holding an empty string can only come from a broken
    /// emit, since the reader and tokenizer never produce one.
    pub fn is_well_formed(&self) -> bool {
        self.category.as_ref().is_none_or(|c| !c.is_empty())
            && self.term.as_ref().is_none_or(|t| !t.is_empty())
    }
}

impl From<&TermPair> for ContingencyKey {
    fn from(pair: &TermPair) -> Self {
        ContingencyKey::joint(pair.category.clone(), pair.term.clone())
    }
}

impl fmt::Display for ContingencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            self.category.as_deref().unwrap_or("*"),
            self.term.as_deref().unwrap_or("*")
        )
    }
}
