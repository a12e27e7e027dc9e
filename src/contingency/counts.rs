// Assembled contingency counts for one (category, term) cell.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::key::{ContingencyKey, CountKind, TermPair};
use crate::error::{Error, Result};

/// The four counts the chi-squared statistic is built from.
///
/// Invariant once assembled: `0 <= n_ct <= min(n_c, n_t) <= n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyCounts {
    /// Units in the corpus
    pub n: u64,
    /// Units in the category
    pub n_c: u64,
    /// Units containing the term
    pub n_t: u64,
    /// Units in the category containing the term
    pub n_ct: u64,
}

impl ContingencyCounts {
    pub fn is_consistent(&self) -> bool {
        self.n_ct <= self.n_c && self.n_ct <= self.n_t && self.n_c <= self.n && self.n_t <= self.n
    }
}

impl fmt::Display for ContingencyCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N={} N_c={} N_t={} N_ct={}",
            self.n, self.n_c, self.n_t, self.n_ct
        )
    }
}

/// Tagged counts collected for one cell during fan-out. Each slot is filled
/// by exactly one group; a re-delivered group carries the same value, so
/// merging is idempotent. Two different values for one slot mean grouping
/// was incomplete when fan-out ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialCounts {
    n: Option<u64>,
    n_c: Option<u64>,
    n_t: Option<u64>,
    n_ct: Option<u64>,
}

impl PartialCounts {
    pub fn single(kind: CountKind, count: u64) -> Self {
        let mut counts = Self::default();
        *counts.slot_mut(kind) = Some(count);
        counts
    }

    pub fn get(&self, kind: CountKind) -> Option<u64> {
        match kind {
            CountKind::Total => self.n,
            CountKind::Category => self.n_c,
            CountKind::Term => self.n_t,
            CountKind::Joint => self.n_ct,
        }
    }

    fn slot_mut(&mut self, kind: CountKind) -> &mut Option<u64> {
        match kind {
            CountKind::Total => &mut self.n,
            CountKind::Category => &mut self.n_c,
            CountKind::Term => &mut self.n_t,
            CountKind::Joint => &mut self.n_ct,
        }
    }

    pub fn merge(&mut self, pair: &TermPair, other: PartialCounts) -> Result<()> {
        for kind in [
            CountKind::Total,
            CountKind::Category,
            CountKind::Term,
            CountKind::Joint,
        ] {
            let Some(incoming) = other.get(kind) else {
                continue;
            };
            let slot = self.slot_mut(kind);
            match *slot {
                Some(existing) if existing != incoming => {
                    return Err(Error::invariant(
                        ContingencyKey::from(pair),
                        format!("conflicting {kind} values {existing} and {incoming}"),
                    ));
                }
                Some(_) => {}
                None => *slot = Some(incoming),
            }
        }
        Ok(())
    }

    /// Build the final counts for a cell.
    ///
    /// Returns `Ok(None)` when the cell never received an N_ct contribution:
    /// the term never co-occurs with the category and the cell is not scored.
    /// A missing marginal, or counts that break the table invariant, are
    /// invariant violations.
    pub fn assemble(&self, pair: &TermPair) -> Result<Option<ContingencyCounts>> {
        let Some(n_ct) = self.n_ct else {
            return Ok(None);
        };

        let require = |kind: CountKind| {
            self.get(kind).ok_or_else(|| {
                Error::invariant(
                    ContingencyKey::from(pair),
                    format!("{kind} missing during assembly (have {self:?})"),
                )
            })
        };

        let counts = ContingencyCounts {
            n: require(CountKind::Total)?,
            n_c: require(CountKind::Category)?,
            n_t: require(CountKind::Term)?,
            n_ct,
        };

        if n_ct == 0 || !counts.is_consistent() {
            return Err(Error::invariant(
                ContingencyKey::from(pair),
                format!("inconsistent counts {counts}"),
            ));
        }

        Ok(Some(counts))
    }
}
