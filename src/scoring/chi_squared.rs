// Chi-squared statistic over a 2x2 contingency table.
//
//                  term    no term
//   category        A         C
//   other           B         D
//
// A = N_ct, B = N_t - A, C = N_c - A, D = N - A - B - C
// chi2 = N (AD - BC)^2 / ((A+B)(A+C)(B+D)(C+D))
//
// A zero marginal means one row or column of the table is empty; the term
// then carries no signal for the category and the score is defined as 0.

use serde::Serialize;

use crate::contingency::counts::ContingencyCounts;

/// Counts that cannot form a table because a derived cell is negative.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("counts {counts} give a negative cell {cell}")]
pub struct InconsistentCounts {
    pub counts: ContingencyCounts,
    pub cell: &'static str,
}

/// The four cells of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContingencyTable {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

impl ContingencyTable {
    pub fn from_counts(counts: &ContingencyCounts) -> Result<Self, InconsistentCounts> {
        let fail = |cell| InconsistentCounts {
            counts: *counts,
            cell,
        };

        let a = counts.n_ct;
        let b = counts.n_t.checked_sub(a).ok_or_else(|| fail("B"))?;
        let c = counts.n_c.checked_sub(a).ok_or_else(|| fail("C"))?;
        let d = counts
            .n
            .checked_sub(counts.n_t)
            .and_then(|rest| rest.checked_sub(c))
            .ok_or_else(|| fail("D"))?;

        Ok(Self { a, b, c, d })
    }

    pub fn total(&self) -> u64 {
        self.a + self.b + self.c + self.d
    }

    /// Row and column sums: (A+B), (A+C), (B+D), (C+D).
    pub fn marginals(&self) -> [u64; 4] {
        [
            self.a + self.b,
            self.a + self.c,
            self.b + self.d,
            self.c + self.d,
        ]
    }

    pub fn is_degenerate(&self) -> bool {
        self.marginals().contains(&0)
    }

    pub fn chi_squared(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }

        // Cross difference in exact integer arithmetic; only the final
        // quotient goes through floating point, always in the same order.
        let cross = i128::from(self.a) * i128::from(self.d) - i128::from(self.b) * i128::from(self.c);
        let cross = cross as f64;

        let [ab, ac, bd, cd] = self.marginals().map(|m| m as f64);
        let n = self.total() as f64;

        n * (cross * cross) / (ab * ac * bd * cd)
    }
}

/// Score one assembled cell.
pub fn score(counts: &ContingencyCounts) -> Result<f64, InconsistentCounts> {
    Ok(ContingencyTable::from_counts(counts)?.chi_squared())
}
