// Selection: bounded top-K per category and the shapes of the final report.

pub mod stage;
pub mod top_k;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contingency::CountUnit;
use top_k::ScoredTerm;

/// The best terms of one category, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: String,
    pub terms: Vec<ScoredTerm>,
}

/// Everything a selection run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionReport {
    /// Ordered by category name
    pub categories: Vec<CategoryResult>,
    /// Sorted, deduplicated scored terms; `None` when not requested
    pub vocabulary: Option<Vec<String>>,
    pub k: usize,
    pub count_unit: CountUnit,
    /// Records handed to the pipeline, duplicates included
    pub documents: usize,
    pub generated_at: DateTime<Utc>,
}

impl SelectionReport {
    pub fn category(&self, name: &str) -> Option<&CategoryResult> {
        self.categories.iter().find(|c| c.category == name)
    }
}
