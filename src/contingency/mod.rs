// Contingency counter: derives (N, N_c, N_t, N_ct) for every co-occurring
// (category, term) cell without building a document x term matrix.
//
// Three pieces: keys with marginal slots (key), set-union partials (partial),
// tagged counts assembled per cell (counts). The stages that drive them
// through the substrate live in `stages`.

pub mod counts;
pub mod key;
pub mod partial;
pub mod stages;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a single count in the contingency table stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountUnit {
    /// One unit per document; a term counts once per document.
    #[default]
    Document,
    /// One unit per surviving token occurrence.
    Occurrence,
}

impl CountUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountUnit::Document => "document",
            CountUnit::Occurrence => "occurrence",
        }
    }
}

impl fmt::Display for CountUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(CountUnit::Document),
            "occurrence" => Ok(CountUnit::Occurrence),
            other => Err(format!(
                "unknown count unit '{other}' (expected 'document' or 'occurrence')"
            )),
        }
    }
}
