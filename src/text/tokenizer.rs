// Document tokenizer.
//
// Splits on every run of characters that is not an ASCII letter or one of the
// preserved symbols `<`, `>`, `^`, `|`, case-folds, then drops single-character
// tokens and stopwords. `tokenize` collapses the result into a set, which is
// what the per-document counting convention needs.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Unique normalized terms of one document.
pub type TermSet = BTreeSet<String>;

/// Tokens of this length or shorter are discarded.
pub const MAX_DISCARDED_LEN: usize = 1;

const PRESERVED_SYMBOLS: [char; 4] = ['<', '>', '^', '|'];

fn is_term_char(c: char) -> bool {
    c.is_ascii_alphabetic() || PRESERVED_SYMBOLS.contains(&c)
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: Arc<HashSet<String>>,
}

impl Tokenizer {
    pub fn new(stopwords: Arc<HashSet<String>>) -> Self {
        Self { stopwords }
    }

    /// Surviving tokens in document order, repeats included.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !is_term_char(c))
            .filter(|raw| raw.len() > MAX_DISCARDED_LEN)
            .map(str::to_ascii_lowercase)
            .filter(|token| !self.stopwords.contains(token))
            .collect()
    }

    /// Unique surviving terms of a document.
    pub fn tokenize(&self, text: &str) -> TermSet {
        self.tokens(text).into_iter().collect()
    }
}
