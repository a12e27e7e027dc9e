// Stopword sources.
//
// A stopword file holds one word per line. Without a file the English list
// from the `stop-words` crate is used. Entries are case-folded so they match
// tokenizer output.

use std::collections::HashSet;
use std::path::Path;
use stop_words::{get, LANGUAGE};

use crate::error::{Error, Result};

pub fn parse(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Load a stopword file. Any read failure is a configuration error, raised
/// before the pipeline starts.
pub fn load(path: &Path) -> Result<HashSet<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!(
            "cannot read stopword file {}: {e}",
            path.display()
        ))
    })?;
    Ok(parse(&contents))
}

pub fn english() -> HashSet<String> {
    let words: Vec<String> = get(LANGUAGE::English);
    words.iter().map(|w| w.trim().to_lowercase()).collect()
}

/// Load from `path` when given, otherwise fall back to the English list.
pub fn resolve(path: Option<&Path>) -> Result<HashSet<String>> {
    match path {
        Some(path) => load(path),
        None => Ok(english()),
    }
}
