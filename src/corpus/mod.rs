// Corpus ingestion: labeled documents and the stopword list.
//
// Everything here sits at the edge of the pipeline: it turns files into
// validated `Document`s and a stopword set, and rejects what it cannot use.

pub mod reader;
pub mod stopwords;

use std::collections::{hash_map, HashMap};
use std::sync::Arc;

use crate::error::{Error, Result};

/// One labeled document. Immutable once built; the id is shared cheaply
/// with every unit identity the counter derives from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: Arc<str>,
    category: String,
    text: String,
}

impl Document {
    /// Build a document, rejecting an empty id or category.
    ///
    /// Empty text is allowed; such a document still counts toward N and N_c.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let category = category.into();
        if id.trim().is_empty() {
            return Err(Error::malformed(None, "document id is empty"));
        }
        if category.trim().is_empty() {
            return Err(Error::malformed(
                None,
                format!("document {id} has an empty category"),
            ));
        }
        Ok(Self {
            id: Arc::from(id),
            category,
            text: text.into(),
        })
    }

    pub fn id(&self) -> &Arc<str> {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// How a document relates to the ones already admitted under its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First document with this id
    New,
    /// Same id, category and text as an earlier document
    Repeat,
}

/// Tracks documents by id so a re-delivered record can be told apart from a
/// different record that reuses an id.
///
/// Counting unions units by document id, so two documents sharing an id
/// must be the same document. A conflicting pair would be merged into one
/// unit that sits in two categories, and the table for it cannot add up.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    seen: HashMap<Arc<str>, Document>,
}

impl DocumentIndex {
    /// Admit `document`, or reject it as malformed when its id was already
    /// taken by a document with another category or text. `line` is only
    /// used for error context.
    pub fn admit(&mut self, document: &Document, line: Option<usize>) -> Result<Admission> {
        match self.seen.entry(Arc::clone(document.id())) {
            hash_map::Entry::Vacant(entry) => {
                entry.insert(document.clone());
                Ok(Admission::New)
            }
            hash_map::Entry::Occupied(entry) if entry.get() == document => Ok(Admission::Repeat),
            hash_map::Entry::Occupied(entry) => Err(Error::malformed(
                line,
                format!(
                    "document id {} already used by a {} record with different text or category",
                    document.id(),
                    entry.get().category()
                ),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
