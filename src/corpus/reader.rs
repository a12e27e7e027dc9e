// JSON-lines corpus reader.
//
// Each line is one review object:
//   {"reviewerID": "...", "asin": "...", "category": "...", "reviewText": "..."}
// The document id is the reviewer/item composite. An explicit "id" field is
// accepted in place of the pair. Lines that fail to parse or lack a field are
// logged and skipped; I/O failures stop the read.
//
// A record whose id was already read is dropped when it is the same record
// again, and rejected as malformed when its category or text differ.

use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use super::{Admission, Document, DocumentIndex};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: Option<String>,
    #[serde(rename = "reviewerID")]
    reviewer_id: Option<String>,
    asin: Option<String>,
    category: Option<String>,
    #[serde(rename = "reviewText")]
    review_text: Option<String>,
}

/// Documents read from a corpus plus the records that were rejected.
#[derive(Debug, Default)]
pub struct ReadReport {
    pub documents: Vec<Document>,
    /// Always `Error::MalformedRecord`
    pub rejected: Vec<Error>,
    /// Records dropped because an identical record was read earlier
    pub repeated: usize,
}

/// Parse one line into a document. `line` is 1-based and only used for
/// error context.
pub fn parse_record(line: usize, raw: &str) -> Result<Document> {
    let record: RawRecord =
        serde_json::from_str(raw).map_err(|e| Error::malformed(Some(line), e.to_string()))?;

    let id = match (record.id, record.reviewer_id, record.asin) {
        (Some(id), _, _) => id,
        (None, Some(reviewer), Some(asin)) => format!("{reviewer}/{asin}"),
        _ => {
            return Err(Error::malformed(
                Some(line),
                "missing field `id` (or `reviewerID` and `asin`)",
            ))
        }
    };
    let category = record
        .category
        .ok_or_else(|| Error::malformed(Some(line), "missing field `category`"))?;
    let text = record
        .review_text
        .ok_or_else(|| Error::malformed(Some(line), "missing field `reviewText`"))?;

    Document::new(id, category, text).map_err(|e| match e {
        Error::MalformedRecord { reason, .. } => Error::malformed(Some(line), reason),
        other => other,
    })
}

/// Parsed records paired with their 1-based line numbers.
fn numbered<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, Result<Document>)> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let number = index + 1;
            match line {
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => Some((number, parse_record(number, &line))),
                Err(e) => Some((number, Err(Error::Io(e)))),
            }
        })
}

/// Lazily parse records. Blank lines are skipped silently; each item is
/// either a document, a recoverable `MalformedRecord`, or a fatal I/O error.
/// No id checks happen here; `read_documents` does those.
pub fn records<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Document>> {
    numbered(reader).map(|(_, record)| record)
}

/// Read a whole corpus, keeping malformed records aside and dropping
/// repeated ones.
pub fn read_documents<R: BufRead>(reader: R) -> Result<ReadReport> {
    let mut report = ReadReport::default();
    let mut index = DocumentIndex::default();

    for (line, record) in numbered(reader) {
        let admitted = record.and_then(|document| {
            index
                .admit(&document, Some(line))
                .map(|admission| (admission, document))
        });
        match admitted {
            Ok((Admission::New, document)) => report.documents.push(document),
            Ok((Admission::Repeat, document)) => {
                debug!(line, id = %document.id(), "Dropping repeated record");
                report.repeated += 1;
            }
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Skipping malformed record");
                report.rejected.push(e);
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        documents = report.documents.len(),
        rejected = report.rejected.len(),
        repeated = report.repeated,
        "Corpus read"
    );
    Ok(report)
}

pub fn read_path(path: &Path) -> Result<ReadReport> {
    let file = File::open(path)?;
    read_documents(BufReader::new(file))
}
