//! ftag tag index
//!
//! An ordered list of `(path, tags)` records, persisted as a JSON sidecar
//! (`.ftag` by default) next to the files it describes:
//!
//! ```text
//! [
//!   { "location": "report.txt", "tags": ["urgent", "work"] },
//!   { "location": "notes.md",   "tags": ["personal"] }
//! ]
//! ```
//!
//! ## Ordering
//!
//! - Records are kept in touch order: re-adding a path moves its record to
//!   the tail of the index.
//! - Tags within a record are kept in touch order too: re-adding a tag moves
//!   it to the tail of that record's tag list.
//!
//! Both orders are observable (they drive `ftag query` output), so they are
//! part of the contract rather than an implementation detail.

pub mod persistence;


use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub use persistence::{
    decode_index, encode_index, load, load_or_default, save, BlobStore, FsBlobStore, Loaded,
    MemoryBlobStore,
};

/// Default sidecar file name, relative to the working directory.
pub const DEFAULT_INDEX_FILE: &str = ".ftag";

// ============================================================================
// Core Types
// ============================================================================

/// One tagged path.
///
/// Tags are unique within a record once they have gone through
/// [`Record::add_tag`]; [`Record::new`] routes every incoming tag through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "location")]
    path: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl Record {
    pub fn new<P, I, T>(path: P, tags: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut record = Self {
            path: path.into(),
            tags: Vec::new(),
        };
        for tag in tags {
            record.add_tag(tag);
        }
        record
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Add `tag`, moving it to the end of the tag list if already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if let Some(pos) = self.tags.iter().position(|t| *t == tag) {
            self.tags.remove(pos);
        }
        self.tags.push(tag);
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Query output line: `<path>\t[<tag> <tag> ...]`.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t[{}]", self.path, self.tags.join(" "))
    }
}

/// The full ordered collection of records; the unit of persistence.
///
/// Serialized as a bare JSON array of [`Record`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagIndex {
    records: Vec<Record>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// First record stored for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.path == path)
    }

    /// Insert `record`, or merge it with the stored record for the same path.
    ///
    /// On a merge the incoming tags come first and the stored tags are then
    /// folded in with [`Record::add_tag`]. Either way the record ends up at
    /// the tail of the index.
    ///
    /// Decoded files may hold several records for one path; all of them are
    /// folded in, oldest first, so at most one record per path remains.
    pub fn add_or_merge(&mut self, mut record: Record) -> &Record {
        let (previous, rest): (Vec<Record>, Vec<Record>) =
            std::mem::take(&mut self.records)
                .into_iter()
                .partition(|r| r.path == record.path);
        self.records = rest;

        if previous.is_empty() {
            tracing::debug!(path = %record.path, tags = record.tags.len(), "adding new record");
        } else {
            tracing::debug!(
                path = %record.path,
                merged = previous.len(),
                "merging into existing record"
            );
        }

        for old in previous {
            for tag in old.tags {
                record.add_tag(tag);
            }
        }

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Records tagged with `tag`, in index order.
    pub fn query<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.has_tag(tag))
    }
}

impl From<Vec<Record>> for TagIndex {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for TagIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TagIndex {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagIndex {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// No storage object exists at `path`. Expected on first use.
    #[error("index file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("malformed index: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode index: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
