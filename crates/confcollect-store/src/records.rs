//! Per-unit publication records persisted as tab-separated lines

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::layout::RECORDS_FILE;

/// Error loading or saving a [`RecordStore`].
#[derive(Debug)]
pub enum RecordStoreError {
    Io { path: PathBuf, source: io::Error },
    /// Line does not have exactly three tab-separated fields
    FieldCount { line: usize, fields: usize },
    /// Line has an empty title field
    EmptyTitle { line: usize },
}

impl fmt::Display for RecordStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::FieldCount { line, fields } => {
                write!(f, "line {line}: expected 3 tab-separated fields, found {fields}")
            }
            Self::EmptyTitle { line } => write!(f, "line {line}: empty title"),
        }
    }
}

impl std::error::Error for RecordStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Collapse every run of tabs, carriage returns and newlines into one space.
///
/// Keeps the line-oriented TSV format unambiguous.
pub fn normalize_field(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if matches!(c, '\t' | '\n' | '\r') {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// One discovered publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationRecord {
    pub title: String,
    /// Comma-joined author names, may be empty
    pub authors: String,
    /// DOI, may be empty
    pub identifier: String,
}

impl PublicationRecord {
    /// Build a record with every field normalized for TSV storage.
    ///
    /// Identifiers are additionally trimmed: surrounding whitespace is never
    /// part of a DOI.
    pub fn new(title: &str, authors: &str, identifier: &str) -> Self {
        Self {
            title: normalize_field(title),
            authors: normalize_field(authors),
            identifier: normalize_field(identifier).trim().to_string(),
        }
    }

    pub fn has_identifier(&self) -> bool {
        !self.identifier.is_empty()
    }

    fn to_line(&self) -> String {
        format!("{}\t{}\t{}", self.title, self.authors, self.identifier)
    }

    fn from_line(line: &str, line_no: usize) -> Result<Self, RecordStoreError> {
        let fields: Vec<&str> = line.split('\t').collect();
        let [title, authors, identifier] = fields.as_slice() else {
            return Err(RecordStoreError::FieldCount {
                line: line_no,
                fields: fields.len(),
            });
        };
        if title.is_empty() {
            return Err(RecordStoreError::EmptyTitle { line: line_no });
        }
        Ok(Self {
            title: title.to_string(),
            authors: authors.to_string(),
            identifier: identifier.to_string(),
        })
    }
}

/// Ordered records of one work unit; at most one record per title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<PublicationRecord>,
    titles: HashSet<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, keeping insertion order.
    ///
    /// Returns `false` (and drops the record) if the title is already present.
    pub fn push(&mut self, record: PublicationRecord) -> bool {
        if !self.titles.insert(record.title.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn records(&self) -> &[PublicationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Split into (records without identifier, download queue), both in store order.
    pub fn partition_queue(&self) -> (Vec<&PublicationRecord>, Vec<&PublicationRecord>) {
        let (queue, missing): (Vec<_>, Vec<_>) =
            self.records.iter().partition(|r| r.has_identifier());
        (missing, queue)
    }

    /// Parse TSV text (no header, one record per line).
    pub fn parse(text: &str) -> Result<Self, RecordStoreError> {
        let mut store = Self::new();
        for (idx, line) in text.lines().enumerate() {
            let record = PublicationRecord::from_line(line, idx + 1)?;
            if !store.push(record) {
                log::warn!("line {}: duplicate title dropped", idx + 1);
            }
        }
        Ok(store)
    }

    /// Render as TSV, one newline-terminated line per record.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_line());
            out.push('\n');
        }
        out
    }

    /// Load `{dir}/papers.csv`. `Ok(None)` when the file does not exist.
    pub fn load(dir: &Path) -> Result<Option<Self>, RecordStoreError> {
        let path = dir.join(RECORDS_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(RecordStoreError::Io { path, source }),
        };
        Self::parse(&text).map(Some)
    }

    /// Write `{dir}/papers.csv`, replacing any previous catalog.
    pub fn save(&self, dir: &Path) -> Result<(), RecordStoreError> {
        let path = dir.join(RECORDS_FILE);
        fs::write(&path, self.to_tsv()).map_err(|source| RecordStoreError::Io { path, source })
    }
}

impl FromIterator<PublicationRecord> for RecordStore {
    fn from_iter<I: IntoIterator<Item = PublicationRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        for record in iter {
            store.push(record);
        }
        store
    }
}
