//! Read-only scan of work-unit state for status reporting

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use confcollect_store::{FailureManifest, ProgressLedger, RecordStore, StatusMarker, UnitStatus};

/// Derived state of one work unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    /// No marker, no ledger
    Unseen,
    /// No marker; ledger records `attempted` of `queued`
    InProgress { attempted: u64, queued: usize },
    Done(UnitStatus),
    /// Records present but unparsable
    Unreadable(String),
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unseen => f.write_str("Unseen"),
            Self::InProgress { attempted, queued } => write!(f, "InProgress {attempted}/{queued}"),
            Self::Done(status) => write!(f, "{status}"),
            Self::Unreadable(e) => write!(f, "Unreadable: {e}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnitReport {
    pub venue: String,
    pub period: String,
    pub dir: PathBuf,
    pub records: usize,
    pub queued: usize,
    /// Titles in the failure manifest, if one was written
    pub failures: Option<usize>,
    pub state: UnitState,
}

/// Every `{root}/*/*` directory with its state, sorted by path. Never writes.
pub fn scan(root: &Path) -> anyhow::Result<Vec<UnitReport>> {
    let pattern = format!(
        "{}/*/*",
        glob::Pattern::escape(&root.to_string_lossy())
    );
    let mut reports = Vec::new();
    for entry in glob::glob(&pattern).context("Invalid catalog root pattern")? {
        let dir = entry.context("Cannot read catalog entry")?;
        if !dir.is_dir() {
            continue;
        }
        reports.push(report_unit(&dir));
    }
    reports.sort_by(|a, b| a.dir.cmp(&b.dir));
    Ok(reports)
}

pub fn report_unit(dir: &Path) -> UnitReport {
    let name = |p: Option<&Path>| {
        p.and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let venue = name(dir.parent());
    let period = name(Some(dir));

    let (records, queued, load_error) = match RecordStore::load(dir) {
        Ok(Some(store)) => {
            let queued = store.partition_queue().1.len();
            (store.len(), queued, None)
        }
        Ok(None) => (0, 0, None),
        Err(e) => (0, 0, Some(e.to_string())),
    };

    let state = match (StatusMarker::open(dir).read(), load_error) {
        (Some(status), _) => UnitState::Done(status),
        (None, Some(e)) => UnitState::Unreadable(e),
        (None, None) => match ProgressLedger::open(dir).peek() {
            Some(attempted) => UnitState::InProgress { attempted, queued },
            None => UnitState::Unseen,
        },
    };
    let failures = FailureManifest::read(dir).ok().flatten().map(|m| m.len());

    UnitReport {
        venue,
        period,
        dir: dir.to_path_buf(),
        records,
        queued,
        failures,
        state,
    }
}
