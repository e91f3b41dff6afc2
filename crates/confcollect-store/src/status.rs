//! Terminal per-unit status marker
//!
//! Presence of `status.log` is the idempotency guard; its content only
//! refines which terminal state was reached.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::layout::STATUS_FILE;
use crate::write::write_atomic;

/// Terminal state of a work unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitStatus {
    /// Queue exhausted, at least one record acquired
    Processed,
    /// No records, or none carrying an identifier
    NoIdentifiers,
    /// Every record failed or lacked an identifier
    AllFailed,
    /// Marker present with content written by something else
    Unrecognized(String),
}

impl UnitStatus {
    /// Token stored on disk
    pub fn token(&self) -> &str {
        match self {
            Self::Processed => "Processed",
            Self::NoIdentifiers => "NoDOI",
            Self::AllFailed => "None",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "Processed" => Self::Processed,
            "NoDOI" => Self::NoIdentifiers,
            "None" => Self::AllFailed,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processed => f.write_str("Processed"),
            Self::NoIdentifiers => f.write_str("NoIdentifiers"),
            Self::AllFailed => f.write_str("AllFailed"),
            Self::Unrecognized(raw) => write!(f, "Unrecognized({raw})"),
        }
    }
}

/// `{unit}/status.log`
#[derive(Debug, Clone)]
pub struct StatusMarker {
    path: PathBuf,
}

impl StatusMarker {
    pub fn open(unit_dir: &Path) -> Self {
        Self {
            path: unit_dir.join(STATUS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// `None` when no marker exists. An unreadable marker still counts as present.
    pub fn read(&self) -> Option<UnitStatus> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Some(UnitStatus::from_token(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("{}: unreadable status marker: {e}", self.path.display());
                Some(UnitStatus::Unrecognized(String::new()))
            }
        }
    }

    pub fn write(&self, status: &UnitStatus) -> io::Result<()> {
        write_atomic(&self.path, status.token().as_bytes())
    }
}
