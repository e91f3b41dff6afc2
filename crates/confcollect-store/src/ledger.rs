//! Durable per-unit checkpoint: number of queue positions already attempted

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::layout::LEDGER_FILE;
use crate::write::write_atomic;

/// `{unit}/progress.log`, a bare decimal integer.
#[derive(Debug, Clone)]
pub struct ProgressLedger {
    path: PathBuf,
}

impl ProgressLedger {
    pub fn open(unit_dir: &Path) -> Self {
        Self {
            path: unit_dir.join(LEDGER_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resume index. Missing file → 0.
    ///
    /// Content that is not a non-negative integer is reset to `0` on disk.
    pub fn load(&self) -> u64 {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return 0,
            Err(e) => {
                log::warn!("{}: unreadable ledger ({e}), resetting", self.path.display());
                self.heal();
                return 0;
            }
        };
        match parse_count(&content) {
            Some(n) => n,
            None => {
                log::warn!(
                    "{}: malformed ledger {:?}, resetting to 0",
                    self.path.display(),
                    content
                );
                self.heal();
                0
            }
        }
    }

    /// Read-only view for reporting: `None` when missing or malformed, never rewrites.
    pub fn peek(&self) -> Option<u64> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|c| parse_count(&c))
    }

    /// Persist the resume index; a reader never observes a partial integer.
    pub fn save(&self, attempted: u64) -> io::Result<()> {
        write_atomic(&self.path, attempted.to_string().as_bytes())
    }

    fn heal(&self) {
        if let Err(e) = self.save(0) {
            log::warn!("{}: cannot reset ledger: {e}", self.path.display());
        }
    }
}

fn parse_count(content: &str) -> Option<u64> {
    let digits = content.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
