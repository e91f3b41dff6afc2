//! Titles that could not be acquired for a work unit

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::layout::{FAILURE_MANIFEST_FILE, documents_dir};

/// `{unit}/PDF/nofile.txt`: one title per line, no trailing newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureManifest {
    pub titles: Vec<String>,
}

impl FailureManifest {
    pub fn new(titles: Vec<String>) -> Self {
        Self { titles }
    }

    pub fn path(unit_dir: &Path) -> PathBuf {
        documents_dir(unit_dir).join(FAILURE_MANIFEST_FILE)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn render(&self) -> String {
        self.titles.join("\n")
    }

    /// Write the manifest, creating the documents directory if needed.
    pub fn write(&self, unit_dir: &Path) -> io::Result<()> {
        let path = Self::path(unit_dir);
        fs::create_dir_all(documents_dir(unit_dir))?;
        fs::write(path, self.render())
    }

    /// `Ok(None)` when no manifest was written for the unit.
    pub fn read(unit_dir: &Path) -> io::Result<Option<Self>> {
        match fs::read_to_string(Self::path(unit_dir)) {
            Ok(text) => Ok(Some(Self::new(text.lines().map(String::from).collect()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_has_no_trailing_newline() {
        let m = FailureManifest::new(vec!["A".into(), "B".into()]);
        assert_eq!(m.render(), "A\nB");
    }

    #[test]
    fn write_creates_documents_dir() {
        let dir = tempfile::tempdir().unwrap();
        let m = FailureManifest::new(vec!["Only title".into()]);
        m.write(dir.path()).unwrap();

        let raw = fs::read_to_string(FailureManifest::path(dir.path())).unwrap();
        assert_eq!(raw, "Only title");
        assert_eq!(FailureManifest::read(dir.path()).unwrap(), Some(m));
    }

    #[test]
    fn read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(FailureManifest::read(dir.path()).unwrap(), None);
    }
}
