//! Work units and their directory layout

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const RECORDS_FILE: &str = "papers.csv";
pub const RAW_RESPONSE_FILE: &str = "papers.json";
pub const LEDGER_FILE: &str = "progress.log";
pub const STATUS_FILE: &str = "status.log";
pub const QUEUE_FILE: &str = "doi.txt";
pub const DOCUMENTS_DIR: &str = "PDF";
pub const FAILURE_MANIFEST_FILE: &str = "nofile.txt";

/// Conference venues are cataloged by year, journals by volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VenueKind {
    Conference,
    Journal,
}

impl VenueKind {
    /// dblp path segment (`db/conf/...`, `db/journals/...`)
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Conference => "conf",
            Self::Journal => "journals",
        }
    }

    /// Parse a dblp path segment
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "conf" => Some(Self::Conference),
            "journals" => Some(Self::Journal),
            _ => None,
        }
    }
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conference => f.write_str("Conference"),
            Self::Journal => f.write_str("Journal"),
        }
    }
}

/// One (venue, period) pair; period is a year or a volume number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub venue_name: String,
    pub venue_symbol: String,
    pub period: u32,
    pub kind: VenueKind,
}

impl WorkUnit {
    pub fn new(venue_name: &str, venue_symbol: &str, period: u32, kind: VenueKind) -> Self {
        Self {
            venue_name: venue_name.to_string(),
            venue_symbol: venue_symbol.to_string(),
            period,
            kind,
        }
    }

    /// `{root}/{venue}/{period}`
    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(venue_dir_name(&self.venue_name))
            .join(self.period.to_string())
    }

    /// Short label for logs, e.g. `ISCA-2019`
    pub fn label(&self) -> String {
        format!("{}-{}", venue_dir_name(&self.venue_name), self.period)
    }
}

/// Directory name for a venue: runs of spaces collapse to one `_`.
pub fn venue_dir_name(name: &str) -> String {
    name.split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Directory receiving retrieved documents and the failure manifest.
pub fn documents_dir(unit_dir: &Path) -> PathBuf {
    unit_dir.join(DOCUMENTS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_dir_name_collapses_spaces() {
        assert_eq!(venue_dir_name("USENIX ATC"), "USENIX_ATC");
        assert_eq!(venue_dir_name("HOT  CHIPS"), "HOT_CHIPS");
        assert_eq!(venue_dir_name("ISCA"), "ISCA");
    }

    #[test]
    fn work_unit_dir() {
        let unit = WorkUnit::new("USENIX ATC", "usenix", 2019, VenueKind::Conference);
        assert_eq!(
            unit.dir(Path::new("/records")),
            PathBuf::from("/records/USENIX_ATC/2019")
        );
        assert_eq!(unit.label(), "USENIX_ATC-2019");
    }

    #[test]
    fn kind_path_segment_roundtrip() {
        for kind in [VenueKind::Conference, VenueKind::Journal] {
            assert_eq!(VenueKind::from_path_segment(kind.path_segment()), Some(kind));
        }
        assert_eq!(VenueKind::from_path_segment("pers"), None);
    }

    #[test]
    fn documents_dir_is_nested() {
        assert_eq!(
            documents_dir(Path::new("/r/ISCA/2019")),
            PathBuf::from("/r/ISCA/2019/PDF")
        );
    }
}
