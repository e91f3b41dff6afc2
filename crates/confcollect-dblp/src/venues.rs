//! Venue list: `<name> <dblp url>` per line
//!
//! ```text
//! A: Architecture
//! ISCA   https://dblp.org/db/conf/isca/index.html
//! TACO | https://dblp.org/db/journals/taco/index.html
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use confcollect_store::VenueKind;
use url::Url;

/// One venue from the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub name: String,
    pub symbol: String,
    pub kind: VenueKind,
}

/// Fatal venue-list problem; the whole batch is aborted.
#[derive(Debug)]
pub enum VenueListError {
    Io { path: PathBuf, source: io::Error },
    /// Link is neither a `/conf/` nor a `/journals/` page
    UnknownLink { line: usize, link: String },
    /// Link has no path segment after `/conf/` or `/journals/`
    MissingSymbol { line: usize, link: String },
}

impl fmt::Display for VenueListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::UnknownLink { line, link } => {
                write!(f, "line {line}: {link} is neither a conference nor a journal")
            }
            Self::MissingSymbol { line, link } => {
                write!(f, "line {line}: no venue symbol in {link}")
            }
        }
    }
}

impl std::error::Error for VenueListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Category headings look like `A:` / `B: Systems`.
fn is_category_line(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), Some(':')) if c.is_ascii_alphabetic()
    )
}

/// `(kind, symbol)` from the first `conf`/`journals` path segment and the one after it.
fn classify_link(link: &str) -> Option<(VenueKind, Option<String>)> {
    let segments: Vec<String> = match Url::parse(link) {
        Ok(url) => url
            .path_segments()
            .map(|s| s.map(String::from).collect())
            .unwrap_or_default(),
        Err(_) => link.split('/').map(String::from).collect(),
    };
    let pos = segments
        .iter()
        .position(|s| VenueKind::from_path_segment(s).is_some())?;
    let kind = VenueKind::from_path_segment(&segments[pos])?;
    let symbol = segments
        .get(pos + 1)
        .filter(|s| !s.is_empty() && !s.contains('.'))
        .cloned();
    Some((kind, symbol))
}

pub fn parse_venue_list(text: &str) -> Result<Vec<Venue>, VenueListError> {
    let mut venues = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.replace('|', " ");
        let line = line.trim();
        if line.is_empty() || is_category_line(line) {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [name, link] = parts.as_slice() else {
            log::warn!("line {line_no}: expected `<name> <url>`, skipping {line:?}");
            continue;
        };
        let Some((kind, symbol)) = classify_link(link) else {
            return Err(VenueListError::UnknownLink {
                line: line_no,
                link: link.to_string(),
            });
        };
        let Some(symbol) = symbol else {
            return Err(VenueListError::MissingSymbol {
                line: line_no,
                link: link.to_string(),
            });
        };
        venues.push(Venue {
            name: name.to_string(),
            symbol,
            kind,
        });
    }
    Ok(venues)
}

pub fn load_venue_list(path: &Path) -> Result<Vec<Venue>, VenueListError> {
    let text = std::fs::read_to_string(path).map_err(|source| VenueListError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let venues = parse_venue_list(&text)?;
    log::info!("{}: {} venues", path.display(), venues.len());
    Ok(venues)
}
