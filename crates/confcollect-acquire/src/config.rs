//! Acquisition run configuration

use std::path::PathBuf;

use crate::classify::{DEFAULT_NO_RESULT_MARKER, DEFAULT_REQUEST_FAILED_MARKER};
use crate::retriever::{DEFAULT_TOOL, default_args};

/// Venues acquired before all others, in this order.
pub const DEFAULT_PRIORITY: &[&str] = &[
    "HPCA",
    "ASPLOS",
    "CGO",
    "PLDI",
    "OSDI",
    "USENIX_ATC",
    "ISCA",
    "EuroSys",
    "PACT",
    "VEE",
    "SoCC",
    "CODES_ISSS",
    "ICCD",
    "HOT_CHIPS",
];

/// Runtime configuration for an acquisition run
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog root containing `{venue}/{period}` directories
    pub root: PathBuf,
    pub tool: String,
    /// Argument template; see [`crate::retriever::DEFAULT_ARGS`]
    pub args: Vec<String>,
    /// Extra directories searched for the tool and given to its PATH
    pub search_paths: Vec<PathBuf>,
    pub no_result_marker: String,
    pub request_failed_marker: String,
    pub priority: Vec<String>,
}

impl Config {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("records"),
            tool: DEFAULT_TOOL.to_string(),
            args: default_args(),
            search_paths: Vec::new(),
            no_result_marker: DEFAULT_NO_RESULT_MARKER.to_string(),
            request_failed_marker: DEFAULT_REQUEST_FAILED_MARKER.to_string(),
            priority: DEFAULT_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }
}
