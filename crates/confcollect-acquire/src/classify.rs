//! Retrieval outcome classification from the tool's diagnostic stream

use std::fmt;

/// Printed when the retrieval source has no document for the identifier.
pub const DEFAULT_NO_RESULT_MARKER: &str = "your searching has no result, please check! ";
/// Printed when the request to the retrieval source itself failed.
pub const DEFAULT_REQUEST_FAILED_MARKER: &str = "failed requests for url:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NoSearchResult,
    RequestFailed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::NoSearchResult => f.write_str("no search result"),
            Self::RequestFailed => f.write_str("request failed"),
        }
    }
}

/// Substring matcher over diagnostics. An empty marker never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    no_result: String,
    request_failed: String,
}

impl Classifier {
    pub fn new(no_result: impl Into<String>, request_failed: impl Into<String>) -> Self {
        Self {
            no_result: no_result.into(),
            request_failed: request_failed.into(),
        }
    }

    /// RequestFailed wins when both markers are present.
    pub fn classify(&self, diagnostics: &str) -> Outcome {
        if contains(diagnostics, &self.request_failed) {
            Outcome::RequestFailed
        } else if contains(diagnostics, &self.no_result) {
            Outcome::NoSearchResult
        } else {
            Outcome::Success
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_NO_RESULT_MARKER, DEFAULT_REQUEST_FAILED_MARKER)
    }
}

fn contains(haystack: &str, marker: &str) -> bool {
    !marker.is_empty() && haystack.contains(marker)
}
