//! dblp JSON response validation and per-hit coercion
//!
//! Shape: `{result:{hits:{"@total":"N", hit:[{info:{title, authors:{author}, doi, year, volume}}]}}}`.
//! Nothing here fails hard: a bad response is `Invalid`, a bad field is empty.

use std::fmt;

use confcollect_store::{PublicationRecord, normalize_field};
use serde_json::{Map, Value};

/// Why a response was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Request failed after retries
    Transport,
    MalformedJson,
    /// `result.hits.@total` missing
    MissingField,
    /// `@total` not an integer
    UnparsableTotal,
    /// `@total` is zero
    NoHits,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Transport => "request failed",
            Self::MalformedJson => "malformed JSON",
            Self::MissingField => "missing result.hits.@total",
            Self::UnparsableTotal => "unparsable hit count",
            Self::NoHits => "no hits",
        };
        f.write_str(s)
    }
}

/// Validated hits of one query
#[derive(Debug, Clone)]
pub struct HitList {
    pub total: u64,
    pub hits: Vec<Value>,
    /// Decoded response, archived next to the records
    pub raw: Value,
}

/// Result of one discovery query
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    Valid(HitList),
    Invalid(InvalidReason),
}

impl QueryOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Decode and validate a response body.
///
/// Valid iff `@total` parses as an integer > 0. A missing `hit` list with a
/// positive total is valid and empty.
pub fn parse_response(body: &str) -> QueryOutcome {
    let raw: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return QueryOutcome::Invalid(InvalidReason::MalformedJson),
    };
    let Some(total) = raw.pointer("/result/hits/@total") else {
        return QueryOutcome::Invalid(InvalidReason::MissingField);
    };
    let total = match coerce_int(total) {
        Some(n) if n > 0 => n as u64,
        Some(_) => return QueryOutcome::Invalid(InvalidReason::NoHits),
        None => return QueryOutcome::Invalid(InvalidReason::UnparsableTotal),
    };
    let hits = raw
        .pointer("/result/hits/hit")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    QueryOutcome::Valid(HitList { total, hits, raw })
}

/// `hit.info`, if it is an object.
pub fn hit_info(hit: &Value) -> Option<&Map<String, Value>> {
    hit.get("info").and_then(Value::as_object)
}

/// Integer from a JSON number or a numeric string.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok())),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-negative integer field of `info` (year, volume).
pub fn info_u32(info: &Map<String, Value>, key: &str) -> Option<u32> {
    info.get(key)
        .and_then(coerce_int)
        .and_then(|n| u32::try_from(n).ok())
}

/// Identifier as a string; absent or non-scalar → empty.
pub fn coerce_identifier(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Join the `author` value (list of objects or one object) into `A,B,...`.
///
/// Entries without a non-empty `text` are dropped. Any other shape → empty.
pub fn normalize_authors(author: &Value) -> String {
    match author {
        Value::Object(obj) => author_text(obj).unwrap_or_default(),
        Value::Array(list) => list
            .iter()
            .filter_map(Value::as_object)
            .filter_map(author_text)
            .collect::<Vec<_>>()
            .join(","),
        _ => String::new(),
    }
}

fn author_text(obj: &Map<String, Value>) -> Option<String> {
    let text = obj.get("text")?.as_str()?;
    let name = normalize_field(text.trim());
    (!name.is_empty()).then_some(name)
}

/// Convert one hit into a record. `None` when the title is absent or not a string.
pub fn hit_to_record(hit: &Value, label: &str) -> Option<PublicationRecord> {
    let Some(info) = hit_info(hit) else {
        log::warn!("{label}: hit without info skipped");
        return None;
    };
    let title = match info.get("title") {
        Some(Value::String(t)) if !t.trim().is_empty() => t,
        _ => {
            log::warn!("{label}: hit without title skipped");
            return None;
        }
    };
    let authors = match info.get("authors") {
        Some(a) => normalize_authors(a.get("author").unwrap_or(&Value::Null)),
        None => {
            log::warn!("{label}: no authors for {title:?}");
            String::new()
        }
    };
    let identifier = coerce_identifier(info.get("doi"));
    Some(PublicationRecord::new(title.trim(), &authors, &identifier))
}
