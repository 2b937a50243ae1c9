//! Data structures exchanged with the tool-invocation layer
//!
//! `ContentRecord` is the only shape the report collaborator depends on.
//! Inbound record lists arrive from a language model and are not reliably
//! typed, so `parse_records` tries the strict shape first and then a fixed
//! sequence of fallbacks before settling on an empty list.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

/// Timestamp layout used by legacy `time` fields
const LEGACY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single URL plus the display label its record will carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchTarget {
    pub url: String,
    pub label: String,
}

impl FetchTarget {
    #[must_use]
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

/// Extracted text for one fetch target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Caller-supplied label, not scraped
    pub title: String,

    /// Cleaned body text, capped at `MAX_CONTENT_CHARS` plus marker
    pub content: String,

    /// Source address
    pub url: String,

    /// Set when extraction ran
    #[serde(
        alias = "time",
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub fetched_at: DateTime<Utc>,
}

impl ContentRecord {
    #[must_use]
    pub fn new(target: &FetchTarget, content: String) -> Self {
        Self {
            title: target.label.clone(),
            content,
            url: target.url.clone(),
            fetched_at: Utc::now(),
        }
    }

    /// Empty-content record keeping a failed target's position
    #[must_use]
    pub fn placeholder(target: &FetchTarget) -> Self {
        Self::new(target, String::new())
    }
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{raw}'")))
}

/// Parse RFC 3339 or the legacy `YYYY-MM-DD HH:MM:SS` layout
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, LEGACY_TIME_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Accepted shapes for an inbound record list, tried in order
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordsInput {
    Strict(Vec<ContentRecord>),
    Loose(Vec<Value>),
    Encoded(String),
}

/// Turn whatever the invocation layer sent into a record list
///
/// Never fails: unusable input yields an empty list.
#[must_use]
pub fn parse_records(raw: Option<&Value>) -> Vec<ContentRecord> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match RecordsInput::deserialize(raw) {
        Ok(RecordsInput::Strict(records)) => records,
        Ok(RecordsInput::Loose(items)) => loose_records(&items),
        Ok(RecordsInput::Encoded(text)) => {
            debug!("Record list arrived as a JSON string, decoding");
            match serde_json::from_str::<Value>(&text) {
                Ok(Value::Array(items)) => {
                    match Vec::<ContentRecord>::deserialize(Value::Array(items.clone())) {
                        Ok(records) => records,
                        Err(_) => loose_records(&items),
                    }
                }
                Ok(other) => {
                    warn!("Encoded record list is not an array: {other}");
                    Vec::new()
                }
                Err(e) => {
                    warn!("Failed to decode record list string: {e}");
                    Vec::new()
                }
            }
        }
        Err(_) => {
            if !raw.is_null() {
                warn!("Unsupported record list shape, treating as empty");
            }
            Vec::new()
        }
    }
}

fn loose_records(items: &[Value]) -> Vec<ContentRecord> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = loose_record(item);
            if record.is_none() {
                warn!("Skipping record {index}: not an object");
            }
            record
        })
        .collect()
}

fn loose_record(item: &Value) -> Option<ContentRecord> {
    let object = item.as_object()?;
    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let fetched_at = object
        .get("fetchedAt")
        .or_else(|| object.get("time"))
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or_default();

    Some(ContentRecord {
        title: text("title"),
        content: text("content"),
        url: text("url"),
        fetched_at,
    })
}
