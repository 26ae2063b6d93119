//! Clawdbot session log records
//!
//! Each line of `~/.clawdbot/agents/<agentId>/sessions/<sessionId>.jsonl`
//! is one loosely structured JSON record. Nothing is schema-enforced, so
//! records are kept as raw JSON and read through lenient accessors.
//!
//! # Record shapes
//!
//! ```json
//! {"type":"session","sessionKey":"agent:main:discord","timestamp":"2026-01-31T04:05:52.936Z"}
//! {"type":"model_change","modelId":"anthropic/claude-opus-4-5"}
//! {"type":"message","timestamp":"...","message":{"role":"user","content":"hi"}}
//! {"role":"assistant","content":[{"type":"toolCall","name":"read"}],"usage":{"totalTokens":812}}
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

/// One parsed log line.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    value: Value,
}

impl RawEvent {
    /// Parse a single log line. Returns `None` for anything that is not valid JSON.
    pub fn parse(line: &str) -> Option<Self> {
        serde_json::from_str(line).ok().map(Self::from_value)
    }

    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// Outer `type` tag
    pub fn event_type(&self) -> Option<&str> {
        self.value["type"].as_str()
    }

    /// Record timestamp in Unix ms.
    ///
    /// Accepts RFC 3339 strings, ISO dates and date-times without an offset
    /// (read as UTC), and integer or fractional milliseconds.
    pub fn timestamp_ms(&self) -> Option<i64> {
        match &self.value["timestamp"] {
            Value::String(s) => parse_timestamp(s.trim()),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .filter(|ms| (-MAX_TIMESTAMP_MS..=MAX_TIMESTAMP_MS).contains(ms)),
            _ => None,
        }
    }

    /// `usage.totalTokens`, when it is a non-negative integer
    pub fn total_tokens(&self) -> Option<u64> {
        self.value["usage"]["totalTokens"].as_u64()
    }

    /// `sessionKey`, only meaningful on `session` records
    pub fn session_key(&self) -> Option<&str> {
        self.value["sessionKey"].as_str().filter(|k| !k.is_empty())
    }

    /// `modelId`, only meaningful on `model_change` records
    pub fn model_id(&self) -> Option<&str> {
        self.value["modelId"].as_str().filter(|m| !m.is_empty())
    }

    /// Normalize the record into its canonical payload shape.
    pub fn payload(&self) -> Payload<'_> {
        Payload::from_record(self)
    }
}

/// Whether the payload came from a `message` wrapper or the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    Wrapped,
    Bare,
}

/// Canonical view of a record, independent of how it was wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload<'a> {
    pub envelope: Envelope,
    /// Outer `type` tag of the enclosing record
    pub record_type: Option<&'a str>,
    pub role: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub content: Content<'a>,
    /// Raw `text` field (system events)
    pub text: &'a Value,
    /// Raw `content` field, before normalization (system events)
    pub raw_content: &'a Value,
    pub tool_name: Option<&'a str>,
}

impl<'a> Payload<'a> {
    fn from_record(record: &'a RawEvent) -> Self {
        let record_type = record.event_type();
        let (envelope, body) = match (record_type, record.value["message"].as_object()) {
            (Some("message"), Some(inner)) => (Envelope::Wrapped, inner),
            _ => (Envelope::Bare, record.value.as_object().unwrap_or(empty_map())),
        };

        Payload {
            envelope,
            record_type,
            role: field(body, "role").as_str(),
            kind: field(body, "kind").as_str(),
            content: Content::from_value(field(body, "content")),
            text: field(body, "text"),
            raw_content: field(body, "content"),
            tool_name: field(body, "toolName").as_str(),
        }
    }
}

/// Largest representable instant (Unix ms), +/- 100,000,000 days
const MAX_TIMESTAMP_MS: i64 = 8_640_000_000_000_000;

/// Offset-less date-time layouts, tried in order
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn parse_timestamp(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().timestamp_millis())
}

fn field<'m>(body: &'m Map<String, Value>, name: &str) -> &'m Value {
    body.get(name).unwrap_or(&Value::Null)
}

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: Lazy<Map<String, Value>> = Lazy::new(Map::new);
    &EMPTY
}

/// Message content: either a plain string or a sequence of typed parts.
#[derive(Debug, Clone, PartialEq)]
pub enum Content<'a> {
    Missing,
    Text(&'a str),
    Parts(Vec<Part<'a>>),
}

impl<'a> Content<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Content::Text(s),
            Value::Array(items) => Content::Parts(items.iter().map(Part::from_value).collect()),
            _ => Content::Missing,
        }
    }

    /// Plain string content, or the first text part of structured content.
    ///
    /// A text part without a string `text` field yields `Some("")`.
    pub fn first_text(&self) -> Option<&'a str> {
        match self {
            Content::Text(s) => Some(*s),
            Content::Parts(parts) => parts.iter().find_map(|p| match p {
                Part::Text(t) => Some(t.unwrap_or("")),
                _ => None,
            }),
            Content::Missing => None,
        }
    }

    /// Names of all tool-call parts, in order
    pub fn tool_calls(&self) -> Vec<Option<&'a str>> {
        match self {
            Content::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    Part::ToolCall { name } => Some(*name),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// One element of structured content.
#[derive(Debug, Clone, PartialEq)]
pub enum Part<'a> {
    Text(Option<&'a str>),
    ToolCall { name: Option<&'a str> },
    Other,
}

impl<'a> Part<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value["type"].as_str() {
            Some("text") => Part::Text(value["text"].as_str()),
            Some("toolCall") => Part::ToolCall {
                name: value["name"].as_str(),
            },
            _ => Part::Other,
        }
    }
}
