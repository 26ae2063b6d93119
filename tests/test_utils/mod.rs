//! Test utilities and fixtures for clawdash tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use clawdash::integrations::clawdbot::{
    classify::Classifier, fold::SessionFolder, record::RawEvent, redact::Redactor,
    window::RecencyWindow,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// A GitHub token with the 36-char body the redactor recognizes
pub fn github_token() -> String {
    format!("ghp_{}", "A".repeat(36))
}

/// RFC 3339 timestamp `ago` before `now`
pub fn iso_ago(now: DateTime<Utc>, ago: Duration) -> String {
    (now - ago).to_rfc3339()
}

pub fn session_record(key: &str, ts: &str) -> Value {
    json!({"type": "session", "sessionKey": key, "timestamp": ts})
}

pub fn user_message(text: &str, ts: &str) -> Value {
    json!({
        "type": "message",
        "timestamp": ts,
        "message": {"role": "user", "content": [{"type": "text", "text": text}]}
    })
}

pub fn system_event(text: &str, ts: &str) -> Value {
    json!({"type": "system", "timestamp": ts, "text": text})
}

pub fn records(values: Vec<Value>) -> Vec<RawEvent> {
    values.into_iter().map(RawEvent::from_value).collect()
}

/// Write records as a `.jsonl` transcript named `<session_id>.jsonl`
pub fn write_transcript(dir: &Path, session_id: &str, values: &[Value]) {
    let content: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    fs::write(dir.join(format!("{}.jsonl", session_id)), content.join("\n")).unwrap();
}

/// Run `f` with a folder whose window ends at `now`
pub fn with_folder<T>(now: DateTime<Utc>, f: impl FnOnce(&SessionFolder<'_>) -> T) -> T {
    let redactor = Redactor::default();
    let folder = SessionFolder::new(Classifier::new(RecencyWindow::trailing_day(now), &redactor));
    f(&folder)
}
