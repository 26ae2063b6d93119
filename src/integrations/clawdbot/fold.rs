//! Per-session fold
//!
//! A session log is reduced in a single left-to-right pass. The running
//! state lives in an explicit [`SessionAccumulator`] that each record
//! transforms into the next one, so the fold can be driven by synthetic
//! record sequences in tests.
//!
//! Aggregates (tokens, last activity) cover the whole file. Activity
//! entries only cover records inside the classifier's window, and are
//! tagged with the session key known *at that point* of the fold.

use super::classify::Classifier;
use super::record::RawEvent;
use crate::data::{ActivityEntry, SessionAggregate};
use crate::util::truncate_chars;

/// Model reported when a session never logged a `model_change`
pub const UNKNOWN_MODEL: &str = "unknown";

/// Length of the key derived from a session file name
pub const FALLBACK_KEY_CHARS: usize = 12;

/// Key used until a `session` record names the session.
pub fn fallback_key(session_id: &str) -> String {
    truncate_chars(session_id, FALLBACK_KEY_CHARS)
}

/// Result of folding one session file.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFold {
    pub aggregate: SessionAggregate,
    /// Entries in log order
    pub entries: Vec<ActivityEntry>,
}

/// Running state of the fold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionAccumulator {
    pub session_key: Option<String>,
    pub model: Option<String>,
    pub total_tokens: u64,
    pub last_activity: Option<i64>,
    pub entries: Vec<ActivityEntry>,
}

impl SessionAccumulator {
    /// Advance the fold by one record.
    pub fn step(mut self, record: &RawEvent, classifier: &Classifier<'_>, fallback: &str) -> Self {
        match record.event_type() {
            Some("session") => {
                if let Some(key) = record.session_key() {
                    self.session_key = Some(key.to_string());
                }
            }
            Some("model_change") => {
                if let Some(model) = record.model_id() {
                    self.model = Some(model.to_string());
                }
            }
            _ => {}
        }

        if let Some(tokens) = record.total_tokens() {
            self.total_tokens = self.total_tokens.saturating_add(tokens);
        }

        if let Some(ts) = record.timestamp_ms() {
            self.last_activity = Some(self.last_activity.map_or(ts, |prev| prev.max(ts)));
        }

        if let Some(classified) = classifier.classify(record) {
            // classify() only succeeds for timestamped records
            let timestamp = record.timestamp_ms().unwrap_or_default();
            let session_key = self.key_or(fallback);
            self.entries.push(ActivityEntry {
                timestamp,
                session_key,
                event_type: classified.event_type,
                summary: classified.summary,
            });
        }

        self
    }

    fn key_or(&self, fallback: &str) -> String {
        self.session_key
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn finish(self, fallback: &str) -> SessionFold {
        let key = self.key_or(fallback);
        SessionFold {
            aggregate: SessionAggregate {
                key,
                model: self.model.unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
                total_tokens: self.total_tokens,
                last_activity: self.last_activity,
            },
            entries: self.entries,
        }
    }
}

/// Folds session logs against one classifier (and therefore one `now`).
#[derive(Debug, Clone, Copy)]
pub struct SessionFolder<'a> {
    classifier: Classifier<'a>,
}

impl<'a> SessionFolder<'a> {
    pub fn new(classifier: Classifier<'a>) -> Self {
        Self { classifier }
    }

    /// Fold already-parsed records of the session named `session_id`
    /// (usually the log file stem).
    pub fn fold<'r, I>(&self, session_id: &str, records: I) -> SessionFold
    where
        I: IntoIterator<Item = &'r RawEvent>,
    {
        let fallback = fallback_key(session_id);
        records
            .into_iter()
            .fold(SessionAccumulator::default(), |acc, record| {
                acc.step(record, &self.classifier, &fallback)
            })
            .finish(&fallback)
    }

    /// Parse and fold raw log lines. Blank lines are ignored and lines that
    /// are not valid JSON are skipped without affecting the result.
    pub fn fold_lines<'l, I>(&self, session_id: &str, lines: I) -> SessionFold
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut skipped = 0usize;
        let records: Vec<RawEvent> = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let parsed = RawEvent::parse(line);
                if parsed.is_none() {
                    skipped += 1;
                }
                parsed
            })
            .collect();

        if skipped > 0 {
            tracing::debug!("Skipped {} unparsable lines in session {}", skipped, session_id);
        }

        self.fold(session_id, &records)
    }
}
