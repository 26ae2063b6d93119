//! Event classification for the activity feed
//!
//! Maps one log record to an `(EventType, summary)` pair. Classification
//! never fails on malformed shapes: every missing or mistyped field falls
//! back to a fixed literal.

use super::record::{Payload, RawEvent};
use super::redact::Redactor;
use super::window::RecencyWindow;
use crate::data::EventType;
use crate::util::truncate_summary;
use serde_json::Value;

const UNKNOWN_EVENT: &str = "unknown event";
const ASSISTANT_FALLBACK: &str = "assistant response";
const SYSTEM_FALLBACK: &str = "system event";
const UNNAMED_TOOL: &str = "unknown";
const TOOL_RESULT_FALLBACK: &str = "tool result";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub event_type: EventType,
    pub summary: String,
}

impl Classified {
    fn new(event_type: EventType, summary: impl AsRef<str>) -> Self {
        Self {
            event_type,
            summary: truncate_summary(summary.as_ref()),
        }
    }
}

/// Classifies records against one recency window.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    window: RecencyWindow,
    redactor: &'a Redactor,
}

impl<'a> Classifier<'a> {
    pub fn new(window: RecencyWindow, redactor: &'a Redactor) -> Self {
        Self { window, redactor }
    }

    /// Classify a record, or `None` if it has no timestamp or is outside
    /// the window.
    pub fn classify(&self, record: &RawEvent) -> Option<Classified> {
        let ts = record.timestamp_ms()?;
        if !self.window.contains(ts) {
            return None;
        }
        Some(self.describe(&record.payload()))
    }

    /// Classify a normalized payload, ignoring time.
    pub fn describe(&self, payload: &Payload<'_>) -> Classified {
        match payload.role {
            Some("user") => {
                let text = payload.content.first_text().unwrap_or("");
                Classified::new(EventType::UserMessage, self.redactor.redact(text))
            }
            Some("assistant") => describe_assistant(payload),
            Some("toolResult") => {
                let summary = match payload.tool_name {
                    Some(name) => format!("{} result", name),
                    None => TOOL_RESULT_FALLBACK.to_string(),
                };
                Classified::new(EventType::ToolCall, summary)
            }
            _ if payload.kind == Some("system") || payload.record_type == Some("system") => {
                Classified::new(EventType::System, system_summary(payload))
            }
            _ => Classified::new(EventType::Other, UNKNOWN_EVENT),
        }
    }
}

fn describe_assistant(payload: &Payload<'_>) -> Classified {
    let tool_calls = payload.content.tool_calls();
    if !tool_calls.is_empty() {
        let names: Vec<&str> = tool_calls
            .iter()
            .map(|name| name.unwrap_or(UNNAMED_TOOL))
            .collect();
        return Classified::new(EventType::ToolCall, names.join(", "));
    }

    let text = payload.content.first_text().unwrap_or(ASSISTANT_FALLBACK);
    Classified::new(EventType::AssistantMessage, text)
}

/// `text`, then `content`, then the outer type tag, then a literal.
fn system_summary(payload: &Payload<'_>) -> String {
    [payload.text, payload.raw_content]
        .into_iter()
        .find(|v| is_truthy(v))
        .map(render_value)
        .or_else(|| {
            payload
                .record_type
                .filter(|t| !t.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| SYSTEM_FALLBACK.to_string())
}

/// Loose truthiness: empty strings, zero, false and null are all "absent".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn describe(value: Value) -> Classified {
        let redactor = Redactor::default();
        let classifier = Classifier::new(RecencyWindow::trailing_day(Utc::now()), &redactor);
        let record = RawEvent::from_value(value);
        classifier.describe(&record.payload())
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1.5)));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_user_structured_content_takes_first_text() {
        let c = describe(json!({
            "role": "user",
            "content": [
                {"type": "image", "data": "..."},
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ]
        }));
        assert_eq!(c.event_type, EventType::UserMessage);
        assert_eq!(c.summary, "first");
    }

    #[test]
    fn test_user_without_content_is_empty() {
        let c = describe(json!({"role": "user"}));
        assert_eq!(c.event_type, EventType::UserMessage);
        assert_eq!(c.summary, "");
    }

    #[test]
    fn test_user_text_is_redacted_before_truncation() {
        let text = format!("{}ghp_{}", "x".repeat(60), "Z".repeat(36));
        let c = describe(json!({"role": "user", "content": text}));
        assert!(!c.summary.contains("ZZZZ"));
        assert!(c.summary.starts_with(&"x".repeat(60)));
        assert_eq!(c.summary.chars().count(), 80);
    }

    #[test]
    fn test_assistant_text() {
        let c = describe(json!({
            "role": "assistant",
            "content": [{"type": "text", "text": "All done."}]
        }));
        assert_eq!(c.event_type, EventType::AssistantMessage);
        assert_eq!(c.summary, "All done.");
    }

    #[test]
    fn test_assistant_without_text_uses_fallback() {
        let c = describe(json!({
            "role": "assistant",
            "content": [{"type": "thinking", "thinking": "hmm"}]
        }));
        assert_eq!(c.event_type, EventType::AssistantMessage);
        assert_eq!(c.summary, "assistant response");

        let c = describe(json!({"role": "assistant"}));
        assert_eq!(c.summary, "assistant response");
    }

    #[test]
    fn test_assistant_plain_string_content() {
        let c = describe(json!({"role": "assistant", "content": "plain reply"}));
        assert_eq!(c.event_type, EventType::AssistantMessage);
        assert_eq!(c.summary, "plain reply");
    }

    #[test]
    fn test_assistant_tool_calls_win_over_text() {
        let c = describe(json!({
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Let me look"},
                {"type": "toolCall", "name": "read"},
                {"type": "toolCall"}
            ]
        }));
        assert_eq!(c.event_type, EventType::ToolCall);
        assert_eq!(c.summary, "read, unknown");
    }

    #[test]
    fn test_tool_result() {
        let c = describe(json!({"role": "toolResult", "toolName": "exec"}));
        assert_eq!(c.event_type, EventType::ToolCall);
        assert_eq!(c.summary, "exec result");

        let c = describe(json!({"role": "toolResult"}));
        assert_eq!(c.summary, "tool result");
    }

    #[test]
    fn test_system_kind_uses_text() {
        let c = describe(json!({"kind": "system", "text": "Gateway restarted"}));
        assert_eq!(c.event_type, EventType::System);
        assert_eq!(c.summary, "Gateway restarted");
    }

    #[test]
    fn test_system_type_falls_back_to_type_tag() {
        let c = describe(json!({"type": "system"}));
        assert_eq!(c.event_type, EventType::System);
        assert_eq!(c.summary, "system");
    }

    #[test]
    fn test_system_kind_without_anything_uses_literal() {
        let c = describe(json!({"kind": "system"}));
        assert_eq!(c.summary, "system event");
    }

    #[test]
    fn test_system_structured_content_is_serialized_and_truncated() {
        let c = describe(json!({
            "type": "system",
            "content": {"detail": "x".repeat(200)}
        }));
        assert_eq!(c.event_type, EventType::System);
        assert!(c.summary.starts_with(r#"{"detail":"xxx"#));
        assert_eq!(c.summary.chars().count(), 80);
    }

    #[test]
    fn test_system_empty_text_skipped() {
        let c = describe(json!({"type": "system", "text": "", "content": "from content"}));
        assert_eq!(c.summary, "from content");
    }

    #[test]
    fn test_unknown_shape() {
        let c = describe(json!({"type": "custom", "foo": 1}));
        assert_eq!(c.event_type, EventType::Other);
        assert_eq!(c.summary, "unknown event");
    }

    #[test]
    fn test_wrapped_message_is_unwrapped() {
        let c = describe(json!({
            "type": "message",
            "message": {"role": "toolResult", "toolName": "write"}
        }));
        assert_eq!(c.summary, "write result");
    }

    #[test]
    fn test_mistyped_fields_degrade() {
        let c = describe(json!({"role": 7, "content": {"type": "text"}}));
        assert_eq!(c.event_type, EventType::Other);

        let c = describe(json!({"role": "assistant", "content": [null, 3, "x"]}));
        assert_eq!(c.event_type, EventType::AssistantMessage);
        assert_eq!(c.summary, "assistant response");
    }

    #[test]
    fn test_classify_requires_timestamp() {
        let redactor = Redactor::default();
        let classifier = Classifier::new(RecencyWindow::trailing_day(Utc::now()), &redactor);
        let record = RawEvent::from_value(json!({"role": "user", "content": "hi"}));
        assert!(classifier.classify(&record).is_none());
    }

    #[test]
    fn test_classify_filters_old_records() {
        let now = Utc::now();
        let redactor = Redactor::default();
        let classifier = Classifier::new(RecencyWindow::trailing_day(now), &redactor);

        let old = RawEvent::from_value(json!({
            "timestamp": (now - Duration::hours(25)).to_rfc3339(),
            "role": "user",
            "content": "stale"
        }));
        assert!(classifier.classify(&old).is_none());

        let fresh = RawEvent::from_value(json!({
            "timestamp": (now - Duration::minutes(5)).to_rfc3339(),
            "role": "user",
            "content": "fresh"
        }));
        assert_eq!(classifier.classify(&fresh).unwrap().summary, "fresh");
    }
}
