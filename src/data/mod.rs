pub mod sorting;

use serde::{Deserialize, Serialize};

/// Root document consumed by the dashboard.
///
/// Key names are part of the dashboard contract, so every struct here
/// serializes in camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Export time (Unix ms)
    pub timestamp: i64,
    pub gateway: GatewayInfo,
    pub sessions: Vec<SessionAggregate>,
    pub activity_log: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayInfo {
    pub status: GatewayStatus,
    pub model: ModelInfo,
    pub auth: AuthInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStatus {
    Running,
    #[default]
    Stopped,
}

impl GatewayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub primary: String,
    /// Free text as printed by the gateway CLI (e.g. "openai/gpt-5, google/gemini")
    pub fallbacks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthInfo {
    /// Provider identifiers in the order reported, duplicates kept
    pub providers: Vec<String>,
}

/// Reduced state of one session log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAggregate {
    pub key: String,
    pub model: String,
    pub total_tokens: u64,
    /// Latest timestamp seen anywhere in the file (Unix ms)
    pub last_activity: Option<i64>,
}

/// Display classification of a single log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    UserMessage,
    AssistantMessage,
    ToolCall,
    System,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserMessage => "user_message",
            Self::AssistantMessage => "assistant_message",
            Self::ToolCall => "tool_call",
            Self::System => "system",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One item of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Unix ms
    pub timestamp: i64,
    pub session_key: String,
    pub event_type: EventType,
    /// Redacted, at most 80 chars
    pub summary: String,
}
