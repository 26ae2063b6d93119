//! Trailing recency window
//!
//! Both the activity feed and the session list only show things that
//! happened recently. One `RecencyWindow` is built per export from a single
//! captured `now`, and every filter goes through it.
//!
//! # Boundary
//!
//! | Timestamp | Recent? |
//! |-----------|---------|
//! | `ts > now - span` | yes (future timestamps included) |
//! | `ts == now - span` | no |
//! | `ts < now - span` | no |

use chrono::{DateTime, Duration, Utc};

/// Default window span (in hours)
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    now_ms: i64,
    span_ms: i64,
}

impl RecencyWindow {
    pub fn new(now: DateTime<Utc>, span: Duration) -> Self {
        Self {
            now_ms: now.timestamp_millis(),
            span_ms: span.num_milliseconds(),
        }
    }

    /// The default 24h window ending at `now`
    pub fn trailing_day(now: DateTime<Utc>) -> Self {
        Self::new(now, Duration::hours(DEFAULT_WINDOW_HOURS))
    }

    /// Export time (Unix ms)
    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    /// Oldest excluded instant (Unix ms)
    pub fn cutoff_ms(&self) -> i64 {
        self.now_ms.saturating_sub(self.span_ms)
    }

    pub fn contains(&self, ts_ms: i64) -> bool {
        ts_ms > self.cutoff_ms()
    }

    /// Like `contains`, but an absent timestamp is never recent.
    pub fn contains_opt(&self, ts_ms: Option<i64>) -> bool {
        ts_ms.is_some_and(|ts| self.contains(ts))
    }
}
