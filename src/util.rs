//! Utility functions and helpers.

/// Maximum length (in chars) of any activity summary.
pub const SUMMARY_MAX_CHARS: usize = 80;

/// Truncate a string to at most `max` chars, never splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Truncate to the activity summary limit.
pub fn truncate_summary(s: &str) -> String {
    truncate_chars(s, SUMMARY_MAX_CHARS)
}
