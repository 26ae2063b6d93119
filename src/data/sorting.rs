//! Ordering of the activity feed.
//!
//! Single place where per-session activity entries are merged, so the
//! dashboard always sees the feed newest-first.

use super::ActivityEntry;

/// Merge entries from every session and sort them newest-first.
///
/// The sort is stable: entries sharing a timestamp keep the order in which
/// their sessions were folded.
pub fn collect_activity<I>(per_session: I) -> Vec<ActivityEntry>
where
    I: IntoIterator<Item = Vec<ActivityEntry>>,
{
    let mut entries: Vec<ActivityEntry> = per_session.into_iter().flatten().collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}
