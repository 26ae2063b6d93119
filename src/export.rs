//! One-shot dashboard export.
//!
//! Folds every session transcript, queries the gateway CLI, assembles the
//! [`Snapshot`] and writes it as pretty-printed JSON. A single `now` is
//! captured per run and shared by every recency filter.

use crate::config::Config;
use crate::data::sorting::collect_activity;
use crate::data::{ActivityEntry, SessionAggregate, Snapshot};
use crate::integrations::clawdbot::{
    self,
    classify::Classifier,
    fold::{SessionFold, SessionFolder},
    redact::Redactor,
    status::{self, StatusFacts},
    window::RecencyWindow,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Assemble the snapshot.
///
/// Only aggregates with a last activity inside `window` are kept; `activity`
/// is passed through as-is.
pub fn build(
    facts: StatusFacts,
    aggregates: Vec<SessionAggregate>,
    activity: Vec<ActivityEntry>,
    window: &RecencyWindow,
) -> Snapshot {
    let sessions = aggregates
        .into_iter()
        .filter(|s| window.contains_opt(s.last_activity))
        .collect();

    Snapshot {
        timestamp: window.now_ms(),
        gateway: facts.into_gateway_info(),
        sessions,
        activity_log: activity,
    }
}

/// Split per-session folds into aggregates and the merged, sorted feed.
pub fn merge_folds(folds: Vec<SessionFold>) -> (Vec<SessionAggregate>, Vec<ActivityEntry>) {
    let (aggregates, entries): (Vec<_>, Vec<_>) = folds
        .into_iter()
        .map(|fold| (fold.aggregate, fold.entries))
        .unzip();
    (aggregates, collect_activity(entries))
}

/// Build the snapshot for `now` without touching the output file.
pub async fn export(config: &Config, now: DateTime<Utc>) -> Result<Snapshot> {
    let redactor = Redactor::with_extra_rules(&config.redaction.rules)
        .context("Invalid redaction rules in config")?;
    tracing::debug!("Redacting user text with {} rules", redactor.rules().len());
    let window = RecencyWindow::new(now, Duration::hours(i64::from(config.sessions.window_hours)));

    let facts = if config.status.enabled {
        status::probe(
            &config.status.command,
            std::time::Duration::from_secs(config.status.timeout_secs),
        )
        .await
    } else {
        StatusFacts::unavailable()
    };

    let dir = config.sessions.resolved_dir();
    let folder = SessionFolder::new(Classifier::new(window, &redactor));
    let (aggregates, activity) = merge_folds(clawdbot::load_sessions(&dir, &folder));

    let snapshot = build(facts, aggregates, activity, &window);
    tracing::debug!(
        "Snapshot has {} recent sessions and {} activity entries",
        snapshot.sessions.len(),
        snapshot.activity_log.len()
    );
    Ok(snapshot)
}

/// Write the snapshot under an exclusive lock.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("Failed to lock {}", path.display()))?;

    let mut writer = std::io::BufWriter::new(&file);
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
    drop(writer);

    file.unlock()?;
    Ok(())
}

/// Export now and write to the configured output path.
pub async fn run(config: &Config) -> Result<PathBuf> {
    let snapshot = export(config, Utc::now()).await?;
    let path = config.output.path.clone();
    write_snapshot(&path, &snapshot)?;
    tracing::info!(
        "Wrote {} sessions and {} activity entries to {} (gateway {})",
        snapshot.sessions.len(),
        snapshot.activity_log.len(),
        path.display(),
        snapshot.gateway.status.label()
    );
    Ok(path)
}
