//! Clawdbot integration
//!
//! Reads the gateway's per-session transcripts:
//! - `~/.clawdbot/agents/main/sessions/<sessionId>.jsonl`, one JSON record per line
//!
//! Each file is folded independently into a [`fold::SessionFold`]; results
//! are only merged when the snapshot is assembled.

pub mod classify;
pub mod fold;
pub mod record;
pub mod redact;
pub mod status;
pub mod window;

use fold::{SessionFold, SessionFolder};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment override for the session directory
pub const SESSIONS_DIR_ENV: &str = "CLAWDBOT_SESSIONS_DIR";

/// Default Clawdbot session directory
fn default_sessions_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".clawdbot/agents/main/sessions"))
        .unwrap_or_else(|| PathBuf::from("/tmp/.clawdbot/agents/main/sessions"))
}

/// Get the session directory (respects $CLAWDBOT_SESSIONS_DIR)
pub fn sessions_dir() -> PathBuf {
    sessions_dir_from(std::env::var(SESSIONS_DIR_ENV).ok())
}

fn sessions_dir_from(env_value: Option<String>) -> PathBuf {
    env_value
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_sessions_dir)
}

/// List `*.jsonl` transcripts, sorted by file name.
pub fn session_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!("Session directory {} not readable: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl"))
        .collect();
    files.sort();
    files
}

/// Fold one transcript file. `None` if it cannot be read.
///
/// Invalid UTF-8 is replaced with U+FFFD, so a corrupt line only affects
/// itself.
pub fn load_session_file(path: &Path, folder: &SessionFolder<'_>) -> Option<SessionFold> {
    let session_id = path.file_stem()?.to_string_lossy().into_owned();

    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!("Skipping unreadable session file {}: {}", path.display(), e);
            return None;
        }
    };

    let content = String::from_utf8_lossy(&bytes);
    Some(folder.fold_lines(&session_id, content.lines()))
}

/// Fold every transcript in `dir`. A missing directory yields no sessions.
pub fn load_sessions(dir: &Path, folder: &SessionFolder<'_>) -> Vec<SessionFold> {
    let folds: Vec<SessionFold> = session_files(dir)
        .iter()
        .filter_map(|path| load_session_file(path, folder))
        .collect();

    tracing::debug!("Folded {} session files from {}", folds.len(), dir.display());
    folds
}
