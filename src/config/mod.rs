use crate::integrations::clawdbot::{sessions_dir, window::DEFAULT_WINDOW_HOURS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub redaction: RedactionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Transcript directory (defaults to $CLAWDBOT_SESSIONS_DIR or ~/.clawdbot/agents/main/sessions)
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
}

fn default_window_hours() -> u32 {
    DEFAULT_WINDOW_HOURS as u32
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            window_hours: default_window_hours(),
        }
    }
}

impl SessionsConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(sessions_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_status_command")]
    pub command: String,
    #[serde(default = "default_status_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_status_command() -> String {
    "clawdbot".to_string()
}

fn default_status_timeout() -> u64 {
    10
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_status_command(),
            timeout_secs: default_status_timeout(),
        }
    }
}

/// Extra redaction rules, applied after the built-in ones
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RedactionConfig {
    #[serde(default)]
    pub rules: Vec<RedactionRuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionRuleConfig {
    pub name: String,
    pub pattern: String,
    pub placeholder: String,
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = directories::ProjectDirs::from("", "", "clawdash")
        .context("Could not determine config directory")?
        .config_dir()
        .to_path_buf();
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load the config.
///
/// An explicit `path` must exist. Without one, the default location is
/// tried and built-in defaults are used if nothing is there.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p.to_path_buf()
        }
        None => match default_config_path() {
            Ok(p) if p.exists() => p,
            _ => {
                tracing::debug!("No config file found, using defaults");
                return Ok(Config::default());
            }
        },
    };

    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sessions.window_hours, 24);
        assert_eq!(config.sessions.dir, None);
        assert_eq!(config.output.path, PathBuf::from("data.json"));
        assert!(config.status.enabled);
        assert_eq!(config.status.command, "clawdbot");
        assert_eq!(config.status.timeout_secs, 10);
        assert!(config.redaction.rules.is_empty());
    }

    #[test]
    fn test_full_config() {
        let toml_str = r#"
            [sessions]
            dir = "/var/lib/clawdbot/sessions"
            window_hours = 6

            [output]
            path = "/srv/dashboard/data.json"

            [status]
            enabled = false
            command = "moltbot"

            [[redaction.rules]]
            name = "aws"
            pattern = "AKIA[0-9A-Z]{16}"
            placeholder = "[AWS key redacted]"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.sessions.resolved_dir(),
            PathBuf::from("/var/lib/clawdbot/sessions")
        );
        assert_eq!(config.sessions.window_hours, 6);
        assert!(!config.status.enabled);
        assert_eq!(config.status.command, "moltbot");
        assert_eq!(config.status.timeout_secs, 10);
        assert_eq!(config.redaction.rules.len(), 1);
        assert_eq!(config.redaction.rules[0].name, "aws");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = load(Some(Path::new("/nonexistent/clawdash.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_from_path_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sessions\nwindow_hours = ").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
