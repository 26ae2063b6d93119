//! Gateway status from the Clawdbot CLI
//!
//! Runs `clawdbot gateway status` and `clawdbot models status` and scrapes
//! the few facts the dashboard shows. The CLI is optional: any failure
//! (missing binary, non-zero exit, timeout) degrades to defaults.
//!
//! # Parsed output
//!
//! ```text
//! Default   : anthropic/claude-opus-4-5
//! Fallbacks (2): openai/gpt-5, google/gemini-2.5-pro
//! Auth
//!   - anthropic effective=oauth
//!   - openai effective=env
//! ```

use crate::data::{AuthInfo, GatewayInfo, GatewayStatus, ModelInfo};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tokio::process::Command;

pub const UNKNOWN_MODEL: &str = "unknown";
pub const NO_FALLBACKS: &str = "none";

static DEFAULT_MODEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Default\s*:\s*(.+)").expect("Invalid default-model regex"));
static FALLBACKS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Fallbacks\s*\((\d+)\)\s*:\s*(.+)").expect("Invalid fallbacks regex")
});
static AUTH_PROVIDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^- (\w+)\s+effective=").expect("Invalid auth provider regex"));

/// Facts supplied by the gateway CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFacts {
    pub gateway: GatewayStatus,
    pub default_model: String,
    pub fallbacks: String,
    pub auth_providers: Vec<String>,
}

impl StatusFacts {
    /// Defaults used when the CLI is unavailable or disabled
    pub fn unavailable() -> Self {
        Self::from_outputs(None, None)
    }

    /// Parse the raw CLI outputs. Either may be absent.
    pub fn from_outputs(gateway_output: Option<&str>, models_output: Option<&str>) -> Self {
        let models = models_output.unwrap_or("");

        Self {
            gateway: parse_gateway_status(gateway_output),
            default_model: DEFAULT_MODEL_RE
                .captures(models)
                .map(|c| c[1].trim().to_string())
                .unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
            fallbacks: FALLBACKS_RE
                .captures(models)
                .map(|c| c[2].trim().to_string())
                .unwrap_or_else(|| NO_FALLBACKS.to_string()),
            auth_providers: parse_auth_providers(models),
        }
    }

    pub fn into_gateway_info(self) -> GatewayInfo {
        GatewayInfo {
            status: self.gateway,
            model: ModelInfo {
                primary: self.default_model,
                fallbacks: self.fallbacks,
            },
            auth: AuthInfo {
                providers: self.auth_providers,
            },
        }
    }
}

fn parse_gateway_status(output: Option<&str>) -> GatewayStatus {
    match output {
        Some(text)
            if !text.contains("not running")
                && (text.contains("running") || text.contains("Gateway is up")) =>
        {
            GatewayStatus::Running
        }
        _ => GatewayStatus::Stopped,
    }
}

/// Provider ids from `- <provider> effective=...` lines, in order.
fn parse_auth_providers(models_output: &str) -> Vec<String> {
    models_output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("- "))
        .filter_map(|line| AUTH_PROVIDER_RE.captures(line))
        .map(|c| c[1].to_string())
        .collect()
}

/// Query the gateway CLI. Both commands run concurrently.
pub async fn probe(command: &str, timeout: Duration) -> StatusFacts {
    let (gateway, models) = tokio::join!(
        run_cli(command, &["gateway", "status"], timeout),
        run_cli(command, &["models", "status"], timeout)
    );
    StatusFacts::from_outputs(gateway.as_deref(), models.as_deref())
}

/// Run the CLI and return stdout followed by stderr, or `None` on any failure.
async fn run_cli(command: &str, args: &[&str], timeout: Duration) -> Option<String> {
    let output = match tokio::time::timeout(
        timeout,
        Command::new(command).args(args).kill_on_drop(true).output(),
    )
    .await
    {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            tracing::debug!("Failed to run `{} {}`: {}", command, args.join(" "), e);
            return None;
        }
        Err(_) => {
            tracing::debug!("`{} {}` timed out after {:?}", command, args.join(" "), timeout);
            return None;
        }
    };

    if !output.status.success() {
        tracing::debug!("`{} {}` exited with {}", command, args.join(" "), output.status);
        return None;
    }

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Some(text)
}
