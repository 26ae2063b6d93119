//! Secret redaction for user-authored text
//!
//! An ordered list of regex rules, each replacing every match with a fixed
//! placeholder naming the credential kind. Only the listed patterns are
//! covered; anything else passes through verbatim.
//!
//! Rules are re-applied until the text stops changing, so a placeholder
//! that combines with its surroundings into a new match is caught too and
//! `redact` is idempotent.

use crate::config::RedactionRuleConfig;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Built-in rules: (name, pattern, placeholder)
const BUILTIN_RULES: &[(&str, &str, &str)] = &[
    ("github", r"ghp_[a-zA-Z0-9]{36}", "[GitHub token redacted]"),
    (
        "anthropic",
        r"sk-ant-[a-zA-Z0-9_-]{95,}",
        "[Anthropic key redacted]",
    ),
    ("slack", r"xoxb-[0-9-]{30,}", "[Slack bot token redacted]"),
];

/// Upper bound on full passes over the rule list
const MAX_PASSES: usize = 8;

static DEFAULT_REDACTOR: Lazy<Redactor> = Lazy::new(Redactor::default);

/// Redact `text` with the built-in rules.
pub fn redact(text: &str) -> String {
    DEFAULT_REDACTOR.redact(text)
}

#[derive(Debug, Clone)]
pub struct RedactionRule {
    pub name: String,
    pattern: Regex,
    pub placeholder: String,
}

impl RedactionRule {
    pub fn new(name: &str, pattern: &str, placeholder: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Invalid redaction pattern for rule '{}'", name))?;
        Ok(Self {
            name: name.to_string(),
            pattern,
            placeholder: placeholder.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Redactor {
    rules: Vec<RedactionRule>,
}

impl Default for Redactor {
    fn default() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(name, pattern, placeholder)| RedactionRule {
                name: name.to_string(),
                pattern: Regex::new(pattern).expect("Invalid built-in redaction pattern"),
                placeholder: placeholder.to_string(),
            })
            .collect();
        Self { rules }
    }
}

impl Redactor {
    /// Built-in rules followed by the configured extra rules.
    ///
    /// Fails if a pattern does not compile, or if any placeholder would
    /// itself be matched by a rule.
    pub fn with_extra_rules(extra: &[RedactionRuleConfig]) -> Result<Self> {
        let mut redactor = Self::default();
        for rule in extra {
            redactor
                .rules
                .push(RedactionRule::new(&rule.name, &rule.pattern, &rule.placeholder)?);
        }
        redactor.check_placeholders()?;
        Ok(redactor)
    }

    pub fn rules(&self) -> &[RedactionRule] {
        &self.rules
    }

    /// Apply every rule, in order, until no rule matches anymore.
    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for _ in 0..MAX_PASSES {
            match self.redact_pass(&out) {
                Some(next) => out = next,
                None => return out,
            }
        }
        tracing::warn!("Redaction did not settle after {} passes", MAX_PASSES);
        out
    }

    /// One pass over the rule list. `None` if nothing matched.
    fn redact_pass(&self, text: &str) -> Option<String> {
        let mut out: Option<String> = None;
        for rule in &self.rules {
            let current = out.as_deref().unwrap_or(text);
            if !rule.pattern.is_match(current) {
                continue;
            }
            // NoExpand: placeholders are literal, `$` is not a group reference
            let replaced = rule
                .pattern
                .replace_all(current, NoExpand(&rule.placeholder))
                .into_owned();
            out = Some(replaced);
        }
        out
    }

    fn check_placeholders(&self) -> Result<()> {
        for rule in &self.rules {
            if let Some(other) = self
                .rules
                .iter()
                .find(|r| r.pattern.is_match(&rule.placeholder))
            {
                anyhow::bail!(
                    "Placeholder of redaction rule '{}' is matched by rule '{}'",
                    rule.name,
                    other.name
                );
            }
        }
        Ok(())
    }
}
