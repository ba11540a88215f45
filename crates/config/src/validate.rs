//! Semantic validation of a loaded configuration.

use crate::schema::ChainchatConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "agent.endpoint"
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path: path.to_string(),
            message: message.into(),
        });
    }
}

/// Check a configuration for values that would stop the bridge from working.
#[must_use]
pub fn validate(config: &ChainchatConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.agent.endpoint.trim().is_empty() {
        result.push(Severity::Error, "agent.endpoint", "agent endpoint is not set");
    } else if !config.agent.endpoint.starts_with("http://")
        && !config.agent.endpoint.starts_with("https://")
    {
        result.push(
            Severity::Error,
            "agent.endpoint",
            "agent endpoint must be an http(s) URL",
        );
    }

    if config.agent.api_key.is_none() {
        result.push(
            Severity::Warning,
            "agent.api_key",
            "no API key configured, requests are sent unauthenticated",
        );
    }

    let identity = &config.identity;
    if identity.address.is_empty() && identity.inbox_id.is_empty() {
        result.push(
            Severity::Error,
            "identity",
            "either identity.address or identity.inbox_id is required to ignore own messages",
        );
    }
    if !identity.address.is_empty() && !is_address(&identity.address) {
        result.push(
            Severity::Error,
            "identity.address",
            "address must be a 0x-prefixed 40-hex string",
        );
    }
    if identity.short_name.trim().is_empty() {
        result.push(
            Severity::Warning,
            "identity.short_name",
            "no short-name tag, group members can only address the agent by id",
        );
    }

    if config.supervisor.max_retries == 0 {
        result.push(
            Severity::Warning,
            "supervisor.max_retries",
            "the first stream failure will stop the process",
        );
    }

    if config.batch.value_decimals > 24 {
        result.push(
            Severity::Error,
            "batch.value_decimals",
            "more than 24 decimals cannot be represented",
        );
    }

    result
}

fn is_address(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
