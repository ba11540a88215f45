use anyhow::Result;

use chainchat_config::{ChainchatConfig, Diagnostic, Severity, ValidationResult, validate};

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub fn handle_check(config: &ChainchatConfig) -> Result<()> {
    let result = validate(config);
    print_diagnostics(&result);

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if result.has_errors() {
        anyhow::bail!("configuration has {errors} error(s)");
    }
    Ok(())
}

pub fn print_diagnostics(result: &ValidationResult) {
    for d in &result.diagnostics {
        eprintln!("  {}", format_diagnostic(d));
    }
    if !result.diagnostics.is_empty() {
        eprintln!();
    }
}

fn format_diagnostic(d: &Diagnostic) -> String {
    let (color, label) = match d.severity {
        Severity::Error => (RED, "error"),
        Severity::Warning => (YELLOW, "warning"),
    };
    if d.path.is_empty() {
        format!("{BOLD}{color}{label}{RESET} {}", d.message)
    } else {
        format!("{BOLD}{color}{label}{RESET} {}: {}", d.path, d.message)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_fails_the_check() {
        let err = handle_check(&ChainchatConfig::default()).unwrap_err();
        assert!(err.to_string().contains("error(s)"));
    }

    #[test]
    fn diagnostic_formatting() {
        let line = format_diagnostic(&Diagnostic {
            severity: Severity::Warning,
            path: "replies.welcome".into(),
            message: "empty".into(),
        });
        assert!(line.contains("warning"));
        assert!(line.ends_with("replies.welcome: empty"));
    }
}
