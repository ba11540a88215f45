use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::ChainchatConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "chainchat.toml",
    "chainchat.yaml",
    "chainchat.yml",
    "chainchat.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<ChainchatConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./chainchat.{toml,yaml,yml,json}`
/// 2. `<user config dir>/chainchat/chainchat.{toml,yaml,yml,json}`
///
/// Falls back to `ChainchatConfig::default()` when nothing is found or the
/// file fails to parse.
pub fn discover_and_load() -> ChainchatConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                ChainchatConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            ChainchatConfig::default()
        },
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(PathBuf::from)
        .chain(
            config_dir()
                .into_iter()
                .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name))),
        )
        .find(|p| p.exists())
}

/// Returns the user-global config directory.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "chainchat").map(|d| d.config_dir().to_path_buf())
}

/// Override selected fields from `CHAINCHAT_*` variables.
///
/// Secrets are expected to come from the environment in deployments, so
/// these take precedence over file values.
pub fn apply_env_overrides(
    config: &mut ChainchatConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(endpoint) = lookup("CHAINCHAT_AGENT_ENDPOINT") {
        config.agent.endpoint = endpoint;
    }
    if let Some(key) = lookup("CHAINCHAT_AGENT_API_KEY") {
        config.agent.api_key = Some(Secret::new(key));
    }
    if let Some(agent_id) = lookup("CHAINCHAT_AGENT_ID") {
        config.agent.agent_id = agent_id;
    }
    if let Some(address) = lookup("CHAINCHAT_AGENT_ADDRESS") {
        config.identity.address = address;
    }
    if let Some(inbox_id) = lookup("CHAINCHAT_INBOX_ID") {
        config.identity.inbox_id = inbox_id;
    }
    if let Some(raw) = lookup("CHAINCHAT_MAX_RETRIES") {
        match raw.parse() {
            Ok(n) => config.supervisor.max_retries = n,
            Err(e) => warn!(value = %raw, error = %e, "ignoring invalid CHAINCHAT_MAX_RETRIES"),
        }
    }
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<ChainchatConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chainchat.toml");
        std::fs::write(
            &path,
            "[agent]\nendpoint = \"https://agent.example.com\"\n[supervisor]\nretry_delay_secs = 1\n",
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.agent.endpoint, "https://agent.example.com");
        assert_eq!(cfg.supervisor.retry_delay_secs, 1);
    }

    #[test]
    fn loads_yaml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("chainchat.yaml");
        std::fs::write(&yaml, "identity:\n  short_name: \"@yaml\"\n").unwrap();
        assert_eq!(load_config(&yaml).unwrap().identity.short_name, "@yaml");

        let json = dir.path().join("chainchat.json");
        std::fs::write(&json, r#"{"batch": {"schema_version": "2.0"}}"#).unwrap();
        assert_eq!(load_config(&json).unwrap().batch.schema_version, "2.0");
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chainchat.ini");
        std::fs::write(&path, "x=1").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/chainchat.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/chainchat.toml"));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut cfg = ChainchatConfig::default();
        cfg.agent.endpoint = "https://file.example.com".into();
        apply_env_overrides(&mut cfg, |name| match name {
            "CHAINCHAT_AGENT_ENDPOINT" => Some("https://env.example.com".into()),
            "CHAINCHAT_AGENT_API_KEY" => Some("sk-env".into()),
            "CHAINCHAT_MAX_RETRIES" => Some("9".into()),
            _ => None,
        });
        assert_eq!(cfg.agent.endpoint, "https://env.example.com");
        assert_eq!(cfg.agent.api_key.unwrap().expose_secret(), "sk-env");
        assert_eq!(cfg.supervisor.max_retries, 9);
    }

    #[test]
    fn invalid_retry_override_is_ignored() {
        let mut cfg = ChainchatConfig::default();
        apply_env_overrides(&mut cfg, |name| {
            (name == "CHAINCHAT_MAX_RETRIES").then(|| "lots".to_string())
        });
        assert_eq!(cfg.supervisor.max_retries, 5);
    }
}
