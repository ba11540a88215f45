//! Configuration loading, validation and env substitution.
//!
//! Config files: `chainchat.toml`, `chainchat.yaml` or `chainchat.json`,
//! searched in `./` then the user config directory.
//!
//! Supports `${ENV_VAR}` substitution in all string values and
//! `CHAINCHAT_*` environment overrides for secrets and endpoints.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{apply_env_overrides, config_dir, discover_and_load, find_config_file, load_config},
    schema::{
        AgentConfig, BatchConfig, ChainchatConfig, RepliesConfig, ResponseFormat,
        SupervisorConfig,
    },
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
