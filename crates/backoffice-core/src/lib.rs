#![forbid(unsafe_code)]

pub mod canonical;
mod error;

use std::path::PathBuf;

pub use crate::error::{ConfigPathScope, ExitCode, MachineError};

pub const CRATE_NAME: &str = "backoffice-core";

pub const ENV_BACKOFFICE_LOG_LEVEL: &str = "BACKOFFICE_LOG_LEVEL";
pub const ENV_BACKOFFICE_LOG_JSON: &str = "BACKOFFICE_LOG_JSON";
pub const ENV_BACKOFFICE_CONFIG: &str = "BACKOFFICE_CONFIG";

const CONFIG_DIR_NAME: &str = "backoffice";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolves where the CLI looks for its TOML config.
///
/// User scope honours `BACKOFFICE_CONFIG`, then `XDG_CONFIG_HOME`, then
/// `HOME/.config`. Blank variables are treated as unset.
#[must_use]
pub fn resolve_backoffice_config_path(scope: ConfigPathScope) -> PathBuf {
    match scope {
        ConfigPathScope::User => {
            if let Some(explicit) = non_blank_env(ENV_BACKOFFICE_CONFIG) {
                return PathBuf::from(explicit);
            }
            if let Some(xdg_config_home) = non_blank_env("XDG_CONFIG_HOME") {
                return PathBuf::from(xdg_config_home)
                    .join(CONFIG_DIR_NAME)
                    .join(CONFIG_FILE_NAME);
            }
            if let Some(home) = non_blank_env("HOME") {
                return PathBuf::from(home)
                    .join(".config")
                    .join(CONFIG_DIR_NAME)
                    .join(CONFIG_FILE_NAME);
            }
            workspace_config_path()
        }
        ConfigPathScope::Workspace => workspace_config_path(),
    }
}

fn workspace_config_path() -> PathBuf {
    PathBuf::from(".backoffice").join(CONFIG_FILE_NAME)
}

fn non_blank_env(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
