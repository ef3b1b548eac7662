use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use backoffice_core::{resolve_backoffice_config_path, ConfigPathScope};
use backoffice_model::PermissionSet;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CliConfig {
    #[serde(default)]
    pub(crate) logging: LoggingConfig,
    /// Named permission bundles expanded by `--role`.
    #[serde(default)]
    pub(crate) roles: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LoggingConfig {
    pub(crate) level: Option<String>,
    pub(crate) json: Option<bool>,
}

#[derive(Debug)]
pub(crate) enum ConfigError {
    Read(String),
    Parse(String),
    UnknownRole(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(msg) | Self::Parse(msg) => f.write_str(msg),
            Self::UnknownRole(role) => write!(f, "unknown role `{role}`"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The user config wins; the workspace file is only consulted when no user
/// config exists.
pub(crate) fn config_candidates() -> [PathBuf; 2] {
    [
        resolve_backoffice_config_path(ConfigPathScope::User),
        resolve_backoffice_config_path(ConfigPathScope::Workspace),
    ]
}

pub(crate) fn load_cli_config() -> Result<(CliConfig, Option<PathBuf>), ConfigError> {
    for path in config_candidates() {
        if path.is_file() {
            let config = load_config_file(&path)?;
            return Ok((config, Some(path)));
        }
    }
    Ok((CliConfig::default(), None))
}

pub(crate) fn load_config_file(path: &Path) -> Result<CliConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| ConfigError::Read(format!("failed to read {}: {err}", path.display())))?;
    toml::from_str(&text)
        .map_err(|err| ConfigError::Parse(format!("failed to parse {}: {err}", path.display())))
}

impl CliConfig {
    /// Explicit codes plus the codes of every named role.
    pub(crate) fn permission_set(
        &self,
        codes: &[String],
        roles: &[String],
    ) -> Result<PermissionSet, ConfigError> {
        let mut permissions = PermissionSet::from_codes(codes);
        for role in roles {
            let granted = self
                .roles
                .get(role.trim())
                .ok_or_else(|| ConfigError::UnknownRole(role.trim().to_string()))?;
            permissions.extend(granted);
        }
        Ok(permissions)
    }
}
