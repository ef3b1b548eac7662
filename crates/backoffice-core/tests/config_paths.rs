use backoffice_core::{resolve_backoffice_config_path, ConfigPathScope};
use std::path::PathBuf;

#[test]
fn workspace_scope_is_relative_and_env_independent() {
    assert_eq!(
        resolve_backoffice_config_path(ConfigPathScope::Workspace),
        PathBuf::from(".backoffice").join("config.toml")
    );
}

#[test]
fn user_scope_always_points_at_a_toml_file() {
    let path = resolve_backoffice_config_path(ConfigPathScope::User);
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
}
