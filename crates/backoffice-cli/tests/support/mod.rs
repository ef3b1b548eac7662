#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A `backoffice` invocation isolated from the caller's config and log env.
pub fn backoffice(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_backoffice"));
    cmd.env("BACKOFFICE_CONFIG", home.path().join("missing.toml"))
        .env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("BACKOFFICE_LOG_LEVEL")
        .env_remove("BACKOFFICE_LOG_JSON")
        .current_dir(home.path());
    cmd
}

pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("workspace root")
        .to_path_buf()
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}
