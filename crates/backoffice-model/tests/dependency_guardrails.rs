use std::path::PathBuf;

#[test]
fn model_crate_has_no_policy_or_cli_dependency() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cargo_toml =
        std::fs::read_to_string(manifest_dir.join("Cargo.toml")).expect("read Cargo.toml");
    for forbidden in ["backoffice-policies", "backoffice-cli", "tracing", "clap"] {
        assert!(
            !cargo_toml.contains(forbidden),
            "forbidden dependency in model crate: {forbidden}"
        );
    }
}
