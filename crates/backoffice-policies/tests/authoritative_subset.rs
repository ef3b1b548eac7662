use std::path::{Path, PathBuf};

use backoffice_model::EntityKind;
use backoffice_policies::{
    check_transition_subset, has_errors, load_authoritative_transitions,
    parse_authoritative_transitions, PolicySeverity,
};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("workspace root")
        .to_path_buf()
}

#[test]
fn client_tables_are_a_subset_of_committed_rules() {
    let doc = load_authoritative_transitions(&workspace_root()).expect("load transitions");
    let violations = check_transition_subset(&doc);
    assert!(!has_errors(&violations), "{violations:#?}");

    let narrower = violations
        .iter()
        .filter(|v| v.id == "lifecycle.subset.client_narrower")
        .collect::<Vec<_>>();
    assert_eq!(narrower.len(), 1, "{violations:#?}");
    assert_eq!(narrower[0].severity, PolicySeverity::Info);
    assert_eq!(
        narrower[0].evidence,
        "kind=cariDocument action=reverse from=SETTLED"
    );
}

#[test]
fn committed_rules_cover_every_kind() {
    let doc = load_authoritative_transitions(&workspace_root()).expect("load transitions");
    for kind in EntityKind::ALL {
        assert!(doc.kinds.contains_key(&kind), "{kind}");
    }
}

#[test]
fn client_transition_outside_backend_rules_is_an_error() {
    let raw = r#"{
        "schema_version": "1",
        "kinds": {
            "contract": {
                "activate": ["DRAFT"],
                "suspend": ["ACTIVE"],
                "close": ["ACTIVE", "SUSPENDED"],
                "cancel": ["DRAFT", "ACTIVE", "SUSPENDED"]
            },
            "cashSession": {"close": ["OPEN"]},
            "cashTransaction": {"post": ["DRAFT"], "reverse": ["POSTED"], "cancel": ["DRAFT"]},
            "cariDocument": {"post": ["DRAFT"], "reverse": ["POSTED", "PARTIALLY_SETTLED"], "cancel": ["DRAFT"]}
        }
    }"#;
    let doc = parse_authoritative_transitions(raw).expect("decode");
    let violations = check_transition_subset(&doc);
    let ids = violations.iter().map(|v| (v.id, v.evidence.as_str())).collect::<Vec<_>>();
    assert_eq!(
        ids,
        vec![
            (
                "lifecycle.subset.transition_not_authoritative",
                "kind=contract action=activate from=SUSPENDED"
            ),
            ("lifecycle.subset.kind_missing", "kind=journal"),
        ]
    );
    assert!(has_errors(&violations));
}

#[test]
fn missing_rules_file_is_reported() {
    let dir = std::env::temp_dir().join("backoffice-policies-no-such-root");
    let err = load_authoritative_transitions(&dir).expect_err("missing file");
    assert!(err.to_string().contains("read authoritative transitions"), "{err}");
}
