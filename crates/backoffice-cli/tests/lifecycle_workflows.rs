mod support;

use predicates::prelude::*;
use support::{backoffice, fixture, stdout_json, workspace_root};
use tempfile::TempDir;

#[test]
fn suspended_contract_actions_report_missing_permissions() {
    let home = TempDir::new().expect("tempdir");
    let output = backoffice(&home)
        .args([
            "--json",
            "lifecycle",
            "actions",
            "--kind",
            "contract",
            "--status",
            "suspended",
            "--permission",
            "contract.read",
            "--permission",
            "contract.activate",
        ])
        .output()
        .expect("run lifecycle actions");
    assert!(output.status.success());
    let payload = stdout_json(&output);
    assert_eq!(payload["status"], "SUSPENDED");
    assert_eq!(payload["actions"]["activate"]["allowed"], true);
    assert_eq!(payload["actions"]["suspend"]["allowed"], false);
    assert_eq!(
        payload["actions"]["suspend"]["reason"],
        "Missing permission: contract.suspend"
    );
    let allowed = payload["allowedActions"]
        .as_array()
        .expect("allowed actions")
        .iter()
        .map(|a| a["action"].as_str().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(allowed, vec!["activate", "close", "cancel"]);
}

#[test]
fn can_reports_transition_verdicts() {
    let home = TempDir::new().expect("tempdir");
    for (status, expected) in [("DRAFT", true), ("ACTIVE", false), ("CLOSED", false)] {
        let output = backoffice(&home)
            .args([
                "--json", "lifecycle", "can", "--kind", "contract", "--status", status, "--action",
                "activate",
            ])
            .output()
            .expect("run lifecycle can");
        assert!(output.status.success());
        assert_eq!(stdout_json(&output)["allowed"], expected, "{status}");
    }
}

#[test]
fn meta_falls_back_for_unknown_status() {
    let home = TempDir::new().expect("tempdir");
    let output = backoffice(&home)
        .args([
            "--json", "lifecycle", "meta", "--kind", "cash-session", "--status", "counting",
        ])
        .output()
        .expect("run lifecycle meta");
    assert!(output.status.success());
    let payload = stdout_json(&output);
    assert_eq!(payload["kind"], "cashSession");
    assert_eq!(payload["meta"]["code"], "COUNTING");
    assert_eq!(payload["meta"]["description"], serde_json::Value::Null);
}

#[test]
fn unknown_kind_is_a_validation_error() {
    let home = TempDir::new().expect("tempdir");
    backoffice(&home)
        .args(["lifecycle", "meta", "--kind", "payroll", "--status", "DRAFT"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown entity kind `payroll`"));
}

#[test]
fn timeline_from_events_file_is_fingerprinted() {
    let home = TempDir::new().expect("tempdir");
    let run = || {
        backoffice(&home)
            .args([
                "--json", "lifecycle", "timeline", "--kind", "contract", "--status", "SUSPENDED",
                "--events",
            ])
            .arg(fixture("contract_events.json"))
            .output()
            .expect("run lifecycle timeline")
    };
    let first = run();
    assert!(first.status.success());
    let payload = stdout_json(&first);
    let states = payload["steps"]
        .as_array()
        .expect("steps")
        .iter()
        .map(|s| s["state"].as_str().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(states, vec!["done", "done", "current", "pending", "pending"]);
    assert_eq!(payload["steps"][2]["note"], "payment overdue");

    let fingerprint = payload["fingerprint"].as_str().expect("fingerprint");
    assert_eq!(fingerprint.len(), 64);
    assert_eq!(stdout_json(&run())["fingerprint"], fingerprint);
}

#[test]
fn invalid_events_file_is_a_validation_error() {
    let home = TempDir::new().expect("tempdir");
    let events = home.path().join("events.json");
    std::fs::write(&events, "{not json").expect("write events");
    backoffice(&home)
        .args(["lifecycle", "timeline", "--kind", "journal", "--status", "DRAFT", "--events"])
        .arg(&events)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn missing_events_file_is_a_dependency_failure() {
    let home = TempDir::new().expect("tempdir");
    backoffice(&home)
        .args(["--json", "lifecycle", "timeline", "--kind", "journal", "--status", "DRAFT", "--events"])
        .arg(home.path().join("absent.json"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("dependency_failure"));
}

#[test]
fn check_passes_against_committed_rules() {
    let home = TempDir::new().expect("tempdir");
    let output = backoffice(&home)
        .current_dir(workspace_root())
        .args(["--json", "lifecycle", "check"])
        .output()
        .expect("run lifecycle check");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let payload = stdout_json(&output);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["violations"][0]["id"], "lifecycle.subset.client_narrower");
}

#[test]
fn check_fails_when_backend_rules_are_narrower() {
    let home = TempDir::new().expect("tempdir");
    let rules = home.path().join("transitions.json");
    std::fs::write(
        &rules,
        r#"{"schema_version":"1","kinds":{"contract":{"activate":["DRAFT"]}}}"#,
    )
    .expect("write rules");
    let output = backoffice(&home)
        .args(["--json", "lifecycle", "check", "--authoritative"])
        .arg(&rules)
        .output()
        .expect("run lifecycle check");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout_json(&output)["status"], "failed");
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("policy_violation"), "{stderr}");
}

#[test]
fn padded_status_is_echoed_in_canonical_form() {
    let home = TempDir::new().expect("tempdir");
    let output = backoffice(&home)
        .args([
            "--json", "lifecycle", "can", "--kind", "journal", "--status", "  posted ", "--action",
            "Reverse",
        ])
        .output()
        .expect("run lifecycle can");
    assert!(output.status.success());
    let payload = stdout_json(&output);
    assert_eq!(payload["status"], "POSTED");
    assert_eq!(payload["allowed"], true);

    let output = backoffice(&home)
        .args([
            "--json", "lifecycle", "timeline", "--kind", "contract", "--status", " active",
            "--events",
        ])
        .arg(fixture("contract_events.json"))
        .output()
        .expect("run lifecycle timeline");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["status"], "ACTIVE");
}
