use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use backoffice_model::{EntityKind, StatusCode};
use serde::{Deserialize, Serialize};

use crate::evaluation::{PolicySeverity, PolicyViolation};
use crate::tables::LIFECYCLE_TABLES;

const AUTHORITATIVE_TRANSITIONS_PATH: &str = "configs/lifecycle/transitions.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyValidationError(pub String);

impl std::fmt::Display for PolicyValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PolicyValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TransitionSchemaVersion {
    #[serde(rename = "1")]
    V1,
}

impl TransitionSchemaVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
        }
    }
}

/// Backend-owned transition rules: kind -> action -> admitted source statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthoritativeTransitions {
    pub schema_version: TransitionSchemaVersion,
    pub kinds: BTreeMap<EntityKind, BTreeMap<String, BTreeSet<StatusCode>>>,
}

impl AuthoritativeTransitions {
    #[must_use]
    pub fn admits(&self, kind: EntityKind, action: &str, from: &str) -> bool {
        self.kinds
            .get(&kind)
            .and_then(|actions| actions.get(action))
            .is_some_and(|statuses| statuses.contains(&StatusCode::normalize(from)))
    }
}

#[must_use]
pub fn authoritative_transitions_path(root: &Path) -> PathBuf {
    root.join(AUTHORITATIVE_TRANSITIONS_PATH)
}

pub fn parse_authoritative_transitions(
    raw: &str,
) -> Result<AuthoritativeTransitions, PolicyValidationError> {
    let doc: AuthoritativeTransitions = serde_json::from_str(raw).map_err(|e| {
        PolicyValidationError(format!("decode authoritative transitions failed: {e}"))
    })?;
    for (kind, actions) in &doc.kinds {
        for (action, statuses) in actions {
            if action.trim().is_empty() || action.trim() != action.as_str() {
                return Err(PolicyValidationError(format!(
                    "kind {kind} has a blank or padded action name `{action}`"
                )));
            }
            if statuses.iter().any(StatusCode::is_blank) {
                return Err(PolicyValidationError(format!(
                    "kind {kind} action {action} lists a blank status"
                )));
            }
        }
    }
    Ok(doc)
}

pub fn load_authoritative_transitions(
    root: &Path,
) -> Result<AuthoritativeTransitions, PolicyValidationError> {
    load_authoritative_transitions_file(&authoritative_transitions_path(root))
}

pub fn load_authoritative_transitions_file(
    path: &Path,
) -> Result<AuthoritativeTransitions, PolicyValidationError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        PolicyValidationError(format!(
            "read authoritative transitions {} failed: {e}",
            path.display()
        ))
    })?;
    parse_authoritative_transitions(&raw)
}

/// Reports every client transition the backend would reject.
///
/// Transitions the backend admits but the client does not offer are only
/// informational: a narrower client table is allowed.
#[must_use]
pub fn check_transition_subset(doc: &AuthoritativeTransitions) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();
    for table in LIFECYCLE_TABLES {
        let kind = table.kind;
        let Some(actions) = doc.kinds.get(&kind) else {
            violations.push(PolicyViolation::new(
                "lifecycle.subset.kind_missing",
                PolicySeverity::Error,
                "authoritative rules do not cover this entity kind",
                format!("kind={kind}"),
            ));
            continue;
        };
        for rule in table.actions {
            for from in rule.from {
                if !doc.admits(kind, rule.action, from) {
                    violations.push(PolicyViolation::new(
                        "lifecycle.subset.transition_not_authoritative",
                        PolicySeverity::Error,
                        "client offers a transition the backend does not admit",
                        format!("kind={kind} action={} from={from}", rule.action),
                    ));
                }
            }
        }
        for (action, statuses) in actions {
            let client = table.action(action);
            for status in statuses {
                let offered = client.is_some_and(|rule| rule.from.iter().any(|f| status == f));
                if !offered {
                    violations.push(PolicyViolation::new(
                        "lifecycle.subset.client_narrower",
                        PolicySeverity::Info,
                        "backend admits a transition the client does not offer",
                        format!("kind={kind} action={action} from={status}"),
                    ));
                }
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_and_kinds_are_rejected() {
        let extra = r#"{"schema_version":"1","kinds":{},"owner":"gl"}"#;
        assert!(parse_authoritative_transitions(extra).is_err());
        let kind = r#"{"schema_version":"1","kinds":{"payroll":{}}}"#;
        assert!(parse_authoritative_transitions(kind).is_err());
        let version = r#"{"schema_version":"2","kinds":{}}"#;
        assert!(parse_authoritative_transitions(version).is_err());
    }

    #[test]
    fn blank_statuses_are_rejected() {
        let raw = r#"{"schema_version":"1","kinds":{"journal":{"post":[" "]}}}"#;
        let err = parse_authoritative_transitions(raw).expect_err("blank status");
        assert!(err.0.contains("blank status"), "{err}");
    }

    #[test]
    fn statuses_are_normalized_on_decode() {
        let raw = r#"{"schema_version":"1","kinds":{"journal":{"post":["draft"]}}}"#;
        let doc = parse_authoritative_transitions(raw).expect("decode");
        assert!(doc.admits(EntityKind::Journal, "post", "DRAFT"));
        assert!(!doc.admits(EntityKind::Journal, "reverse", "POSTED"));
    }
}
