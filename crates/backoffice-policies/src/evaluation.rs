use std::collections::BTreeSet;

use backoffice_model::EntityKind;
use serde::Serialize;

use crate::gates::{GateDomain, GateRequirement, GateSpec, GATE_TABLES};
use crate::tables::{lifecycle_table, LifecycleTable, LIFECYCLE_TABLES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PolicySeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyViolation {
    pub id: &'static str,
    pub severity: PolicySeverity,
    pub message: &'static str,
    pub evidence: String,
}

impl PolicyViolation {
    pub(crate) fn new(
        id: &'static str,
        severity: PolicySeverity,
        message: &'static str,
        evidence: String,
    ) -> Self {
        Self {
            id,
            severity,
            message,
            evidence,
        }
    }
}

#[must_use]
pub fn has_errors(violations: &[PolicyViolation]) -> bool {
    violations
        .iter()
        .any(|v| matches!(v.severity, PolicySeverity::Error))
}

/// Self-consistency of the compiled lifecycle and gate tables.
#[must_use]
pub fn evaluate_lifecycle_tables() -> Vec<PolicyViolation> {
    let mut violations = Vec::new();
    for kind in EntityKind::ALL {
        if lifecycle_table(kind).is_none() {
            violations.push(PolicyViolation::new(
                "lifecycle.table.missing",
                PolicySeverity::Error,
                "entity kind has no lifecycle table",
                format!("kind={kind}"),
            ));
        }
    }
    violations.extend(evaluate_tables(LIFECYCLE_TABLES, GATE_TABLES));
    violations
}

pub(crate) fn evaluate_tables(
    tables: &[LifecycleTable],
    gate_tables: &[(GateDomain, &[GateSpec])],
) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();
    for table in tables {
        evaluate_table(table, gate_tables, &mut violations);
    }
    violations
}

fn evaluate_table(
    table: &LifecycleTable,
    gate_tables: &[(GateDomain, &[GateSpec])],
    out: &mut Vec<PolicyViolation>,
) {
    let kind = table.kind;
    if table.statuses.is_empty() {
        out.push(PolicyViolation::new(
            "lifecycle.status.empty",
            PolicySeverity::Error,
            "lifecycle table declares no statuses",
            format!("kind={kind}"),
        ));
    }

    let mut seen_status = BTreeSet::new();
    for status in table.statuses {
        if status.code.is_empty() || status.code != status.code.to_ascii_uppercase() {
            out.push(PolicyViolation::new(
                "lifecycle.status.not_normalized",
                PolicySeverity::Error,
                "status codes must be non-empty upper-case",
                format!("kind={kind} status={}", status.code),
            ));
        }
        if !seen_status.insert(status.code) {
            out.push(PolicyViolation::new(
                "lifecycle.status.duplicate",
                PolicySeverity::Error,
                "status code declared twice",
                format!("kind={kind} status={}", status.code),
            ));
        }
    }

    let domain_codes = GateDomain::for_kind(kind)
        .and_then(|domain| gate_tables.iter().find(|(d, _)| *d == domain))
        .map(|(_, specs)| single_permission_codes(specs))
        .unwrap_or_default();

    let mut seen_action = BTreeSet::new();
    for rule in table.actions {
        let evidence = format!("kind={kind} action={}", rule.action);
        if !seen_action.insert(rule.action) {
            out.push(PolicyViolation::new(
                "lifecycle.action.duplicate",
                PolicySeverity::Error,
                "action declared twice",
                evidence.clone(),
            ));
        }
        if rule.from.is_empty() {
            out.push(PolicyViolation::new(
                "lifecycle.action.unreachable",
                PolicySeverity::Info,
                "action admits no source status",
                evidence.clone(),
            ));
        }
        for from in rule.from {
            match table.status(from) {
                None => out.push(PolicyViolation::new(
                    "lifecycle.action.from_unknown_status",
                    PolicySeverity::Error,
                    "action starts from a status outside the canonical sequence",
                    format!("{evidence} from={from}"),
                )),
                Some(spec) if spec.terminal => out.push(PolicyViolation::new(
                    "lifecycle.action.from_terminal_status",
                    PolicySeverity::Error,
                    "terminal statuses must not admit actions",
                    format!("{evidence} from={from}"),
                )),
                Some(_) => {}
            }
        }
        if !domain_codes.contains(rule.permission) {
            out.push(PolicyViolation::new(
                "lifecycle.action.permission_ungated",
                PolicySeverity::Warning,
                "action permission has no matching capability flag",
                format!("{evidence} permission={}", rule.permission),
            ));
        }
    }
}

fn single_permission_codes(specs: &[GateSpec]) -> BTreeSet<&'static str> {
    specs
        .iter()
        .filter_map(|spec| match spec.requirement {
            GateRequirement::Permission(code) => Some(code),
            GateRequirement::AllOf(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::CONTRACT_GATES;
    use crate::tables::{ActionRule, StatusSpec};

    const BROKEN: LifecycleTable = LifecycleTable {
        kind: EntityKind::Contract,
        statuses: &[
            StatusSpec {
                code: "DRAFT",
                description: "",
                terminal: false,
            },
            StatusSpec {
                code: "closed",
                description: "",
                terminal: true,
            },
            StatusSpec {
                code: "DRAFT",
                description: "",
                terminal: false,
            },
        ],
        actions: &[
            ActionRule {
                action: "activate",
                label: "Activate",
                permission: "contract.activate",
                from: &["DRAFT", "ARCHIVED"],
            },
            ActionRule {
                action: "activate",
                label: "Activate",
                permission: "contract.approve",
                from: &[],
            },
        ],
    };

    #[test]
    fn compiled_tables_are_consistent() {
        assert_eq!(evaluate_lifecycle_tables(), Vec::new());
    }

    #[test]
    fn broken_table_reports_each_defect() {
        let violations = evaluate_tables(&[BROKEN], &[(GateDomain::Contract, CONTRACT_GATES)]);
        let ids = violations.iter().map(|v| v.id).collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                "lifecycle.status.not_normalized",
                "lifecycle.status.duplicate",
                "lifecycle.action.from_unknown_status",
                "lifecycle.action.duplicate",
                "lifecycle.action.unreachable",
                "lifecycle.action.permission_ungated",
            ]
        );
        assert!(has_errors(&violations));
    }
}
