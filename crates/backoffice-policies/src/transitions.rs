use std::collections::BTreeMap;

use backoffice_model::{EntityKind, StatusCode};
use serde::Serialize;

use crate::gates::{ActionGates, ContractGates};
use crate::tables::{lifecycle_table, ActionRule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMeta {
    pub code: String,
    pub description: Option<&'static str>,
    pub terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedAction {
    pub action: &'static str,
    pub label: &'static str,
}

/// Whether a lifecycle button is enabled, and why not when it is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionState {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl ActionState {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn denied(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

#[must_use]
pub fn missing_permission_reason(permission: &str) -> String {
    format!("Missing permission: {permission}")
}

#[must_use]
pub fn unavailable_status_reason(status: &StatusCode) -> String {
    format!("Not available while {status}")
}

/// Advisory state-machine check. The backend re-validates every transition.
#[must_use]
pub fn can_transition(kind: EntityKind, status: &str, action: &str) -> bool {
    let status = StatusCode::normalize(status);
    lifecycle_table(kind)
        .and_then(|table| table.action(action.trim()))
        .is_some_and(|rule| rule_admits(rule, &status))
}

fn rule_admits(rule: &ActionRule, status: &StatusCode) -> bool {
    rule.from.iter().any(|from| status == from)
}

#[must_use]
pub fn lifecycle_status_meta(kind: EntityKind, status: &str) -> StatusMeta {
    let code = StatusCode::normalize(status);
    match lifecycle_table(kind).and_then(|table| table.status(code.as_str())) {
        Some(spec) => StatusMeta {
            code: spec.code.to_string(),
            description: Some(spec.description),
            terminal: spec.terminal,
        },
        None => StatusMeta {
            code: code.into_inner(),
            description: None,
            terminal: false,
        },
    }
}

#[must_use]
pub fn lifecycle_allowed_actions(kind: EntityKind, status: &str) -> Vec<AllowedAction> {
    let status = StatusCode::normalize(status);
    let Some(table) = lifecycle_table(kind) else {
        return Vec::new();
    };
    table
        .actions
        .iter()
        .filter(|rule| rule_admits(rule, &status))
        .map(|rule| AllowedAction {
            action: rule.action,
            label: rule.label,
        })
        .collect()
}

/// Every known action of `kind` with its permission-and-status verdict.
///
/// The permission is checked first, so a user lacking it always sees the
/// missing-permission reason even when the status would admit the action.
#[must_use]
pub fn lifecycle_action_states<G>(
    kind: EntityKind,
    status: &str,
    gates: &G,
) -> BTreeMap<&'static str, ActionState>
where
    G: ActionGates + ?Sized,
{
    let status = StatusCode::normalize(status);
    let Some(table) = lifecycle_table(kind) else {
        return BTreeMap::new();
    };
    table
        .actions
        .iter()
        .map(|rule| {
            let state = if !gates.grants(rule.permission) {
                ActionState::denied(missing_permission_reason(rule.permission))
            } else if !rule_admits(rule, &status) {
                ActionState::denied(unavailable_status_reason(&status))
            } else {
                ActionState::allowed()
            };
            (rule.action, state)
        })
        .collect()
}

#[must_use]
pub fn contract_action_states(
    status: &str,
    gates: &ContractGates,
) -> BTreeMap<&'static str, ActionState> {
    lifecycle_action_states(EntityKind::Contract, status, gates)
}
