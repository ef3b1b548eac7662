use std::path::{Path, PathBuf};

use backoffice_core::canonical::stable_json_hash_hex;
use backoffice_model::{events_from_json_value, EntityKind, PermissionSet, StatusCode};
use backoffice_policies::{
    authoritative_transitions_path, build_lifecycle_timeline_steps, can_transition,
    check_transition_subset, evaluate_lifecycle_tables, has_errors, lifecycle_action_states,
    lifecycle_allowed_actions, lifecycle_status_meta, load_authoritative_transitions_file,
    resolve_gate_table, GateDomain,
};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::commands::{LifecycleCommand, Target};
use crate::config::CliConfig;
use crate::helpers::emit_ok;
use crate::{CliError, OutputMode};

pub(crate) fn run_gates(
    domain: Option<String>,
    permissions: &PermissionSet,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let domains = match domain {
        Some(raw) => vec![GateDomain::parse(&raw).map_err(|e| CliError::validation(&e.0))?],
        None => GateDomain::ALL.to_vec(),
    };
    info!(domains = domains.len(), permissions = permissions.len(), "resolving gates");
    let mut resolved = Map::new();
    for domain in domains {
        resolved.insert(
            domain.as_str().to_string(),
            json!(resolve_gate_table(domain, permissions)),
        );
    }
    emit_ok(
        output_mode,
        json!({
            "command": "gates",
            "permissions": permissions,
            "domains": resolved,
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn run_lifecycle_command(
    command: LifecycleCommand,
    config: &CliConfig,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    match command {
        LifecycleCommand::Meta { target } => {
            let kind = parse_kind(&target)?;
            let meta = lifecycle_status_meta(kind, &target.status);
            emit(output_mode, json!({"command": "lifecycle meta", "kind": kind, "meta": meta}))
        }
        LifecycleCommand::Actions { target, grants } => {
            let kind = parse_kind(&target)?;
            let permissions = config
                .permission_set(&grants.permissions, &grants.roles)
                .map_err(|e| CliError::validation(&e.to_string()))?;
            debug!(?permissions, "resolved permission set");
            let states = lifecycle_action_states(kind, &target.status, &permissions);
            let allowed = lifecycle_allowed_actions(kind, &target.status);
            emit(
                output_mode,
                json!({
                    "command": "lifecycle actions",
                    "kind": kind,
                    "status": StatusCode::normalize(&target.status),
                    "allowedActions": allowed,
                    "actions": states,
                }),
            )
        }
        LifecycleCommand::Can { target, action } => {
            let kind = parse_kind(&target)?;
            let allowed = can_transition(kind, &target.status, &action);
            emit(
                output_mode,
                json!({
                    "command": "lifecycle can",
                    "kind": kind,
                    "status": StatusCode::normalize(&target.status),
                    "action": action.trim(),
                    "allowed": allowed,
                }),
            )
        }
        LifecycleCommand::Timeline { target, events } => {
            let kind = parse_kind(&target)?;
            run_timeline(kind, &target.status, &events, output_mode)
        }
        LifecycleCommand::Check { authoritative } => run_check(authoritative, output_mode),
    }
}

fn parse_kind(target: &Target) -> Result<EntityKind, CliError> {
    let kind = EntityKind::parse(&target.kind).map_err(|e| CliError::validation(&e.0))?;
    info!(kind = kind.as_str(), status = target.status.as_str(), "lifecycle request");
    Ok(kind)
}

fn emit(output_mode: OutputMode, payload: Value) -> Result<(), CliError> {
    emit_ok(output_mode, payload).map_err(CliError::internal)
}

fn run_timeline(
    kind: EntityKind,
    status: &str,
    events_path: &Path,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(events_path).map_err(|e| {
        CliError::dependency(format!(
            "failed to read events {}: {e}",
            events_path.display()
        ))
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| {
        CliError::validation(&format!(
            "events file {} is not valid JSON: {e}",
            events_path.display()
        ))
    })?;
    let events = events_from_json_value(&value);
    debug!(events = events.len(), "decoded lifecycle events");
    let steps = build_lifecycle_timeline_steps(kind, status, &events);
    let fingerprint = stable_json_hash_hex(&steps).map_err(|e| CliError::internal(e.to_string()))?;
    emit(
        output_mode,
        json!({
            "command": "lifecycle timeline",
            "kind": kind,
            "status": StatusCode::normalize(status),
            "steps": steps,
            "fingerprint": fingerprint,
        }),
    )
}

fn run_check(authoritative: Option<PathBuf>, output_mode: OutputMode) -> Result<(), CliError> {
    let path = authoritative.unwrap_or_else(|| authoritative_transitions_path(Path::new(".")));
    info!(path = %path.display(), "checking lifecycle tables");
    let doc = load_authoritative_transitions_file(&path)
        .map_err(|e| CliError::validation(&e.to_string()))?;
    let mut violations = evaluate_lifecycle_tables();
    violations.extend(check_transition_subset(&doc));
    let failed = has_errors(&violations);
    emit(
        output_mode,
        json!({
            "command": "lifecycle check",
            "authoritative": path,
            "status": if failed { "failed" } else { "ok" },
            "violations": violations,
        }),
    )?;
    if failed {
        return Err(CliError::validation("lifecycle tables disagree with authoritative rules")
            .with_code("policy_violation"));
    }
    Ok(())
}
