#![forbid(unsafe_code)]

mod authoritative;
mod evaluation;
mod gates;
mod tables;
mod timeline;
mod transitions;

pub use authoritative::{
    authoritative_transitions_path, check_transition_subset, load_authoritative_transitions,
    load_authoritative_transitions_file, parse_authoritative_transitions,
    AuthoritativeTransitions, PolicyValidationError, TransitionSchemaVersion,
};
pub use evaluation::{evaluate_lifecycle_tables, has_errors, PolicySeverity, PolicyViolation};
pub use gates::{
    gate_table, resolve_cari_document_gates, resolve_cash_gates, resolve_contract_gates,
    resolve_counterparty_gates, resolve_gate_table, resolve_journal_gates, ActionGates,
    CariDocumentGates, CashGates, ContractGates, CounterpartyGates, GateDomain, GateRequirement,
    GateSpec, JournalGates, CARI_DOCUMENT_GATES, CASH_GATES, CONTRACT_GATES, COUNTERPARTY_GATES,
    GATE_TABLES, JOURNAL_GATES,
};
pub use tables::{lifecycle_table, ActionRule, LifecycleTable, StatusSpec, LIFECYCLE_TABLES};
pub use timeline::{build_lifecycle_timeline_steps, StepState, TimelineStep};
pub use transitions::{
    can_transition, contract_action_states, lifecycle_action_states, lifecycle_allowed_actions,
    lifecycle_status_meta, missing_permission_reason, unavailable_status_reason, ActionState,
    AllowedAction, StatusMeta,
};

pub const CRATE_NAME: &str = "backoffice-policies";
