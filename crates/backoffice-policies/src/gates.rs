use std::collections::BTreeMap;

use backoffice_model::{EntityKind, PermissionSet, ValidationError};
use serde::Serialize;

/// What a capability flag needs from the permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GateRequirement {
    Permission(&'static str),
    /// Every listed code must be granted. An empty list never passes.
    AllOf(&'static [&'static str]),
}

impl GateRequirement {
    #[must_use]
    pub fn is_met(self, permissions: &PermissionSet) -> bool {
        match self {
            Self::Permission(code) => permissions.contains(code),
            Self::AllOf(codes) => permissions.contains_all(codes),
        }
    }

    #[must_use]
    pub fn codes(self) -> Vec<&'static str> {
        match self {
            Self::Permission(code) => vec![code],
            Self::AllOf(codes) => codes.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSpec {
    pub name: &'static str,
    pub requirement: GateRequirement,
}

const fn permission(name: &'static str, code: &'static str) -> GateSpec {
    GateSpec {
        name,
        requirement: GateRequirement::Permission(code),
    }
}

const fn all_of(name: &'static str, codes: &'static [&'static str]) -> GateSpec {
    GateSpec {
        name,
        requirement: GateRequirement::AllOf(codes),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum GateDomain {
    Contract,
    Counterparty,
    Cash,
    CariDocument,
    Journal,
}

impl GateDomain {
    pub const ALL: [Self; 5] = [
        Self::Contract,
        Self::Counterparty,
        Self::Cash,
        Self::CariDocument,
        Self::Journal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Counterparty => "counterparty",
            Self::Cash => "cash",
            Self::CariDocument => "cariDocument",
            Self::Journal => "journal",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let folded: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "contract" => Ok(Self::Contract),
            "counterparty" | "caricard" => Ok(Self::Counterparty),
            "cash" => Ok(Self::Cash),
            "caridocument" | "caridoc" => Ok(Self::CariDocument),
            "journal" | "gljournal" => Ok(Self::Journal),
            _ => Err(ValidationError(format!(
                "unknown gate domain `{}`",
                input.trim()
            ))),
        }
    }

    /// Gate domain whose flags decide the lifecycle actions of `kind`.
    #[must_use]
    pub const fn for_kind(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Contract => Some(Self::Contract),
            EntityKind::CashSession | EntityKind::CashTransaction => Some(Self::Cash),
            EntityKind::CariDocument => Some(Self::CariDocument),
            EntityKind::Journal => Some(Self::Journal),
            _ => None,
        }
    }
}

pub const CONTRACT_GATES: &[GateSpec] = &[
    permission("canReadContracts", "contract.read"),
    permission("canCreateContract", "contract.create"),
    permission("canUpdateContract", "contract.update"),
    permission("canActivateContract", "contract.activate"),
    permission("canSuspendContract", "contract.suspend"),
    permission("canCloseContract", "contract.close"),
    permission("canCancelContract", "contract.cancel"),
    permission("canLinkDocument", "contract.link_document"),
    permission("canGenerateRevrec", "revenue.schedule.generate"),
    permission("canReadRevrec", "revenue.schedule.read"),
    // cari.doc.read alone must not unlock the linked documents panel.
    all_of(
        "shouldFetchDocuments",
        &["contract.read", "contract.link_document"],
    ),
    all_of("shouldFetchRevrec", &["contract.read", "revenue.schedule.read"]),
];

pub const COUNTERPARTY_GATES: &[GateSpec] = &[
    permission("canReadCounterparty", "cari.card.read"),
    permission("canCreateCounterparty", "cari.card.create"),
    permission("canUpdateCounterparty", "cari.card.update"),
    permission("canManageBankAccounts", "cari.card.bank.upsert"),
    permission("canManageContacts", "cari.card.contact.upsert"),
    all_of("shouldFetchPaymentTerms", &["cari.card.read", "payment_term.read"]),
    all_of("shouldFetchBankAccounts", &["cari.card.read", "cari.card.bank.read"]),
];

pub const CASH_GATES: &[GateSpec] = &[
    permission("canReadRegisters", "cash.register.read"),
    permission("canOpenSession", "cash.session.open"),
    permission("canCloseSession", "cash.session.close"),
    permission("canCreateTxn", "cash.txn.create"),
    permission("canPostTxn", "cash.txn.post"),
    permission("canReverseTxn", "cash.txn.reverse"),
    permission("canCancelTxn", "cash.txn.cancel"),
    all_of("shouldFetchSessions", &["cash.register.read", "cash.session.read"]),
];

pub const CARI_DOCUMENT_GATES: &[GateSpec] = &[
    permission("canReadDocuments", "cari.doc.read"),
    permission("canCreateDocument", "cari.doc.create"),
    permission("canPostDocument", "cari.doc.post"),
    permission("canReverseDocument", "cari.doc.reverse"),
    permission("canCancelDocument", "cari.doc.cancel"),
    all_of("shouldFetchSettlements", &["cari.doc.read", "cari.settlement.read"]),
];

pub const JOURNAL_GATES: &[GateSpec] = &[
    permission("canReadJournals", "gl.journal.read"),
    permission("canCreateJournal", "gl.journal.create"),
    permission("canPostJournal", "gl.journal.post"),
    permission("canReverseJournal", "gl.journal.reverse"),
    permission("canCancelJournal", "gl.journal.cancel"),
    permission("canReclassify", "gl.reclass.create"),
];

pub const GATE_TABLES: &[(GateDomain, &[GateSpec])] = &[
    (GateDomain::Contract, CONTRACT_GATES),
    (GateDomain::Counterparty, COUNTERPARTY_GATES),
    (GateDomain::Cash, CASH_GATES),
    (GateDomain::CariDocument, CARI_DOCUMENT_GATES),
    (GateDomain::Journal, JOURNAL_GATES),
];

#[must_use]
pub fn gate_table(domain: GateDomain) -> &'static [GateSpec] {
    GATE_TABLES
        .iter()
        .find(|(d, _)| *d == domain)
        .map(|(_, table)| *table)
        .unwrap_or(&[])
}

/// Generic form of the typed gate structs, keyed by the camelCase flag name.
#[must_use]
pub fn resolve_gate_table(
    domain: GateDomain,
    permissions: &PermissionSet,
) -> BTreeMap<&'static str, bool> {
    gate_table(domain)
        .iter()
        .map(|spec| (spec.name, spec.requirement.is_met(permissions)))
        .collect()
}

fn granted(table: &[GateSpec], name: &str, permissions: &PermissionSet) -> bool {
    table
        .iter()
        .find(|spec| spec.name == name)
        .is_some_and(|spec| spec.requirement.is_met(permissions))
}

/// Name of the single-permission gate in `table` that guards `permission`.
fn flag_for_permission(table: &[GateSpec], permission: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|spec| {
            matches!(spec.requirement, GateRequirement::Permission(code) if code == permission)
        })
        .map(|spec| spec.name)
}

/// Source of "is this permission granted" answers for lifecycle action states.
pub trait ActionGates {
    fn grants(&self, permission: &str) -> bool;
}

impl ActionGates for PermissionSet {
    fn grants(&self, permission: &str) -> bool {
        self.contains(permission)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractGates {
    pub can_read_contracts: bool,
    pub can_create_contract: bool,
    pub can_update_contract: bool,
    pub can_activate_contract: bool,
    pub can_suspend_contract: bool,
    pub can_close_contract: bool,
    pub can_cancel_contract: bool,
    pub can_link_document: bool,
    pub can_generate_revrec: bool,
    pub can_read_revrec: bool,
    pub should_fetch_documents: bool,
    pub should_fetch_revrec: bool,
}

impl ContractGates {
    #[must_use]
    pub fn from_permissions(p: &PermissionSet) -> Self {
        let t = CONTRACT_GATES;
        Self {
            can_read_contracts: granted(t, "canReadContracts", p),
            can_create_contract: granted(t, "canCreateContract", p),
            can_update_contract: granted(t, "canUpdateContract", p),
            can_activate_contract: granted(t, "canActivateContract", p),
            can_suspend_contract: granted(t, "canSuspendContract", p),
            can_close_contract: granted(t, "canCloseContract", p),
            can_cancel_contract: granted(t, "canCancelContract", p),
            can_link_document: granted(t, "canLinkDocument", p),
            can_generate_revrec: granted(t, "canGenerateRevrec", p),
            can_read_revrec: granted(t, "canReadRevrec", p),
            should_fetch_documents: granted(t, "shouldFetchDocuments", p),
            should_fetch_revrec: granted(t, "shouldFetchRevrec", p),
        }
    }
}

impl ContractGates {
    fn flag(&self, name: &str) -> bool {
        match name {
            "canReadContracts" => self.can_read_contracts,
            "canCreateContract" => self.can_create_contract,
            "canUpdateContract" => self.can_update_contract,
            "canActivateContract" => self.can_activate_contract,
            "canSuspendContract" => self.can_suspend_contract,
            "canCloseContract" => self.can_close_contract,
            "canCancelContract" => self.can_cancel_contract,
            "canLinkDocument" => self.can_link_document,
            "canGenerateRevrec" => self.can_generate_revrec,
            "canReadRevrec" => self.can_read_revrec,
            "shouldFetchDocuments" => self.should_fetch_documents,
            "shouldFetchRevrec" => self.should_fetch_revrec,
            _ => false,
        }
    }
}

impl ActionGates for ContractGates {
    fn grants(&self, permission: &str) -> bool {
        flag_for_permission(CONTRACT_GATES, permission).is_some_and(|name| self.flag(name))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyGates {
    pub can_read_counterparty: bool,
    pub can_create_counterparty: bool,
    pub can_update_counterparty: bool,
    pub can_manage_bank_accounts: bool,
    pub can_manage_contacts: bool,
    pub should_fetch_payment_terms: bool,
    pub should_fetch_bank_accounts: bool,
}

impl CounterpartyGates {
    #[must_use]
    pub fn from_permissions(p: &PermissionSet) -> Self {
        let t = COUNTERPARTY_GATES;
        Self {
            can_read_counterparty: granted(t, "canReadCounterparty", p),
            can_create_counterparty: granted(t, "canCreateCounterparty", p),
            can_update_counterparty: granted(t, "canUpdateCounterparty", p),
            can_manage_bank_accounts: granted(t, "canManageBankAccounts", p),
            can_manage_contacts: granted(t, "canManageContacts", p),
            should_fetch_payment_terms: granted(t, "shouldFetchPaymentTerms", p),
            should_fetch_bank_accounts: granted(t, "shouldFetchBankAccounts", p),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashGates {
    pub can_read_registers: bool,
    pub can_open_session: bool,
    pub can_close_session: bool,
    pub can_create_txn: bool,
    pub can_post_txn: bool,
    pub can_reverse_txn: bool,
    pub can_cancel_txn: bool,
    pub should_fetch_sessions: bool,
}

impl CashGates {
    #[must_use]
    pub fn from_permissions(p: &PermissionSet) -> Self {
        let t = CASH_GATES;
        Self {
            can_read_registers: granted(t, "canReadRegisters", p),
            can_open_session: granted(t, "canOpenSession", p),
            can_close_session: granted(t, "canCloseSession", p),
            can_create_txn: granted(t, "canCreateTxn", p),
            can_post_txn: granted(t, "canPostTxn", p),
            can_reverse_txn: granted(t, "canReverseTxn", p),
            can_cancel_txn: granted(t, "canCancelTxn", p),
            should_fetch_sessions: granted(t, "shouldFetchSessions", p),
        }
    }
}

impl CashGates {
    fn flag(&self, name: &str) -> bool {
        match name {
            "canReadRegisters" => self.can_read_registers,
            "canOpenSession" => self.can_open_session,
            "canCloseSession" => self.can_close_session,
            "canCreateTxn" => self.can_create_txn,
            "canPostTxn" => self.can_post_txn,
            "canReverseTxn" => self.can_reverse_txn,
            "canCancelTxn" => self.can_cancel_txn,
            "shouldFetchSessions" => self.should_fetch_sessions,
            _ => false,
        }
    }
}

impl ActionGates for CashGates {
    fn grants(&self, permission: &str) -> bool {
        flag_for_permission(CASH_GATES, permission).is_some_and(|name| self.flag(name))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CariDocumentGates {
    pub can_read_documents: bool,
    pub can_create_document: bool,
    pub can_post_document: bool,
    pub can_reverse_document: bool,
    pub can_cancel_document: bool,
    pub should_fetch_settlements: bool,
}

impl CariDocumentGates {
    #[must_use]
    pub fn from_permissions(p: &PermissionSet) -> Self {
        let t = CARI_DOCUMENT_GATES;
        Self {
            can_read_documents: granted(t, "canReadDocuments", p),
            can_create_document: granted(t, "canCreateDocument", p),
            can_post_document: granted(t, "canPostDocument", p),
            can_reverse_document: granted(t, "canReverseDocument", p),
            can_cancel_document: granted(t, "canCancelDocument", p),
            should_fetch_settlements: granted(t, "shouldFetchSettlements", p),
        }
    }
}

impl CariDocumentGates {
    fn flag(&self, name: &str) -> bool {
        match name {
            "canReadDocuments" => self.can_read_documents,
            "canCreateDocument" => self.can_create_document,
            "canPostDocument" => self.can_post_document,
            "canReverseDocument" => self.can_reverse_document,
            "canCancelDocument" => self.can_cancel_document,
            "shouldFetchSettlements" => self.should_fetch_settlements,
            _ => false,
        }
    }
}

impl ActionGates for CariDocumentGates {
    fn grants(&self, permission: &str) -> bool {
        flag_for_permission(CARI_DOCUMENT_GATES, permission).is_some_and(|name| self.flag(name))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalGates {
    pub can_read_journals: bool,
    pub can_create_journal: bool,
    pub can_post_journal: bool,
    pub can_reverse_journal: bool,
    pub can_cancel_journal: bool,
    pub can_reclassify: bool,
}

impl JournalGates {
    #[must_use]
    pub fn from_permissions(p: &PermissionSet) -> Self {
        let t = JOURNAL_GATES;
        Self {
            can_read_journals: granted(t, "canReadJournals", p),
            can_create_journal: granted(t, "canCreateJournal", p),
            can_post_journal: granted(t, "canPostJournal", p),
            can_reverse_journal: granted(t, "canReverseJournal", p),
            can_cancel_journal: granted(t, "canCancelJournal", p),
            can_reclassify: granted(t, "canReclassify", p),
        }
    }
}

impl JournalGates {
    fn flag(&self, name: &str) -> bool {
        match name {
            "canReadJournals" => self.can_read_journals,
            "canCreateJournal" => self.can_create_journal,
            "canPostJournal" => self.can_post_journal,
            "canReverseJournal" => self.can_reverse_journal,
            "canCancelJournal" => self.can_cancel_journal,
            "canReclassify" => self.can_reclassify,
            _ => false,
        }
    }
}

impl ActionGates for JournalGates {
    fn grants(&self, permission: &str) -> bool {
        flag_for_permission(JOURNAL_GATES, permission).is_some_and(|name| self.flag(name))
    }
}

#[must_use]
pub fn resolve_contract_gates<I, S>(codes: I) -> ContractGates
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ContractGates::from_permissions(&PermissionSet::from_codes(codes))
}

#[must_use]
pub fn resolve_counterparty_gates<I, S>(codes: I) -> CounterpartyGates
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CounterpartyGates::from_permissions(&PermissionSet::from_codes(codes))
}

#[must_use]
pub fn resolve_cash_gates<I, S>(codes: I) -> CashGates
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CashGates::from_permissions(&PermissionSet::from_codes(codes))
}

#[must_use]
pub fn resolve_cari_document_gates<I, S>(codes: I) -> CariDocumentGates
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CariDocumentGates::from_permissions(&PermissionSet::from_codes(codes))
}

#[must_use]
pub fn resolve_journal_gates<I, S>(codes: I) -> JournalGates
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    JournalGates::from_permissions(&PermissionSet::from_codes(codes))
}
