use backoffice_model::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSpec {
    pub code: &'static str,
    pub description: &'static str,
    pub terminal: bool,
}

/// One lifecycle action and the statuses it may start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRule {
    pub action: &'static str,
    pub label: &'static str,
    pub permission: &'static str,
    pub from: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleTable {
    pub kind: EntityKind,
    /// Canonical order used by the timeline.
    pub statuses: &'static [StatusSpec],
    pub actions: &'static [ActionRule],
}

impl LifecycleTable {
    #[must_use]
    pub fn status(&self, code: &str) -> Option<&'static StatusSpec> {
        self.statuses.iter().find(|s| s.code == code)
    }

    #[must_use]
    pub fn status_index(&self, code: &str) -> Option<usize> {
        self.statuses.iter().position(|s| s.code == code)
    }

    #[must_use]
    pub fn action(&self, action: &str) -> Option<&'static ActionRule> {
        self.actions
            .iter()
            .find(|rule| rule.action.eq_ignore_ascii_case(action))
    }
}

const fn status(code: &'static str, description: &'static str) -> StatusSpec {
    StatusSpec {
        code,
        description,
        terminal: false,
    }
}

const fn terminal(code: &'static str, description: &'static str) -> StatusSpec {
    StatusSpec {
        code,
        description,
        terminal: true,
    }
}

const CONTRACT: LifecycleTable = LifecycleTable {
    kind: EntityKind::Contract,
    statuses: &[
        status("DRAFT", "Contract is being prepared and has no effect yet"),
        status("ACTIVE", "Contract is in force and recognizes revenue"),
        status("SUSPENDED", "Contract is temporarily on hold"),
        terminal("CLOSED", "Contract ended normally"),
        terminal("CANCELLED", "Contract was cancelled before completion"),
    ],
    actions: &[
        ActionRule {
            action: "activate",
            label: "Activate",
            permission: "contract.activate",
            from: &["DRAFT", "SUSPENDED"],
        },
        ActionRule {
            action: "suspend",
            label: "Suspend",
            permission: "contract.suspend",
            from: &["ACTIVE"],
        },
        ActionRule {
            action: "close",
            label: "Close",
            permission: "contract.close",
            from: &["ACTIVE", "SUSPENDED"],
        },
        ActionRule {
            action: "cancel",
            label: "Cancel",
            permission: "contract.cancel",
            from: &["DRAFT", "ACTIVE", "SUSPENDED"],
        },
    ],
};

const CASH_SESSION: LifecycleTable = LifecycleTable {
    kind: EntityKind::CashSession,
    statuses: &[
        status("OPEN", "Register session accepts transactions"),
        terminal("CLOSED", "Register session is counted and closed"),
    ],
    actions: &[ActionRule {
        action: "close",
        label: "Close session",
        permission: "cash.session.close",
        from: &["OPEN"],
    }],
};

const CASH_TRANSACTION: LifecycleTable = LifecycleTable {
    kind: EntityKind::CashTransaction,
    statuses: &[
        status("DRAFT", "Transaction is entered but not posted"),
        status("POSTED", "Transaction is posted to the register"),
        terminal("REVERSED", "Posted transaction was reversed"),
        terminal("CANCELLED", "Draft transaction was cancelled"),
    ],
    actions: &[
        ActionRule {
            action: "post",
            label: "Post",
            permission: "cash.txn.post",
            from: &["DRAFT"],
        },
        ActionRule {
            action: "reverse",
            label: "Reverse",
            permission: "cash.txn.reverse",
            from: &["POSTED"],
        },
        ActionRule {
            action: "cancel",
            label: "Cancel",
            permission: "cash.txn.cancel",
            from: &["DRAFT"],
        },
    ],
};

const CARI_DOCUMENT: LifecycleTable = LifecycleTable {
    kind: EntityKind::CariDocument,
    statuses: &[
        status("DRAFT", "Document is entered but not posted"),
        status("POSTED", "Document is posted to the counterparty ledger"),
        status("PARTIALLY_SETTLED", "Document is partly settled"),
        terminal("SETTLED", "Document is fully settled"),
        terminal("REVERSED", "Posted document was reversed"),
        terminal("CANCELLED", "Draft document was cancelled"),
    ],
    actions: &[
        ActionRule {
            action: "post",
            label: "Post",
            permission: "cari.doc.post",
            from: &["DRAFT"],
        },
        ActionRule {
            action: "reverse",
            label: "Reverse",
            permission: "cari.doc.reverse",
            from: &["POSTED", "PARTIALLY_SETTLED"],
        },
        ActionRule {
            action: "cancel",
            label: "Cancel",
            permission: "cari.doc.cancel",
            from: &["DRAFT"],
        },
    ],
};

const JOURNAL: LifecycleTable = LifecycleTable {
    kind: EntityKind::Journal,
    statuses: &[
        status("DRAFT", "Journal is entered but not posted"),
        status("POSTED", "Journal is posted to the general ledger"),
        terminal("REVERSED", "Posted journal was reversed"),
        terminal("CANCELLED", "Draft journal was cancelled"),
    ],
    actions: &[
        ActionRule {
            action: "post",
            label: "Post",
            permission: "gl.journal.post",
            from: &["DRAFT"],
        },
        ActionRule {
            action: "reverse",
            label: "Reverse",
            permission: "gl.journal.reverse",
            from: &["POSTED"],
        },
        ActionRule {
            action: "cancel",
            label: "Cancel",
            permission: "gl.journal.cancel",
            from: &["DRAFT"],
        },
    ],
};

pub const LIFECYCLE_TABLES: &[LifecycleTable] =
    &[CONTRACT, CASH_SESSION, CASH_TRANSACTION, CARI_DOCUMENT, JOURNAL];

#[must_use]
pub fn lifecycle_table(kind: EntityKind) -> Option<&'static LifecycleTable> {
    LIFECYCLE_TABLES.iter().find(|table| table.kind == kind)
}
