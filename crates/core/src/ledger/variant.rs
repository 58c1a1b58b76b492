//! Report variants and their extraction registries.

use serde::Serialize;
use tally_shared::types::{ClientId, CollaboratorId};

use super::extract::{BANK_RULES, CLIENT_RULES, COLLABORATOR_RULES, ExtractionRule};
use super::source::CounterpartyScope;

/// How an entry moves the running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceMode {
    /// `amount + adjustment`.
    WithAdjustment,
    /// `amount` only.
    AmountOnly,
}

/// Which ledger is being reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", content = "counterparty_id", rename_all = "snake_case")]
pub enum ReportVariant {
    /// Organization-wide bank ledger.
    Bank,
    /// Ledger of one client.
    Client(ClientId),
    /// Ledger of one collaborator.
    Collaborator(CollaboratorId),
}

impl ReportVariant {
    /// Extraction rules, in merge order.
    #[must_use]
    pub const fn rules(&self) -> &'static [ExtractionRule] {
        match self {
            Self::Bank => BANK_RULES,
            Self::Client(_) => CLIENT_RULES,
            Self::Collaborator(_) => COLLABORATOR_RULES,
        }
    }

    /// Balance accumulation mode.
    #[must_use]
    pub const fn balance_mode(&self) -> BalanceMode {
        match self {
            Self::Bank => BalanceMode::WithAdjustment,
            Self::Client(_) | Self::Collaborator(_) => BalanceMode::AmountOnly,
        }
    }

    /// Counterparty restriction applied to every source read.
    #[must_use]
    pub const fn scope(&self) -> CounterpartyScope {
        match self {
            Self::Bank => CounterpartyScope::All,
            Self::Client(id) => CounterpartyScope::Client(*id),
            Self::Collaborator(id) => CounterpartyScope::Collaborator(*id),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Client(_) => "client",
            Self::Collaborator(_) => "collaborator",
        }
    }
}
