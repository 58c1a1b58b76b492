//! Ledger entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::round_cents;

/// Label used when a document's counterparty cannot be resolved.
pub const UNKNOWN_COUNTERPARTY: &str = "Unknown";

/// Direction of money for a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryClass {
    /// Money coming in (positive amount).
    Income,
    /// Money going out (negative amount).
    Outcome,
}

/// A single dated, signed line of a reconstructed ledger.
///
/// Entries are created fresh per request by the extractors and never change
/// afterwards. The amount is positive for income and negative for outcome,
/// never zero, and always rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Finalization date of the source document.
    pub entry_date: NaiveDate,
    /// Income or outcome.
    pub class: EntryClass,
    /// Human-readable description.
    pub label: String,
    /// Signed primary amount.
    pub amount: Decimal,
    /// Secondary tax or commission adjustment, zero or negative.
    pub adjustment: Decimal,
}

impl LedgerEntry {
    /// Builds an income entry from a raw amount.
    ///
    /// Returns `None` when the amount rounds to zero or below.
    #[must_use]
    pub fn income(
        entry_date: NaiveDate,
        label: impl Into<String>,
        amount: Decimal,
        adjustment: Decimal,
    ) -> Option<Self> {
        let amount = round_cents(amount);
        (amount > Decimal::ZERO).then(|| Self {
            entry_date,
            class: EntryClass::Income,
            label: label.into(),
            amount,
            adjustment: round_cents(adjustment),
        })
    }

    /// Builds an outcome entry from a raw (positive) amount.
    ///
    /// Returns `None` when the amount rounds to zero or below.
    #[must_use]
    pub fn outcome(
        entry_date: NaiveDate,
        label: impl Into<String>,
        amount: Decimal,
        adjustment: Decimal,
    ) -> Option<Self> {
        let amount = round_cents(amount);
        (amount > Decimal::ZERO).then(|| Self {
            entry_date,
            class: EntryClass::Outcome,
            label: label.into(),
            amount: -amount.abs(),
            adjustment: round_cents(adjustment),
        })
    }

    /// Net effect of this entry on the balance, adjustment included.
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        self.amount + self.adjustment
    }
}

/// A ledger entry annotated with the running balance through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningLedgerEntry {
    /// The underlying entry.
    #[serde(flatten)]
    pub entry: LedgerEntry,
    /// Cumulative balance up to and including this entry.
    pub balance: Decimal,
}

/// A fully assembled ledger report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReport {
    /// Entries in chronological order with running balances.
    pub entries: Vec<RunningLedgerEntry>,
    /// Balance after the last entry (zero when empty).
    pub final_balance: Decimal,
}

impl LedgerReport {
    /// Returns an empty report.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            final_balance: Decimal::ZERO,
        }
    }

    /// Returns true if the report has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
