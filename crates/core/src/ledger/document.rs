//! Finalized source documents as seen by the ledger engine.
//!
//! Each kind keeps only the fields the extractors need. Documents are owned by
//! other parts of the back office; the engine reads them and never writes.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::EntryClass;

/// Kind of source document contributing to a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Manually recorded bank transaction.
    Transaction,
    /// Money collected from a client.
    Collection,
    /// Payment to a collaborator.
    CollaboratorPayment,
    /// Conversion between two currencies.
    MoneyExchange,
    /// Salary, commission and pension payments.
    Payroll,
    /// Monthly tax payment.
    TaxPayment,
    /// Proforma invoice issued to a client.
    Proforma,
}

impl DocumentKind {
    /// Returns the kind as a snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Collection => "collection",
            Self::CollaboratorPayment => "collaborator_payment",
            Self::MoneyExchange => "money_exchange",
            Self::Payroll => "payroll",
            Self::TaxPayment => "tax_payment",
            Self::Proforma => "proforma",
        }
    }

    /// Statuses that count as "money moved" for this kind.
    #[must_use]
    pub const fn finalized_statuses(self) -> &'static [DocumentStatus] {
        match self {
            Self::Transaction | Self::Proforma => &[DocumentStatus::Issued],
            Self::Collection | Self::MoneyExchange => &[DocumentStatus::Confirmed],
            Self::CollaboratorPayment | Self::TaxPayment => &[DocumentStatus::Paid],
            Self::Payroll => &[DocumentStatus::Paid, DocumentStatus::PensionPaid],
        }
    }

    /// Returns true if `status` is a finalized status for this kind.
    #[must_use]
    pub fn is_finalized(self, status: DocumentStatus) -> bool {
        self.finalized_statuses().contains(&status)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Not finalized yet.
    Pending,
    /// Issued (transactions, proformas).
    Issued,
    /// Confirmed (collections, money exchanges).
    Confirmed,
    /// Paid (collaborator payments, payrolls, tax payments).
    Paid,
    /// Payroll pension paid.
    PensionPaid,
    /// Canceled.
    Canceled,
}

/// Finalization timestamp in whatever shape the store returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizationStamp {
    /// Timestamp with time of day.
    DateTime(DateTime<FixedOffset>),
    /// Date-only column.
    Date(NaiveDate),
    /// Pre-formatted text starting with `YYYY-MM-DD`.
    Text(String),
}

impl FinalizationStamp {
    /// Normalizes the stamp to the calendar date used for ordering.
    ///
    /// Date-times are taken on their UTC calendar day. Returns `None` if a text
    /// stamp does not start with a valid ISO date.
    #[must_use]
    pub fn entry_date(&self) -> Option<NaiveDate> {
        match self {
            Self::DateTime(at) => Some(at.with_timezone(&Utc).date_naive()),
            Self::Date(date) => Some(*date),
            Self::Text(text) => text
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()),
        }
    }
}

impl From<DateTime<FixedOffset>> for FinalizationStamp {
    fn from(at: DateTime<FixedOffset>) -> Self {
        Self::DateTime(at)
    }
}

impl From<NaiveDate> for FinalizationStamp {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// Returns the entry date of an optional stamp.
pub(crate) fn stamp_date(stamp: Option<&FinalizationStamp>) -> Option<NaiveDate> {
    let stamp = stamp?;
    let date = stamp.entry_date();
    if date.is_none() {
        tracing::debug!(?stamp, "Dropping document with unparseable finalization stamp");
    }
    date
}

/// Bank transaction with a declared direction.
#[derive(Debug, Clone)]
pub struct TransactionDocument {
    /// Document ID.
    pub id: Uuid,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Declared direction.
    pub direction: EntryClass,
    /// Free-text description.
    pub description: String,
    /// Currency code.
    pub currency: String,
    /// Total amount.
    pub total: Decimal,
    /// When the transaction was issued.
    pub issued_at: Option<FinalizationStamp>,
}

/// Collection of client money for a project.
#[derive(Debug, Clone)]
pub struct CollectionDocument {
    /// Document ID.
    pub id: Uuid,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Currency code.
    pub currency: String,
    /// Collected total.
    pub total: Decimal,
    /// Commission charged on the collection.
    pub commission: Option<Decimal>,
    /// Tax component.
    pub taxes: Option<Decimal>,
    /// When the collection was confirmed.
    pub confirmed_at: Option<FinalizationStamp>,
    /// Resolved client name.
    pub client_name: Option<String>,
}

/// Payment to a collaborator.
#[derive(Debug, Clone)]
pub struct CollaboratorPaymentDocument {
    /// Document ID.
    pub id: Uuid,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Currency code.
    pub currency: String,
    /// Gross amount before deductions.
    pub gross_amount: Decimal,
    /// Net amount actually paid.
    pub net_amount: Decimal,
    /// When the payment was made.
    pub paid_at: Option<FinalizationStamp>,
    /// Resolved collaborator name.
    pub collaborator_name: Option<String>,
}

/// Exchange between two currencies.
#[derive(Debug, Clone)]
pub struct MoneyExchangeDocument {
    /// Document ID.
    pub id: Uuid,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Currency sold.
    pub from_currency: String,
    /// Amount sold.
    pub from_amount: Decimal,
    /// Tax charged on the outgoing leg.
    pub from_taxes: Option<Decimal>,
    /// Currency bought.
    pub to_currency: String,
    /// Amount bought.
    pub to_amount: Decimal,
    /// Tax charged on the incoming leg.
    pub to_taxes: Option<Decimal>,
    /// When the exchange was confirmed.
    pub confirmed_at: Option<FinalizationStamp>,
}

/// Payroll payment for a collaborator.
#[derive(Debug, Clone)]
pub struct PayrollDocument {
    /// Document ID.
    pub id: Uuid,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Currency code.
    pub currency: String,
    /// Net salary paid.
    pub net_salary: Decimal,
    /// Tax component of the salary.
    pub taxes: Option<Decimal>,
    /// Commission paid with the salary.
    pub commission: Option<Decimal>,
    /// Pension contribution.
    pub pension_amount: Option<Decimal>,
    /// When salary and commission were paid.
    pub paid_at: Option<FinalizationStamp>,
    /// When the pension was paid.
    pub pension_paid_at: Option<FinalizationStamp>,
    /// Resolved collaborator name.
    pub collaborator_name: Option<String>,
}

/// Monthly tax payment.
#[derive(Debug, Clone)]
pub struct TaxPaymentDocument {
    /// Document ID.
    pub id: Uuid,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Currency code.
    pub currency: String,
    /// Fiscal year paid for.
    pub year: i32,
    /// Fiscal month paid for (1-12).
    pub month: u32,
    /// Total paid.
    pub total: Decimal,
    /// Tax component.
    pub taxes: Option<Decimal>,
    /// When the payment was made.
    pub paid_at: Option<FinalizationStamp>,
}

/// Proforma invoice for a client project.
#[derive(Debug, Clone)]
pub struct ProformaDocument {
    /// Document ID.
    pub id: Uuid,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Currency code.
    pub currency: String,
    /// Proforma total.
    pub total: Decimal,
    /// First day of the billed period.
    pub start_date: NaiveDate,
    /// Last day of the billed period.
    pub end_date: NaiveDate,
    /// When the proforma was issued.
    pub issued_at: Option<FinalizationStamp>,
    /// Resolved client name.
    pub client_name: Option<String>,
}

/// Any source document the engine can consume.
#[derive(Debug, Clone)]
pub enum SourceDocument {
    /// Bank transaction.
    Transaction(TransactionDocument),
    /// Client collection.
    Collection(CollectionDocument),
    /// Collaborator payment.
    CollaboratorPayment(CollaboratorPaymentDocument),
    /// Money exchange.
    MoneyExchange(MoneyExchangeDocument),
    /// Payroll payment.
    Payroll(PayrollDocument),
    /// Tax payment.
    TaxPayment(TaxPaymentDocument),
    /// Proforma.
    Proforma(ProformaDocument),
}

impl SourceDocument {
    /// Returns the kind of this document.
    #[must_use]
    pub const fn kind(&self) -> DocumentKind {
        match self {
            Self::Transaction(_) => DocumentKind::Transaction,
            Self::Collection(_) => DocumentKind::Collection,
            Self::CollaboratorPayment(_) => DocumentKind::CollaboratorPayment,
            Self::MoneyExchange(_) => DocumentKind::MoneyExchange,
            Self::Payroll(_) => DocumentKind::Payroll,
            Self::TaxPayment(_) => DocumentKind::TaxPayment,
            Self::Proforma(_) => DocumentKind::Proforma,
        }
    }

    /// Returns the document ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Transaction(d) => d.id,
            Self::Collection(d) => d.id,
            Self::CollaboratorPayment(d) => d.id,
            Self::MoneyExchange(d) => d.id,
            Self::Payroll(d) => d.id,
            Self::TaxPayment(d) => d.id,
            Self::Proforma(d) => d.id,
        }
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> DocumentStatus {
        match self {
            Self::Transaction(d) => d.status,
            Self::Collection(d) => d.status,
            Self::CollaboratorPayment(d) => d.status,
            Self::MoneyExchange(d) => d.status,
            Self::Payroll(d) => d.status,
            Self::TaxPayment(d) => d.status,
            Self::Proforma(d) => d.status,
        }
    }

    /// Returns the stamp that finalized the document in its current status.
    ///
    /// Payrolls use `pension_paid_at` once the pension is paid and `paid_at`
    /// otherwise.
    #[must_use]
    pub fn finalization_stamp(&self) -> Option<&FinalizationStamp> {
        match self {
            Self::Transaction(d) => d.issued_at.as_ref(),
            Self::Collection(d) => d.confirmed_at.as_ref(),
            Self::CollaboratorPayment(d) => d.paid_at.as_ref(),
            Self::MoneyExchange(d) => d.confirmed_at.as_ref(),
            Self::Payroll(d) if d.status == DocumentStatus::PensionPaid => {
                d.pension_paid_at.as_ref()
            }
            Self::Payroll(d) => d.paid_at.as_ref(),
            Self::TaxPayment(d) => d.paid_at.as_ref(),
            Self::Proforma(d) => d.issued_at.as_ref(),
        }
    }

    /// Returns true if the document is denominated in `currency`.
    ///
    /// Money exchanges match on either leg.
    #[must_use]
    pub fn is_in_currency(&self, currency: &str) -> bool {
        match self {
            Self::Transaction(d) => d.currency == currency,
            Self::Collection(d) => d.currency == currency,
            Self::CollaboratorPayment(d) => d.currency == currency,
            Self::MoneyExchange(d) => d.from_currency == currency || d.to_currency == currency,
            Self::Payroll(d) => d.currency == currency,
            Self::TaxPayment(d) => d.currency == currency,
            Self::Proforma(d) => d.currency == currency,
        }
    }
}
