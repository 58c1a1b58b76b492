//! Entry extractors, one per document kind and report variant.
//!
//! Every extractor is a plain function from a finalized document to zero or
//! more entries. Variants register their extractors in static rule tables, so
//! adding a kind means adding a function and a table row.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::{CurrencyCode, outflow};

use super::document::{
    CollaboratorPaymentDocument, CollectionDocument, DocumentKind, DocumentStatus,
    FinalizationStamp, MoneyExchangeDocument, PayrollDocument, SourceDocument, stamp_date,
};
use super::entry::{EntryClass, LedgerEntry, UNKNOWN_COUNTERPARTY};

/// Turns one document into ledger entries for a report currency.
pub type Extractor = fn(&SourceDocument, &CurrencyCode) -> Vec<LedgerEntry>;

/// Registry row binding a document kind to its extractor.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    /// Kind read from the source.
    pub kind: DocumentKind,
    /// Extractor applied to every document of that kind.
    pub extract: Extractor,
}

/// Kinds contributing to the organization-wide bank ledger.
pub const BANK_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        kind: DocumentKind::Transaction,
        extract: transaction_entries,
    },
    ExtractionRule {
        kind: DocumentKind::Collection,
        extract: bank_collection_entries,
    },
    ExtractionRule {
        kind: DocumentKind::CollaboratorPayment,
        extract: collaborator_payment_entries,
    },
    ExtractionRule {
        kind: DocumentKind::MoneyExchange,
        extract: money_exchange_entries,
    },
    ExtractionRule {
        kind: DocumentKind::Payroll,
        extract: bank_payroll_entries,
    },
    ExtractionRule {
        kind: DocumentKind::TaxPayment,
        extract: tax_payment_entries,
    },
];

/// Kinds contributing to a client ledger.
pub const CLIENT_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        kind: DocumentKind::Collection,
        extract: client_collection_entries,
    },
    ExtractionRule {
        kind: DocumentKind::Proforma,
        extract: proforma_entries,
    },
];

/// Kinds contributing to a collaborator ledger.
pub const COLLABORATOR_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        kind: DocumentKind::CollaboratorPayment,
        extract: collaborator_payment_entries,
    },
    ExtractionRule {
        kind: DocumentKind::Payroll,
        extract: collaborator_payroll_entries,
    },
];

fn counterparty(name: Option<&String>) -> &str {
    name.map_or(UNKNOWN_COUNTERPARTY, String::as_str)
}

/// Entry date for a document in single-currency kinds.
///
/// `None` when the document is not finalized, carries another currency, or has
/// no usable finalization stamp.
fn finalized_on(
    kind: DocumentKind,
    status: DocumentStatus,
    document_currency: &str,
    currency: &CurrencyCode,
    stamp: Option<&FinalizationStamp>,
) -> Option<NaiveDate> {
    if !kind.is_finalized(status) || *currency != *document_currency {
        return None;
    }
    stamp_date(stamp)
}

/// Transaction: one entry signed by its declared direction.
pub fn transaction_entries(document: &SourceDocument, currency: &CurrencyCode) -> Vec<LedgerEntry> {
    let SourceDocument::Transaction(tx) = document else {
        return Vec::new();
    };
    let Some(date) = finalized_on(
        DocumentKind::Transaction,
        tx.status,
        &tx.currency,
        currency,
        tx.issued_at.as_ref(),
    ) else {
        return Vec::new();
    };

    let entry = match tx.direction {
        EntryClass::Income => {
            LedgerEntry::income(date, tx.description.clone(), tx.total, Decimal::ZERO)
        }
        EntryClass::Outcome => {
            LedgerEntry::outcome(date, tx.description.clone(), tx.total, Decimal::ZERO)
        }
    };
    entry.into_iter().collect()
}

fn collection_date(collection: &CollectionDocument, currency: &CurrencyCode) -> Option<NaiveDate> {
    finalized_on(
        DocumentKind::Collection,
        collection.status,
        &collection.currency,
        currency,
        collection.confirmed_at.as_ref(),
    )
}

/// Collection on the bank ledger: principal income plus commission outcome.
pub fn bank_collection_entries(
    document: &SourceDocument,
    currency: &CurrencyCode,
) -> Vec<LedgerEntry> {
    let SourceDocument::Collection(collection) = document else {
        return Vec::new();
    };
    let Some(date) = collection_date(collection, currency) else {
        return Vec::new();
    };
    let client = counterparty(collection.client_name.as_ref());

    let principal = LedgerEntry::income(
        date,
        format!("Collection for {client}"),
        collection.total,
        outflow(collection.taxes),
    );
    let commission = collection.commission.and_then(|commission| {
        LedgerEntry::outcome(
            date,
            format!("Commission's collection for {client}"),
            commission,
            Decimal::ZERO,
        )
    });

    principal.into_iter().chain(commission).collect()
}

/// Collection on a client ledger: principal only, no adjustment.
pub fn client_collection_entries(
    document: &SourceDocument,
    currency: &CurrencyCode,
) -> Vec<LedgerEntry> {
    let SourceDocument::Collection(collection) = document else {
        return Vec::new();
    };
    let Some(date) = collection_date(collection, currency) else {
        return Vec::new();
    };
    let client = counterparty(collection.client_name.as_ref());

    LedgerEntry::income(
        date,
        format!("Collection for {client}"),
        collection.total,
        Decimal::ZERO,
    )
    .into_iter()
    .collect()
}

/// Collaborator payment: net amount as outcome.
pub fn collaborator_payment_entries(
    document: &SourceDocument,
    currency: &CurrencyCode,
) -> Vec<LedgerEntry> {
    let SourceDocument::CollaboratorPayment(CollaboratorPaymentDocument {
        status,
        currency: document_currency,
        net_amount,
        paid_at,
        collaborator_name,
        ..
    }) = document
    else {
        return Vec::new();
    };
    let Some(date) = finalized_on(
        DocumentKind::CollaboratorPayment,
        *status,
        document_currency,
        currency,
        paid_at.as_ref(),
    ) else {
        return Vec::new();
    };

    LedgerEntry::outcome(
        date,
        format!(
            "Collaborator payment to {}",
            counterparty(collaborator_name.as_ref())
        ),
        *net_amount,
        Decimal::ZERO,
    )
    .into_iter()
    .collect()
}

/// Money exchange: each leg matching the report currency contributes.
///
/// A same-currency exchange matches both legs and yields two entries.
pub fn money_exchange_entries(
    document: &SourceDocument,
    currency: &CurrencyCode,
) -> Vec<LedgerEntry> {
    let SourceDocument::MoneyExchange(MoneyExchangeDocument {
        status,
        from_currency,
        from_amount,
        from_taxes,
        to_currency,
        to_amount,
        to_taxes,
        confirmed_at,
        ..
    }) = document
    else {
        return Vec::new();
    };
    if !DocumentKind::MoneyExchange.is_finalized(*status) {
        return Vec::new();
    }
    let Some(date) = stamp_date(confirmed_at.as_ref()) else {
        return Vec::new();
    };

    let outgoing = (*currency == **from_currency)
        .then(|| {
            LedgerEntry::outcome(
                date,
                format!("Exchange from {currency}"),
                *from_amount,
                outflow(*from_taxes),
            )
        })
        .flatten();
    let incoming = (*currency == **to_currency)
        .then(|| {
            LedgerEntry::income(
                date,
                format!("Exchange to {currency}"),
                *to_amount,
                outflow(*to_taxes),
            )
        })
        .flatten();

    outgoing.into_iter().chain(incoming).collect()
}

fn payroll_entries(
    payroll: &PayrollDocument,
    currency: &CurrencyCode,
    with_taxes: bool,
) -> Vec<LedgerEntry> {
    if *currency != *payroll.currency {
        return Vec::new();
    }
    let collaborator = counterparty(payroll.collaborator_name.as_ref());

    match payroll.status {
        DocumentStatus::Paid => {
            let Some(date) = stamp_date(payroll.paid_at.as_ref()) else {
                return Vec::new();
            };
            let taxes = if with_taxes {
                outflow(payroll.taxes)
            } else {
                Decimal::ZERO
            };
            let salary = LedgerEntry::outcome(
                date,
                format!("Payroll payment for {collaborator}"),
                payroll.net_salary,
                taxes,
            );
            let commission = payroll.commission.and_then(|commission| {
                LedgerEntry::outcome(
                    date,
                    format!("Commission's payroll payment for {collaborator}"),
                    commission,
                    Decimal::ZERO,
                )
            });
            salary.into_iter().chain(commission).collect()
        }
        DocumentStatus::PensionPaid => {
            let Some(date) = stamp_date(payroll.pension_paid_at.as_ref()) else {
                return Vec::new();
            };
            payroll
                .pension_amount
                .and_then(|pension| {
                    LedgerEntry::outcome(
                        date,
                        format!("Payroll pension payment for {collaborator}"),
                        pension,
                        Decimal::ZERO,
                    )
                })
                .into_iter()
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Payroll on the bank ledger: salary carries its tax adjustment.
pub fn bank_payroll_entries(document: &SourceDocument, currency: &CurrencyCode) -> Vec<LedgerEntry> {
    match document {
        SourceDocument::Payroll(payroll) => payroll_entries(payroll, currency, true),
        _ => Vec::new(),
    }
}

/// Payroll on a collaborator ledger: no adjustments.
pub fn collaborator_payroll_entries(
    document: &SourceDocument,
    currency: &CurrencyCode,
) -> Vec<LedgerEntry> {
    match document {
        SourceDocument::Payroll(payroll) => payroll_entries(payroll, currency, false),
        _ => Vec::new(),
    }
}

/// Tax payment: total as outcome, labelled with the fiscal month.
pub fn tax_payment_entries(document: &SourceDocument, currency: &CurrencyCode) -> Vec<LedgerEntry> {
    let SourceDocument::TaxPayment(payment) = document else {
        return Vec::new();
    };
    let Some(date) = finalized_on(
        DocumentKind::TaxPayment,
        payment.status,
        &payment.currency,
        currency,
        payment.paid_at.as_ref(),
    ) else {
        return Vec::new();
    };

    LedgerEntry::outcome(
        date,
        format!("Tax payments {}-{:02}", payment.year, payment.month),
        payment.total,
        outflow(payment.taxes),
    )
    .into_iter()
    .collect()
}

/// Proforma: total as income for the billed period.
pub fn proforma_entries(document: &SourceDocument, currency: &CurrencyCode) -> Vec<LedgerEntry> {
    let SourceDocument::Proforma(proforma) = document else {
        return Vec::new();
    };
    let Some(date) = finalized_on(
        DocumentKind::Proforma,
        proforma.status,
        &proforma.currency,
        currency,
        proforma.issued_at.as_ref(),
    ) else {
        return Vec::new();
    };

    LedgerEntry::income(
        date,
        format!(
            "Proforma for {} from {} to {}",
            counterparty(proforma.client_name.as_ref()),
            proforma.start_date,
            proforma.end_date
        ),
        proforma.total,
        Decimal::ZERO,
    )
    .into_iter()
    .collect()
}
