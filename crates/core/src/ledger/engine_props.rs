//! Property-based tests for the ledger engine.
//!
//! - Ordering: entries are non-decreasing by date, same-day ties keep source order
//! - Balance: every running balance is the previous one plus the entry's step
//! - Exclusion: no entry carries a zero amount or a sign contradicting its class
//! - Isolation: documents in other currencies never affect a report
//! - Idempotence: the same batches always serialize to the same bytes

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{CurrencyCode, round_cents};
use uuid::Uuid;

use super::document::{
    CollectionDocument, DocumentKind, DocumentStatus, FinalizationStamp, SourceDocument,
    TransactionDocument,
};
use super::engine::{KindBatch, LedgerEngine};
use super::entry::EntryClass;
use super::variant::{BalanceMode, ReportVariant};

/// Strategy to generate signed amounts (-100.00 to 10,000.00), zero included.
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-10_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate optional tax amounts with sub-cent precision.
fn tax_amount() -> impl Strategy<Value = Option<Decimal>> {
    proptest::option::of((0i64..100_000i64).prop_map(|mills| Decimal::new(mills, 3)))
}

fn currency_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("USD".to_string()),
        Just("EUR".to_string()),
        Just("GBP".to_string()),
    ]
}

fn status() -> impl Strategy<Value = DocumentStatus> {
    prop_oneof![
        4 => Just(DocumentStatus::Issued),
        4 => Just(DocumentStatus::Confirmed),
        1 => Just(DocumentStatus::Pending),
        1 => Just(DocumentStatus::Canceled),
    ]
}

fn day() -> impl Strategy<Value = NaiveDate> {
    (0u64..10).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(offset)
    })
}

/// Strategy to generate transactions and collections in mixed currencies.
fn document() -> impl Strategy<Value = SourceDocument> {
    prop_oneof![
        (signed_amount(), currency_code(), status(), day(), any::<bool>()).prop_map(
            |(total, currency, status, day, income)| {
                SourceDocument::Transaction(TransactionDocument {
                    id: Uuid::new_v4(),
                    status,
                    direction: if income {
                        EntryClass::Income
                    } else {
                        EntryClass::Outcome
                    },
                    description: format!("tx {total}"),
                    currency,
                    total,
                    issued_at: Some(FinalizationStamp::Date(day)),
                })
            }
        ),
        (
            signed_amount(),
            tax_amount(),
            tax_amount(),
            currency_code(),
            status(),
            day()
        )
            .prop_map(|(total, commission, taxes, currency, status, day)| {
                SourceDocument::Collection(CollectionDocument {
                    id: Uuid::new_v4(),
                    status,
                    currency,
                    total,
                    commission,
                    taxes,
                    confirmed_at: Some(FinalizationStamp::Text(day.to_string())),
                    client_name: None,
                })
            }),
    ]
}

fn batches(documents: Vec<SourceDocument>) -> Vec<KindBatch> {
    [DocumentKind::Transaction, DocumentKind::Collection]
        .into_iter()
        .map(|kind| KindBatch {
            kind,
            documents: documents
                .iter()
                .filter(|document| document.kind() == kind)
                .cloned()
                .collect(),
        })
        .collect()
}

fn usd() -> CurrencyCode {
    CurrencyCode::parse("USD").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Entries are sorted by date and the running balance follows the recurrence.
    #[test]
    fn prop_sorted_with_consistent_balances(
        documents in proptest::collection::vec(document(), 0..40),
    ) {
        let report = LedgerEngine::build(&ReportVariant::Bank, &usd(), &batches(documents));

        let mut previous = Decimal::ZERO;
        for pair in report.entries.windows(2) {
            prop_assert!(pair[0].entry.entry_date <= pair[1].entry.entry_date);
        }
        for running in &report.entries {
            prop_assert_eq!(running.balance, round_cents(previous + running.entry.net_amount()));
            previous = running.balance;
        }
        prop_assert_eq!(report.final_balance, previous);
    }

    /// No entry has a zero amount, and the sign always matches the class.
    #[test]
    fn prop_non_positive_amounts_excluded(
        documents in proptest::collection::vec(document(), 0..40),
    ) {
        let report = LedgerEngine::build(&ReportVariant::Bank, &usd(), &batches(documents));

        for running in &report.entries {
            let entry = &running.entry;
            match entry.class {
                EntryClass::Income => prop_assert!(entry.amount > Decimal::ZERO),
                EntryClass::Outcome => prop_assert!(entry.amount < Decimal::ZERO),
            }
            prop_assert!(entry.adjustment <= Decimal::ZERO);
            prop_assert_eq!(entry.amount, round_cents(entry.amount));
        }
    }

    /// Same-day entries of one kind keep their source order.
    #[test]
    fn prop_same_day_ties_keep_source_order(
        totals in proptest::collection::vec(1i64..1_000_000i64, 1..20),
    ) {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let documents: Vec<SourceDocument> = totals
            .iter()
            .enumerate()
            .map(|(index, cents)| {
                SourceDocument::Transaction(TransactionDocument {
                    id: Uuid::new_v4(),
                    status: DocumentStatus::Issued,
                    direction: EntryClass::Income,
                    description: index.to_string(),
                    currency: "USD".to_string(),
                    total: Decimal::new(*cents, 2),
                    issued_at: Some(FinalizationStamp::Date(day)),
                })
            })
            .collect();

        let report = LedgerEngine::build(&ReportVariant::Bank, &usd(), &batches(documents));
        let labels: Vec<String> = report.entries.iter().map(|e| e.entry.label.clone()).collect();
        let expected: Vec<String> = (0..totals.len()).map(|i| i.to_string()).collect();
        prop_assert_eq!(labels, expected);
    }

    /// Foreign-currency documents never change a report.
    #[test]
    fn prop_currency_isolation(
        documents in proptest::collection::vec(document(), 0..40),
    ) {
        let usd_only: Vec<SourceDocument> = documents
            .iter()
            .filter(|document| document.is_in_currency("USD"))
            .cloned()
            .collect();

        let mixed = LedgerEngine::build(&ReportVariant::Bank, &usd(), &batches(documents));
        let isolated = LedgerEngine::build(&ReportVariant::Bank, &usd(), &batches(usd_only));
        prop_assert_eq!(mixed, isolated);
    }

    /// Building twice from the same batches yields byte-identical JSON.
    #[test]
    fn prop_build_is_idempotent(
        documents in proptest::collection::vec(document(), 0..40),
    ) {
        let batches = batches(documents);
        let first = serde_json::to_vec(&LedgerEngine::build(&ReportVariant::Bank, &usd(), &batches)).unwrap();
        let second = serde_json::to_vec(&LedgerEngine::build(&ReportVariant::Bank, &usd(), &batches)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Amount-only accumulation ignores adjustments entirely.
    #[test]
    fn prop_amount_only_ignores_adjustments(
        documents in proptest::collection::vec(document(), 0..40),
    ) {
        let mut entries = LedgerEngine::merge(LedgerEngine::extract(
            ReportVariant::Bank.rules(),
            &batches(documents),
            &usd(),
        ));
        LedgerEngine::sort_chronologically(&mut entries);
        let expected = entries
            .iter()
            .fold(Decimal::ZERO, |sum, entry| round_cents(sum + entry.amount));

        let (_, final_balance) = LedgerEngine::accumulate(entries, BalanceMode::AmountOnly);
        prop_assert_eq!(final_balance, expected);
    }
}
