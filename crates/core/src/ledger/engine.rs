//! Merge, sort, accumulate and assemble.
//!
//! Nothing here knows about individual document kinds: the engine applies the
//! variant's registry to the batches it is given and works on entries only.

use rust_decimal::Decimal;
use tally_shared::types::{CurrencyCode, round_cents};

use super::document::{DocumentKind, SourceDocument};
use super::entry::{LedgerEntry, LedgerReport, RunningLedgerEntry};
use super::extract::ExtractionRule;
use super::variant::{BalanceMode, ReportVariant};

/// Documents of one kind, as returned by a source read.
#[derive(Debug, Clone)]
pub struct KindBatch {
    /// Kind that was read.
    pub kind: DocumentKind,
    /// Documents in source order.
    pub documents: Vec<SourceDocument>,
}

/// Pure ledger pipeline.
pub struct LedgerEngine;

impl LedgerEngine {
    /// Applies the registry to every batch, one entry list per rule.
    ///
    /// Lists follow registry order; batches for kinds without a rule are ignored.
    #[must_use]
    pub fn extract(
        rules: &[ExtractionRule],
        batches: &[KindBatch],
        currency: &CurrencyCode,
    ) -> Vec<Vec<LedgerEntry>> {
        rules
            .iter()
            .map(|rule| {
                batches
                    .iter()
                    .filter(|batch| batch.kind == rule.kind)
                    .flat_map(|batch| &batch.documents)
                    .flat_map(|document| (rule.extract)(document, currency))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Concatenates entry lists without deduplication.
    #[must_use]
    pub fn merge(lists: Vec<Vec<LedgerEntry>>) -> Vec<LedgerEntry> {
        lists.into_iter().flatten().collect()
    }

    /// Stable ascending sort by entry date; ties keep merge order.
    pub fn sort_chronologically(entries: &mut [LedgerEntry]) {
        entries.sort_by_key(|entry| entry.entry_date);
    }

    /// Walks the sorted entries once, producing running balances.
    ///
    /// The balance is rounded to cents after every step.
    #[must_use]
    pub fn accumulate(
        entries: Vec<LedgerEntry>,
        mode: BalanceMode,
    ) -> (Vec<RunningLedgerEntry>, Decimal) {
        let mut balance = Decimal::ZERO;
        let running = entries
            .into_iter()
            .map(|entry| {
                let step = match mode {
                    BalanceMode::WithAdjustment => entry.net_amount(),
                    BalanceMode::AmountOnly => entry.amount,
                };
                balance = round_cents(balance + step);
                RunningLedgerEntry { entry, balance }
            })
            .collect();
        (running, balance)
    }

    /// Packages the accumulator output.
    #[must_use]
    pub fn assemble(entries: Vec<RunningLedgerEntry>, final_balance: Decimal) -> LedgerReport {
        LedgerReport {
            entries,
            final_balance,
        }
    }

    /// Runs the full pipeline for a variant over already-read batches.
    #[must_use]
    pub fn build(
        variant: &ReportVariant,
        currency: &CurrencyCode,
        batches: &[KindBatch],
    ) -> LedgerReport {
        let mut entries = Self::merge(Self::extract(variant.rules(), batches, currency));
        Self::sort_chronologically(&mut entries);
        let (running, final_balance) = Self::accumulate(entries, variant.balance_mode());
        Self::assemble(running, final_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::document::{
        CollectionDocument, DocumentStatus, FinalizationStamp, MoneyExchangeDocument,
        TransactionDocument,
    };
    use crate::ledger::entry::EntryClass;
    use chrono::{DateTime, NaiveDate};
    use rust_decimal_macros::dec;
    use tally_shared::types::ClientId;
    use uuid::Uuid;

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(day: &str, amount: Decimal, adjustment: Decimal) -> LedgerEntry {
        LedgerEntry {
            entry_date: date(day),
            class: if amount.is_sign_negative() {
                EntryClass::Outcome
            } else {
                EntryClass::Income
            },
            label: format!("{day} {amount}"),
            amount,
            adjustment,
        }
    }

    fn transaction(total: Decimal, issued_at: &str) -> SourceDocument {
        SourceDocument::Transaction(TransactionDocument {
            id: Uuid::new_v4(),
            status: DocumentStatus::Issued,
            direction: EntryClass::Income,
            description: "Consulting fee".to_string(),
            currency: "USD".to_string(),
            total,
            issued_at: Some(FinalizationStamp::DateTime(
                DateTime::parse_from_rfc3339(issued_at).unwrap(),
            )),
        })
    }

    fn collection(
        total: Decimal,
        commission: Decimal,
        taxes: Decimal,
        confirmed_at: &str,
    ) -> SourceDocument {
        SourceDocument::Collection(CollectionDocument {
            id: Uuid::new_v4(),
            status: DocumentStatus::Confirmed,
            currency: "USD".to_string(),
            total,
            commission: Some(commission),
            taxes: Some(taxes),
            confirmed_at: Some(FinalizationStamp::Text(confirmed_at.to_string())),
            client_name: Some("Acme".to_string()),
        })
    }

    #[test]
    fn test_scenario_transaction_and_collection() {
        let batches = vec![
            KindBatch {
                kind: DocumentKind::Transaction,
                documents: vec![transaction(dec!(150), "2024-01-05T12:00:00Z")],
            },
            KindBatch {
                kind: DocumentKind::Collection,
                documents: vec![collection(dec!(200), dec!(20), dec!(5), "2024-01-03")],
            },
        ];

        let report = LedgerEngine::build(&ReportVariant::Bank, &usd(), &batches);

        assert_eq!(report.entries.len(), 3);

        let first = &report.entries[0];
        assert_eq!(first.entry.label, "Collection for Acme");
        assert_eq!(first.entry.amount, dec!(200));
        assert_eq!(first.entry.adjustment, dec!(-5));
        assert_eq!(first.balance, dec!(195));

        let second = &report.entries[1];
        assert_eq!(second.entry.label, "Commission's collection for Acme");
        assert_eq!(second.entry.amount, dec!(-20));
        assert_eq!(second.balance, dec!(175));

        let third = &report.entries[2];
        assert_eq!(third.entry.label, "Consulting fee");
        assert_eq!(third.entry.amount, dec!(150));
        assert_eq!(third.balance, dec!(325));

        assert_eq!(report.final_balance, dec!(325));
    }

    #[test]
    fn test_exchange_scenario_per_currency() {
        let exchange = SourceDocument::MoneyExchange(MoneyExchangeDocument {
            id: Uuid::new_v4(),
            status: DocumentStatus::Confirmed,
            from_currency: "USD".to_string(),
            from_amount: dec!(100),
            from_taxes: Some(dec!(2)),
            to_currency: "EUR".to_string(),
            to_amount: dec!(90),
            to_taxes: None,
            confirmed_at: Some(FinalizationStamp::Date(date("2024-02-01"))),
        });
        let batches = vec![KindBatch {
            kind: DocumentKind::MoneyExchange,
            documents: vec![exchange],
        }];

        let usd_report = LedgerEngine::build(&ReportVariant::Bank, &usd(), &batches);
        assert_eq!(usd_report.entries.len(), 1);
        assert_eq!(usd_report.entries[0].entry.amount, dec!(-100));
        assert_eq!(usd_report.entries[0].entry.adjustment, dec!(-2));
        assert_eq!(usd_report.final_balance, dec!(-102));

        let eur = CurrencyCode::parse("EUR").unwrap();
        let eur_report = LedgerEngine::build(&ReportVariant::Bank, &eur, &batches);
        assert_eq!(eur_report.entries.len(), 1);
        assert_eq!(eur_report.entries[0].entry.amount, dec!(90));
        assert_eq!(eur_report.final_balance, dec!(90));
    }

    #[test]
    fn test_empty_report() {
        let report = LedgerEngine::build(&ReportVariant::Bank, &usd(), &[]);
        assert!(report.entries.is_empty());
        assert_eq!(report.final_balance, Decimal::ZERO);
    }

    #[test]
    fn test_sort_is_stable_for_same_day() {
        let mut entries = vec![
            entry("2024-01-02", dec!(1), Decimal::ZERO),
            entry("2024-01-01", dec!(2), Decimal::ZERO),
            entry("2024-01-02", dec!(3), Decimal::ZERO),
            entry("2024-01-01", dec!(4), Decimal::ZERO),
        ];
        LedgerEngine::sort_chronologically(&mut entries);

        let amounts: Vec<Decimal> = entries.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![dec!(2), dec!(4), dec!(1), dec!(3)]);
    }

    #[test]
    fn test_accumulate_modes() {
        let entries = vec![
            entry("2024-01-01", dec!(100), dec!(-10)),
            entry("2024-01-02", dec!(-30), Decimal::ZERO),
        ];

        let (running, final_balance) =
            LedgerEngine::accumulate(entries.clone(), BalanceMode::WithAdjustment);
        assert_eq!(running[0].balance, dec!(90));
        assert_eq!(running[1].balance, dec!(60));
        assert_eq!(final_balance, dec!(60));

        let (running, final_balance) = LedgerEngine::accumulate(entries, BalanceMode::AmountOnly);
        assert_eq!(running[0].balance, dec!(100));
        assert_eq!(final_balance, dec!(70));
    }

    #[test]
    fn test_accumulate_does_not_drift() {
        // 0.1 + 0.2 style sums stay exact on decimals.
        let entries: Vec<LedgerEntry> = (0..1000)
            .map(|_| entry("2024-01-01", dec!(0.10), Decimal::ZERO))
            .chain((0..1000).map(|_| entry("2024-01-01", dec!(0.20), Decimal::ZERO)))
            .collect();
        let (_, final_balance) = LedgerEngine::accumulate(entries, BalanceMode::AmountOnly);
        assert_eq!(final_balance, dec!(300.00));
    }

    #[test]
    fn test_extract_follows_registry_order() {
        // Batches arrive collection-first, the registry puts transactions first.
        let batches = vec![
            KindBatch {
                kind: DocumentKind::Collection,
                documents: vec![collection(dec!(10), dec!(1), dec!(0), "2024-01-01")],
            },
            KindBatch {
                kind: DocumentKind::Transaction,
                documents: vec![transaction(dec!(5), "2024-01-01T08:00:00Z")],
            },
        ];
        let merged = LedgerEngine::merge(LedgerEngine::extract(
            ReportVariant::Bank.rules(),
            &batches,
            &usd(),
        ));
        let labels: Vec<&str> = merged.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Consulting fee",
                "Collection for Acme",
                "Commission's collection for Acme"
            ]
        );
    }

    #[test]
    fn test_client_variant_ignores_bank_only_kinds() {
        let batches = vec![
            KindBatch {
                kind: DocumentKind::Transaction,
                documents: vec![transaction(dec!(5), "2024-01-01T08:00:00Z")],
            },
            KindBatch {
                kind: DocumentKind::Collection,
                documents: vec![collection(dec!(10), dec!(1), dec!(2), "2024-01-01")],
            },
        ];
        let variant = ReportVariant::Client(ClientId::from_uuid(Uuid::new_v4()));
        let report = LedgerEngine::build(&variant, &usd(), &batches);

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].entry.amount, dec!(10));
        assert_eq!(report.final_balance, dec!(10));
    }
}
