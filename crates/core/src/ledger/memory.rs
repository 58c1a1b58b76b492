//! In-memory document source.
//!
//! Applies the same read contract as the database reader over a fixed set of
//! documents. Used by tests and by the API crate's router tests.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tally_shared::types::{ClientId, CollaboratorId};

use super::document::{DocumentKind, SourceDocument};
use super::source::{CounterpartyScope, DocumentSource, SourceError, SourceFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    None,
    Client(ClientId),
    Collaborator(CollaboratorId),
}

impl Owner {
    fn is_in(self, scope: CounterpartyScope) -> bool {
        match scope {
            CounterpartyScope::All => true,
            CounterpartyScope::Client(id) => self == Self::Client(id),
            CounterpartyScope::Collaborator(id) => self == Self::Collaborator(id),
        }
    }
}

/// Document source backed by a vector.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    documents: Vec<(SourceDocument, Owner)>,
    failing: HashSet<DocumentKind>,
    delay: Option<Duration>,
}

impl InMemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document with no counterparty.
    #[must_use]
    pub fn with_document(mut self, document: SourceDocument) -> Self {
        self.documents.push((document, Owner::None));
        self
    }

    /// Adds a document belonging to a client.
    #[must_use]
    pub fn with_client_document(mut self, client_id: ClientId, document: SourceDocument) -> Self {
        self.documents.push((document, Owner::Client(client_id)));
        self
    }

    /// Adds a document belonging to a collaborator.
    #[must_use]
    pub fn with_collaborator_document(
        mut self,
        collaborator_id: CollaboratorId,
        document: SourceDocument,
    ) -> Self {
        self.documents
            .push((document, Owner::Collaborator(collaborator_id)));
        self
    }

    /// Makes every read of `kind` fail.
    #[must_use]
    pub fn failing_on(mut self, kind: DocumentKind) -> Self {
        self.failing.insert(kind);
        self
    }

    /// Delays every read by `delay`.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn matches(document: &SourceDocument, owner: Owner, filter: &SourceFilter) -> bool {
        document.kind().is_finalized(document.status())
            && document.is_in_currency(filter.currency.as_str())
            && owner.is_in(filter.scope)
            && document
                .finalization_stamp()
                .and_then(|stamp| stamp.entry_date())
                .is_some_and(|date| filter.covers(date))
    }
}

#[async_trait]
impl DocumentSource for InMemorySource {
    async fn read(
        &self,
        kind: DocumentKind,
        filter: &SourceFilter,
    ) -> Result<Vec<SourceDocument>, SourceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&kind) {
            return Err(SourceError::new(kind, "source unavailable"));
        }

        Ok(self
            .documents
            .iter()
            .filter(|(document, owner)| {
                document.kind() == kind && Self::matches(document, *owner, filter)
            })
            .map(|(document, _)| document.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::document::{
        CollectionDocument, DocumentStatus, FinalizationStamp, MoneyExchangeDocument,
        PayrollDocument,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_shared::types::CurrencyCode;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filter(currency: &str, scope: CounterpartyScope) -> SourceFilter {
        SourceFilter {
            currency: CurrencyCode::parse(currency).unwrap(),
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 1, 31)),
            scope,
        }
    }

    fn collection(status: DocumentStatus, confirmed_at: Option<NaiveDate>) -> SourceDocument {
        SourceDocument::Collection(CollectionDocument {
            id: Uuid::new_v4(),
            status,
            currency: "USD".to_string(),
            total: dec!(100),
            commission: None,
            taxes: None,
            confirmed_at: confirmed_at.map(FinalizationStamp::Date),
            client_name: Some("Acme".to_string()),
        })
    }

    #[tokio::test]
    async fn test_read_applies_status_stamp_and_bounds() {
        let source = InMemorySource::new()
            .with_document(collection(DocumentStatus::Confirmed, Some(date(2024, 1, 1))))
            .with_document(collection(DocumentStatus::Confirmed, Some(date(2024, 1, 31))))
            .with_document(collection(DocumentStatus::Confirmed, Some(date(2024, 2, 1))))
            .with_document(collection(DocumentStatus::Pending, Some(date(2024, 1, 10))))
            .with_document(collection(DocumentStatus::Confirmed, None));

        let docs = source
            .read(DocumentKind::Collection, &filter("USD", CounterpartyScope::All))
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);

        let docs = source
            .read(DocumentKind::Transaction, &filter("USD", CounterpartyScope::All))
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_read_matches_either_exchange_leg() {
        let exchange = SourceDocument::MoneyExchange(MoneyExchangeDocument {
            id: Uuid::new_v4(),
            status: DocumentStatus::Confirmed,
            from_currency: "USD".to_string(),
            from_amount: dec!(100),
            from_taxes: None,
            to_currency: "EUR".to_string(),
            to_amount: dec!(90),
            to_taxes: None,
            confirmed_at: Some(FinalizationStamp::Date(date(2024, 1, 15))),
        });
        let source = InMemorySource::new().with_document(exchange);

        for currency in ["USD", "EUR"] {
            let docs = source
                .read(DocumentKind::MoneyExchange, &filter(currency, CounterpartyScope::All))
                .await
                .unwrap();
            assert_eq!(docs.len(), 1, "{currency}");
        }
        let docs = source
            .read(DocumentKind::MoneyExchange, &filter("GBP", CounterpartyScope::All))
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_read_respects_scope() {
        let acme = ClientId::new();
        let other = ClientId::new();
        let source = InMemorySource::new()
            .with_client_document(acme, collection(DocumentStatus::Confirmed, Some(date(2024, 1, 5))))
            .with_client_document(other, collection(DocumentStatus::Confirmed, Some(date(2024, 1, 6))));

        let docs = source
            .read(DocumentKind::Collection, &filter("USD", CounterpartyScope::Client(acme)))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);

        let docs = source
            .read(DocumentKind::Collection, &filter("USD", CounterpartyScope::All))
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[tokio::test]
    async fn test_payroll_pension_uses_pension_date() {
        let payroll = SourceDocument::Payroll(PayrollDocument {
            id: Uuid::new_v4(),
            status: DocumentStatus::PensionPaid,
            currency: "USD".to_string(),
            net_salary: dec!(1000),
            taxes: None,
            commission: None,
            pension_amount: Some(dec!(50)),
            paid_at: Some(FinalizationStamp::Date(date(2023, 12, 28))),
            pension_paid_at: Some(FinalizationStamp::Date(date(2024, 1, 10))),
            collaborator_name: Some("Dana".to_string()),
        });
        let source = InMemorySource::new().with_document(payroll);

        let docs = source
            .read(DocumentKind::Payroll, &filter("USD", CounterpartyScope::All))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_kind() {
        let source = InMemorySource::new().failing_on(DocumentKind::TaxPayment);
        let err = source
            .read(DocumentKind::TaxPayment, &filter("USD", CounterpartyScope::All))
            .await
            .unwrap_err();
        assert_eq!(err.kind, DocumentKind::TaxPayment);
    }
}
