//! Document repository: the Postgres-backed ledger source.
//!
//! Each read returns finalized documents of one kind, filtered in SQL by status,
//! currency, finalization bounds and counterparty scope. Counterparty names are
//! resolved with batched lookups; a missing project, client or collaborator
//! yields no name rather than an error.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta};
use sea_orm::sea_query::Query;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use tally_core::ledger::{
    CollaboratorPaymentDocument, CollectionDocument, CounterpartyScope, DocumentKind,
    DocumentSource, FinalizationStamp, MoneyExchangeDocument, PayrollDocument, ProformaDocument,
    SourceDocument, SourceError, SourceFilter, TaxPaymentDocument, TransactionDocument,
};
use uuid::Uuid;

use crate::entities::{
    clients, collaborator_payments, collaborators, collections, money_exchanges, payroll_payments,
    projects, proformas,
    sea_orm_active_enums::DocumentStatus,
    tax_payments, transactions,
};

/// Milliseconds from midnight to 23:59:59.999.
const END_OF_DAY_MILLIS: i64 = 86_399_999;

/// Lower bound for a timestamptz column: midnight UTC of `date`.
#[must_use]
pub fn start_of_day_bound(date: NaiveDate) -> DateTime<FixedOffset> {
    NaiveDateTime::from(date).and_utc().fixed_offset()
}

/// Upper bound for a timestamptz column: 23:59:59.999 UTC of `date`.
///
/// Returns `None` if the bound is not representable.
#[must_use]
pub fn end_of_day_bound(date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    NaiveDateTime::from(date)
        .checked_add_signed(TimeDelta::milliseconds(END_OF_DAY_MILLIS))
        .map(|at| at.and_utc().fixed_offset())
}

/// Non-null, inclusive bounds on a date column.
fn date_bounds<C: ColumnTrait>(column: C, filter: &SourceFilter) -> Condition {
    let mut condition = Condition::all().add(column.is_not_null());
    if let Some(start) = filter.start_date {
        condition = condition.add(column.gte(start));
    }
    if let Some(end) = filter.end_date {
        condition = condition.add(column.lte(end));
    }
    condition
}

/// Non-null, inclusive bounds on a timestamptz column.
fn timestamp_bounds<C: ColumnTrait>(column: C, filter: &SourceFilter) -> Condition {
    let mut condition = Condition::all().add(column.is_not_null());
    if let Some(start) = filter.start_date {
        condition = condition.add(column.gte(start_of_day_bound(start)));
    }
    if let Some(end) = filter.end_date.and_then(end_of_day_bound) {
        condition = condition.add(column.lte(end));
    }
    condition
}

fn finalized<C: ColumnTrait>(column: C, kind: DocumentKind) -> Condition {
    let statuses: Vec<DocumentStatus> = kind
        .finalized_statuses()
        .iter()
        .map(|status| DocumentStatus::from(*status))
        .collect();
    Condition::all().add(column.is_in(statuses))
}

/// Reads ledger source documents from Postgres.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn read_transactions(&self, filter: &SourceFilter) -> Result<Vec<SourceDocument>, DbErr> {
        // Transactions have no counterparty and never appear on narrow ledgers.
        if filter.scope != CounterpartyScope::All {
            return Ok(Vec::new());
        }

        let rows = transactions::Entity::find()
            .filter(finalized(transactions::Column::Status, DocumentKind::Transaction))
            .filter(transactions::Column::Currency.eq(filter.currency.as_str()))
            .filter(timestamp_bounds(transactions::Column::IssuedAt, filter))
            .order_by_asc(transactions::Column::IssuedAt)
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                SourceDocument::Transaction(TransactionDocument {
                    id: row.id,
                    status: row.status.into(),
                    direction: row.transaction_type.into(),
                    description: row.description,
                    currency: row.currency,
                    total: row.total,
                    issued_at: row.issued_at.map(FinalizationStamp::DateTime),
                })
            })
            .collect())
    }

    async fn read_collections(&self, filter: &SourceFilter) -> Result<Vec<SourceDocument>, DbErr> {
        let mut query = collections::Entity::find()
            .filter(finalized(collections::Column::Status, DocumentKind::Collection))
            .filter(collections::Column::Currency.eq(filter.currency.as_str()))
            .filter(timestamp_bounds(collections::Column::ConfirmedAt, filter));
        match filter.scope {
            CounterpartyScope::All => {}
            CounterpartyScope::Client(client_id) => {
                query = query.filter(
                    collections::Column::ProjectId.in_subquery(client_projects(client_id.into_inner())),
                );
            }
            CounterpartyScope::Collaborator(_) => return Ok(Vec::new()),
        }

        let rows = query
            .order_by_asc(collections::Column::ConfirmedAt)
            .order_by_asc(collections::Column::Id)
            .all(&self.db)
            .await?;
        let names = self
            .client_names_by_project(rows.iter().filter_map(|row| row.project_id))
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                SourceDocument::Collection(CollectionDocument {
                    id: row.id,
                    status: row.status.into(),
                    currency: row.currency,
                    total: row.total,
                    commission: row.commission,
                    taxes: row.taxes,
                    confirmed_at: row.confirmed_at.map(FinalizationStamp::DateTime),
                    client_name: row.project_id.and_then(|id| names.get(&id).cloned()),
                })
            })
            .collect())
    }

    async fn read_collaborator_payments(
        &self,
        filter: &SourceFilter,
    ) -> Result<Vec<SourceDocument>, DbErr> {
        let mut query = collaborator_payments::Entity::find()
            .filter(finalized(
                collaborator_payments::Column::Status,
                DocumentKind::CollaboratorPayment,
            ))
            .filter(collaborator_payments::Column::Currency.eq(filter.currency.as_str()))
            .filter(timestamp_bounds(collaborator_payments::Column::PaidAt, filter));
        match filter.scope {
            CounterpartyScope::All => {}
            CounterpartyScope::Collaborator(collaborator_id) => {
                query = query.filter(
                    collaborator_payments::Column::CollaboratorId.eq(collaborator_id.into_inner()),
                );
            }
            CounterpartyScope::Client(_) => return Ok(Vec::new()),
        }

        let rows = query
            .order_by_asc(collaborator_payments::Column::PaidAt)
            .order_by_asc(collaborator_payments::Column::Id)
            .all(&self.db)
            .await?;
        let names = self
            .collaborator_names(rows.iter().filter_map(|row| row.collaborator_id))
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                SourceDocument::CollaboratorPayment(CollaboratorPaymentDocument {
                    id: row.id,
                    status: row.status.into(),
                    currency: row.currency,
                    gross_amount: row.gross_amount,
                    net_amount: row.net_amount,
                    paid_at: row.paid_at.map(FinalizationStamp::DateTime),
                    collaborator_name: row.collaborator_id.and_then(|id| names.get(&id).cloned()),
                })
            })
            .collect())
    }

    async fn read_money_exchanges(
        &self,
        filter: &SourceFilter,
    ) -> Result<Vec<SourceDocument>, DbErr> {
        if filter.scope != CounterpartyScope::All {
            return Ok(Vec::new());
        }

        let currency = filter.currency.as_str();
        let rows = money_exchanges::Entity::find()
            .filter(finalized(money_exchanges::Column::Status, DocumentKind::MoneyExchange))
            .filter(
                Condition::any()
                    .add(money_exchanges::Column::FromCurrency.eq(currency))
                    .add(money_exchanges::Column::ToCurrency.eq(currency)),
            )
            .filter(timestamp_bounds(money_exchanges::Column::ConfirmedAt, filter))
            .order_by_asc(money_exchanges::Column::ConfirmedAt)
            .order_by_asc(money_exchanges::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                SourceDocument::MoneyExchange(MoneyExchangeDocument {
                    id: row.id,
                    status: row.status.into(),
                    from_currency: row.from_currency,
                    from_amount: row.from_amount,
                    from_taxes: row.from_taxes,
                    to_currency: row.to_currency,
                    to_amount: row.to_amount,
                    to_taxes: row.to_taxes,
                    confirmed_at: row.confirmed_at.map(FinalizationStamp::DateTime),
                })
            })
            .collect())
    }

    async fn read_payrolls(&self, filter: &SourceFilter) -> Result<Vec<SourceDocument>, DbErr> {
        let paid = Condition::all()
            .add(payroll_payments::Column::Status.eq(DocumentStatus::Paid))
            .add(date_bounds(payroll_payments::Column::PaidAt, filter));
        let pension_paid = Condition::all()
            .add(payroll_payments::Column::Status.eq(DocumentStatus::PensionPaid))
            .add(date_bounds(payroll_payments::Column::PensionPaidAt, filter));

        let mut query = payroll_payments::Entity::find()
            .filter(payroll_payments::Column::Currency.eq(filter.currency.as_str()))
            .filter(Condition::any().add(paid).add(pension_paid));
        match filter.scope {
            CounterpartyScope::All => {}
            CounterpartyScope::Collaborator(collaborator_id) => {
                query = query.filter(
                    payroll_payments::Column::CollaboratorId.eq(collaborator_id.into_inner()),
                );
            }
            CounterpartyScope::Client(_) => return Ok(Vec::new()),
        }

        let rows = query
            .order_by_asc(payroll_payments::Column::PaidAt)
            .order_by_asc(payroll_payments::Column::Id)
            .all(&self.db)
            .await?;
        let names = self
            .collaborator_names(rows.iter().filter_map(|row| row.collaborator_id))
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                SourceDocument::Payroll(PayrollDocument {
                    id: row.id,
                    status: row.status.into(),
                    currency: row.currency,
                    net_salary: row.net_salary,
                    taxes: row.taxes,
                    commission: row.commission,
                    pension_amount: row.pension_amount,
                    paid_at: row.paid_at.map(FinalizationStamp::Date),
                    pension_paid_at: row.pension_paid_at.map(FinalizationStamp::Date),
                    collaborator_name: row.collaborator_id.and_then(|id| names.get(&id).cloned()),
                })
            })
            .collect())
    }

    async fn read_tax_payments(&self, filter: &SourceFilter) -> Result<Vec<SourceDocument>, DbErr> {
        if filter.scope != CounterpartyScope::All {
            return Ok(Vec::new());
        }

        let rows = tax_payments::Entity::find()
            .filter(finalized(tax_payments::Column::Status, DocumentKind::TaxPayment))
            .filter(tax_payments::Column::Currency.eq(filter.currency.as_str()))
            .filter(date_bounds(tax_payments::Column::PaidAt, filter))
            .order_by_asc(tax_payments::Column::PaidAt)
            .order_by_asc(tax_payments::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                SourceDocument::TaxPayment(TaxPaymentDocument {
                    id: row.id,
                    status: row.status.into(),
                    year: row.year,
                    month: row.month.unsigned_abs(),
                    currency: row.currency,
                    total: row.total,
                    taxes: row.taxes,
                    paid_at: row.paid_at.map(FinalizationStamp::Date),
                })
            })
            .collect())
    }

    async fn read_proformas(&self, filter: &SourceFilter) -> Result<Vec<SourceDocument>, DbErr> {
        let mut query = proformas::Entity::find()
            .filter(finalized(proformas::Column::Status, DocumentKind::Proforma))
            .filter(proformas::Column::Currency.eq(filter.currency.as_str()))
            .filter(date_bounds(proformas::Column::IssuedAt, filter));
        match filter.scope {
            CounterpartyScope::All => {}
            CounterpartyScope::Client(client_id) => {
                query = query.filter(
                    proformas::Column::ProjectId.in_subquery(client_projects(client_id.into_inner())),
                );
            }
            CounterpartyScope::Collaborator(_) => return Ok(Vec::new()),
        }

        let rows = query
            .order_by_asc(proformas::Column::IssuedAt)
            .order_by_asc(proformas::Column::Id)
            .all(&self.db)
            .await?;
        let names = self
            .client_names_by_project(rows.iter().filter_map(|row| row.project_id))
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                SourceDocument::Proforma(ProformaDocument {
                    id: row.id,
                    status: row.status.into(),
                    currency: row.currency,
                    total: row.total,
                    start_date: row.start_date,
                    end_date: row.end_date,
                    issued_at: row.issued_at.map(FinalizationStamp::Date),
                    client_name: row.project_id.and_then(|id| names.get(&id).cloned()),
                })
            })
            .collect())
    }

    /// Maps project IDs to the name of the owning client.
    ///
    /// Projects without a client, or whose client is gone, are left out.
    async fn client_names_by_project(
        &self,
        project_ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, String>, DbErr> {
        let ids: Vec<Uuid> = project_ids.collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = projects::Entity::find()
            .filter(projects::Column::Id.is_in(ids))
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(project, client)| client.map(|client| (project.id, client.name)))
            .collect())
    }

    /// Maps collaborator IDs to names; unknown IDs are left out.
    async fn collaborator_names(
        &self,
        collaborator_ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, String>, DbErr> {
        let ids: Vec<Uuid> = collaborator_ids.collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = collaborators::Entity::find()
            .filter(collaborators::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|row| (row.id, row.name)).collect())
    }
}

/// `SELECT id FROM projects WHERE client_id = $1`.
fn client_projects(client_id: Uuid) -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column(projects::Column::Id)
        .from(projects::Entity)
        .and_where(projects::Column::ClientId.eq(client_id))
        .to_owned()
}

#[async_trait]
impl DocumentSource for DocumentRepository {
    async fn read(
        &self,
        kind: DocumentKind,
        filter: &SourceFilter,
    ) -> Result<Vec<SourceDocument>, SourceError> {
        let result = match kind {
            DocumentKind::Transaction => self.read_transactions(filter).await,
            DocumentKind::Collection => self.read_collections(filter).await,
            DocumentKind::CollaboratorPayment => self.read_collaborator_payments(filter).await,
            DocumentKind::MoneyExchange => self.read_money_exchanges(filter).await,
            DocumentKind::Payroll => self.read_payrolls(filter).await,
            DocumentKind::TaxPayment => self.read_tax_payments(filter).await,
            DocumentKind::Proforma => self.read_proformas(filter).await,
        };

        match result {
            Ok(documents) => {
                tracing::debug!(
                    kind = %kind,
                    currency = %filter.currency,
                    count = documents.len(),
                    "Read ledger source documents"
                );
                Ok(documents)
            }
            Err(err) => Err(SourceError::new(kind, err.to_string())),
        }
    }
}
