//! Ledger report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::ledger::{EntryClass, LedgerReport, LedgerRequest, ReportVariant};
use tally_shared::AppError;
use tally_shared::types::{ClientId, CollaboratorId, CurrencyCode};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledgers/bank", get(get_bank_ledger))
        .route("/clients/{client_id}/ledger", get(get_client_ledger))
        .route(
            "/collaborators/{collaborator_id}/ledger",
            get(get_collaborator_ledger),
        )
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters shared by every ledger.
///
/// Fields stay raw strings so malformed values surface as validation errors
/// with the JSON error body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    /// Report currency, exactly three letters.
    pub currency: Option<String>,
    /// Inclusive start date, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

impl LedgerQuery {
    /// Validates the query into a report request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a missing or malformed currency, a
    /// malformed date, or a start date after the end date.
    pub fn into_request(self, variant: ReportVariant) -> Result<LedgerRequest, AppError> {
        let currency = self
            .currency
            .ok_or_else(|| AppError::Validation("currency is required".to_string()))?;
        let currency = CurrencyCode::parse(&currency)
            .map_err(|err| AppError::Validation(err.to_string()))?;

        let request = LedgerRequest {
            variant,
            currency,
            start_date: parse_date("startDate", self.start_date.as_deref())?,
            end_date: parse_date("endDate", self.end_date.as_deref())?,
        };
        request
            .validate()
            .map_err(|err| AppError::Validation(err.to_string()))?;
        Ok(request)
    }
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::Validation(format!("{name} must be a date formatted as YYYY-MM-DD"))
            })
        })
        .transpose()
}

fn parse_id(name: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("{name} must be a UUID")))
}

// ============================================================================
// Response Types
// ============================================================================

/// Ledger response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse<E> {
    /// Entries in chronological order.
    pub entries: Vec<E>,
    /// Balance after the last entry.
    #[serde(with = "rust_decimal::serde::float")]
    pub final_balance: Decimal,
}

/// Bank ledger entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankEntryResponse {
    /// Entry date.
    pub issued_at: NaiveDate,
    /// Income or outcome.
    #[serde(rename = "type")]
    pub entry_type: EntryClass,
    /// Description.
    pub description: String,
    /// Signed amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Tax adjustment, zero or negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub taxes: Decimal,
    /// Running balance through this entry.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Client or collaborator ledger entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyEntryResponse {
    /// Entry date.
    pub issued_at: NaiveDate,
    /// Income or outcome.
    #[serde(rename = "type")]
    pub entry_type: EntryClass,
    /// Description.
    pub description: String,
    /// Signed amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Running balance through this entry.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl LedgerResponse<BankEntryResponse> {
    fn bank(report: LedgerReport) -> Self {
        Self {
            entries: report
                .entries
                .into_iter()
                .map(|running| BankEntryResponse {
                    issued_at: running.entry.entry_date,
                    entry_type: running.entry.class,
                    description: running.entry.label,
                    total: running.entry.amount,
                    taxes: running.entry.adjustment,
                    balance: running.balance,
                })
                .collect(),
            final_balance: report.final_balance,
        }
    }
}

impl LedgerResponse<CounterpartyEntryResponse> {
    fn counterparty(report: LedgerReport) -> Self {
        Self {
            entries: report
                .entries
                .into_iter()
                .map(|running| CounterpartyEntryResponse {
                    issued_at: running.entry.entry_date,
                    entry_type: running.entry.class,
                    description: running.entry.label,
                    amount: running.entry.amount,
                    balance: running.balance,
                })
                .collect(),
            final_balance: report.final_balance,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_bank_ledger(
    State(state): State<AppState>,
    query: Result<Query<LedgerQuery>, QueryRejection>,
) -> Result<Json<LedgerResponse<BankEntryResponse>>, ApiError> {
    let Query(query) = query?;
    let request = query.into_request(ReportVariant::Bank)?;
    let report = state.ledger.generate(&request).await?;
    Ok(Json(LedgerResponse::bank(report)))
}

async fn get_client_ledger(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    query: Result<Query<LedgerQuery>, QueryRejection>,
) -> Result<Json<LedgerResponse<CounterpartyEntryResponse>>, ApiError> {
    let client_id = ClientId::from_uuid(parse_id("client_id", &client_id)?);
    let Query(query) = query?;
    let request = query.into_request(ReportVariant::Client(client_id))?;
    let report = state.ledger.generate(&request).await?;
    Ok(Json(LedgerResponse::counterparty(report)))
}

async fn get_collaborator_ledger(
    State(state): State<AppState>,
    Path(collaborator_id): Path<String>,
    query: Result<Query<LedgerQuery>, QueryRejection>,
) -> Result<Json<LedgerResponse<CounterpartyEntryResponse>>, ApiError> {
    let collaborator_id =
        CollaboratorId::from_uuid(parse_id("collaborator_id", &collaborator_id)?);
    let Query(query) = query?;
    let request = query.into_request(ReportVariant::Collaborator(collaborator_id))?;
    let report = state.ledger.generate(&request).await?;
    Ok(Json(LedgerResponse::counterparty(report)))
}
