//! Ledger report service.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::future::try_join_all;
use tally_shared::types::CurrencyCode;

use super::engine::{KindBatch, LedgerEngine};
use super::entry::LedgerReport;
use super::error::LedgerError;
use super::source::{DocumentSource, SourceFilter};
use super::variant::ReportVariant;

/// Parameters of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRequest {
    /// Which ledger to build.
    pub variant: ReportVariant,
    /// Report currency.
    pub currency: CurrencyCode,
    /// Inclusive lower bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub end_date: Option<NaiveDate>,
}

impl LedgerRequest {
    /// Checks the date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if both bounds are set and start is after end.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => {
                Err(LedgerError::InvalidDateRange { start, end })
            }
            _ => Ok(()),
        }
    }

    /// Filter passed to every source read.
    #[must_use]
    pub fn source_filter(&self) -> SourceFilter {
        SourceFilter {
            currency: self.currency.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            scope: self.variant.scope(),
        }
    }
}

/// Builds ledger reports from a document source.
#[derive(Clone)]
pub struct LedgerService {
    source: Arc<dyn DocumentSource>,
    read_timeout: Duration,
}

impl LedgerService {
    /// Creates a new service.
    #[must_use]
    pub fn new(source: Arc<dyn DocumentSource>, read_timeout: Duration) -> Self {
        Self {
            source,
            read_timeout,
        }
    }

    /// Generates a report.
    ///
    /// All kinds in the variant's registry are read concurrently. If any read
    /// fails or the reads exceed the timeout, no report is produced.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange`, `Source` or `Timeout`.
    pub async fn generate(&self, request: &LedgerRequest) -> Result<LedgerReport, LedgerError> {
        request.validate()?;

        let filter = request.source_filter();
        let reads = request.variant.rules().iter().map(|rule| {
            let filter = &filter;
            async move {
                let documents = self.source.read(rule.kind, filter).await?;
                Ok::<_, LedgerError>(KindBatch {
                    kind: rule.kind,
                    documents,
                })
            }
        });

        let batches = match tokio::time::timeout(self.read_timeout, try_join_all(reads)).await {
            Ok(Ok(batches)) => batches,
            Ok(Err(err)) => {
                tracing::error!(
                    variant = request.variant.name(),
                    currency = %request.currency,
                    error = %err,
                    "Ledger source read failed"
                );
                return Err(err);
            }
            Err(_) => {
                tracing::warn!(
                    variant = request.variant.name(),
                    currency = %request.currency,
                    timeout_secs = self.read_timeout.as_secs(),
                    "Ledger source reads timed out"
                );
                return Err(LedgerError::Timeout(self.read_timeout));
            }
        };

        let report = LedgerEngine::build(&request.variant, &request.currency, &batches);

        tracing::info!(
            variant = request.variant.name(),
            currency = %request.currency,
            entries = report.entries.len(),
            final_balance = %report.final_balance,
            "Ledger report generated"
        );

        Ok(report)
    }
}
