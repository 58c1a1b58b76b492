//! Ledger error types.

use std::time::Duration;

use chrono::NaiveDate;
use tally_shared::AppError;
use thiserror::Error;

use super::source::SourceError;

/// Errors that abort a ledger report.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// A source read failed; the whole report is discarded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Source reads did not finish in time.
    #[error("Source reads did not complete within {0:?}")]
    Timeout(Duration),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
            LedgerError::Source(source) => Self::Database(source.to_string()),
            LedgerError::Timeout(_) => Self::Timeout(err.to_string()),
        }
    }
}
