//! Source reader seam.
//!
//! The engine depends on this trait only; the database crate provides the
//! production implementation and `memory::InMemorySource` backs tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use tally_shared::types::{ClientId, CollaboratorId, CurrencyCode};
use thiserror::Error;

use super::document::{DocumentKind, SourceDocument};

/// Counterparty restriction for a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterpartyScope {
    /// No restriction.
    All,
    /// Documents of one client (through its projects).
    Client(ClientId),
    /// Documents of one collaborator.
    Collaborator(CollaboratorId),
}

/// Filter shared by every read of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
    /// Report currency; either leg for money exchanges.
    pub currency: CurrencyCode,
    /// Inclusive lower bound on the finalization date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the finalization date.
    pub end_date: Option<NaiveDate>,
    /// Counterparty restriction.
    pub scope: CounterpartyScope,
}

impl SourceFilter {
    /// Returns true if `date` falls within the optional bounds.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }
}

/// Failure reading one document kind.
#[derive(Debug, Error)]
#[error("Failed to read {kind} documents: {message}")]
pub struct SourceError {
    /// Kind whose read failed.
    pub kind: DocumentKind,
    /// Underlying failure.
    pub message: String,
}

impl SourceError {
    /// Creates a new source error.
    pub fn new(kind: DocumentKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Reads finalized documents of one kind.
///
/// Implementations return only documents in a finalized status for `kind`,
/// with a non-null finalization timestamp, matching the filter currency and
/// bounds, and restricted to the filter scope. Reads are independent and may
/// run concurrently.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Reads documents of `kind` matching `filter`.
    async fn read(
        &self,
        kind: DocumentKind,
        filter: &SourceFilter,
    ) -> Result<Vec<SourceDocument>, SourceError>;
}
