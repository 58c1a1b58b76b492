//! Ledger reconstruction from finalized source documents.
//!
//! A report is rebuilt from scratch on every request:
//! - Source readers return finalized documents of one kind each
//! - Extractors turn each document into zero, one, or two entries
//! - The engine merges, sorts, and accumulates a running balance
//! - The service fans the reads out and assembles the report

pub mod document;
pub mod engine;
pub mod entry;
pub mod error;
pub mod extract;
pub mod memory;
pub mod service;
pub mod source;
pub mod variant;

#[cfg(test)]
mod engine_props;

pub use document::{
    CollaboratorPaymentDocument, CollectionDocument, DocumentKind, DocumentStatus,
    FinalizationStamp, MoneyExchangeDocument, PayrollDocument, ProformaDocument, SourceDocument,
    TaxPaymentDocument, TransactionDocument,
};
pub use engine::{KindBatch, LedgerEngine};
pub use entry::{EntryClass, LedgerEntry, LedgerReport, RunningLedgerEntry, UNKNOWN_COUNTERPARTY};
pub use error::LedgerError;
pub use extract::{ExtractionRule, Extractor};
pub use memory::InMemorySource;
pub use service::{LedgerRequest, LedgerService};
pub use source::{CounterpartyScope, DocumentSource, SourceError, SourceFilter};
pub use variant::{BalanceMode, ReportVariant};
