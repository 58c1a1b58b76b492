//! Postgres enums shared by the source tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tally_core::ledger::{DocumentStatus as LedgerStatus, EntryClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_status")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "issued")]
    Issued,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "pension_paid")]
    PensionPaid,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "outcome")]
    Outcome,
}

impl From<DocumentStatus> for LedgerStatus {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Pending => Self::Pending,
            DocumentStatus::Issued => Self::Issued,
            DocumentStatus::Confirmed => Self::Confirmed,
            DocumentStatus::Paid => Self::Paid,
            DocumentStatus::PensionPaid => Self::PensionPaid,
            DocumentStatus::Canceled => Self::Canceled,
        }
    }
}

impl From<LedgerStatus> for DocumentStatus {
    fn from(status: LedgerStatus) -> Self {
        match status {
            LedgerStatus::Pending => Self::Pending,
            LedgerStatus::Issued => Self::Issued,
            LedgerStatus::Confirmed => Self::Confirmed,
            LedgerStatus::Paid => Self::Paid,
            LedgerStatus::PensionPaid => Self::PensionPaid,
            LedgerStatus::Canceled => Self::Canceled,
        }
    }
}

impl From<TransactionType> for EntryClass {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Income => Self::Income,
            TransactionType::Outcome => Self::Outcome,
        }
    }
}
