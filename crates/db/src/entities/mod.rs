//! `SeaORM` entities for the ledger source tables.

pub mod clients;
pub mod collaborator_payments;
pub mod collaborators;
pub mod collections;
pub mod money_exchanges;
pub mod payroll_payments;
pub mod projects;
pub mod proformas;
pub mod sea_orm_active_enums;
pub mod tax_payments;
pub mod transactions;
