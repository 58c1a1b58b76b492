//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, extraction rules, and balance calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Ledger reconstruction from finalized source documents

pub mod ledger;
