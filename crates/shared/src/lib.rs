//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision and cent rounding
//! - Currency codes as stored by the source documents
//! - Typed IDs for counterparty references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LedgerConfig};
pub use error::AppError;
