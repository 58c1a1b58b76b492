//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{CurrencyCode, CurrencyCodeError, outflow, round_cents};
