//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` and every stored or reported value is
//! rounded to cents with round-half-away-from-zero.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimal places kept for every monetary value.
pub const CENT_SCALE: u32 = 2;

/// Rounds a value to cents using round-half-away-from-zero.
///
/// A result that rounds to zero is returned as an unsigned zero, so a tiny
/// negative residue never surfaces as `-0`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tally_shared::types::round_cents;
///
/// assert_eq!(round_cents(dec!(2.345)), dec!(2.35));
/// assert_eq!(round_cents(dec!(-2.345)), dec!(-2.35));
/// ```
#[must_use]
pub fn round_cents(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Turns an optional tax or commission component into an outflow adjustment.
///
/// Present components are folded in as `-abs(value)`, absent ones as zero.
/// The result is already rounded to cents.
///
/// A stored negative component still becomes an outflow here. Upstream
/// systems that negate the stored value would turn it into a positive
/// adjustment; this helper keeps adjustments zero or negative instead.
#[must_use]
pub fn outflow(component: Option<Decimal>) -> Decimal {
    component.map_or(Decimal::ZERO, |value| round_cents(-value.abs()))
}

/// A three-letter currency code, kept exactly as the caller wrote it.
///
/// Source documents store codes verbatim and report filters match them
/// case-sensitively, so no normalization happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

/// Rejected currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Currency must be a 3-letter code, got '{0}'")]
pub struct CurrencyCodeError(pub String);

impl CurrencyCode {
    /// Parses a currency code: exactly three ASCII letters.
    ///
    /// # Errors
    ///
    /// Returns an error if the code has the wrong length or non-letter characters.
    pub fn parse(code: &str) -> Result<Self, CurrencyCodeError> {
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(code.to_string()))
        } else {
            Err(CurrencyCodeError(code.to_string()))
        }
    }

    /// Returns the code as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl PartialEq<str> for CurrencyCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
