//! Decimal view of price text.
//!
//! Product prices travel as text: the product form keeps exactly what the
//! admin typed and sends it unchanged. `Price` is the parsed, display-only
//! view used by listing pages.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The input is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price is not a number: {0}")]
    NotANumber(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative decimal amount.
///
/// ```
/// use backoffice_core::Price;
///
/// let price = Price::parse("$ 12.5").unwrap();
/// assert_eq!(price.to_string(), "$ 12.50");
/// assert!(Price::parse("doce").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse price text, accepting an optional leading `$` and surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the text is empty, not a decimal number, or
    /// negative.
    pub fn parse(raw: &str) -> Result<Self, PriceError> {
        let text = raw.trim();
        let text = text.strip_prefix('$').map_or(text, str::trim_start);
        if text.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount =
            Decimal::from_str(text).map_err(|_| PriceError::NotANumber(raw.trim().to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        Ok(Self(amount))
    }

    /// Wrap an already-parsed amount.
    #[must_use]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$ {:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
