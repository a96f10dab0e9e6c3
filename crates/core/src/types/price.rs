//! Type-safe price representation using decimal arithmetic.
//!
//! Shopify returns money as decimal strings (`"12.50"`) next to an ISO 4217
//! code. [`Price`] keeps that precision with [`Decimal`] and knows how the
//! storefront displays each supported currency.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] or [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The currency code is not supported by the storefront.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
    /// Two prices in different currencies were combined.
    #[error("currency mismatch: {0} vs {1}")]
    CurrencyMismatch(CurrencyCode, CurrencyCode),
    /// Arithmetic overflowed.
    #[error("amount overflow")]
    Overflow,
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Parse a Shopify money pair (`"12.50"`, `"EUR"`).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::InvalidAmount` if the amount is not a decimal and
    /// `PriceError::UnsupportedCurrency` for unknown currency codes.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_owned()))?;
        let currency_code = currency_code.parse()?;
        Ok(Self::new(amount, currency_code))
    }

    /// Add two prices of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` when currencies differ and
    /// `PriceError::Overflow` if the sum overflows.
    pub fn checked_add(self, other: Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch(
                self.currency_code,
                other.currency_code,
            ));
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(PriceError::Overflow)?;
        Ok(Self::new(amount, self.currency_code))
    }

    /// The amount rounded to two decimals as a plain string (`"12.50"`).
    ///
    /// This is the representation the Admin REST API expects.
    #[must_use]
    pub fn amount_string(&self) -> String {
        format!("{:.2}", self.amount.round_dp(2))
    }

    /// Format for display (e.g., `"12,50 €"`, `"$12.50"`).
    #[must_use]
    pub fn display(&self) -> String {
        let amount = self.amount_string();
        match self.currency_code {
            CurrencyCode::EUR => format!("{} €", amount.replace('.', ",")),
            CurrencyCode::CHF => format!("CHF {amount}"),
            CurrencyCode::USD | CurrencyCode::CAD | CurrencyCode::GBP => {
                format!("{}{amount}", self.currency_code.symbol())
            }
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes the storefront sells in.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
    USD,
    GBP,
    CHF,
    CAD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::EUR => "€",
            Self::USD | Self::CAD => "$",
            Self::GBP => "£",
            Self::CHF => "CHF",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::GBP => "GBP",
            Self::CHF => "CHF",
            Self::CAD => "CAD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Self::EUR),
            "USD" => Ok(Self::USD),
            "GBP" => Ok(Self::GBP),
            "CHF" => Ok(Self::CHF),
            "CAD" => Ok(Self::CAD),
            _ => Err(PriceError::UnsupportedCurrency(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shopify_money() {
        let price = Price::parse("12.5", "EUR").unwrap();
        assert_eq!(price.amount, Decimal::new(125, 1));
        assert_eq!(price.currency_code, CurrencyCode::EUR);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Price::parse("twelve", "EUR"),
            Err(PriceError::InvalidAmount(_))
        ));
        assert!(matches!(
            Price::parse("12.00", "XYZ"),
            Err(PriceError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn test_display_eur_uses_comma_and_trailing_symbol() {
        let price = Price::parse("1234.5", "EUR").unwrap();
        assert_eq!(price.display(), "1234,50 €");
    }

    #[test]
    fn test_display_other_currencies() {
        assert_eq!(Price::parse("9.9", "USD").unwrap().display(), "$9.90");
        assert_eq!(Price::parse("9.9", "GBP").unwrap().display(), "£9.90");
        assert_eq!(Price::parse("9.9", "CHF").unwrap().display(), "CHF 9.90");
    }

    #[test]
    fn test_amount_string_rounds_to_cents() {
        let price = Price::parse("4.905", "EUR").unwrap();
        assert_eq!(price.amount_string(), "4.90");
        let price = Price::parse("4.915", "EUR").unwrap();
        assert_eq!(price.amount_string(), "4.92");
    }

    #[test]
    fn test_checked_add_same_currency() {
        let a = Price::parse("10.00", "EUR").unwrap();
        let b = Price::parse("4.90", "EUR").unwrap();
        assert_eq!(a.checked_add(b).unwrap().amount_string(), "14.90");
    }

    #[test]
    fn test_checked_add_rejects_mixed_currency() {
        let a = Price::parse("10.00", "EUR").unwrap();
        let b = Price::parse("4.90", "USD").unwrap();
        assert!(matches!(
            a.checked_add(b),
            Err(PriceError::CurrencyMismatch(CurrencyCode::EUR, CurrencyCode::USD))
        ));
    }

    #[test]
    fn test_currency_from_str_is_case_insensitive() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
    }
}
