//! Shipping table inspection.

use std::fmt::Write as _;

use jolananas_core::CountryCode;
use jolananas_core::shipping::{self, ShippingError};
use jolananas_core::types::CountryCodeError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShippingCommandError {
    #[error(transparent)]
    Country(#[from] CountryCodeError),

    #[error(transparent)]
    Shipping(#[from] ShippingError),
}

/// Render the tier table for `country`, plus a quote for `subtotal`.
///
/// # Errors
///
/// Returns an error for an invalid country code or a negative subtotal.
pub fn render(country: &str, subtotal: Option<Decimal>) -> Result<String, ShippingCommandError> {
    let country = CountryCode::parse(country)?;
    let zone = shipping::zone_for(country);

    let mut out = String::new();
    let _ = writeln!(out, "Zone for {country}: {zone}");
    let _ = writeln!(out, "{:>12}  {:>8}", "from (EUR)", "cost");
    for tier in shipping::rates(zone) {
        let cost = if tier.is_free() {
            "free".to_string()
        } else {
            format!("{:.2}", tier.cost())
        };
        let _ = writeln!(out, "{:>12.2}  {cost:>8}", tier.min_subtotal());
    }

    if let Some(subtotal) = subtotal {
        let quote = shipping::quote(country, subtotal)?;
        let _ = writeln!(
            out,
            "Subtotal {subtotal:.2}: {} {:.2}",
            quote.method_title, quote.cost
        );
        if let Some(remaining) = quote.remaining_for_free {
            let _ = writeln!(out, "{remaining:.2} more for free shipping");
        }
    }

    Ok(out)
}

/// Print the table to stdout.
///
/// # Errors
///
/// See [`render`].
pub fn print(country: &str, subtotal: Option<Decimal>) -> Result<(), ShippingCommandError> {
    let table = render(country, subtotal)?;

    #[allow(clippy::print_stdout)]
    {
        print!("{table}");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_france_table() {
        let out = render("fr", None).unwrap();
        assert!(out.starts_with("Zone for FR: "));
        assert!(out.contains("free"));
        assert!(out.contains("4.90"));
    }

    #[test]
    fn test_render_with_quote() {
        let out = render("FR", Some(Decimal::new(4250, 2))).unwrap();
        assert!(out.contains("Subtotal 42.50"));
        assert!(out.contains("7.50 more for free shipping"));
    }

    #[test]
    fn test_render_rejects_bad_country() {
        assert!(matches!(
            render("France", None),
            Err(ShippingCommandError::Country(_))
        ));
    }
}
