//! Shipping table route.

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use jolananas_core::CountryCode;
use jolananas_core::shipping::{self, ShippingQuote, ShippingZone};

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ShippingQuery {
    /// ISO country code, France when absent.
    pub country: Option<String>,
    /// Cart subtotal in euros.
    pub subtotal: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct TierView {
    pub min_subtotal: Decimal,
    pub cost: Decimal,
    pub free: bool,
}

#[derive(Debug, Serialize)]
pub struct ShippingInfo {
    pub country: CountryCode,
    pub zone: ShippingZone,
    pub tiers: Vec<TierView>,
    /// Present when a subtotal was given.
    pub quote: Option<ShippingQuote>,
}

/// Build the shipping info for a destination.
///
/// # Errors
///
/// Returns `BadRequest` for an invalid country or a negative subtotal.
pub fn shipping_info(country: Option<&str>, subtotal: Option<Decimal>) -> Result<ShippingInfo> {
    let country = country
        .map(CountryCode::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .unwrap_or(CountryCode::FRANCE);

    let zone = shipping::zone_for(country);
    let tiers = shipping::rates(zone)
        .iter()
        .map(|tier| TierView {
            min_subtotal: tier.min_subtotal(),
            cost: tier.cost(),
            free: tier.is_free(),
        })
        .collect();

    let quote = subtotal
        .map(|amount| shipping::quote(country, amount))
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(ShippingInfo {
        country,
        zone,
        tiers,
        quote,
    })
}

/// Zone, tier table and, with a subtotal, a quote.
pub async fn show(
    State(_state): State<AppState>,
    Query(query): Query<ShippingQuery>,
) -> Result<Json<ShippingInfo>> {
    shipping_info(query.country.as_deref(), query.subtotal).map(Json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_france_without_quote() {
        let info = shipping_info(None, None).unwrap();
        assert_eq!(info.country, CountryCode::FRANCE);
        assert_eq!(info.zone, ShippingZone::France);
        assert_eq!(info.tiers.len(), 3);
        assert!(info.quote.is_none());
    }

    #[test]
    fn test_quote_for_subtotal() {
        let info = shipping_info(Some("de"), Some(Decimal::new(12000, 2))).unwrap();
        assert_eq!(info.zone, ShippingZone::Europe);
        assert!(info.quote.unwrap().free);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            shipping_info(Some("FRA"), None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            shipping_info(None, Some(Decimal::new(-1, 0))),
            Err(AppError::BadRequest(_))
        ));
    }
}
