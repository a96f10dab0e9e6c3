//! Static shipping threshold table.
//!
//! Shipping cost depends only on the destination zone and the cart subtotal
//! (after discounts). Each zone has ascending tiers; the applicable tier is the
//! one with the greatest lower bound not above the subtotal. The last tier of
//! every zone is free shipping.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CountryCode, CurrencyCode, Price};

/// Currency the rate table is expressed in.
pub const TABLE_CURRENCY: CurrencyCode = CurrencyCode::EUR;

/// Method title shown when shipping is charged.
pub const STANDARD_METHOD_TITLE: &str = "Livraison standard";

/// Method title shown when shipping is free.
pub const FREE_METHOD_TITLE: &str = "Livraison offerte";

/// Errors that can occur when quoting shipping.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShippingError {
    /// The subtotal is below zero.
    #[error("subtotal cannot be negative: {0}")]
    NegativeSubtotal(Decimal),

    /// The subtotal is not in [`TABLE_CURRENCY`].
    #[error("shipping is quoted in EUR only, cart is in {}", .0.code())]
    UnsupportedCurrency(CurrencyCode),
}

/// Destination zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingZone {
    /// Metropolitan France and Monaco.
    France,
    /// EU member states and close European neighbours.
    Europe,
    /// Everything else, French overseas territories included.
    International,
}

impl ShippingZone {
    /// All zones, in display order.
    pub const ALL: [Self; 3] = [Self::France, Self::Europe, Self::International];

    /// Stable identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::France => "france",
            Self::Europe => "europe",
            Self::International => "international",
        }
    }
}

impl fmt::Display for ShippingZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the threshold table, amounts in euro cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingTier {
    min_subtotal_cents: i64,
    cost_cents: i64,
}

impl ShippingTier {
    const fn new(min_subtotal_cents: i64, cost_cents: i64) -> Self {
        Self {
            min_subtotal_cents,
            cost_cents,
        }
    }

    /// Inclusive lower bound of the subtotal for this tier.
    #[must_use]
    pub fn min_subtotal(&self) -> Decimal {
        Decimal::new(self.min_subtotal_cents, 2)
    }

    /// Shipping cost charged in this tier.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        Decimal::new(self.cost_cents, 2)
    }

    /// Whether this tier ships for free.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.cost_cents == 0
    }
}

const FRANCE_TIERS: [ShippingTier; 3] = [
    ShippingTier::new(0, 490),
    ShippingTier::new(3500, 290),
    ShippingTier::new(5000, 0),
];

const EUROPE_TIERS: [ShippingTier; 3] = [
    ShippingTier::new(0, 990),
    ShippingTier::new(8000, 490),
    ShippingTier::new(12000, 0),
];

const INTERNATIONAL_TIERS: [ShippingTier; 3] = [
    ShippingTier::new(0, 1990),
    ShippingTier::new(15000, 990),
    ShippingTier::new(25000, 0),
];

const FRANCE_COUNTRIES: &[&str] = &["FR", "MC"];

const EUROPE_COUNTRIES: &[&str] = &[
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "GR", "HR", "HU", "IE", "IT", "LT",
    "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK", // EU without FR
    "CH", "GB", "NO", "LI", "AD",
];

/// Zone for a destination country.
///
/// Overseas departments and collectivities (GP, MQ, RE, ...) have their own
/// ISO codes and fall through to `International`.
#[must_use]
pub fn zone_for(country: CountryCode) -> ShippingZone {
    let code = country.as_str();
    if FRANCE_COUNTRIES.contains(&code) {
        ShippingZone::France
    } else if EUROPE_COUNTRIES.contains(&code) {
        ShippingZone::Europe
    } else {
        ShippingZone::International
    }
}

/// Tiers for a zone, ascending by lower bound.
#[must_use]
pub const fn rates(zone: ShippingZone) -> &'static [ShippingTier] {
    match zone {
        ShippingZone::France => &FRANCE_TIERS,
        ShippingZone::Europe => &EUROPE_TIERS,
        ShippingZone::International => &INTERNATIONAL_TIERS,
    }
}

/// Result of quoting shipping for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingQuote {
    /// Destination zone.
    pub zone: ShippingZone,
    /// Amount charged, in euros.
    pub cost: Decimal,
    /// Whether shipping is free.
    pub free: bool,
    /// How much more the customer must spend for free shipping.
    pub remaining_for_free: Option<Decimal>,
    /// Title of the shipping line on the draft order.
    pub method_title: &'static str,
}

/// Quote shipping for a subtotal carrying its currency.
///
/// # Errors
///
/// Returns `ShippingError::UnsupportedCurrency` unless the subtotal is in
/// [`TABLE_CURRENCY`], and `NegativeSubtotal` as [`quote`] does.
pub fn quote_price(country: CountryCode, subtotal: Price) -> Result<ShippingQuote, ShippingError> {
    if subtotal.currency_code != TABLE_CURRENCY {
        return Err(ShippingError::UnsupportedCurrency(subtotal.currency_code));
    }
    quote(country, subtotal.amount)
}

/// Quote shipping for a destination and subtotal in [`TABLE_CURRENCY`].
///
/// # Errors
///
/// Returns `ShippingError::NegativeSubtotal` if `subtotal` is below zero.
pub fn quote(country: CountryCode, subtotal: Decimal) -> Result<ShippingQuote, ShippingError> {
    if subtotal.is_sign_negative() && !subtotal.is_zero() {
        return Err(ShippingError::NegativeSubtotal(subtotal));
    }

    let zone = zone_for(country);
    let tiers = rates(zone);

    // Tier 0 starts at zero, so a match always exists for non-negative input
    let tier = tiers
        .iter()
        .rev()
        .find(|tier| tier.min_subtotal() <= subtotal)
        .copied()
        .unwrap_or(ShippingTier::new(0, 0));

    let free_from = tiers
        .iter()
        .find(|tier| tier.is_free())
        .map(ShippingTier::min_subtotal);

    let free = tier.is_free();
    let remaining_for_free = if free {
        None
    } else {
        free_from.map(|threshold| threshold - subtotal)
    };

    Ok(ShippingQuote {
        zone,
        cost: tier.cost(),
        free,
        remaining_for_free,
        method_title: if free {
            FREE_METHOD_TITLE
        } else {
            STANDARD_METHOD_TITLE
        },
    })
}
