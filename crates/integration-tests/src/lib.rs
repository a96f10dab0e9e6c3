//! Integration tests for JOLANANAS.
//!
//! Every test runs against `wiremock` servers standing in for Shopify and the
//! geocoders, so no credentials or network access are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jolananas-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_client` - Storefront GraphQL client
//! - `admin_client` - Admin REST client
//! - `checkout_pipeline` - Cart, customer and draft order in sequence
//! - `address_autocomplete` - Geocoder fan-out and ranking
//! - `cart_quantity` - Debounced quantity commits

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::MockServer;

use jolananas_storefront::config::GeocodeConfig;
use jolananas_storefront::services::retry::RetryPolicy;
use jolananas_storefront::shopify::{AdminClient, StorefrontClient};

/// Token the mocked Shopify expects.
pub const TEST_TOKEN: &str = "shpat_test_token";

/// Storefront client pointed at `server`, without retries.
#[must_use]
pub fn storefront_client(server: &MockServer) -> StorefrontClient {
    storefront_client_with_retry(server, RetryPolicy::NONE)
}

/// Storefront client pointed at `server`.
#[must_use]
pub fn storefront_client_with_retry(server: &MockServer, retry: RetryPolicy) -> StorefrontClient {
    StorefrontClient::with_endpoint(
        format!("{}/api/2026-01/graphql.json", server.uri()),
        TEST_TOKEN,
        retry,
    )
}

/// Admin client pointed at `server`, without retries.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn admin_client(server: &MockServer) -> AdminClient {
    AdminClient::with_base_url(
        format!("{}/admin/api/2026-01", server.uri()),
        TEST_TOKEN,
        RetryPolicy::NONE,
    )
    .unwrap()
}

/// Geocoder config sending all three providers to `server`.
#[must_use]
pub fn geocode_config(server: &MockServer) -> GeocodeConfig {
    GeocodeConfig {
        gouv_url: server.uri(),
        photon_url: server.uri(),
        nominatim_url: server.uri(),
        user_agent: "jolananas-tests/0.1".to_string(),
        timeout: Duration::from_secs(2),
    }
}

/// Money in the Storefront wire shape.
#[must_use]
pub fn money(amount: &str) -> Value {
    json!({ "amount": amount, "currencyCode": "EUR" })
}

/// A cart node with one line.
#[must_use]
pub fn cart_node(cart_id: &str, line_id: &str, quantity: u32, unit_price: &str) -> Value {
    let unit: rust_decimal::Decimal = unit_price.parse().unwrap_or_default();
    let total = (unit * rust_decimal::Decimal::from(quantity)).to_string();

    json!({
        "id": cart_id,
        "checkoutUrl": format!("https://jolananas.com/cart/c/{cart_id}"),
        "totalQuantity": quantity,
        "buyerIdentity": null,
        "cost": {
            "subtotalAmount": money(&total),
            "totalAmount": money(&total),
            "totalTaxAmount": null
        },
        "lines": { "nodes": [{
            "id": line_id,
            "quantity": quantity,
            "cost": { "totalAmount": money(&total) },
            "merchandise": {
                "id": "gid://shopify/ProductVariant/11",
                "title": "500 g",
                "price": money(unit_price),
                "image": null,
                "product": { "handle": "ananas-victoria", "title": "Ananas Victoria" }
            }
        }]}
    })
}

/// A mutation payload (`{ cart, userErrors }`) wrapped under `field`.
#[must_use]
pub fn cart_payload(field: &str, cart: Value) -> Value {
    json!({ "data": { field: { "cart": cart, "userErrors": [] } } })
}
