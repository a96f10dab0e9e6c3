//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET  /api/shop                         - Shop info
//! GET  /api/shipping                     - Zone, tiers and quote
//! GET  /api/products                     - Product listing (?first, after, query)
//! GET  /api/products/{handle}            - Product detail
//! GET  /api/collections                  - Collection listing
//! GET  /api/collections/{handle}         - Collection with products
//!
//! # Cart (cart id kept in the session)
//! GET  /api/cart                         - Current cart
//! POST /api/cart/lines                   - Add a variant
//! POST /api/cart/quantity                - Debounced quantity change
//! POST /api/cart/remove                  - Remove a line
//!
//! # Checkout
//! POST /api/checkout                     - Cart, customer and draft order
//!
//! # Address
//! GET  /api/address/autocomplete         - Suggestions (?q, limit)
//!
//! # Auth (strict rate limit)
//! POST /api/auth/register
//! POST /api/auth/login
//! POST /api/auth/logout
//! GET  /api/auth/session                 - Polled by the client after login
//!
//! # Account (requires auth)
//! GET  /api/account                      - Dashboard
//! PUT  /api/account/profile
//! GET  /api/account/activity
//! GET  /api/account/addresses
//! POST /api/account/addresses
//! PUT  /api/account/addresses/{id}
//! DELETE /api/account/addresses/{id}
//! POST /api/account/addresses/{id}/default
//! ```

pub mod account;
pub mod address;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod collections;
pub mod products;
pub mod shipping;
pub mod shop;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post, put},
};
use tracing::warn;

use jolananas_core::UserId;

use crate::db::ActivityRepository;
use crate::middleware::{api_rate_limiter, auth_rate_limiter, client_ip};
use crate::models::ActivityKind;
use crate::state::AppState;

/// `Cache-Control` for public catalog responses.
pub const CATALOG_CACHE_CONTROL: &str = "public, max-age=60";

/// Append an activity log entry.
///
/// The log is informational, so a failed insert is logged and ignored.
pub(crate) async fn record_activity(
    state: &AppState,
    headers: &HeaderMap,
    user_id: UserId,
    kind: ActivityKind,
    detail: Option<serde_json::Value>,
) {
    let ip = client_ip(headers).map(|ip| ip.to_string());
    if let Err(e) = ActivityRepository::new(state.pool())
        .record(user_id, kind, detail, ip.as_deref())
        .await
    {
        warn!(error = %e, kind = kind.as_str(), "Failed to record activity");
    }
}

/// Catalog, cart, checkout and address routes.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/shop", get(shop::show))
        .route("/shipping", get(shipping::show))
        .route("/products", get(products::index))
        .route("/products/{handle}", get(products::show))
        .route("/collections", get(collections::index))
        .route("/collections/{handle}", get(collections::show))
        .route("/cart", get(cart::show))
        .route("/cart/lines", post(cart::add))
        .route("/cart/quantity", post(cart::quantity))
        .route("/cart/remove", post(cart::remove))
        .route("/checkout", post(checkout::create))
        .route("/address/autocomplete", get(address::autocomplete))
}

/// Registration and login routes.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}

/// Signed-in account routes.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::dashboard))
        .route("/profile", put(account::update_profile))
        .route("/activity", get(account::activity))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
        .route("/addresses/{id}/default", post(account::set_default_address))
}

/// Every API route, each group behind its rate limiter.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(store_routes())
        .nest("/account", account_routes())
        .layer(api_rate_limiter());

    Router::new()
        .nest(
            "/api",
            api.nest("/auth", auth_routes().layer(auth_rate_limiter())),
        )
}
