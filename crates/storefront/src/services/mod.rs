//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `address` - Address autocomplete across three geocoders
//! - `auth` - Password registration, login and profile updates
//! - `cart_sync` - Debounced cart quantity commits
//! - `checkout` - Cart, customer and draft order pipeline
//! - `dashboard` - Account dashboard aggregation
//! - `retry` - Retry policy shared by every outbound client

pub mod address;
pub mod auth;
pub mod cart_sync;
pub mod checkout;
pub mod dashboard;
pub mod retry;
