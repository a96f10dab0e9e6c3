//! JOLANANAS Core - Shared types and pure storefront logic.
//!
//! This crate provides the pieces used by the storefront server and the CLI:
//! - `storefront` - JSON API in front of Shopify
//! - `cli` - Command-line tools for migrations and inspection
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and lets every
//! rule here be unit tested without mocks.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and country codes
//! - [`shipping`] - Static shipping threshold table and quotes
//! - [`sanitize`] - Cleanup of free text sent to the Shopify Admin API
//! - [`debounce`] - Commit delay for cart quantity inputs
//! - [`geo`] - Scoring and ranking of address suggestions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod debounce;
pub mod geo;
pub mod sanitize;
pub mod shipping;
pub mod types;

pub use types::*;
