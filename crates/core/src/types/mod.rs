//! Core types for JOLANANAS.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod country;
pub mod email;
pub mod id;
pub mod price;

pub use country::{CountryCode, CountryCodeError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
