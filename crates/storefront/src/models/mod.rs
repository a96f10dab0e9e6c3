//! Domain models for locally owned storefront data.
//!
//! Shopify owns products, carts, customers and orders. The storefront keeps
//! only account records: users, saved addresses and the activity log.

pub mod activity;
pub mod address;
pub mod session;
pub mod user;

pub use activity::{ActivityEntry, ActivityKind};
pub use address::{Address, AddressInput};
pub use session::CurrentUser;
pub use user::{ProfileUpdate, User};
