//! What the storefront keeps in the `jolananas_session` cookie's record.
//!
//! Only identifiers live in the session: the signed-in account and the
//! Shopify cart. Everything else is fetched per request.

use serde::{Deserialize, Serialize};

use jolananas_core::{Email, UserId};

/// Signed-in account, set at login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
}

/// Session record keys.
pub mod keys {
    pub const CURRENT_USER: &str = "current_user";

    /// Storefront cart GID, shared by guests and signed-in users.
    pub const CART_ID: &str = "cart_id";
}
