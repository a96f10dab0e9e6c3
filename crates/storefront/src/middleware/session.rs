//! Session layer and session-stored cart.
//!
//! Sessions live in `PostgreSQL` through tower-sessions. Besides the signed-in
//! user, the session remembers the Shopify cart id so guests keep their cart.
//! The session id cookie is signed with the key from `JOLANANAS_SESSION_SECRET`.

use sqlx::PgPool;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;
use crate::models::session::keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "jolananas_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The `tower_sessions.session` table is created by migration.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    let store = PostgresStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(config.session_key.clone())
}

/// Cart id remembered in the session, if any.
pub async fn cart_id(session: &Session) -> Option<String> {
    session.get::<String>(keys::CART_ID).await.ok().flatten()
}

/// Remember `cart_id` in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_cart_id(
    session: &Session,
    cart_id: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART_ID, cart_id).await
}
