//! Session cookie signing against a real session store.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::routing::get;
use secrecy::SecretString;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_sessions::Session;
use tower_sessions::cookie::Key;

use jolananas_storefront::config::{GeocodeConfig, RetryConfig, ShopifyConfig, StorefrontConfig};
use jolananas_storefront::middleware::{cart_id, create_session_layer, set_cart_id};

/// Base64 length of the HMAC-SHA256 tag prefixed to a signed cookie value.
const SIGNATURE_LEN: usize = 44;

const CART: &str = "gid://shopify/Cart/abc";

fn config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/jolananas_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        session_key: Key::from(&[42; 64]),
        shopify: ShopifyConfig {
            store: "jolananas.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_token: SecretString::from("storefront-token"),
            admin_token: SecretString::from("admin-token"),
        },
        retry: RetryConfig::default(),
        geocode: GeocodeConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn router(pool: &PgPool) -> Router {
    Router::new()
        .route(
            "/remember",
            get(|session: Session| async move {
                set_cart_id(&session, CART).await.unwrap();
                "ok"
            }),
        )
        .route(
            "/recall",
            get(|session: Session| async move {
                cart_id(&session).await.unwrap_or_else(|| "none".to_string())
            }),
        )
        .layer(create_session_layer(pool, &config()))
}

async fn recall(pool: &PgPool, cookie: &str) -> String {
    let response = router(pool)
        .oneshot(
            Request::get("/recall")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_session_cookie_is_signed(pool: PgPool) {
    let response = router(&pool)
        .oneshot(Request::get("/remember").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let pair = set_cookie.split(';').next().unwrap();
    let value = pair.strip_prefix("jolananas_session=").unwrap();
    assert!(value.len() > SIGNATURE_LEN);

    assert_eq!(recall(&pool, pair).await, CART);

    // The bare session id without its signature is rejected
    let unsigned = format!("jolananas_session={}", &value[SIGNATURE_LEN..]);
    assert_eq!(recall(&pool, &unsigned).await, "none");
}
