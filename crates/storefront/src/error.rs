//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Responses are JSON
//! `{"error": "..."}`; server-side failures are captured to Sentry and their
//! details are never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::address::GeocodeError;
use crate::services::auth::AuthError;
use crate::services::cart_sync::CartSyncError;
use crate::services::checkout::CheckoutError;
use crate::shopify::{AdminError, ShopifyError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Storefront API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Admin API operation failed.
    #[error("Shopify admin error: {0}")]
    Admin(#[from] AdminError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout pipeline failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Address autocomplete failed.
    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Quantity reconciliation failed.
    #[error("Cart error: {0}")]
    CartSync(#[from] CartSyncError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

const INTERNAL_MESSAGE: &str = "Internal server error";
const UPSTREAM_MESSAGE: &str = "External service error";

fn shopify_response(err: &ShopifyError) -> (StatusCode, String) {
    match err {
        ShopifyError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        ShopifyError::UserError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        ShopifyError::RateLimited(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests, please retry shortly".to_string(),
        ),
        _ => (StatusCode::BAD_GATEWAY, UPSTREAM_MESSAGE.to_string()),
    }
}

fn admin_response(err: &AdminError) -> (StatusCode, String) {
    match err {
        AdminError::Api { status: 422, message } => (StatusCode::BAD_REQUEST, message.clone()),
        _ => (StatusCode::BAD_GATEWAY, UPSTREAM_MESSAGE.to_string()),
    }
}

fn repository_response(err: &RepositoryError) -> (StatusCode, String) {
    match err {
        RepositoryError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_MESSAGE.to_string(),
        ),
    }
}

fn auth_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::InvalidCredentials | AuthError::UserNotFound => {
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        }
        AuthError::UserAlreadyExists => (
            StatusCode::CONFLICT,
            "An account with this email already exists".to_string(),
        ),
        AuthError::WeakPassword(msg) | AuthError::InvalidProfile(msg) => {
            (StatusCode::BAD_REQUEST, msg.clone())
        }
        AuthError::InvalidEmail(_) => {
            (StatusCode::BAD_REQUEST, "Invalid email address".to_string())
        }
        AuthError::Repository(e) => repository_response(e),
        AuthError::PasswordHash => (
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_MESSAGE.to_string(),
        ),
    }
}

impl AppError {
    /// Status code and client-facing message.
    fn parts(&self) -> (StatusCode, String) {
        match self {
            Self::Database(e) => repository_response(e),
            Self::Shopify(e) => shopify_response(e),
            Self::Admin(e) => admin_response(e),
            Self::Auth(e) => auth_response(e),
            Self::Checkout(e) => match e {
                CheckoutError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CheckoutError::Shipping(e) => (StatusCode::BAD_REQUEST, e.to_string()),
                CheckoutError::Shopify(e) => shopify_response(e),
                CheckoutError::Admin(e) => admin_response(e),
            },
            Self::Geocode(e) => match e {
                GeocodeError::QueryTooLong => (StatusCode::BAD_REQUEST, e.to_string()),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "Address suggestions are unavailable".to_string(),
                ),
            },
            Self::CartSync(e) => match e {
                CartSyncError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CartSyncError::Shopify(e) => shopify_response(e),
            },
            Self::Session(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
