//! Shopify Storefront (GraphQL) and Admin (REST) API clients.
//!
//! # Architecture
//!
//! - Shopify is source of truth - NO local sync, direct API calls
//! - Storefront API: catalog reads and cart mutations, private token
//! - Admin API: customer lookup/creation, order history, draft orders
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//! - Every request goes through the retry policy from configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use jolananas_storefront::shopify::{CartLineInput, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.shopify, config.retry.into());
//!
//! let product = client.get_product_by_handle("ananas-victoria").await?;
//! let cart = client
//!     .create_cart(
//!         vec![CartLineInput {
//!             merchandise_id: product.variants[0].id.clone(),
//!             quantity: 2,
//!         }],
//!         None,
//!     )
//!     .await?;
//! ```

pub mod admin;
mod storefront;
pub mod types;

pub use admin::{AdminClient, AdminError, numeric_id};
pub use storefront::StorefrontClient;
pub use types::*;

use std::time::Duration;

use thiserror::Error;

use crate::services::retry::Retryable;

/// Errors that can occur when interacting with the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

impl Retryable for ShopifyError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::Status { status, .. } => *status >= 500,
            Self::RateLimited(_) => true,
            Self::GraphQL(_) | Self::Parse(_) | Self::NotFound(_) | Self::UserError(_) => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited(secs) => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError::message("Field not found"),
            GraphQLError::message("Invalid ID"),
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("cartCreate".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: cartCreate.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = ShopifyError::GraphQL(vec![GraphQLError::message("")]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");

        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ShopifyError::RateLimited(2).is_retryable());
        assert_eq!(
            ShopifyError::RateLimited(2).retry_after(),
            Some(Duration::from_secs(2))
        );
        assert!(
            ShopifyError::Status {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ShopifyError::Status {
                status: 401,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!ShopifyError::UserError("bad".to_string()).is_retryable());
        assert!(!ShopifyError::NotFound("x".to_string()).is_retryable());
    }
}
