//! Shopify Admin REST API client.
//!
//! Covers the slice of the Admin API the storefront needs: customer lookup
//! and creation, a customer's order history, and draft order creation.

mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ShopifyConfig;
use crate::services::retry::{RetryPolicy, Retryable, with_retry};

/// Errors that can occur when interacting with the Admin API.
#[derive(Debug, Error)]
pub enum AdminError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse a response or an identifier.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Retryable for AdminError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::Api { status, .. } => *status >= 500,
            Self::RateLimited(_) => true,
            Self::Parse(_) | Self::NotFound(_) => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited(secs) => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

/// Extract the numeric id from a Shopify GID.
///
/// `gid://shopify/ProductVariant/123` and `123` both yield `123`.
///
/// # Errors
///
/// Returns `AdminError::Parse` for anything else.
pub fn numeric_id(gid: &str) -> Result<i64, AdminError> {
    let trimmed = gid.trim();
    let tail = trimmed
        .strip_prefix("gid://shopify/")
        .map_or(Some(trimmed), |rest| {
            rest.split_once('/').map(|(_, id)| id)
        })
        .unwrap_or_default();

    // Some GIDs carry a query suffix (`?key=...`)
    let digits = tail.split('?').next().unwrap_or_default();

    digits
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AdminError::Parse(format!("Invalid Shopify id: {gid}")))
}

/// Client for the Shopify Admin REST API.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ShopifyConfig, retry: RetryPolicy) -> Result<Self, AdminError> {
        Self::with_base_url(
            config.admin_base_url(),
            config.admin_token.expose_secret(),
            retry,
        )
    }

    /// Create a client against an explicit base URL (`.../admin/api/{version}`).
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn with_base_url(
        base_url: impl Into<String>,
        access_token: &str,
        retry: RetryPolicy,
    ) -> Result<Self, AdminError> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(access_token)
            .map_err(|e| AdminError::Parse(format!("Invalid access token format: {e}")))?;
        token.set_sensitive(true);
        headers.insert("X-Shopify-Access-Token", token);
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url: base_url.into().trim_end_matches('/').to_string(),
                retry,
            }),
        })
    }

    fn url(&self, path: &str) -> Result<Url, AdminError> {
        Url::parse(&format!("{}{path}", self.inner.base_url))
            .map_err(|e| AdminError::Parse(format!("Invalid Admin API URL: {e}")))
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Find a customer whose email matches exactly (case-insensitive).
    ///
    /// Shopify's search is fuzzy, so results are filtered locally.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, email), fields(email_domain = %email_domain(email)))]
    pub async fn search_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminCustomer>, AdminError> {
        let mut url = self.url("/customers/search.json")?;
        url.query_pairs_mut()
            .append_pair("query", &format!("email:{email}"));

        let response: CustomersResponse = with_retry(self.inner.retry, "search_customer", || {
            self.get_json(url.clone())
        })
        .await?;

        let wanted = email.trim();
        let found = response.customers.into_iter().find(|c| {
            c.email
                .as_deref()
                .is_some_and(|e| e.trim().eq_ignore_ascii_case(wanted))
        });

        debug!(found = found.is_some(), "Customer search finished");
        Ok(found)
    }

    /// Fetch a customer by numeric id, including their lifetime order totals.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` if the customer does not exist.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, customer_id: i64) -> Result<AdminCustomer, AdminError> {
        let url = self.url(&format!("/customers/{customer_id}.json"))?;

        let response: CustomerResponse = with_retry(self.inner.retry, "get_customer", || {
            self.get_json(url.clone())
        })
        .await?;

        Ok(response.customer)
    }

    /// Create a customer, or return the existing one when the email is taken.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input), fields(email_domain = %email_domain(&input.email)))]
    pub async fn create_customer(&self, input: &CustomerInput) -> Result<AdminCustomer, AdminError> {
        let url = self.url("/customers.json")?;
        let body = CustomerEnvelope { customer: input };

        let result: Result<CustomerResponse, AdminError> =
            with_retry(self.inner.retry, "create_customer", || {
                self.post_json(url.clone(), &body)
            })
            .await;

        match result {
            Ok(response) => Ok(response.customer),
            Err(AdminError::Api { status: 422, message }) if message.contains("taken") => {
                debug!("Customer already exists, searching again");
                self.search_customer_by_email(&input.email)
                    .await?
                    .ok_or(AdminError::Api {
                        status: 422,
                        message,
                    })
            }
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List a customer's most recent orders, any status.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_customer_orders(
        &self,
        customer_id: i64,
        limit: u32,
    ) -> Result<Vec<AdminOrder>, AdminError> {
        let mut url = self.url(&format!("/customers/{customer_id}/orders.json"))?;
        url.query_pairs_mut()
            .append_pair("status", "any")
            .append_pair("limit", &limit.clamp(1, 250).to_string());

        let response: OrdersResponse = with_retry(self.inner.retry, "get_customer_orders", || {
            self.get_json(url.clone())
        })
        .await?;

        Ok(response.orders)
    }

    // =========================================================================
    // Draft orders
    // =========================================================================

    /// Create a draft order.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or Shopify rejects the input.
    #[instrument(skip(self, input), fields(line_count = input.line_items.len()))]
    pub async fn create_draft_order(
        &self,
        input: &DraftOrderInput,
    ) -> Result<DraftOrder, AdminError> {
        let url = self.url("/draft_orders.json")?;
        let body = DraftOrderEnvelope { draft_order: input };

        let response: DraftOrderResponse =
            with_retry(self.inner.retry, "create_draft_order", || {
                self.post_json(url.clone(), &body)
            })
            .await?;

        Ok(response.draft_order)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AdminError> {
        let response = self.inner.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, AdminError>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AdminError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(AdminError::RateLimited(retry_after));
        }

        let text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AdminError::NotFound(text.chars().take(200).collect()));
        }

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Shopify Admin API returned non-success status"
            );
            return Err(AdminError::Api {
                status: status.as_u16(),
                message: text.chars().take(500).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|e| AdminError::Parse(e.to_string()))
    }
}

/// Domain part of an email, for logs.
fn email_domain(email: &str) -> &str {
    email.rsplit_once('@').map_or("", |(_, domain)| domain)
}
