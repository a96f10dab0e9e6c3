//! Shopify Storefront API client implementation.
//!
//! Documents live in `queries`, request and response shapes in `wire`.
//! Requests go out as `graphql_client::QueryBody` over `reqwest`, and every
//! call runs through the configured retry policy. Catalog reads are cached
//! using `moka` (5-minute TTL).

mod cache;
mod conversions;
pub mod queries;
mod wire;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ShopifyConfig;
use crate::services::retry::{RetryPolicy, with_retry};
use crate::shopify::types::{
    Cart, CartLineInput, CartLineUpdateInput, Collection, CollectionConnection, Product,
    ProductConnection, Shop,
};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::CacheValue;
use conversions::{
    convert_cart, convert_collection, convert_collection_connection, convert_product,
    convert_product_connection, convert_shop, convert_user_errors,
};
use wire::{
    AddLinesVariables, BuyerIdentityInput, CartCreateData, CartData, CartIdVariables, CartInput,
    CartLinesAddData, CartLinesRemoveData, CartLinesUpdateData, CartPayload, CollectionData,
    CollectionVariables, CollectionsData, CreateCartVariables, HandleVariables, NoVariables,
    PageVariables, ProductData, ProductsData, ProductsVariables, RemoveLinesVariables, ShopData,
    UpdateLinesVariables,
};

/// Page size used when the caller does not provide one.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Largest page Shopify accepts for connections.
pub const MAX_PAGE_SIZE: i64 = 250;

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300);

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to the shop, products, collections and carts.
/// Catalog reads are cached for 5 minutes; cart reads are never cached.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<String, CacheValue>,
    retry: RetryPolicy,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyConfig, retry: RetryPolicy) -> Self {
        Self::with_endpoint(
            config.storefront_endpoint(),
            config.storefront_token.expose_secret(),
            retry,
        )
    }

    /// Create a client against an explicit GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token: access_token.into(),
                cache,
                retry,
            }),
        }
    }

    /// Execute a GraphQL document, retrying transient failures.
    async fn execute<V, D>(
        &self,
        operation_name: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<D, ShopifyError>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let body = QueryBody {
            variables,
            query,
            operation_name,
        };

        with_retry(self.inner.retry, operation_name, || self.send(&body)).await
    }

    async fn send<V, D>(&self, body: &QueryBody<V>) -> Result<D, ShopifyError>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header(
                "Shopify-Storefront-Private-Token",
                &self.inner.access_token,
            )
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = body.operation_name,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body: truncate(&response_text, 200),
            });
        }

        let response: Response<D> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = body.operation_name,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = body.operation_name,
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
        })
    }

    // =========================================================================
    // Shop
    // =========================================================================

    /// Get public shop information.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_shop(&self) -> Result<Shop, ShopifyError> {
        let cache_key = cache::shop_key();
        if let Some(CacheValue::Shop(shop)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for shop");
            return Ok(*shop);
        }

        let data: ShopData = self
            .execute("GetShop", queries::GET_SHOP, NoVariables {})
            .await?;
        let shop = convert_shop(data.shop);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Shop(Box::new(shop.clone())))
            .await;

        Ok(shop)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = cache::product_key(handle);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let data: ProductData = self
            .execute(
                "GetProductByHandle",
                queries::GET_PRODUCT_BY_HANDLE,
                HandleVariables {
                    handle: handle.to_string(),
                },
            )
            .await?;

        let product = data
            .product
            .map(convert_product)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a paginated list of products, optionally filtered by a search query.
    ///
    /// Only unfiltered pages are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        first: Option<i64>,
        after: Option<String>,
        query: Option<String>,
    ) -> Result<ProductConnection, ShopifyError> {
        let first = page_size(first);
        let query = query.filter(|q| !q.trim().is_empty());
        let cache_key = cache::products_key(first, after.as_deref());

        if query.is_none()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let cacheable = query.is_none();
        let data: ProductsData = self
            .execute(
                "GetProducts",
                queries::GET_PRODUCTS,
                ProductsVariables {
                    first,
                    after,
                    query,
                },
            )
            .await?;

        let connection = convert_product_connection(data.products);

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(connection.clone()))
                .await;
        }

        Ok(connection)
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get a collection and one page of its products.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_by_handle(
        &self,
        handle: &str,
        product_count: Option<i64>,
        after: Option<String>,
    ) -> Result<Collection, ShopifyError> {
        let first = page_size(product_count);
        let cache_key = cache::collection_key(handle, first, after.as_deref());

        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let data: CollectionData = self
            .execute(
                "GetCollectionByHandle",
                queries::GET_COLLECTION_BY_HANDLE,
                CollectionVariables {
                    handle: handle.to_string(),
                    first,
                    after,
                },
            )
            .await?;

        let collection = data
            .collection
            .map(convert_collection)
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Collection(Box::new(collection.clone())),
            )
            .await;

        Ok(collection)
    }

    /// Get a paginated list of collections (without their products).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(
        &self,
        first: Option<i64>,
        after: Option<String>,
    ) -> Result<CollectionConnection, ShopifyError> {
        let first = page_size(first);
        let cache_key = cache::collections_key(first, after.as_deref());

        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let data: CollectionsData = self
            .execute(
                "GetCollections",
                queries::GET_COLLECTIONS,
                PageVariables { first, after },
            )
            .await?;

        let connection = convert_collection_connection(data.collections);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(connection.clone()))
            .await;

        Ok(connection)
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Create a new cart, optionally with lines and a buyer email.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the input.
    #[instrument(skip(self, lines, buyer_email), fields(line_count = lines.len()))]
    pub async fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
        buyer_email: Option<&str>,
    ) -> Result<Cart, ShopifyError> {
        let variables = CreateCartVariables {
            input: CartInput {
                lines,
                buyer_identity: buyer_email.map(|email| BuyerIdentityInput {
                    email: email.to_string(),
                }),
            },
        };

        let data: CartCreateData = self
            .execute("CreateCart", queries::CREATE_CART, variables)
            .await?;

        cart_from_payload(data.cart_create)
    }

    /// Get a cart by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the cart no longer exists.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Cart, ShopifyError> {
        let data: CartData = self
            .execute(
                "GetCart",
                queries::GET_CART,
                CartIdVariables {
                    cart_id: cart_id.to_string(),
                },
            )
            .await?;

        data.cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the input.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id, line_count = lines.len()))]
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let data: CartLinesAddData = self
            .execute(
                "AddToCart",
                queries::ADD_TO_CART,
                AddLinesVariables {
                    cart_id: cart_id.to_string(),
                    lines,
                },
            )
            .await?;

        cart_from_payload(data.cart_lines_add)
    }

    /// Update quantities of existing cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the input.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id, line_count = lines.len()))]
    pub async fn update_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let data: CartLinesUpdateData = self
            .execute(
                "UpdateCartLines",
                queries::UPDATE_CART_LINES,
                UpdateLinesVariables {
                    cart_id: cart_id.to_string(),
                    lines,
                },
            )
            .await?;

        cart_from_payload(data.cart_lines_update)
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the input.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id, line_count = line_ids.len()))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let data: CartLinesRemoveData = self
            .execute(
                "RemoveFromCart",
                queries::REMOVE_FROM_CART,
                RemoveLinesVariables {
                    cart_id: cart_id.to_string(),
                    line_ids,
                },
            )
            .await?;

        cart_from_payload(data.cart_lines_remove)
    }
}

fn page_size(requested: Option<i64>) -> i64 {
    requested.map_or(DEFAULT_PAGE_SIZE, |n| n.clamp(1, MAX_PAGE_SIZE))
}

fn cart_from_payload(payload: Option<CartPayload>) -> Result<Cart, ShopifyError> {
    let payload = payload.ok_or_else(|| {
        ShopifyError::GraphQL(vec![GraphQLError::message("No mutation payload in response")])
    })?;

    if !payload.user_errors.is_empty() {
        return Err(ShopifyError::UserError(convert_user_errors(
            payload.user_errors,
        )));
    }

    payload.cart.map(convert_cart).ok_or_else(|| {
        ShopifyError::GraphQL(vec![GraphQLError::message("No cart in mutation payload")])
    })
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_clamps() {
        assert_eq!(page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(page_size(Some(0)), 1);
        assert_eq!(page_size(Some(20)), 20);
        assert_eq!(page_size(Some(10_000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_user_errors_become_user_error() {
        let payload = CartPayload {
            cart: None,
            user_errors: vec![wire::UserErrorNode {
                field: None,
                message: "Variant is sold out".to_string(),
            }],
        };
        let err = cart_from_payload(Some(payload)).unwrap_err();
        assert!(matches!(err, ShopifyError::UserError(msg) if msg == "Variant is sold out"));
    }

    #[test]
    fn test_missing_payload_is_graphql_error() {
        assert!(matches!(
            cart_from_payload(None),
            Err(ShopifyError::GraphQL(_))
        ));
    }
}
