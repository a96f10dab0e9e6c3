//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header::CACHE_CONTROL,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::routes::CATALOG_CACHE_CONTROL;
use crate::state::AppState;

/// Pagination and search parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub first: Option<i64>,
    pub after: Option<String>,
    /// Shopify search syntax; results are not cached.
    pub query: Option<String>,
}

/// One page of products.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .storefront()
        .get_products(query.first, query.after, query.query)
        .await?;

    Ok(([(CACHE_CONTROL, CATALOG_CACHE_CONTROL)], Json(page)))
}

/// A product by handle, `404` when Shopify has none.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state.storefront().get_product_by_handle(&handle).await?;
    Ok(([(CACHE_CONTROL, CATALOG_CACHE_CONTROL)], Json(product)))
}
