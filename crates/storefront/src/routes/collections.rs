//! Collection route handlers.

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

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub first: Option<i64>,
    pub after: Option<String>,
}

/// One page of collections, without their products.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .storefront()
        .get_collections(query.first, query.after)
        .await?;

    Ok(([(CACHE_CONTROL, CATALOG_CACHE_CONTROL)], Json(page)))
}

/// A collection with one page of its products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let collection = state
        .storefront()
        .get_collection_by_handle(&handle, query.first, query.after)
        .await?;

    Ok(([(CACHE_CONTROL, CATALOG_CACHE_CONTROL)], Json(collection)))
}
