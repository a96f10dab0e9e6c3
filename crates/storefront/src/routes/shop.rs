//! Shop info route.

use axum::{
    Json,
    extract::State,
    http::header::CACHE_CONTROL,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::Result;
use crate::routes::CATALOG_CACHE_CONTROL;
use crate::state::AppState;

/// Shop name, description, currency and domain.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let shop = state.storefront().get_shop().await?;
    Ok(([(CACHE_CONTROL, CATALOG_CACHE_CONTROL)], Json(shop)))
}
