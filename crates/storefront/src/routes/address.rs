//! Address autocomplete route.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::services::address::AddressSuggestion;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<AddressSuggestion>,
}

/// Ranked suggestions; queries under three characters return none.
#[instrument(skip_all, fields(limit = query.limit))]
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<AutocompleteResponse>> {
    let suggestions = state.autocomplete().suggest(&query.q, query.limit).await?;
    Ok(Json(AutocompleteResponse { suggestions }))
}
