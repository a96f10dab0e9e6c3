//! Checkout route.

use axum::{Json, extract::State, http::HeaderMap};
use serde_json::json;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::{OptionalAuth, set_cart_id};
use crate::models::ActivityKind;
use crate::routes::record_activity;
use crate::services::checkout::{CheckoutOutcome, CheckoutRequest};
use crate::state::AppState;

/// Run the checkout pipeline.
///
/// For a signed-in user the Shopify customer id is remembered and the
/// checkout is logged to the account activity.
#[instrument(skip_all, fields(line_count = body.lines.len()))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    OptionalAuth(user): OptionalAuth,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutOutcome>> {
    let outcome = state.checkout().create_checkout(&body).await?;

    set_cart_id(&session, &outcome.cart_id).await?;

    if let Some(user) = user {
        if let Err(e) = UserRepository::new(state.pool())
            .set_shopify_customer_id(user.id, outcome.shopify_customer_id)
            .await
        {
            warn!(error = %e, "Failed to link Shopify customer");
        }

        record_activity(
            &state,
            &headers,
            user.id,
            ActivityKind::CheckoutCreated,
            Some(json!({
                "draft_order_id": outcome.draft_order_id,
                "total": outcome.total.amount_string(),
                "currency": outcome.total.currency_code.code(),
            })),
        )
        .await;
    }

    Ok(Json(outcome))
}
