//! Cart route handlers.
//!
//! The Shopify cart id lives in the session, so guests keep their cart
//! across requests. Quantity changes go through the debounced reconciler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{instrument, warn};

use jolananas_core::debounce::{Device, QuantityInput};

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, cart_id, set_cart_id};
use crate::services::cart_sync::{MAX_LINE_QUANTITY, Reconciled};
use crate::services::checkout::variant_gid;
use crate::shopify::{Cart, CartLineInput, ShopifyError, numeric_id};
use crate::state::AppState;

/// Cart as returned to the client; `cart` is `None` for an empty cart.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Option<Cart>,
    pub item_count: u32,
}

impl CartResponse {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cart: None,
            item_count: 0,
        }
    }
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            item_count: cart.total_quantity,
            cart: Some(cart),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    /// Variant GID or numeric id.
    pub variant_id: String,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub line_id: String,
    pub quantity: u32,
    pub previous: u32,
    /// Characters in the quantity field.
    #[serde(default)]
    pub input_len: usize,
    #[serde(default)]
    pub device: Device,
    pub keystroke_interval_ms: Option<u64>,
}

impl QuantityRequest {
    const fn input(&self) -> QuantityInput {
        QuantityInput {
            previous: self.previous,
            requested: self.quantity,
            input_len: self.input_len,
            device: self.device,
            keystroke_interval_ms: self.keystroke_interval_ms,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityStatus {
    Committed,
    Superseded,
}

#[derive(Debug, Serialize)]
pub struct QuantityResponse {
    pub status: QuantityStatus,
    /// The updated cart when the change was committed.
    #[serde(flatten)]
    pub cart: CartResponse,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub line_id: String,
}

async fn require_cart_id(session: &Session) -> Result<String> {
    cart_id(session)
        .await
        .ok_or_else(|| AppError::NotFound("No cart in session".to_string()))
}

/// Current session cart, empty when none or when it expired on Shopify.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    let Some(cart_id) = cart_id(&session).await else {
        return Ok(Json(CartResponse::empty()));
    };

    match state.storefront().get_cart(&cart_id).await {
        Ok(cart) => Ok(Json(cart.into())),
        Err(ShopifyError::NotFound(_)) => {
            warn!(cart_id = %cart_id, "Session cart no longer exists");
            Ok(Json(CartResponse::empty()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Add a variant, creating the cart on first use.
#[instrument(skip(state, session, user, body))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let quantity = body.quantity.unwrap_or(1);
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(AppError::BadRequest(format!(
            "Quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }

    let id = numeric_id(&body.variant_id)
        .map_err(|_| AppError::BadRequest("Invalid variant id".to_string()))?;
    let lines = vec![CartLineInput {
        merchandise_id: variant_gid(&body.variant_id, id),
        quantity,
    }];

    let existing = match cart_id(&session).await {
        Some(cart_id) => match state.storefront().add_to_cart(&cart_id, lines.clone()).await {
            Ok(cart) => Some(cart),
            Err(ShopifyError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    let cart = match existing {
        Some(cart) => cart,
        None => {
            let email = user.as_ref().map(|u| u.email.normalized());
            let cart = state
                .storefront()
                .create_cart(lines, email.as_deref())
                .await?;
            set_cart_id(&session, &cart.id).await?;
            cart
        }
    };

    Ok(Json(cart.into()))
}

/// Debounced quantity change; `0` removes the line.
#[instrument(skip(state, session, body), fields(line_id = %body.line_id))]
pub async fn quantity(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<QuantityRequest>,
) -> Result<Json<QuantityResponse>> {
    let cart_id = require_cart_id(&session).await?;

    let response = match state
        .reconciler()
        .submit(&cart_id, &body.line_id, body.input())
        .await?
    {
        Reconciled::Committed(cart) => QuantityResponse {
            status: QuantityStatus::Committed,
            cart: CartResponse::from(*cart),
        },
        Reconciled::Superseded => QuantityResponse {
            status: QuantityStatus::Superseded,
            cart: CartResponse::empty(),
        },
    };

    Ok(Json(response))
}

/// Remove a line immediately.
#[instrument(skip(state, session, body), fields(line_id = %body.line_id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<Json<CartResponse>> {
    let cart_id = require_cart_id(&session).await?;
    let cart = state
        .storefront()
        .remove_from_cart(&cart_id, vec![body.line_id])
        .await?;

    Ok(Json(cart.into()))
}
