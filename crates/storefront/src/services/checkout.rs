//! Checkout orchestration.
//!
//! A checkout is a linear pipeline over two Shopify APIs:
//!
//! 1. validate and sanitize the request
//! 2. create a Storefront cart with the lines and buyer email
//! 3. find or create the Admin customer
//! 4. quote shipping from the cart subtotal (EUR only) and destination
//! 5. submit a draft order carrying lines, addresses, shipping and note
//!
//! The first failing step aborts the checkout. Nothing is compensated: a cart
//! or customer created before a later failure is left in place.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use jolananas_core::sanitize::{MAX_LINE_CHARS, MAX_NOTE_CHARS, sanitize_line, sanitize_multiline};
use jolananas_core::shipping::{self, ShippingError, ShippingQuote};
use jolananas_core::{CountryCode, Email, Price};

use crate::models::address::optional_line;
use crate::shopify::admin::{
    AdminClient, AdminError, CustomerInput, DraftOrderAddress, DraftOrderCustomer,
    DraftOrderInput, DraftOrderLineItem, NoteAttribute, ShippingLine, numeric_id,
};
use crate::shopify::{Cart, CartLineInput, ShopifyError, StorefrontClient};

/// Most lines accepted in one checkout.
pub const MAX_LINES: usize = 50;

/// Largest quantity accepted per line.
pub const MAX_QUANTITY: u32 = 99;

/// Tag put on customers and draft orders created here.
pub const SOURCE_TAG: &str = "jolananas-web";

/// Shipping line code on draft orders.
pub const SHIPPING_CODE: &str = "STANDARD";

/// Errors from the checkout pipeline.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The request failed validation.
    #[error("invalid checkout: {0}")]
    Invalid(String),

    /// Storefront API step failed.
    #[error("storefront error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Admin API step failed.
    #[error("admin error: {0}")]
    Admin(#[from] AdminError),

    /// Shipping could not be quoted.
    #[error("shipping error: {0}")]
    Shipping(#[from] ShippingError),
}

/// One line of the checkout request.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutLine {
    /// Variant GID or numeric id.
    pub variant_id: String,
    pub quantity: u32,
}

/// Checkout request as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub lines: Vec<CheckoutLine>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub zip: String,
    #[serde(default)]
    pub province: Option<String>,
    pub country_code: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOutcome {
    pub draft_order_id: i64,
    pub invoice_url: Option<String>,
    pub cart_id: String,
    pub checkout_url: String,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub free_shipping: bool,
    /// Admin customer the draft order belongs to.
    #[serde(skip)]
    pub shopify_customer_id: i64,
}

/// A request that passed validation, every string sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCheckout {
    pub lines: Vec<ValidLine>,
    pub email: Email,
    pub address: DraftOrderAddress,
    pub country: CountryCode,
    pub note: Option<String>,
}

/// A line with its variant GID and numeric id resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLine {
    pub merchandise_id: String,
    pub variant_id: i64,
    pub quantity: u32,
}

impl CheckoutRequest {
    /// Check limits and required fields, sanitizing every string.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Invalid` naming the first violation.
    pub fn validate(&self) -> Result<ValidCheckout, CheckoutError> {
        if self.lines.is_empty() {
            return Err(CheckoutError::Invalid("cart is empty".to_string()));
        }
        if self.lines.len() > MAX_LINES {
            return Err(CheckoutError::Invalid(format!(
                "at most {MAX_LINES} lines per checkout"
            )));
        }

        let lines = self
            .lines
            .iter()
            .map(|line| {
                if !(1..=MAX_QUANTITY).contains(&line.quantity) {
                    return Err(CheckoutError::Invalid(format!(
                        "quantity must be between 1 and {MAX_QUANTITY}"
                    )));
                }
                let variant_id = numeric_id(&line.variant_id).map_err(|_| {
                    CheckoutError::Invalid(format!("invalid variant id: {}", line.variant_id))
                })?;
                Ok(ValidLine {
                    merchandise_id: variant_gid(&line.variant_id, variant_id),
                    variant_id,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let email = Email::parse(&self.email)
            .map_err(|e| CheckoutError::Invalid(format!("email: {e}")))?;

        let country = CountryCode::parse(&self.country_code)
            .map_err(|e| CheckoutError::Invalid(format!("country_code: {e}")))?;

        let address = DraftOrderAddress {
            first_name: required(&self.first_name, "first_name")?,
            last_name: required(&self.last_name, "last_name")?,
            company: optional_line(self.company.as_deref()),
            address1: required(&self.address1, "address1")?,
            address2: optional_line(self.address2.as_deref()),
            city: required(&self.city, "city")?,
            zip: required(&self.zip, "zip")?,
            province: optional_line(self.province.as_deref()),
            country_code: country.as_str().to_string(),
            phone: optional_line(self.phone.as_deref()),
        };

        let note = self
            .note
            .as_deref()
            .map(|n| sanitize_multiline(n, MAX_NOTE_CHARS))
            .filter(|n| !n.is_empty());

        Ok(ValidCheckout {
            lines,
            email,
            address,
            country,
            note,
        })
    }
}

fn required(value: &str, field: &str) -> Result<String, CheckoutError> {
    let clean = sanitize_line(value, MAX_LINE_CHARS);
    if clean.is_empty() {
        Err(CheckoutError::Invalid(format!("{field} is required")))
    } else {
        Ok(clean)
    }
}

/// The Storefront API wants GIDs; bare numbers are expanded.
pub(crate) fn variant_gid(raw: &str, id: i64) -> String {
    let raw = raw.trim();
    if raw.starts_with("gid://") {
        raw.to_string()
    } else {
        format!("gid://shopify/ProductVariant/{id}")
    }
}

/// Assemble the draft order for a validated checkout.
#[must_use]
pub fn build_draft_order(
    checkout: &ValidCheckout,
    customer_id: i64,
    cart: &Cart,
    quote: &ShippingQuote,
) -> DraftOrderInput {
    let currency = cart.cost.subtotal.currency_code.code().to_string();

    DraftOrderInput {
        line_items: checkout
            .lines
            .iter()
            .map(|l| DraftOrderLineItem {
                variant_id: l.variant_id,
                quantity: l.quantity,
            })
            .collect(),
        customer: DraftOrderCustomer { id: customer_id },
        shipping_address: checkout.address.clone(),
        billing_address: checkout.address.clone(),
        shipping_line: ShippingLine {
            title: quote.method_title.to_string(),
            price: quote.cost,
            code: SHIPPING_CODE.to_string(),
            custom: true,
        },
        note: checkout.note.clone(),
        note_attributes: vec![
            NoteAttribute {
                name: "cart_id".to_string(),
                value: cart.id.clone(),
            },
            NoteAttribute {
                name: "source".to_string(),
                value: SOURCE_TAG.to_string(),
            },
        ],
        email: checkout.email.normalized(),
        tags: SOURCE_TAG.to_string(),
        currency,
        use_customer_default_address: false,
    }
}

/// Runs the checkout pipeline against Shopify.
#[derive(Clone)]
pub struct CheckoutService {
    storefront: StorefrontClient,
    admin: AdminClient,
}

impl CheckoutService {
    /// Create a checkout service.
    #[must_use]
    pub const fn new(storefront: StorefrontClient, admin: AdminClient) -> Self {
        Self { storefront, admin }
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing step.
    #[instrument(skip(self, request), fields(line_count = request.lines.len()))]
    pub async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let checkout = request.validate()?;

        let cart = self
            .storefront
            .create_cart(
                checkout
                    .lines
                    .iter()
                    .map(|l| CartLineInput {
                        merchandise_id: l.merchandise_id.clone(),
                        quantity: l.quantity,
                    })
                    .collect(),
                Some(&checkout.email.normalized()),
            )
            .await?;

        let customer_id = self.find_or_create_customer(&checkout).await?;

        let subtotal = cart.cost.subtotal;
        let quote = shipping::quote_price(checkout.country, subtotal)?;

        let draft = build_draft_order(&checkout, customer_id, &cart, &quote);
        let draft_order = self.admin.create_draft_order(&draft).await?;

        let shipping_price = Price::new(quote.cost, subtotal.currency_code);
        let total = Price::new(subtotal.amount + quote.cost, subtotal.currency_code);

        info!(
            draft_order_id = draft_order.id,
            zone = %quote.zone,
            free_shipping = quote.free,
            "Checkout created"
        );

        Ok(CheckoutOutcome {
            draft_order_id: draft_order.id,
            invoice_url: draft_order.invoice_url,
            cart_id: cart.id,
            checkout_url: cart.checkout_url,
            subtotal,
            shipping: shipping_price,
            total,
            free_shipping: quote.free,
            shopify_customer_id: customer_id,
        })
    }

    async fn find_or_create_customer(&self, checkout: &ValidCheckout) -> Result<i64, AdminError> {
        let email = checkout.email.normalized();

        if let Some(customer) = self.admin.search_customer_by_email(&email).await? {
            return Ok(customer.id);
        }

        let input = CustomerInput {
            email,
            first_name: checkout.address.first_name.clone(),
            last_name: checkout.address.last_name.clone(),
            phone: checkout.address.phone.clone(),
            tags: SOURCE_TAG.to_string(),
            verified_email: true,
            send_email_welcome: false,
        };

        Ok(self.admin.create_customer(&input).await?.id)
    }
}
