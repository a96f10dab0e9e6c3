//! Admin REST API request and response types.
//!
//! Field names follow the REST resources (snake case), so no renaming is
//! needed. Money fields are decimal strings on the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Customers
// =============================================================================

/// A Shopify customer as returned by the Admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCustomer {
    pub id: i64,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub orders_count: i64,
    pub total_spent: Option<Decimal>,
    #[serde(default)]
    pub tags: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for `POST /customers.json`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub tags: String,
    pub verified_email: bool,
    pub send_email_welcome: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct CustomerEnvelope<'a> {
    pub customer: &'a CustomerInput,
}

#[derive(Debug, Deserialize)]
pub(super) struct CustomerResponse {
    pub customer: AdminCustomer,
}

#[derive(Debug, Deserialize)]
pub(super) struct CustomersResponse {
    #[serde(default)]
    pub customers: Vec<AdminCustomer>,
}

// =============================================================================
// Orders
// =============================================================================

/// A past order as listed for a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrder {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub total_price: Decimal,
    pub currency: String,
    #[serde(default)]
    pub line_items: Vec<AdminOrderLineItem>,
}

/// A line of a past order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrderLineItem {
    pub title: String,
    pub quantity: i64,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub(super) struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<AdminOrder>,
}

// =============================================================================
// Draft orders
// =============================================================================

/// Input for `POST /draft_orders.json`.
#[derive(Debug, Clone, Serialize)]
pub struct DraftOrderInput {
    pub line_items: Vec<DraftOrderLineItem>,
    pub customer: DraftOrderCustomer,
    pub shipping_address: DraftOrderAddress,
    pub billing_address: DraftOrderAddress,
    pub shipping_line: ShippingLine,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub note_attributes: Vec<NoteAttribute>,
    pub email: String,
    pub tags: String,
    pub currency: String,
    pub use_customer_default_address: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftOrderLineItem {
    pub variant_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftOrderCustomer {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftOrderAddress {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub address1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    pub zip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShippingLine {
    pub title: String,
    pub price: Decimal,
    pub code: String,
    pub custom: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteAttribute {
    pub name: String,
    pub value: String,
}

/// The created draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrder {
    pub id: i64,
    pub name: Option<String>,
    pub status: Option<String>,
    pub invoice_url: Option<String>,
    pub total_price: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DraftOrderEnvelope<'a> {
    pub draft_order: &'a DraftOrderInput,
}

#[derive(Debug, Deserialize)]
pub(super) struct DraftOrderResponse {
    pub draft_order: DraftOrder,
}
