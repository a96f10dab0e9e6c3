//! Request variables and response shapes for the Storefront GraphQL documents.
//!
//! These mirror the selections in `queries.rs` field for field. Domain types
//! are produced from them in `conversions`.

use jolananas_core::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shopify::types::{CartLineInput, CartLineUpdateInput};

// =============================================================================
// Variables
// =============================================================================

#[derive(Debug, Serialize)]
pub struct NoVariables {}

#[derive(Debug, Serialize)]
pub struct HandleVariables {
    pub handle: String,
}

#[derive(Debug, Serialize)]
pub struct ProductsVariables {
    pub first: i64,
    pub after: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CollectionVariables {
    pub handle: String,
    pub first: i64,
    pub after: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PageVariables {
    pub first: i64,
    pub after: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateCartVariables {
    pub input: CartInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInput {
    pub lines: Vec<CartLineInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_identity: Option<BuyerIdentityInput>,
}

#[derive(Debug, Serialize)]
pub struct BuyerIdentityInput {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartIdVariables {
    pub cart_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLinesVariables {
    pub cart_id: String,
    pub lines: Vec<CartLineInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinesVariables {
    pub cart_id: String,
    pub lines: Vec<CartLineUpdateInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLinesVariables {
    pub cart_id: String,
    pub line_ids: Vec<String>,
}

// =============================================================================
// Shared shapes
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    pub amount: Decimal,
    pub currency_code: CurrencyCode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoNode {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page_info: PageInfoNode,
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Shop
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ShopData {
    pub shop: ShopNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopNode {
    pub name: String,
    pub description: Option<String>,
    pub primary_domain: UrlNode,
    pub payment_settings: PaymentSettingsNode,
    #[serde(default)]
    pub ships_to_countries: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UrlNode {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettingsNode {
    pub currency_code: String,
}

// =============================================================================
// Products and collections
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub product: Option<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Page<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionData {
    pub collection: Option<CollectionNode>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionsData {
    pub collections: Page<CollectionNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    pub available_for_sale: bool,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price_range: PriceRangeNode,
    pub featured_image: Option<ImageNode>,
    pub images: Nodes<ImageNode>,
    #[serde(default)]
    pub options: Vec<OptionNode>,
    pub variants: Nodes<VariantNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeNode {
    pub min_variant_price: MoneyV2,
    pub max_variant_price: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionNode {
    pub name: String,
    #[serde(default)]
    pub option_values: Vec<NamedNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedNode {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub quantity_available: Option<i64>,
    pub sku: Option<String>,
    pub price: MoneyV2,
    pub compare_at_price: Option<MoneyV2>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOptionNode>,
    pub image: Option<ImageNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionNode {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct CollectionNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<ImageNode>,
    pub products: Option<Page<ProductNode>>,
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CartData {
    pub cart: Option<CartNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreateData {
    pub cart_create: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddData {
    pub cart_lines_add: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesUpdateData {
    pub cart_lines_update: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesRemoveData {
    pub cart_lines_remove: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<UserErrorNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: u32,
    pub buyer_identity: Option<BuyerIdentityNode>,
    pub cost: CartCostNode,
    pub lines: Nodes<CartLineNode>,
}

#[derive(Debug, Deserialize)]
pub struct BuyerIdentityNode {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostNode {
    pub subtotal_amount: MoneyV2,
    pub total_amount: MoneyV2,
    pub total_tax_amount: Option<MoneyV2>,
}

#[derive(Debug, Deserialize)]
pub struct CartLineNode {
    pub id: String,
    pub quantity: u32,
    pub cost: CartLineCostNode,
    pub merchandise: MerchandiseNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCostNode {
    pub total_amount: MoneyV2,
}

#[derive(Debug, Deserialize)]
pub struct MerchandiseNode {
    pub id: String,
    pub title: String,
    pub price: MoneyV2,
    pub image: Option<ImageNode>,
    pub product: MerchandiseProductNode,
}

#[derive(Debug, Deserialize)]
pub struct MerchandiseProductNode {
    pub handle: String,
    pub title: String,
}
