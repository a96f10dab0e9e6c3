//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw wire
//! shapes. Money is carried as [`Price`] so amounts keep decimal precision.

use jolananas_core::Price;
use serde::{Deserialize, Serialize};

// =============================================================================
// Shop
// =============================================================================

/// Public shop information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    /// Shop name.
    pub name: String,
    /// Shop description.
    pub description: Option<String>,
    /// Primary domain URL.
    pub primary_domain_url: String,
    /// Currency the shop sells in.
    pub currency_code: String,
    /// Country codes the shop ships to.
    pub ships_to_countries: Vec<String>,
}

// =============================================================================
// Image Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Price range for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Price,
    /// Maximum price among all variants.
    pub max_variant_price: Price,
}

/// Selected option on a product variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Taille").
    pub name: String,
    /// Selected value (e.g., "L").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name.
    pub name: String,
    /// Available values.
    pub values: Vec<String>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant GID.
    pub id: String,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Quantity available (if inventory tracking enabled).
    pub quantity_available: Option<i64>,
    /// SKU code.
    pub sku: Option<String>,
    /// Current price.
    pub price: Price,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Price>,
    /// Selected options for this variant.
    pub selected_options: Vec<SelectedOption>,
    /// Variant image.
    pub image: Option<Image>,
}

/// A product in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product GID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    /// Product type/category.
    pub product_type: String,
    /// Vendor name.
    pub vendor: String,
    /// Product tags.
    pub tags: Vec<String>,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// Featured image.
    pub featured_image: Option<Image>,
    /// All product images.
    pub images: Vec<Image>,
    /// Product options.
    pub options: Vec<ProductOption>,
    /// Product variants.
    pub variants: Vec<ProductVariant>,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Collection GID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Collection image.
    pub image: Option<Image>,
    /// Products in this collection (one page).
    pub products: Vec<Product>,
    /// Pagination for `products`.
    pub products_page_info: PageInfo,
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Pagination information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Cursor for the last item.
    pub end_cursor: Option<String>,
}

/// Paginated list of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConnection {
    /// Products in this page.
    pub products: Vec<Product>,
    /// Pagination info.
    pub page_info: PageInfo,
}

/// Paginated list of collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConnection {
    /// Collections in this page (without products).
    pub collections: Vec<Collection>,
    /// Pagination info.
    pub page_info: PageInfo,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Merchandise in a cart line (simplified product variant info).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMerchandise {
    /// Variant GID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// Current unit price.
    pub price: Price,
    /// Variant image.
    pub image: Option<Image>,
    /// Parent product handle.
    pub product_handle: String,
    /// Parent product title.
    pub product_title: String,
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart line GID.
    pub id: String,
    /// Quantity.
    pub quantity: u32,
    /// Product variant.
    pub merchandise: CartMerchandise,
    /// Line total after discounts.
    pub total: Price,
}

/// Cart cost summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartCost {
    /// Subtotal after discounts, before shipping.
    pub subtotal: Price,
    /// Total amount.
    pub total: Price,
    /// Total tax amount.
    pub total_tax: Option<Price>,
}

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Cart GID.
    pub id: String,
    /// Shopify-hosted checkout URL.
    pub checkout_url: String,
    /// Total item quantity.
    pub total_quantity: u32,
    /// Buyer email, if set.
    pub buyer_email: Option<String>,
    /// Cart cost summary.
    pub cost: CartCost,
    /// Cart lines.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Find a line by its id.
    #[must_use]
    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }
}

/// Input for adding a line to cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Product variant GID.
    pub merchandise_id: String,
    /// Quantity to add.
    pub quantity: u32,
}

/// Input for updating a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineUpdateInput {
    /// Cart line GID.
    pub id: String,
    /// New quantity.
    pub quantity: u32,
}
