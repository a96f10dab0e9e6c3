//! Cache types for Storefront API responses.

use crate::shopify::types::{Collection, CollectionConnection, Product, ProductConnection, Shop};

/// Cache key prefix for single products, used for targeted invalidation.
pub const PRODUCT_PREFIX: &str = "product:";

pub fn shop_key() -> String {
    "shop".to_string()
}

pub fn product_key(handle: &str) -> String {
    format!("{PRODUCT_PREFIX}{handle}")
}

pub fn products_key(first: i64, after: Option<&str>) -> String {
    format!("products:{first}:{}", after.unwrap_or(""))
}

pub fn collection_key(handle: &str, first: i64, after: Option<&str>) -> String {
    format!("collection:{handle}:{first}:{}", after.unwrap_or(""))
}

pub fn collections_key(first: i64, after: Option<&str>) -> String {
    format!("collections:{first}:{}", after.unwrap_or(""))
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Shop(Box<Shop>),
    Product(Box<Product>),
    Products(ProductConnection),
    Collection(Box<Collection>),
    Collections(CollectionConnection),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys_distinguish_pages() {
        assert_eq!(product_key("ananas"), "product:ananas");
        assert_ne!(products_key(12, None), products_key(12, Some("abc")));
        assert_ne!(products_key(12, None), products_key(24, None));
        assert_eq!(
            collection_key("fruits", 12, Some("c1")),
            "collection:fruits:12:c1"
        );
        assert_eq!(collections_key(20, None), "collections:20:");
    }
}
