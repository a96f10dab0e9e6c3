//! Product and shop conversion functions.

use crate::shopify::types::{
    PriceRange, Product, ProductConnection, ProductOption, ProductVariant, SelectedOption, Shop,
};

use super::super::wire::{Page, ProductNode, ShopNode, VariantNode};
use super::{convert_image, convert_money, convert_page_info};

pub fn convert_shop(shop: ShopNode) -> Shop {
    Shop {
        name: shop.name,
        description: shop.description.filter(|d| !d.is_empty()),
        primary_domain_url: shop.primary_domain.url,
        currency_code: shop.payment_settings.currency_code,
        ships_to_countries: shop.ships_to_countries,
    }
}

pub fn convert_product(product: ProductNode) -> Product {
    Product {
        id: product.id,
        handle: product.handle,
        title: product.title,
        description: product.description,
        description_html: product.description_html,
        available_for_sale: product.available_for_sale,
        product_type: product.product_type,
        vendor: product.vendor,
        tags: product.tags,
        price_range: PriceRange {
            min_variant_price: convert_money(product.price_range.min_variant_price),
            max_variant_price: convert_money(product.price_range.max_variant_price),
        },
        featured_image: product.featured_image.map(convert_image),
        images: product.images.nodes.into_iter().map(convert_image).collect(),
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.option_values.into_iter().map(|v| v.name).collect(),
            })
            .collect(),
        variants: product
            .variants
            .nodes
            .into_iter()
            .map(convert_variant)
            .collect(),
    }
}

fn convert_variant(variant: VariantNode) -> ProductVariant {
    ProductVariant {
        id: variant.id,
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        quantity_available: variant.quantity_available,
        sku: variant.sku.filter(|s| !s.is_empty()),
        price: convert_money(variant.price),
        compare_at_price: variant.compare_at_price.map(convert_money),
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
        image: variant.image.map(convert_image),
    }
}

pub fn convert_product_connection(page: Page<ProductNode>) -> ProductConnection {
    ProductConnection {
        products: page.nodes.into_iter().map(convert_product).collect(),
        page_info: convert_page_info(page.page_info),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jolananas_core::CurrencyCode;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_convert_product_from_wire_json() {
        let json = serde_json::json!({
            "id": "gid://shopify/Product/1",
            "handle": "ananas-victoria",
            "title": "Ananas Victoria",
            "description": "Petit et sucré",
            "descriptionHtml": "<p>Petit et sucré</p>",
            "availableForSale": true,
            "productType": "Fruit",
            "vendor": "JOLANANAS",
            "tags": ["frais"],
            "priceRange": {
                "minVariantPrice": { "amount": "6.5", "currencyCode": "EUR" },
                "maxVariantPrice": { "amount": "12.0", "currencyCode": "EUR" }
            },
            "featuredImage": null,
            "images": { "nodes": [] },
            "options": [{ "name": "Taille", "optionValues": [{ "name": "S" }, { "name": "L" }] }],
            "variants": { "nodes": [{
                "id": "gid://shopify/ProductVariant/11",
                "title": "S",
                "availableForSale": true,
                "quantityAvailable": 4,
                "sku": "",
                "price": { "amount": "6.5", "currencyCode": "EUR" },
                "compareAtPrice": null,
                "selectedOptions": [{ "name": "Taille", "value": "S" }],
                "image": null
            }] }
        });

        let node: ProductNode = serde_json::from_value(json).unwrap();
        let product = convert_product(node);

        assert_eq!(product.handle, "ananas-victoria");
        assert_eq!(product.options[0].values, vec!["S", "L"]);
        assert_eq!(product.variants[0].price.amount, Decimal::new(65, 1));
        assert_eq!(product.variants[0].price.currency_code, CurrencyCode::EUR);
        assert_eq!(product.variants[0].sku, None);
        assert_eq!(product.price_range.max_variant_price.amount, Decimal::new(12, 0));
    }
}
