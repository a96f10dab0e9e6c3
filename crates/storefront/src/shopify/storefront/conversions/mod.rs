//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod collections;
pub mod products;

pub use cart::{convert_cart, convert_user_errors};
pub use collections::{convert_collection, convert_collection_connection};
pub use products::{convert_product, convert_product_connection, convert_shop};

use jolananas_core::Price;

use crate::shopify::types::{Image, PageInfo};

use super::wire::{ImageNode, MoneyV2, PageInfoNode};

fn convert_money(money: MoneyV2) -> Price {
    Price::new(money.amount, money.currency_code)
}

fn convert_image(image: ImageNode) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    }
}

fn convert_page_info(page_info: PageInfoNode) -> PageInfo {
    PageInfo {
        has_next_page: page_info.has_next_page,
        end_cursor: page_info.end_cursor,
    }
}
