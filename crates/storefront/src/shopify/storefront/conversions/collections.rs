//! Collection type conversion functions.

use crate::shopify::types::{Collection, CollectionConnection, PageInfo};

use super::super::wire::{CollectionNode, Page};
use super::{convert_image, convert_page_info, convert_product};

pub fn convert_collection(collection: CollectionNode) -> Collection {
    let (products, products_page_info) = collection.products.map_or_else(
        || (Vec::new(), PageInfo::default()),
        |page| {
            (
                page.nodes.into_iter().map(convert_product).collect(),
                convert_page_info(page.page_info),
            )
        },
    );

    Collection {
        id: collection.id,
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        image: collection.image.map(convert_image),
        products,
        products_page_info,
    }
}

pub fn convert_collection_connection(page: Page<CollectionNode>) -> CollectionConnection {
    CollectionConnection {
        collections: page.nodes.into_iter().map(convert_collection).collect(),
        page_info: convert_page_info(page.page_info),
    }
}
