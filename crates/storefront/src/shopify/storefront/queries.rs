//! GraphQL documents for the Shopify Storefront API.
//!
//! Fragments are spliced in with `concat!` so every document only declares
//! the fragments it spreads (unused fragments are a validation error).

macro_rules! image_fields {
    () => {
        "
fragment ImageFields on Image {
  url
  altText
  width
  height
}
"
    };
}

macro_rules! product_fields {
    () => {
        "
fragment ProductFields on Product {
  id
  handle
  title
  description
  descriptionHtml
  availableForSale
  productType
  vendor
  tags
  priceRange {
    minVariantPrice { amount currencyCode }
    maxVariantPrice { amount currencyCode }
  }
  featuredImage { ...ImageFields }
  images(first: 10) { nodes { ...ImageFields } }
  options { name optionValues { name } }
  variants(first: 50) {
    nodes {
      id
      title
      availableForSale
      quantityAvailable
      sku
      price { amount currencyCode }
      compareAtPrice { amount currencyCode }
      selectedOptions { name value }
      image { ...ImageFields }
    }
  }
}
"
    };
}

macro_rules! cart_fields {
    () => {
        "
fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  buyerIdentity { email }
  cost {
    subtotalAmount { amount currencyCode }
    totalAmount { amount currencyCode }
    totalTaxAmount { amount currencyCode }
  }
  lines(first: 100) {
    nodes {
      id
      quantity
      cost { totalAmount { amount currencyCode } }
      merchandise {
        ... on ProductVariant {
          id
          title
          price { amount currencyCode }
          image { ...ImageFields }
          product { handle title }
        }
      }
    }
  }
}
"
    };
}

pub const GET_SHOP: &str = "
query GetShop {
  shop {
    name
    description
    primaryDomain { url }
    paymentSettings { currencyCode }
    shipsToCountries
  }
}
";

pub const GET_PRODUCT_BY_HANDLE: &str = concat!(
    "
query GetProductByHandle($handle: String!) {
  product(handle: $handle) { ...ProductFields }
}
",
    product_fields!(),
    image_fields!()
);

pub const GET_PRODUCTS: &str = concat!(
    "
query GetProducts($first: Int!, $after: String, $query: String) {
  products(first: $first, after: $after, query: $query) {
    pageInfo { hasNextPage endCursor }
    nodes { ...ProductFields }
  }
}
",
    product_fields!(),
    image_fields!()
);

pub const GET_COLLECTION_BY_HANDLE: &str = concat!(
    "
query GetCollectionByHandle($handle: String!, $first: Int!, $after: String) {
  collection(handle: $handle) {
    id
    handle
    title
    description
    image { ...ImageFields }
    products(first: $first, after: $after) {
      pageInfo { hasNextPage endCursor }
      nodes { ...ProductFields }
    }
  }
}
",
    product_fields!(),
    image_fields!()
);

pub const GET_COLLECTIONS: &str = concat!(
    "
query GetCollections($first: Int!, $after: String) {
  collections(first: $first, after: $after) {
    pageInfo { hasNextPage endCursor }
    nodes {
      id
      handle
      title
      description
      image { ...ImageFields }
    }
  }
}
",
    image_fields!()
);

pub const CREATE_CART: &str = concat!(
    "
mutation CreateCart($input: CartInput!) {
  cartCreate(input: $input) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
",
    cart_fields!(),
    image_fields!()
);

pub const GET_CART: &str = concat!(
    "
query GetCart($cartId: ID!) {
  cart(id: $cartId) { ...CartFields }
}
",
    cart_fields!(),
    image_fields!()
);

pub const ADD_TO_CART: &str = concat!(
    "
mutation AddToCart($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
",
    cart_fields!(),
    image_fields!()
);

pub const UPDATE_CART_LINES: &str = concat!(
    "
mutation UpdateCartLines($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
",
    cart_fields!(),
    image_fields!()
);

pub const REMOVE_FROM_CART: &str = concat!(
    "
mutation RemoveFromCart($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
",
    cart_fields!(),
    image_fields!()
);
