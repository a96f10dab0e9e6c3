//! Cart type conversion functions.

use crate::shopify::types::{Cart, CartCost, CartLine, CartMerchandise};

use super::super::wire::{CartLineNode, CartNode, UserErrorNode};
use super::{convert_image, convert_money};

pub fn convert_cart(cart: CartNode) -> Cart {
    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url,
        total_quantity: cart.total_quantity,
        buyer_email: cart.buyer_identity.and_then(|b| b.email),
        cost: CartCost {
            subtotal: convert_money(cart.cost.subtotal_amount),
            total: convert_money(cart.cost.total_amount),
            total_tax: cart.cost.total_tax_amount.map(convert_money),
        },
        lines: cart.lines.nodes.into_iter().map(convert_cart_line).collect(),
    }
}

fn convert_cart_line(line: CartLineNode) -> CartLine {
    let merchandise = line.merchandise;
    CartLine {
        id: line.id,
        quantity: line.quantity,
        merchandise: CartMerchandise {
            id: merchandise.id,
            title: merchandise.title,
            price: convert_money(merchandise.price),
            image: merchandise.image.map(convert_image),
            product_handle: merchandise.product.handle,
            product_title: merchandise.product.title,
        },
        total: convert_money(line.cost.total_amount),
    }
}

/// Join mutation user errors into one message (`"field.path: message; ..."`).
pub fn convert_user_errors(errors: Vec<UserErrorNode>) -> String {
    errors
        .into_iter()
        .map(|e| match e.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
            _ => e.message,
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_convert_cart_from_wire_json() {
        let json = serde_json::json!({
            "id": "gid://shopify/Cart/abc",
            "checkoutUrl": "https://jolananas.com/cart/c/abc",
            "totalQuantity": 3,
            "buyerIdentity": { "email": "client@jolananas.com" },
            "cost": {
                "subtotalAmount": { "amount": "19.5", "currencyCode": "EUR" },
                "totalAmount": { "amount": "19.5", "currencyCode": "EUR" },
                "totalTaxAmount": null
            },
            "lines": { "nodes": [{
                "id": "gid://shopify/CartLine/1",
                "quantity": 3,
                "cost": { "totalAmount": { "amount": "19.5", "currencyCode": "EUR" } },
                "merchandise": {
                    "id": "gid://shopify/ProductVariant/11",
                    "title": "S",
                    "price": { "amount": "6.5", "currencyCode": "EUR" },
                    "image": null,
                    "product": { "handle": "ananas-victoria", "title": "Ananas Victoria" }
                }
            }] }
        });

        let cart = convert_cart(serde_json::from_value(json).unwrap());

        assert_eq!(cart.total_quantity, 3);
        assert_eq!(cart.buyer_email.as_deref(), Some("client@jolananas.com"));
        assert_eq!(cart.cost.subtotal.amount, Decimal::new(195, 1));
        assert_eq!(cart.line("gid://shopify/CartLine/1").unwrap().quantity, 3);
        assert!(cart.line("missing").is_none());
    }

    #[test]
    fn test_convert_user_errors_joins_with_field_path() {
        let errors = vec![
            UserErrorNode {
                field: Some(vec!["lines".to_string(), "0".to_string(), "quantity".to_string()]),
                message: "must be positive".to_string(),
            },
            UserErrorNode {
                field: None,
                message: "cart is locked".to_string(),
            },
        ];
        assert_eq!(
            convert_user_errors(errors),
            "lines.0.quantity: must be positive; cart is locked"
        );
    }
}
