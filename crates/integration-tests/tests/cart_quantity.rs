//! Debounced quantity commits against a mocked Storefront API.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jolananas_core::debounce::{Device, QuantityInput};
use jolananas_integration_tests::{cart_node, cart_payload, storefront_client};
use jolananas_storefront::services::cart_sync::{CartQuantityReconciler, Reconciled};

const CART: &str = "gid://shopify/Cart/abc";
const LINE: &str = "gid://shopify/CartLine/1";

fn change(previous: u32, requested: u32) -> QuantityInput {
    QuantityInput {
        previous,
        requested,
        input_len: requested.to_string().len(),
        device: Device::Desktop,
        keystroke_interval_ms: None,
    }
}

#[tokio::test]
async fn test_quantity_change_commits_update() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "UpdateCartLines",
            "variables": { "cartId": CART, "lines": [{ "id": LINE, "quantity": 3 }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_payload(
            "cartLinesUpdate",
            cart_node(CART, LINE, 3, "6.50"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = CartQuantityReconciler::new(storefront_client(&server));
    let result = reconciler.submit(CART, LINE, change(2, 3)).await.unwrap();

    match result {
        Reconciled::Committed(cart) => assert_eq!(cart.total_quantity, 3),
        Reconciled::Superseded => panic!("single change must commit"),
    }
    assert_eq!(reconciler.pending_count(), 0);
}

#[tokio::test]
async fn test_zero_removes_line() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "RemoveFromCart",
            "variables": { "lineIds": [LINE] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {
            "cartLinesRemove": {
                "cart": {
                    "id": CART,
                    "checkoutUrl": "https://jolananas.com/cart/c/abc",
                    "totalQuantity": 0,
                    "buyerIdentity": null,
                    "cost": {
                        "subtotalAmount": { "amount": "0.0", "currencyCode": "EUR" },
                        "totalAmount": { "amount": "0.0", "currencyCode": "EUR" },
                        "totalTaxAmount": null
                    },
                    "lines": { "nodes": [] }
                },
                "userErrors": []
            }
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = CartQuantityReconciler::new(storefront_client(&server));
    let result = reconciler.submit(CART, LINE, change(4, 0)).await.unwrap();

    match result {
        Reconciled::Committed(cart) => assert!(cart.lines.is_empty()),
        Reconciled::Superseded => panic!("removal must commit"),
    }
}

#[tokio::test]
async fn test_later_change_supersedes_pending_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "operationName": "UpdateCartLines" })))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "operationName": "RemoveFromCart" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_payload(
            "cartLinesRemove",
            cart_node(CART, "gid://shopify/CartLine/2", 1, "6.50"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = CartQuantityReconciler::new(storefront_client(&server));

    // The typed change waits before committing; the removal does not
    let (typed, removal) = tokio::join!(
        reconciler.submit(CART, LINE, change(1, 5)),
        reconciler.submit(CART, LINE, change(1, 0)),
    );

    assert!(matches!(typed.unwrap(), Reconciled::Superseded));
    assert!(matches!(removal.unwrap(), Reconciled::Committed(_)));
    assert_eq!(reconciler.pending_count(), 0);
}
