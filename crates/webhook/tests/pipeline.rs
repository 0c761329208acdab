//! Decision-level tests for the order pipeline.
//!
//! Feeds parsed order payloads through the derivation, qualification, and
//! routing steps without any network calls.

use jarvis_core::rules::{ItemResolution, Qualification, RuleSet};
use jarvis_core::{Order, ProductDetail, ShippingDetails};
use rust_decimal::Decimal;

use jarvis_webhook::pipeline::{ORDERED_TAG, Route, decide_route};
use jarvis_webhook::services::AddressIssue;

fn canadian_order() -> Order {
    serde_json::from_str(
        r##"{
            "id": 5678901234567,
            "order_number": 1042,
            "name": "#1042",
            "tags": "vip, repeat-customer",
            "shipping_address": {
                "first_name": "Dana",
                "last_name": "Roy",
                "address1": "450 Front St W",
                "address2": "apt204",
                "city": "Toronto",
                "province_code": "ON",
                "zip": "M5V 0V6",
                "country": "Canada",
                "phone": "+1 416 555 0101"
            },
            "line_items": [
                {
                    "sku": "BB-3321",
                    "title": "Portable Speaker",
                    "variant_title": "Black",
                    "quantity": 2,
                    "price": "129.99",
                    "total_discount": "10.00",
                    "product_id": 111,
                    "vendor": "Best Buy"
                }
            ],
            "shipping_lines": [{"title": "Standard"}]
        }"##,
    )
    .expect("valid order payload")
}

fn dropship(supplier: &str) -> ItemResolution {
    ItemResolution {
        warehouse: "A - Dropship (Abbey Lane)".to_string(),
        supplier: supplier.to_string(),
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal")
}

#[test]
fn qualifying_order_routes_to_standard_dispatch() {
    let order = canadian_order();
    let rules = RuleSet::default();

    let qualification = rules.qualify(&order.shipping_address.country, &[dropship("Best Buy")]);
    assert_eq!(qualification.supplier(), Some("Best Buy"));

    let route = decide_route(dec("0.1"), AddressIssue::None);
    assert_eq!(route, Route::Standard);
}

#[test]
fn high_risk_score_diverts_qualified_order() {
    let order = canadian_order();
    let rules = RuleSet::default();

    let qualification = rules.qualify(&order.shipping_address.country, &[dropship("Best Buy")]);
    assert!(qualification.supplier().is_some());

    // Qualified, but the risk gate wins.
    let route = decide_route(dec("0.73"), AddressIssue::None);
    assert_eq!(route, Route::Risk);
}

#[test]
fn address_warning_diverts_qualified_order() {
    let route = decide_route(dec("0.1"), AddressIssue::Warning);
    assert_eq!(route, Route::Warning);
}

#[test]
fn derived_details_match_payload() {
    let order = canadian_order();

    let shipping = ShippingDetails::from_order(&order);
    assert_eq!(shipping.name, "Dana Roy");
    assert_eq!(
        shipping.address,
        "450 Front St W, Unit 204, Toronto, ON M5V 0V6 Canada"
    );
    assert_eq!(shipping.po_number, "1042");

    let products: Vec<ProductDetail> = order
        .line_items
        .iter()
        .map(ProductDetail::from_line_item)
        .collect();
    assert_eq!(products.len(), 1);
    let first = products.first().expect("one product");
    assert_eq!(first.title, "Portable Speaker - Black");
    assert_eq!(first.net_price, dec("249.98"));
}

#[test]
fn sentinel_tag_marks_order_as_processed() {
    let mut order = canadian_order();
    assert!(!order.has_tag(ORDERED_TAG));

    order.tags = format!("{}, {ORDERED_TAG}", order.tags);
    assert!(order.has_tag(ORDERED_TAG));
}

#[test]
fn unknown_warehouse_sentinel_never_qualifies() {
    let order = canadian_order();
    let rules = RuleSet::default();

    let items = [ItemResolution {
        warehouse: "Unknown Warehouse".to_string(),
        supplier: "Best Buy".to_string(),
    }];
    let qualification = rules.qualify(&order.shipping_address.country, &items);
    assert!(matches!(qualification, Qualification::Rejected(_)));
}
