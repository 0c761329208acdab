//! Details derived from an order for the purchase-order email.
//!
//! Both types are built once per webhook invocation and never mutated
//! afterwards.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::address::normalize_unit_line;

use super::order::{LineItem, Order};

/// Shipping block of the purchase-order email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingDetails {
    /// Recipient display name ("First Last").
    pub name: String,
    /// Single-line destination address, with the secondary line
    /// canonicalized to "Unit N" form when present.
    pub address: String,
    /// Contact phone number, if the address carries one.
    pub contact_number: String,
    /// Purchase-order number (the order number).
    pub po_number: String,
}

impl ShippingDetails {
    /// Build the shipping details for an order.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        let addr = &order.shipping_address;

        let name = [addr.first_name.as_deref(), addr.last_name.as_deref()]
            .iter()
            .filter_map(|part| *part)
            .collect::<Vec<_>>()
            .join(" ");

        let unit = addr
            .address2
            .as_deref()
            .map(normalize_unit_line)
            .unwrap_or_default();

        let mut address = addr.address1.clone();
        if !unit.trim().is_empty() {
            address.push_str(", ");
            address.push_str(unit.trim());
        }
        address.push_str(&format!(
            ", {}, {} {} {}",
            addr.city,
            addr.province_code.as_deref().unwrap_or_default(),
            addr.zip,
            addr.country
        ));

        Self {
            name,
            address,
            contact_number: addr.phone.clone().unwrap_or_default(),
            po_number: order.order_number.to_string(),
        }
    }
}

/// One row of the itemized product list in the purchase-order email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetail {
    pub sku: String,
    /// Title with the variant appended ("Title - Variant").
    pub title: String,
    pub quantity: u32,
    /// `price * quantity - total_discount`.
    pub net_price: Decimal,
}

impl ProductDetail {
    /// Build the detail row for a line item.
    #[must_use]
    pub fn from_line_item(item: &LineItem) -> Self {
        let title = item.variant_title.as_deref().map_or_else(
            || item.title.clone(),
            |variant| format!("{} - {variant}", item.title),
        );

        Self {
            sku: item.sku.clone().unwrap_or_default(),
            title,
            quantity: item.quantity,
            net_price: item.price * Decimal::from(item.quantity) - item.total_discount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::order::ShippingAddress;

    fn order_with_address(address2: Option<&str>) -> Order {
        Order {
            id: 1,
            order_number: 1042,
            name: "#1042".to_string(),
            tags: String::new(),
            shipping_address: ShippingAddress {
                first_name: Some("Dana".to_string()),
                last_name: Some("Roy".to_string()),
                address1: "450 Front St W".to_string(),
                address2: address2.map(String::from),
                city: "Toronto".to_string(),
                province_code: Some("ON".to_string()),
                zip: "M5V 0V6".to_string(),
                country: "Canada".to_string(),
                phone: Some("+1 416 555 0101".to_string()),
            },
            line_items: vec![],
            shipping_lines: vec![],
        }
    }

    #[test]
    fn test_shipping_details_without_unit_line() {
        let details = ShippingDetails::from_order(&order_with_address(None));
        assert_eq!(details.name, "Dana Roy");
        assert_eq!(details.address, "450 Front St W, Toronto, ON M5V 0V6 Canada");
        assert_eq!(details.contact_number, "+1 416 555 0101");
        assert_eq!(details.po_number, "1042");
    }

    #[test]
    fn test_shipping_details_normalizes_unit_line() {
        let details = ShippingDetails::from_order(&order_with_address(Some("apt204")));
        assert_eq!(
            details.address,
            "450 Front St W, Unit 204, Toronto, ON M5V 0V6 Canada"
        );
    }

    #[test]
    fn test_shipping_details_blank_unit_line_is_omitted() {
        let details = ShippingDetails::from_order(&order_with_address(Some("  ")));
        assert_eq!(details.address, "450 Front St W, Toronto, ON M5V 0V6 Canada");
    }

    #[test]
    fn test_product_detail_net_price() {
        let item = LineItem {
            sku: Some("BB-3321".to_string()),
            title: "Portable Speaker".to_string(),
            variant_title: Some("Black".to_string()),
            quantity: 2,
            price: "129.99".parse().expect("decimal"),
            total_discount: "10.00".parse().expect("decimal"),
            product_id: Some(111),
            variant_id: Some(222),
            vendor: Some("Best Buy".to_string()),
        };

        let detail = ProductDetail::from_line_item(&item);
        assert_eq!(detail.title, "Portable Speaker - Black");
        assert_eq!(detail.net_price, "249.98".parse().expect("decimal"));
    }

    #[test]
    fn test_product_detail_without_variant() {
        let item = LineItem {
            sku: None,
            title: "Gift Card".to_string(),
            variant_title: None,
            quantity: 1,
            price: "25.00".parse().expect("decimal"),
            total_discount: Decimal::ZERO,
            product_id: None,
            variant_id: None,
            vendor: None,
        };

        let detail = ProductDetail::from_line_item(&item);
        assert_eq!(detail.title, "Gift Card");
        assert_eq!(detail.sku, "");
        assert_eq!(detail.net_price, "25.00".parse().expect("decimal"));
    }
}
