//! Order payload types for the Shopify order-created webhook.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order as delivered by the `orders/create` webhook.
///
/// Only the fields the decision pipeline reads are modeled; unknown fields
/// in the payload are ignored during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Shopify order ID.
    pub id: i64,
    /// Sequential order number (used as the PO number).
    pub order_number: i64,
    /// Display name (e.g., "#1001").
    #[serde(default)]
    pub name: String,
    /// Comma-separated tag list as stored on the order.
    #[serde(default)]
    pub tags: String,
    /// Destination address.
    pub shipping_address: ShippingAddress,
    /// Purchased items.
    pub line_items: Vec<LineItem>,
    /// Selected shipping rates (used as a warehouse fallback).
    #[serde(default)]
    pub shipping_lines: Vec<ShippingLine>,
}

impl Order {
    /// Whether the order's tag list already contains `tag`.
    ///
    /// Tags are compared case-sensitively after trimming, matching how the
    /// platform stores them.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.split(',').any(|t| t.trim() == tag)
    }
}

/// Shipping address block of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Primary street line.
    #[serde(default)]
    pub address1: String,
    /// Free-text secondary line (unit/suite/apartment).
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default)]
    pub zip: String,
    /// Full country name (e.g., "Canada"), as sent by the webhook.
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A purchased line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub sku: Option<String>,
    pub title: String,
    #[serde(default)]
    pub variant_title: Option<String>,
    pub quantity: u32,
    /// Unit price. Sent as a decimal string on the wire.
    pub price: Decimal,
    /// Total discount applied across the item's quantity.
    #[serde(default)]
    pub total_discount: Decimal,
    /// Product ID; absent for custom items.
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub variant_id: Option<i64>,
    /// Vendor name, when the product has one.
    #[serde(default)]
    pub vendor: Option<String>,
}

/// A shipping line on the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingLine {
    #[serde(default)]
    pub title: String,
}
