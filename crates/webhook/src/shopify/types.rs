//! Admin REST API response types.
//!
//! Only the fields the resolver reads are modeled; everything else in the
//! responses is ignored.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response envelope for `GET /orders/{id}/fulfillment_orders.json`.
#[derive(Debug, Deserialize)]
pub struct FulfillmentOrdersResponse {
    pub fulfillment_orders: Vec<FulfillmentOrder>,
}

/// A fulfillment order with its assigned location.
#[derive(Debug, Deserialize)]
pub struct FulfillmentOrder {
    #[serde(default)]
    pub assigned_location_id: Option<i64>,
    #[serde(default)]
    pub assigned_location: Option<AssignedLocation>,
}

/// Location details embedded in a fulfillment order.
#[derive(Debug, Deserialize)]
pub struct AssignedLocation {
    #[serde(default)]
    pub name: Option<String>,
}

/// Response envelope for `GET /locations/{id}.json`.
#[derive(Debug, Deserialize)]
pub struct LocationResponse {
    pub location: Location,
}

/// A store location.
#[derive(Debug, Deserialize)]
pub struct Location {
    pub name: String,
}

/// Response envelope for `GET /products/{id}/metafields.json`.
#[derive(Debug, Deserialize)]
pub struct MetafieldsResponse {
    pub metafields: Vec<Metafield>,
}

/// A product metafield.
#[derive(Debug, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    pub value: serde_json::Value,
}

impl Metafield {
    /// The metafield value as a plain string.
    ///
    /// Supplier metafields are stored as strings, but the API types the
    /// `value` field by metafield definition, so coerce defensively.
    #[must_use]
    pub fn value_string(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Response envelope for `GET /orders/{id}/risks.json`.
#[derive(Debug, Deserialize)]
pub struct OrderRisksResponse {
    pub risks: Vec<OrderRisk>,
}

/// A fraud-risk assessment attached to an order.
#[derive(Debug, Deserialize)]
pub struct OrderRisk {
    /// Risk score in [0.0, 1.0], serialized as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub score: Decimal,
    #[serde(default)]
    pub recommendation: Option<String>,
}
