//! Shopify Admin REST API client.
//!
//! Thin wrapper over reqwest for the handful of endpoints the enrichment
//! phase needs: fulfillment orders, locations, product metafields, order
//! risks, and the order tag update.

use reqwest::Client;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::error::ShopifyError;
use super::types::{
    FulfillmentOrder, FulfillmentOrdersResponse, LocationResponse, Metafield, MetafieldsResponse,
    OrderRisksResponse,
};

/// Admin API client scoped to one store and API version.
#[derive(Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    api_token: SecretString,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Create a client for the given store and API version.
    #[must_use]
    pub fn new(store_url: &str, api_version: &str, api_token: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("https://{store_url}/admin/api/{api_version}"),
            api_token,
        }
    }

    /// Fetch the fulfillment orders for an order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_fulfillment_orders(
        &self,
        order_id: i64,
    ) -> Result<Vec<FulfillmentOrder>, ShopifyError> {
        let url = format!("{}/orders/{order_id}/fulfillment_orders.json", self.base_url);
        let resp: FulfillmentOrdersResponse = self.get_json(&url).await?;
        Ok(resp.fulfillment_orders)
    }

    /// Fetch a location's name by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(location_id = %location_id))]
    pub async fn get_location_name(&self, location_id: i64) -> Result<String, ShopifyError> {
        let url = format!("{}/locations/{location_id}.json", self.base_url);
        let resp: LocationResponse = self.get_json(&url).await?;
        Ok(resp.location.name)
    }

    /// Fetch a product's metafields.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product_metafields(
        &self,
        product_id: i64,
    ) -> Result<Vec<Metafield>, ShopifyError> {
        let url = format!("{}/products/{product_id}/metafields.json", self.base_url);
        let resp: MetafieldsResponse = self.get_json(&url).await?;
        Ok(resp.metafields)
    }

    /// Fetch the maximum fraud-risk score recorded for an order.
    ///
    /// Returns `Decimal::ZERO` when no assessments exist.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_max_risk_score(&self, order_id: i64) -> Result<Decimal, ShopifyError> {
        let url = format!("{}/orders/{order_id}/risks.json", self.base_url);
        let resp: OrderRisksResponse = self.get_json(&url).await?;
        Ok(resp
            .risks
            .iter()
            .map(|r| r.score)
            .max()
            .unwrap_or(Decimal::ZERO))
    }

    /// Append a tag to an order's tag list.
    ///
    /// Shopify stores tags as one comma-separated string, so the update must
    /// carry the existing tags or they are lost. No-op if the tag is already
    /// present.
    ///
    /// # Errors
    ///
    /// Returns error if the update request fails.
    #[instrument(skip(self, current_tags), fields(order_id = %order_id, tag = %tag))]
    pub async fn add_order_tag(
        &self,
        order_id: i64,
        current_tags: &str,
        tag: &str,
    ) -> Result<(), ShopifyError> {
        if current_tags.split(',').any(|t| t.trim() == tag) {
            debug!("Tag already present, skipping update");
            return Ok(());
        }

        let new_tags = if current_tags.trim().is_empty() {
            tag.to_string()
        } else {
            format!("{current_tags}, {tag}")
        };

        let url = format!("{}/orders/{order_id}.json", self.base_url);
        let body = serde_json::json!({
            "order": { "id": order_id, "tags": new_tags }
        });

        let response = self
            .client
            .put(&url)
            .header("X-Shopify-Access-Token", self.api_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ShopifyError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Status { status, body });
        }

        debug!("Order tag updated");

        Ok(())
    }

    /// Issue an authenticated GET and deserialize the JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ShopifyError> {
        let response = self
            .client
            .get(url)
            .header("X-Shopify-Access-Token", self.api_token.expose_secret())
            .send()
            .await
            .map_err(|e| ShopifyError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| ShopifyError::Response(e.to_string()))
    }
}
