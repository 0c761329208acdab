//! Address verification gate.
//!
//! Optional external service that flags deliverability problems on an
//! order's shipping address. A `WARNING` verdict reroutes the order to
//! manual review instead of dispatching a purchase order.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::AddressCheckConfig;

/// Verdict from the address verification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressIssue {
    /// No deliverability concern.
    #[default]
    None,
    /// Address flagged for manual review.
    Warning,
}

impl AddressIssue {
    /// Map the service's verdict string. Anything other than `WARNING`
    /// (including verdicts added later) must not block order processing.
    fn from_verdict(verdict: &str) -> Self {
        if verdict == "WARNING" {
            Self::Warning
        } else {
            Self::None
        }
    }
}

/// Errors from the address verification service.
#[derive(Debug, Error)]
pub enum AddressCheckError {
    /// Request failed to send.
    #[error("Request error: {0}")]
    Request(String),

    /// Response could not be parsed.
    #[error("Response error: {0}")]
    Response(String),

    /// Service returned a non-success status.
    #[error("Address check returned {status}")]
    Status { status: u16 },
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    issue: Option<String>,
}

/// Client for the address verification service.
#[derive(Clone)]
pub struct AddressCheckClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl std::fmt::Debug for AddressCheckClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressCheckClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl AddressCheckClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &AddressCheckConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Look up the recorded address verdict for an order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn check_order(&self, order_id: i64) -> Result<AddressIssue, AddressCheckError> {
        let url = format!("{}/orders/{order_id}/address-check", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| AddressCheckError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AddressCheckError::Status {
                status: response.status().as_u16(),
            });
        }

        let result: CheckResponse = response
            .json()
            .await
            .map_err(|e| AddressCheckError::Response(e.to_string()))?;

        Ok(result
            .issue
            .as_deref()
            .map(AddressIssue::from_verdict)
            .unwrap_or_default())
    }
}
