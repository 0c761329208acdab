//! Error types for Shopify Admin API interactions.

use thiserror::Error;

/// Errors from the Shopify Admin API client.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Request failed to send (network, DNS, TLS).
    #[error("Request error: {0}")]
    Request(String),

    /// Response body could not be read or parsed.
    #[error("Response error: {0}")]
    Response(String),

    /// Shopify returned a non-success status.
    #[error("Shopify API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Signature verification failure.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The computed digest did not match the provided signature.
    #[error("Signature mismatch")]
    Mismatch,

    /// The secret could not be used as an HMAC key.
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}
