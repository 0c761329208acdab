//! Shopify webhook verification and Admin REST API client.

pub mod client;
pub mod error;
pub mod types;
pub mod verify;

pub use client::AdminClient;
pub use error::ShopifyError;
pub use verify::WebhookVerifier;
