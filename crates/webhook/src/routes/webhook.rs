//! Order-created webhook handler.
//!
//! Verification runs over the raw body bytes before parsing, and the
//! delivery is acknowledged as soon as the payload parses. Everything that
//! talks to the Admin API or SMTP happens in a detached task so a slow
//! supplier email can never push the response past Shopify's delivery
//! timeout.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use jarvis_core::Order;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::pipeline;
use crate::state::AppState;

/// Signature header attached to every Shopify webhook delivery.
const HMAC_HEADER: &str = "X-Shopify-Hmac-Sha256";

/// Handle a Shopify `orders/create` delivery.
///
/// # Errors
///
/// Returns 401 when the signature header is missing or does not match, and
/// 400 when an authenticated payload is not a parseable order.
#[instrument(skip_all)]
pub async fn handle_order_created(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let signature = headers
        .get(HMAC_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Invalid HMAC".to_string()))?;

    state
        .verifier()
        .verify(&body, signature)
        .map_err(|_| AppError::Unauthorized("Invalid HMAC".to_string()))?;

    // Authenticated but unparseable payloads are the sender's problem; 400
    // stops Shopify from redelivering something we can never process.
    let order: Order = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid order payload: {e}")))?;

    info!(order_id = %order.id, order_name = %order.name, "Order webhook received");

    pipeline::spawn_processing(state, order);

    Ok("Order webhook received")
}
