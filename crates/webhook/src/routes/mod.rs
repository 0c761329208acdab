//! HTTP route handlers.

pub mod webhook;

use axum::Router;
use axum::routing::post;

use crate::state::AppState;

/// Build the webhook routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/webhook/orders/create",
        post(webhook::handle_order_created),
    )
}
