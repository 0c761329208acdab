//! Order-created webhook receiver.
//!
//! Verifies Shopify webhook signatures, derives purchase-order details from
//! the order payload, resolves each line item's fulfillment warehouse and
//! supplier via the Admin REST API, and dispatches supplier purchase-order
//! emails (or review alerts) over SMTP.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
