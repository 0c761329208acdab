//! Jarvis Core - Shared domain logic.
//!
//! This crate provides the types and decision rules used by the webhook
//! binary:
//! - `webhook` - Order-created webhook receiver and notification dispatcher
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no mail transport. Everything here can be exercised in unit
//! tests without a network.
//!
//! # Modules
//!
//! - [`types`] - Order payload types and the derived shipping/product details
//! - [`address`] - Unit-line address normalization
//! - [`rules`] - The purchase-order qualification rule set

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod rules;
pub mod types;

pub use types::*;
