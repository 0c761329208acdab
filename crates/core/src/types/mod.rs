//! Core types for Jarvis.
//!
//! Payload types mirror the fields of the order-created webhook that the
//! pipeline actually consumes; everything else in the payload is ignored.

pub mod derived;
pub mod order;

pub use derived::{ProductDetail, ShippingDetails};
pub use order::{LineItem, Order, ShippingAddress, ShippingLine};
