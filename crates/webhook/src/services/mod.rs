//! External service clients: SMTP email and address verification.

pub mod address_check;
pub mod email;

pub use address_check::{AddressCheckClient, AddressIssue};
pub use email::EmailService;
