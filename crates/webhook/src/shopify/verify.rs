//! Shopify webhook signature verification.
//!
//! Shopify signs each delivery with HMAC-SHA256 over the raw request body
//! and sends the base64-encoded digest in the `X-Shopify-Hmac-Sha256`
//! header. Verification must run over the exact bytes received, before any
//! JSON parsing.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::debug;

use super::error::SignatureError;

/// Verifies webhook deliveries against the app's shared secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: SecretString,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl WebhookVerifier {
    /// Create a verifier from the webhook shared secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verify a delivery's signature against the raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns `SignatureError::Mismatch` if the signature does not match.
    pub fn verify(&self, body: &[u8], signature: &str) -> Result<(), SignatureError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        mac.update(body);

        let expected = BASE64.encode(mac.finalize().into_bytes());

        // Constant-time comparison
        if !constant_time_compare(&expected, signature) {
            return Err(SignatureError::Mismatch);
        }

        debug!("Webhook signature verified");

        Ok(())
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
