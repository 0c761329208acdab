//! Application state shared across handlers.

use std::sync::Arc;

use jarvis_core::rules::RuleSet;

use crate::config::Config;
use crate::services::{AddressCheckClient, EmailService};
use crate::shopify::{AdminClient, WebhookVerifier};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    verifier: WebhookVerifier,
    shopify: AdminClient,
    email: EmailService,
    address_check: Option<AddressCheckClient>,
    rules: RuleSet,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: Config) -> Result<Self, lettre::transport::smtp::Error> {
        let verifier = WebhookVerifier::new(config.webhook_secret.clone());
        let shopify = AdminClient::new(
            &config.shopify.store_url,
            &config.shopify.api_version,
            config.shopify.api_token.clone(),
        );
        let email = EmailService::new(&config.email)?;
        let address_check = config.address_check.as_ref().map(AddressCheckClient::new);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                verifier,
                shopify,
                email,
                address_check,
                rules: RuleSet::default(),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn verifier(&self) -> &WebhookVerifier {
        &self.inner.verifier
    }

    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    pub fn address_check(&self) -> Option<&AddressCheckClient> {
        self.inner.address_check.as_ref()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.inner.rules
    }
}
