//! Email service for supplier purchase orders and review alerts.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use askama::Template;
use jarvis_core::{ProductDetail, ShippingDetails};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// HTML template for the supplier purchase-order email.
#[derive(Template)]
#[template(path = "email/purchase_order.html")]
struct PurchaseOrderEmailHtml<'a> {
    supplier: &'a str,
    account_number: &'a str,
    shipping: &'a ShippingDetails,
    products: &'a [ProductDetail],
}

/// Plain text template for the supplier purchase-order email.
#[derive(Template)]
#[template(path = "email/purchase_order.txt")]
struct PurchaseOrderEmailText<'a> {
    supplier: &'a str,
    account_number: &'a str,
    shipping: &'a ShippingDetails,
    products: &'a [ProductDetail],
}

/// HTML template for the high-risk review email.
#[derive(Template)]
#[template(path = "email/risk_alert.html")]
struct RiskAlertEmailHtml<'a> {
    risk_score: Decimal,
    shipping: &'a ShippingDetails,
    products: &'a [ProductDetail],
}

/// Plain text template for the high-risk review email.
#[derive(Template)]
#[template(path = "email/risk_alert.txt")]
struct RiskAlertEmailText<'a> {
    risk_score: Decimal,
    shipping: &'a ShippingDetails,
    products: &'a [ProductDetail],
}

/// HTML template for the address-warning review email.
#[derive(Template)]
#[template(path = "email/address_warning.html")]
struct AddressWarningEmailHtml<'a> {
    shipping: &'a ShippingDetails,
    products: &'a [ProductDetail],
}

/// Plain text template for the address-warning review email.
#[derive(Template)]
#[template(path = "email/address_warning.txt")]
struct AddressWarningEmailText<'a> {
    shipping: &'a ShippingDetails,
    products: &'a [ProductDetail],
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for purchase orders and review alerts.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the purchase-order email to the supplier's fulfillment team.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_purchase_order(
        &self,
        recipients: &[String],
        supplier: &str,
        account_number: &str,
        shipping: &ShippingDetails,
        products: &[ProductDetail],
    ) -> Result<(), EmailError> {
        let html = PurchaseOrderEmailHtml {
            supplier,
            account_number,
            shipping,
            products,
        }
        .render()?;
        let text = PurchaseOrderEmailText {
            supplier,
            account_number,
            shipping,
            products,
        }
        .render()?;

        let subject = format!("Purchase Order: {}", shipping.po_number);
        self.send_multipart_email(recipients, &subject, &text, &html)
            .await
    }

    /// Send the high-risk review email instead of a purchase order.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_risk_alert(
        &self,
        recipients: &[String],
        risk_score: Decimal,
        shipping: &ShippingDetails,
        products: &[ProductDetail],
    ) -> Result<(), EmailError> {
        let html = RiskAlertEmailHtml {
            risk_score,
            shipping,
            products,
        }
        .render()?;
        let text = RiskAlertEmailText {
            risk_score,
            shipping,
            products,
        }
        .render()?;

        let subject = format!("Review Required - High Risk Order {}", shipping.po_number);
        self.send_multipart_email(recipients, &subject, &text, &html)
            .await
    }

    /// Send the address-warning review email instead of a purchase order.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_address_warning(
        &self,
        recipients: &[String],
        shipping: &ShippingDetails,
        products: &[ProductDetail],
    ) -> Result<(), EmailError> {
        let html = AddressWarningEmailHtml { shipping, products }.render()?;
        let text = AddressWarningEmailText { shipping, products }.render()?;

        let subject = format!(
            "Review Required - Address Warning Order {}",
            shipping.po_number
        );
        self.send_multipart_email(recipients, &subject, &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        recipients: &[String],
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let mut builder = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .subject(subject);

        for recipient in recipients {
            builder = builder.to(recipient
                .parse()
                .map_err(|_| EmailError::InvalidAddress(recipient.clone()))?);
        }

        let email = builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text_body.to_string()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_body.to_string()),
                ),
        )?;

        self.mailer.send(email).await?;

        tracing::info!(
            recipients = recipients.len(),
            subject = %subject,
            "Email sent successfully"
        );
        Ok(())
    }
}
