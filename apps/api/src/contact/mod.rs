//! Contact form relay — validates a support message and forwards it to a
//! transactional mail HTTP API.

pub mod handlers;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Mail relay is not configured")]
    NotConfigured,

    #[error("Mail relay failed: {0}")]
    Relay(String),
}

/// Incoming contact form. Fields are optional so that absent ones reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// A contact message with all three fields present and non-blank.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(self) -> Result<ContactMessage, ContactError> {
        fn present(field: Option<String>) -> Option<String> {
            field.filter(|f| !f.trim().is_empty())
        }

        // Name and email are single-line identifiers; the message body keeps
        // its own whitespace.
        let name = present(self.name).map(|n| n.trim().to_string());
        let email = present(self.email).map(|e| e.trim().to_string());

        match (name, email, present(self.message)) {
            (Some(name), Some(email), Some(message)) => Ok(ContactMessage {
                name,
                email,
                message,
            }),
            _ => Err(ContactError::MissingFields),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MailAddress {
    pub name: String,
    pub email: String,
}

/// Payload posted to the mail API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutgoingMail {
    pub from: MailAddress,
    pub reply_to: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds the support mail: sent from the support inbox on the submitter's
/// behalf, with replies going to the submitter.
pub fn build_support_mail(contact: &ContactMessage, support_email: &str) -> OutgoingMail {
    let ContactMessage {
        name,
        email,
        message,
    } = contact;

    OutgoingMail {
        from: MailAddress {
            name: name.clone(),
            email: support_email.to_string(),
        },
        reply_to: email.clone(),
        to: support_email.to_string(),
        subject: format!("[SayBetter Support] Message from {name}"),
        text: format!("Name: {name}\nEmail: {email}\n\nMessage:\n{message}\n"),
        html: format!(
            "<h3>New Support Message</h3>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <hr/>\n\
             <p><strong>Message:</strong></p>\n\
             <p style=\"white-space: pre-wrap;\">{}</p>\n",
            escape_html(name),
            escape_html(email),
            escape_html(message)
        ),
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, contact: &ContactMessage) -> Result<(), ContactError>;
}

/// Posts mail as JSON to a transactional mail API with bearer auth.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, contact: &ContactMessage) -> Result<(), ContactError> {
        let mail = build_support_mail(contact, &self.config.support_email);

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&mail)
            .send()
            .await
            .map_err(|e| {
                error!("Error sending email: {e}");
                ContactError::Relay(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Mail API returned {status}: {body}");
            return Err(ContactError::Relay(format!("status {status}")));
        }

        info!("Support message from {} relayed", contact.email);
        Ok(())
    }
}
