//! Outbound email adapters.
//!
//! [`ProviderMailer`] posts to an HTTP mail provider; [`LogMailer`] is the
//! development fallback used when no provider key is configured, writing
//! the would-be email to the log instead.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{EmailMessage, Mailer, MailerError};

/// Default sender address when none is configured.
pub const DEFAULT_FROM: &str = "noreply@communitygarden.org";

/// Settings for the HTTP mail provider.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Full send endpoint, e.g. `https://api.sendgrid.com/v3/mail/send`.
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

/// Mailer backed by a SendGrid-style HTTP API.
pub struct ProviderMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl ProviderMailer {
    /// Create a mailer for the given provider settings.
    pub fn new(config: MailerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn payload(&self, message: &EmailMessage) -> serde_json::Value {
        let mut to = json!({ "email": message.to });
        if let Some(name) = &message.recipient_name {
            to["name"] = json!(name);
        }
        let mut content = vec![json!({ "type": "text/plain", "value": message.text })];
        if let Some(html) = &message.html {
            content.push(json!({ "type": "text/html", "value": html }));
        }
        json!({
            "personalizations": [{ "to": [to] }],
            "from": { "email": self.config.from },
            "subject": message.subject,
            "content": content,
        })
    }
}

#[async_trait]
impl Mailer for ProviderMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&self.payload(message))
            .send()
            .await
            .map_err(|err| MailerError::delivery(err.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(MailerError::delivery(format!(
                "provider returned {}",
                response.status()
            )))
        }
    }
}

/// Development mailer: records the email in the log and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text,
            "no mail provider configured, logging email instead"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_payload_carries_both_content_types() {
        let mailer = ProviderMailer::new(MailerConfig {
            api_url: "https://mail.invalid/send".into(),
            api_key: "key".into(),
            from: DEFAULT_FROM.into(),
        });
        let payload = mailer.payload(&EmailMessage {
            to: "ada@example.org".into(),
            recipient_name: Some("Ada Lovelace".into()),
            subject: "Hello".into(),
            text: "plain".into(),
            html: Some("<p>rich</p>".into()),
        });

        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "ada@example.org"
        );
        assert_eq!(
            payload["personalizations"][0]["to"][0]["name"],
            "Ada Lovelace"
        );
        assert_eq!(payload["from"]["email"], DEFAULT_FROM);
        assert_eq!(payload["content"][0]["type"], "text/plain");
        assert_eq!(payload["content"][1]["type"], "text/html");
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let result = LogMailer
            .send(&EmailMessage {
                to: "ada@example.org".into(),
                recipient_name: None,
                subject: "Hello".into(),
                text: "plain".into(),
                html: None,
            })
            .await;
        assert!(result.is_ok());
    }
}
