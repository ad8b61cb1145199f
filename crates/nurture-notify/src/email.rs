//! Email notifier backed by an HTTP mail relay.
//!
//! Delivery itself is external; this client posts the message to a
//! configured relay endpoint as JSON.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use nurture_core::config::NotifyConfig;

use crate::error::NotifyError;
use crate::notifier::Notifier;

/// Sends email through an HTTP relay endpoint.
pub struct EmailNotifier {
    client: reqwest::Client,
    relay_url: String,
    from_email: String,
}

impl EmailNotifier {
    pub fn from_config(config: &NotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url: config.relay_url.clone(),
            from_email: config.from_email.clone(),
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let to: Vec<&String> = recipients.iter().filter(|r| !r.is_empty()).collect();
        if to.is_empty() {
            debug!("No recipient emails provided, skipping email send");
            return Ok(());
        }

        let response = self
            .client
            .post(&self.relay_url)
            .json(&json!({
                "from": self.from_email,
                "to": to,
                "subject": subject,
                "body": body,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Delivery(format!(
                "relay returned {}",
                response.status()
            )));
        }

        info!(recipients = to.len(), "Sent email notification");
        Ok(())
    }
}
