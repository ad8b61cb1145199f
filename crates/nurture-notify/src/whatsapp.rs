//! WhatsApp notifier stub.
//!
//! A real implementation would map lead phone numbers and call a provider
//! API; this one records the delivery intent in the log.

use async_trait::async_trait;
use tracing::info;

use crate::error::NotifyError;
use crate::notifier::Notifier;

pub struct WhatsAppNotifier;

#[async_trait]
impl Notifier for WhatsAppNotifier {
    async fn notify(
        &self,
        recipients: &[String],
        subject: &str,
        _body: &str,
    ) -> Result<(), NotifyError> {
        info!(
            recipients = recipients.len(),
            subject = %subject,
            "WhatsApp notify called (stub)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_always_succeeds() {
        let notifier = WhatsAppNotifier;
        assert!(notifier
            .notify(&["+15550100".to_string()], "offer", "hi")
            .await
            .is_ok());
        assert!(notifier.notify(&[], "", "").await.is_ok());
    }
}
