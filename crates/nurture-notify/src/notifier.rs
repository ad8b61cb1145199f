//! Notifier trait and channel registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::NotifyError;

/// Channel-specific delivery of a message to a set of recipients.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError>;
}

/// Registry mapping channel keys to notifier implementations.
///
/// Keys are matched case-insensitively. An unknown channel resolves to
/// `None`; callers treat that as a logged no-op, not an error.
#[derive(Default)]
pub struct NotifierRegistry {
    channels: HashMap<String, Arc<dyn Notifier>>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, channel: &str, notifier: Arc<dyn Notifier>) {
        self.channels.insert(channel.to_lowercase(), notifier);
    }

    pub fn resolve(&self, channel: &str) -> Option<Arc<dyn Notifier>> {
        let resolved = self.channels.get(&channel.to_lowercase()).cloned();
        if resolved.is_none() {
            debug!(channel = %channel, "No notifier configured for channel");
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopNotifier;

    #[async_trait]
    impl Notifier for NoopNotifier {
        async fn notify(
            &self,
            _recipients: &[String],
            _subject: &str,
            _body: &str,
        ) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let mut registry = NotifierRegistry::new();
        registry.register("email", Arc::new(NoopNotifier));
        assert!(registry.resolve("EMAIL").is_some());
        assert!(registry.resolve("Email").is_some());
        assert!(registry.resolve("email").is_some());
    }

    #[test]
    fn test_unknown_channel_resolves_none() {
        let registry = NotifierRegistry::new();
        assert!(registry.resolve("telegram").is_none());
    }

    #[test]
    fn test_register_mixed_case_key() {
        let mut registry = NotifierRegistry::new();
        registry.register("WhatsApp", Arc::new(NoopNotifier));
        assert!(registry.resolve("whatsapp").is_some());
    }
}
