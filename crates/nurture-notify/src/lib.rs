//! Outbound notification for lead nurturing.
//!
//! Defines the `Notifier` async trait, channel-specific implementations
//! (email via HTTP relay, WhatsApp stub), a registry resolving notifiers
//! by channel key, and subject/body splitting of generated messages.

pub mod email;
pub mod error;
pub mod message;
pub mod notifier;
pub mod whatsapp;

pub use email::EmailNotifier;
pub use error::NotifyError;
pub use message::split_subject_body;
pub use notifier::{Notifier, NotifierRegistry};
pub use whatsapp::WhatsAppNotifier;
