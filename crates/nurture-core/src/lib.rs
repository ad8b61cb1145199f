//! Nurture core crate - shared types, configuration, and errors.
//!
//! Every other crate in the workspace depends on this one. It holds the
//! persisted record types, the TOML configuration model, and the top-level
//! error type that subsystem errors convert into.

pub mod config;
pub mod error;
pub mod types;

pub use config::NurtureConfig;
pub use error::{NurtureError, Result};
pub use types::{CampaignRecord, ConversationRecord, LeadRecord, MessageRecord, Sender};
