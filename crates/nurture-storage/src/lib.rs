//! Nurture storage crate - SQLite persistence for leads, campaigns, and
//! conversations.
//!
//! Provides a WAL-mode SQLite database with migrations, repository traits
//! consumed by the coordinator, a SQLite-backed implementation, and an
//! in-memory implementation used as a test double.

pub mod db;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use repository::{
    CampaignRepository, ConversationRepository, LeadDraft, LeadRepository, SqliteStore,
};
