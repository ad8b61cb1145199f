//! Repository traits and the SQLite-backed implementation.
//!
//! The coordinator consumes `LeadRepository`, `CampaignRepository`, and
//! `ConversationRepository` as trait objects; `SqliteStore` implements all
//! three over a shared `Database`, and `MemoryStore` (see `memory.rs`)
//! provides the in-memory double.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use nurture_core::types::{CampaignRecord, ConversationRecord, LeadRecord, MessageRecord, Sender};

use crate::db::Database;
use crate::error::StorageError;

/// Fields needed to create a new lead.
#[derive(Debug, Clone, Default)]
pub struct LeadDraft {
    pub lead_ref: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub unit_type: Option<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub status: Option<String>,
    pub last_summary: Option<String>,
}

/// Read/write access to leads.
pub trait LeadRepository: Send + Sync {
    fn create(&self, draft: &LeadDraft) -> Result<i64, StorageError>;

    /// Fetch leads by id. Unknown ids are silently skipped; the result
    /// preserves the order of `ids`.
    fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<LeadRecord>, StorageError>;

    fn get(&self, id: i64) -> Result<LeadRecord, StorageError>;

    /// Overwrite the lead's rolling summary and contact timestamp.
    fn update_summary(
        &self,
        lead_id: i64,
        summary: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

/// Read/write access to campaigns.
pub trait CampaignRepository: Send + Sync {
    fn create(
        &self,
        name: &str,
        project_name: &str,
        offer_details: &str,
        channel: &str,
    ) -> Result<i64, StorageError>;

    fn get(&self, id: i64) -> Result<CampaignRecord, StorageError>;

    /// Replace the campaign's shortlisted leads.
    fn set_leads(&self, campaign_id: i64, lead_ids: &[i64]) -> Result<(), StorageError>;
}

/// Read/write access to conversations and their append-only messages.
pub trait ConversationRepository: Send + Sync {
    fn create(&self, campaign_id: i64, lead_id: i64) -> Result<i64, StorageError>;

    fn get(&self, id: i64) -> Result<ConversationRecord, StorageError>;

    fn append_message(
        &self,
        conversation_id: i64,
        sender: Sender,
        content: &str,
    ) -> Result<i64, StorageError>;

    /// Messages for a conversation, ordered by creation.
    fn messages(&self, conversation_id: i64) -> Result<Vec<MessageRecord>, StorageError>;
}

/// SQLite-backed implementation of all three repositories.
pub struct SqliteStore {
    db: Arc<Database>,
}

impl SqliteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl LeadRepository for SqliteStore {
    fn create(&self, draft: &LeadDraft) -> Result<i64, StorageError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO leads (lead_ref, name, email, phone, unit_type, min_budget, max_budget, status, last_summary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    draft.lead_ref,
                    draft.name,
                    draft.email,
                    draft.phone,
                    draft.unit_type,
                    draft.min_budget,
                    draft.max_budget,
                    draft.status,
                    draft.last_summary,
                ],
            )
            .map_err(|e| StorageError::Database(format!("Failed to create lead: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<LeadRecord>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = self.db.with_conn(|conn| {
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!(
                "SELECT id, lead_ref, name, email, phone, unit_type, min_budget, max_budget,
                        status, last_summary, last_contact_at
                 FROM leads WHERE id IN ({})",
                placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(ids.iter()), row_to_lead)?;
            let mut leads = Vec::new();
            for row in rows {
                leads.push(row?);
            }
            Ok(leads)
        })?;

        // Re-order to match the caller's id order.
        let mut ordered = Vec::with_capacity(found.len());
        for id in ids {
            if let Some(lead) = found.iter().find(|l| l.id == *id) {
                ordered.push(lead.clone());
            }
        }
        Ok(ordered)
    }

    fn get(&self, id: i64) -> Result<LeadRecord, StorageError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, lead_ref, name, email, phone, unit_type, min_budget, max_budget,
                        status, last_summary, last_contact_at
                 FROM leads WHERE id = ?1",
                params![id],
                row_to_lead,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("lead {}", id)))
        })
    }

    fn update_summary(
        &self,
        lead_id: i64,
        summary: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE leads SET last_summary = ?1, last_contact_at = ?2 WHERE id = ?3",
                params![summary, at.timestamp(), lead_id],
            )?;
            if changed == 0 {
                return Err(StorageError::NotFound(format!("lead {}", lead_id)));
            }
            Ok(())
        })
    }
}

impl CampaignRepository for SqliteStore {
    fn create(
        &self,
        name: &str,
        project_name: &str,
        offer_details: &str,
        channel: &str,
    ) -> Result<i64, StorageError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO campaigns (name, project_name, offer_details, channel)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, project_name, offer_details, channel],
            )
            .map_err(|e| StorageError::Database(format!("Failed to create campaign: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn get(&self, id: i64) -> Result<CampaignRecord, StorageError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, name, project_name, offer_details, channel
                 FROM campaigns WHERE id = ?1",
                params![id],
                |row| {
                    Ok(CampaignRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        project_name: row.get(2)?,
                        offer_details: row.get(3)?,
                        channel: row.get(4)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("campaign {}", id)))
        })
    }

    fn set_leads(&self, campaign_id: i64, lead_ids: &[i64]) -> Result<(), StorageError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "DELETE FROM campaign_leads WHERE campaign_id = ?1",
                params![campaign_id],
            )?;
            for lead_id in lead_ids {
                conn.execute(
                    "INSERT INTO campaign_leads (campaign_id, lead_id) VALUES (?1, ?2)",
                    params![campaign_id, lead_id],
                )?;
            }
            Ok(())
        })
    }
}

impl ConversationRepository for SqliteStore {
    fn create(&self, campaign_id: i64, lead_id: i64) -> Result<i64, StorageError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO conversations (campaign_id, lead_id, state, created_at)
                 VALUES (?1, ?2, 'active', ?3)",
                params![campaign_id, lead_id, Utc::now().timestamp()],
            )
            .map_err(|e| StorageError::Database(format!("Failed to create conversation: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn get(&self, id: i64) -> Result<ConversationRecord, StorageError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, campaign_id, lead_id, state, created_at
                 FROM conversations WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ConversationRecord {
                        id: row.get(0)?,
                        campaign_id: row.get(1)?,
                        lead_id: row.get(2)?,
                        state: row.get(3)?,
                        created_at: epoch_to_utc(row.get(4)?),
                    })
                },
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("conversation {}", id)))
        })
    }

    fn append_message(
        &self,
        conversation_id: i64,
        sender: Sender,
        content: &str,
    ) -> Result<i64, StorageError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (conversation_id, sender, content, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    conversation_id,
                    sender.as_str(),
                    content,
                    Utc::now().timestamp()
                ],
            )
            .map_err(|e| StorageError::Database(format!("Failed to append message: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn messages(&self, conversation_id: i64) -> Result<Vec<MessageRecord>, StorageError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, sender, content, created_at
                 FROM messages WHERE conversation_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;
            let rows = stmt.query_map(params![conversation_id], |row| {
                let sender_str: String = row.get(2)?;
                Ok(MessageRecord {
                    id: row.get(0)?,
                    conversation_id: row.get(1)?,
                    sender: Sender::parse(&sender_str).unwrap_or(Sender::Ai),
                    content: row.get(3)?,
                    created_at: epoch_to_utc(row.get(4)?),
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
    }
}

fn row_to_lead(row: &Row<'_>) -> rusqlite::Result<LeadRecord> {
    let last_contact: Option<i64> = row.get(10)?;
    Ok(LeadRecord {
        id: row.get(0)?,
        lead_ref: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        unit_type: row.get(5)?,
        min_budget: row.get(6)?,
        max_budget: row.get(7)?,
        status: row.get(8)?,
        last_summary: row.get(9)?,
        last_contact_at: last_contact.map(epoch_to_utc),
    })
}

fn epoch_to_utc(epoch: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(epoch, 0).single().unwrap_or_default()
}
