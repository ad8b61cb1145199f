//! In-memory store used as a test double for the repository traits.
//!
//! Mirrors the SQLite implementation's observable behavior: monotonically
//! increasing ids, NotFound for missing entities, order-preserving
//! `get_by_ids`, append-only messages.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use nurture_core::types::{CampaignRecord, ConversationRecord, LeadRecord, MessageRecord, Sender};

use crate::error::StorageError;
use crate::repository::{
    CampaignRepository, ConversationRepository, LeadDraft, LeadRepository,
};

#[derive(Default)]
struct Inner {
    leads: HashMap<i64, LeadRecord>,
    campaigns: HashMap<i64, CampaignRecord>,
    campaign_leads: HashMap<i64, Vec<i64>>,
    conversations: HashMap<i64, ConversationRecord>,
    messages: Vec<MessageRecord>,
    next_id: i64,
}

impl Inner {
    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory implementation of all three repository traits.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Database(format!("store lock poisoned: {}", e)))
    }
}

impl LeadRepository for MemoryStore {
    fn create(&self, draft: &LeadDraft) -> Result<i64, StorageError> {
        let mut inner = self.lock()?;
        let id = inner.next();
        inner.leads.insert(
            id,
            LeadRecord {
                id,
                lead_ref: draft.lead_ref.clone(),
                name: draft.name.clone(),
                email: draft.email.clone(),
                phone: draft.phone.clone(),
                unit_type: draft.unit_type.clone(),
                min_budget: draft.min_budget,
                max_budget: draft.max_budget,
                status: draft.status.clone(),
                last_summary: draft.last_summary.clone(),
                last_contact_at: None,
            },
        );
        Ok(id)
    }

    fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<LeadRecord>, StorageError> {
        let inner = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.leads.get(id).cloned())
            .collect())
    }

    fn get(&self, id: i64) -> Result<LeadRecord, StorageError> {
        let inner = self.lock()?;
        inner
            .leads
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("lead {}", id)))
    }

    fn update_summary(
        &self,
        lead_id: i64,
        summary: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        let lead = inner
            .leads
            .get_mut(&lead_id)
            .ok_or_else(|| StorageError::NotFound(format!("lead {}", lead_id)))?;
        lead.last_summary = Some(summary.to_string());
        lead.last_contact_at = Some(at);
        Ok(())
    }
}

impl CampaignRepository for MemoryStore {
    fn create(
        &self,
        name: &str,
        project_name: &str,
        offer_details: &str,
        channel: &str,
    ) -> Result<i64, StorageError> {
        let mut inner = self.lock()?;
        let id = inner.next();
        inner.campaigns.insert(
            id,
            CampaignRecord {
                id,
                name: name.to_string(),
                project_name: project_name.to_string(),
                offer_details: offer_details.to_string(),
                channel: channel.to_string(),
            },
        );
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<CampaignRecord, StorageError> {
        let inner = self.lock()?;
        inner
            .campaigns
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("campaign {}", id)))
    }

    fn set_leads(&self, campaign_id: i64, lead_ids: &[i64]) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        if !inner.campaigns.contains_key(&campaign_id) {
            return Err(StorageError::NotFound(format!("campaign {}", campaign_id)));
        }
        inner.campaign_leads.insert(campaign_id, lead_ids.to_vec());
        Ok(())
    }
}

impl ConversationRepository for MemoryStore {
    fn create(&self, campaign_id: i64, lead_id: i64) -> Result<i64, StorageError> {
        let mut inner = self.lock()?;
        let id = inner.next();
        inner.conversations.insert(
            id,
            ConversationRecord {
                id,
                campaign_id,
                lead_id,
                state: "active".to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<ConversationRecord, StorageError> {
        let inner = self.lock()?;
        inner
            .conversations
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("conversation {}", id)))
    }

    fn append_message(
        &self,
        conversation_id: i64,
        sender: Sender,
        content: &str,
    ) -> Result<i64, StorageError> {
        let mut inner = self.lock()?;
        if !inner.conversations.contains_key(&conversation_id) {
            return Err(StorageError::NotFound(format!(
                "conversation {}",
                conversation_id
            )));
        }
        let id = inner.next();
        inner.messages.push(MessageRecord {
            id,
            conversation_id,
            sender,
            content: content.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn messages(&self, conversation_id: i64) -> Result<Vec<MessageRecord>, StorageError> {
        let inner = self.lock()?;
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }
}
