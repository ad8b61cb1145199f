//! Persisted record types shared across the workspace.
//!
//! These mirror the relational schema: leads, campaigns, conversations,
//! and append-only messages. View types consumed by the workflow pipeline
//! live in `nurture-workflow`; records here carry the full stored shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender role for a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Lead,
    Ai,
}

impl Sender {
    /// Stable string form used in the database and over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Lead => "lead",
            Sender::Ai => "ai",
        }
    }

    /// Parse from the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lead" => Some(Sender::Lead),
            "ai" => Some(Sender::Ai),
            _ => None,
        }
    }
}

/// A prospective buyer tracked by the CRM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: i64,
    /// External CRM identifier, unique per lead.
    pub lead_ref: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub unit_type: Option<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub status: Option<String>,
    /// Rolling summary of the last conversation, updated by the pipeline.
    pub last_summary: Option<String>,
    pub last_contact_at: Option<DateTime<Utc>>,
}

/// A nurture campaign tied to a project, targeting a set of leads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: i64,
    pub name: String,
    pub project_name: String,
    pub offer_details: String,
    /// Notification channel key: "email", "whatsapp".
    pub channel: String,
}

/// A message thread between the system and one lead for one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: i64,
    pub campaign_id: i64,
    pub lead_id: i64,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

/// A single message within a conversation. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: i64,
    pub conversation_id: i64,
    pub sender: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_round_trip() {
        assert_eq!(Sender::parse(Sender::Lead.as_str()), Some(Sender::Lead));
        assert_eq!(Sender::parse(Sender::Ai.as_str()), Some(Sender::Ai));
    }

    #[test]
    fn test_sender_parse_unknown() {
        assert_eq!(Sender::parse("system"), None);
        assert_eq!(Sender::parse(""), None);
    }

    #[test]
    fn test_sender_serde_lowercase() {
        let json = serde_json::to_string(&Sender::Ai).unwrap();
        assert_eq!(json, "\"ai\"");
        let back: Sender = serde_json::from_str("\"lead\"").unwrap();
        assert_eq!(back, Sender::Lead);
    }

    #[test]
    fn test_lead_record_serde() {
        let lead = LeadRecord {
            id: 1,
            lead_ref: "L-001".to_string(),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            unit_type: Some("2BHK".to_string()),
            min_budget: Some(4_500_000.0),
            max_budget: Some(6_000_000.0),
            status: Some("warm".to_string()),
            last_summary: None,
            last_contact_at: None,
        };
        let json = serde_json::to_string(&lead).unwrap();
        let back: LeadRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "Asha Rao");
        assert_eq!(back.min_budget, Some(4_500_000.0));
    }
}
