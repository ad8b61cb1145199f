//! Structured response types for coordinator operations.

use serde::Serialize;

/// Fallback outreach text used when a lead's generation unit failed.
pub const DEFAULT_GREETING: &str = "Hi, we have a great offer for you!";

/// Fallback reply text used when no AI reply was generated.
pub const DEFAULT_ACKNOWLEDGMENT: &str = "Thank you for your message! We'll get back shortly.";

/// Per-lead delivery status within a campaign batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Generated message persisted and handed to the notifier.
    Sent,
    /// The generation unit failed; the default greeting was used instead.
    Fallback,
    /// Persistence or notification failed for this lead.
    Failed,
}

/// Outcome for one lead in a `start_campaign` run.
#[derive(Debug, Clone, Serialize)]
pub struct LeadOutcome {
    pub lead: String,
    pub status: DeliveryStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `start_campaign`.
#[derive(Debug, Serialize)]
pub struct StartCampaignResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub leads: Vec<LeadOutcome>,
}

impl StartCampaignResponse {
    pub fn success(leads: Vec<LeadOutcome>) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            leads,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            leads: Vec::new(),
        }
    }
}

/// Response of `continue_conversation`.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_summary: Option<String>,
}

impl SendMessageResponse {
    pub fn success(ai_message: String, new_summary: String) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            ai_message: Some(ai_message),
            new_summary: Some(new_summary),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            ai_message: None,
            new_summary: None,
        }
    }
}

/// Response of `create_campaign`.
#[derive(Debug, Serialize)]
pub struct CreateCampaignResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<i64>,
}

impl CreateCampaignResponse {
    pub fn success(campaign_id: i64) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            campaign_id: Some(campaign_id),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            campaign_id: None,
        }
    }
}
