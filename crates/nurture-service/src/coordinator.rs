//! The conversation coordinator.
//!
//! Two entry operations drive the pipeline: `start_campaign` (batch
//! outreach) and `continue_conversation` (single reply). A third,
//! `create_campaign`, sets up a campaign and announces the offer.
//! Reconciliation rules: per-lead persistence/notification failures in a
//! batch are recorded in that lead's status and never abort siblings;
//! pipeline-level failures become structured error responses.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use nurture_core::types::{CampaignRecord, LeadRecord, Sender};
use nurture_notify::{split_subject_body, NotifierRegistry};
use nurture_storage::{CampaignRepository, ConversationRepository, LeadRepository};
use nurture_workflow::{
    CampaignBrief, GeneratedMessage, LeadProfile, NurturePipeline, NurtureRequest,
};

use crate::types::{
    CreateCampaignResponse, DeliveryStatus, LeadOutcome, SendMessageResponse,
    StartCampaignResponse, DEFAULT_ACKNOWLEDGMENT, DEFAULT_GREETING,
};

/// Boundary component reconciling pipeline outcomes with persistence and
/// notification.
pub struct NurtureCoordinator {
    leads: Arc<dyn LeadRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    conversations: Arc<dyn ConversationRepository>,
    notifiers: NotifierRegistry,
    pipeline: NurturePipeline,
}

impl NurtureCoordinator {
    pub fn new(
        leads: Arc<dyn LeadRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        conversations: Arc<dyn ConversationRepository>,
        notifiers: NotifierRegistry,
        pipeline: NurturePipeline,
    ) -> Self {
        Self {
            leads,
            campaigns,
            conversations,
            notifiers,
            pipeline,
        }
    }

    /// Start a campaign for a set of leads: one batch pipeline run, then
    /// per-lead conversation creation, message persistence, and
    /// notification. Returns a per-lead status list.
    pub async fn start_campaign(
        &self,
        campaign_id: i64,
        lead_ids: &[i64],
    ) -> StartCampaignResponse {
        let campaign = match self.campaigns.get(campaign_id) {
            Ok(c) => c,
            Err(e) => return StartCampaignResponse::error(e.to_string()),
        };
        let leads = match self.leads.get_by_ids(lead_ids) {
            Ok(l) => l,
            Err(e) => return StartCampaignResponse::error(e.to_string()),
        };

        let request = NurtureRequest::Batch {
            campaign: CampaignBrief::from_record(&campaign),
            leads: leads.iter().map(LeadProfile::from_record).collect(),
        };
        let outcome = match self.pipeline.run(request).await {
            Ok(o) => o,
            Err(e) => {
                error!(campaign_id, error = %e, "Campaign pipeline run failed");
                return StartCampaignResponse::error(e.to_string());
            }
        };

        let mut results = Vec::with_capacity(leads.len());
        for lead in &leads {
            results.push(self.deliver_to_lead(&campaign, lead, &outcome.messages).await);
        }

        info!(
            campaign_id,
            leads = results.len(),
            sent = results
                .iter()
                .filter(|r| r.status == DeliveryStatus::Sent)
                .count(),
            "Campaign started"
        );
        StartCampaignResponse::success(results)
    }

    /// Persist and notify one lead's outreach. Failures are recorded in
    /// the returned outcome, never propagated.
    async fn deliver_to_lead(
        &self,
        campaign: &CampaignRecord,
        lead: &LeadRecord,
        messages: &[GeneratedMessage],
    ) -> LeadOutcome {
        // Batch output is completion-ordered; re-key by lead name.
        let generated = messages.iter().find(|m| m.lead == lead.name);
        let (text, status) = match generated {
            Some(m) => (m.message.clone(), DeliveryStatus::Sent),
            None => (DEFAULT_GREETING.to_string(), DeliveryStatus::Fallback),
        };

        let persisted = self
            .conversations
            .create(campaign.id, lead.id)
            .and_then(|conversation_id| {
                self.conversations
                    .append_message(conversation_id, Sender::Ai, &text)
            });
        if let Err(e) = persisted {
            warn!(lead = %lead.name, error = %e, "Failed to persist outreach");
            return LeadOutcome {
                lead: lead.name.clone(),
                status: DeliveryStatus::Failed,
                message: text,
                error: Some(e.to_string()),
            };
        }

        if let Some(notifier) = self.notifiers.resolve(&campaign.channel) {
            let (subject, body) = split_subject_body(&text);
            if let Err(e) = notifier.notify(&[lead.email.clone()], &subject, &body).await {
                warn!(lead = %lead.name, error = %e, "Notification failed");
                return LeadOutcome {
                    lead: lead.name.clone(),
                    status: DeliveryStatus::Failed,
                    message: text,
                    error: Some(e.to_string()),
                };
            }
        } else {
            warn!(channel = %campaign.channel, "Unknown channel, skipping notification");
        }

        LeadOutcome {
            lead: lead.name.clone(),
            status,
            message: text,
            error: None,
        }
    }

    /// Continue an existing conversation with an inbound lead message:
    /// persist the inbound text, run one reply pipeline invocation, persist
    /// the AI reply and updated summary.
    pub async fn continue_conversation(
        &self,
        conversation_id: i64,
        inbound: &str,
    ) -> SendMessageResponse {
        let conversation = match self.conversations.get(conversation_id) {
            Ok(c) => c,
            Err(e) => return SendMessageResponse::error(e.to_string()),
        };
        let lead = match self.leads.get(conversation.lead_id) {
            Ok(l) => l,
            Err(e) => return SendMessageResponse::error(e.to_string()),
        };
        let campaign = match self.campaigns.get(conversation.campaign_id) {
            Ok(c) => c,
            Err(e) => return SendMessageResponse::error(e.to_string()),
        };

        if let Err(e) = self
            .conversations
            .append_message(conversation_id, Sender::Lead, inbound)
        {
            return SendMessageResponse::error(e.to_string());
        }

        let request = NurtureRequest::Reply {
            campaign: CampaignBrief::from_record(&campaign),
            lead: LeadProfile::from_record(&lead),
            conversation_id,
            inbound: inbound.to_string(),
            prior_summary: lead.last_summary.clone(),
        };
        let outcome = match self.pipeline.run(request).await {
            Ok(o) => o,
            Err(e) => {
                error!(conversation_id, error = %e, "Reply pipeline run failed");
                return SendMessageResponse::error("AI generation failed");
            }
        };

        let ai_message = outcome
            .ai_reply
            .unwrap_or_else(|| DEFAULT_ACKNOWLEDGMENT.to_string());
        let new_summary = if outcome.summary.is_empty() {
            lead.last_summary.clone().unwrap_or_default()
        } else {
            outcome.summary
        };

        if let Err(e) = self
            .conversations
            .append_message(conversation_id, Sender::Ai, &ai_message)
        {
            return SendMessageResponse::error(e.to_string());
        }
        if let Err(e) = self.leads.update_summary(lead.id, &new_summary, Utc::now()) {
            return SendMessageResponse::error(e.to_string());
        }

        info!(conversation_id, lead = %lead.name, "Conversation continued");
        SendMessageResponse::success(ai_message, new_summary)
    }

    /// Create a campaign, link its shortlisted leads, and announce the
    /// offer over the configured channel. Notification failure degrades to
    /// a warning; the campaign is still created.
    pub async fn create_campaign(
        &self,
        name: &str,
        project_name: &str,
        offer_details: &str,
        channel: &str,
        lead_ids: &[i64],
    ) -> CreateCampaignResponse {
        let leads = match self.leads.get_by_ids(lead_ids) {
            Ok(l) => l,
            Err(e) => return CreateCampaignResponse::error(e.to_string()),
        };

        let campaign_id = match self
            .campaigns
            .create(name, project_name, offer_details, channel)
            .and_then(|id| self.campaigns.set_leads(id, lead_ids).map(|_| id))
        {
            Ok(id) => id,
            Err(e) => return CreateCampaignResponse::error(e.to_string()),
        };

        if let Some(notifier) = self.notifiers.resolve(channel) {
            let emails: Vec<String> = leads
                .iter()
                .map(|l| l.email.clone())
                .filter(|e| !e.is_empty())
                .collect();
            let subject = format!("{} - {}", name, project_name);
            if let Err(e) = notifier.notify(&emails, &subject, offer_details).await {
                warn!(campaign_id, error = %e, "Campaign announcement failed");
            }
        }

        info!(campaign_id, leads = leads.len(), "Campaign created");
        CreateCampaignResponse::success(campaign_id)
    }
}
