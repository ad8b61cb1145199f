//! Prompt builders for the three completion call sites.

use crate::state::{CampaignBrief, LeadProfile};

/// Placeholder substituted when a lead has no prior conversation summary.
pub const NO_SUMMARY_PLACEHOLDER: &str = "No previous summary";

/// Framing for the summarization call.
pub const SUMMARY_SYSTEM: &str = "You are a CRM assistant summarizing a client conversation.";

/// Personalized outreach prompt for one lead in a campaign batch.
pub fn outreach_prompt(lead: &LeadProfile, campaign: &CampaignBrief, brochure: &str) -> String {
    let prior = lead
        .prior_summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_SUMMARY_PLACEHOLDER);
    format!(
        "You are an expert real estate sales agent.\n\
         Generate a short, personalized message for {name} about the project {project}.\n\
         Keep the message concise (max 150 words), professional, and engaging.\n\n\
         Offer details: {offer}\n\
         Lead interest: {unit}\n\
         Budget: {budget}\n\
         Previous conversation: {prior}\n\
         Brochure details: {brochure}",
        name = lead.name,
        project = campaign.project_name,
        offer = campaign.offer_details,
        unit = lead.unit_type.as_deref().unwrap_or("unspecified"),
        budget = lead.budget_range(),
        prior = prior,
        brochure = brochure,
    )
}

/// Conversational reply prompt for one inbound lead message.
pub fn reply_prompt(inbound: &str, prior_summary: &str, brochure: &str) -> String {
    format!(
        "You are an AI real estate assistant continuing a chat with a potential buyer.\n\n\
         Lead message: {inbound}\n\
         Context summary: {summary}\n\
         Brochure details: {brochure}\n\n\
         Reply professionally and persuasively, keeping it short and relevant.",
        inbound = inbound,
        summary = prior_summary,
        brochure = brochure,
    )
}

/// Summarization prompt over a flattened transcript.
pub fn summary_prompt(transcript: &str) -> String {
    format!("Summarize this conversation briefly:\n{}", transcript)
}
