//! Workflow request and outcome types.
//!
//! The batch/reply distinction is a sum type: each variant carries only the
//! fields its branch needs, so there is no nullable-field sniffing to decide
//! the mode. One request produces one outcome; the request is consumed by
//! the pipeline invocation.

use serde::{Deserialize, Serialize};

use nurture_core::types::{CampaignRecord, LeadRecord};

/// Immutable snapshot of a lead's nurture-relevant attributes.
///
/// Decoupled from the persisted `LeadRecord` so the pipeline has no
/// dependency on the storage schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadProfile {
    pub name: String,
    pub unit_type: Option<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub prior_summary: Option<String>,
}

impl LeadProfile {
    pub fn from_record(record: &LeadRecord) -> Self {
        Self {
            name: record.name.clone(),
            unit_type: record.unit_type.clone(),
            min_budget: record.min_budget,
            max_budget: record.max_budget,
            prior_summary: record.last_summary.clone(),
        }
    }

    /// Budget range in prompt form, e.g. `"4500000 - 6000000"`.
    pub fn budget_range(&self) -> String {
        match (self.min_budget, self.max_budget) {
            (Some(min), Some(max)) => format!("{} - {}", min, max),
            (Some(min), None) => format!("from {}", min),
            (None, Some(max)) => format!("up to {}", max),
            (None, None) => "unspecified".to_string(),
        }
    }
}

/// Immutable snapshot of the campaign context fanned out to generation units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignBrief {
    pub project_name: String,
    pub offer_details: String,
}

impl CampaignBrief {
    pub fn from_record(record: &CampaignRecord) -> Self {
        Self {
            project_name: record.project_name.clone(),
            offer_details: record.offer_details.clone(),
        }
    }
}

/// One personalized outreach message produced by a batch generation unit.
///
/// Batch output is ordered by completion, not submission; callers that need
/// positional correspondence must re-key by lead name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedMessage {
    pub lead: String,
    pub message: String,
}

/// A single pipeline invocation: outreach for a batch of leads, or a reply
/// within one existing conversation.
#[derive(Debug, Clone)]
pub enum NurtureRequest {
    Batch {
        campaign: CampaignBrief,
        leads: Vec<LeadProfile>,
    },
    Reply {
        campaign: CampaignBrief,
        lead: LeadProfile,
        conversation_id: i64,
        inbound: String,
        prior_summary: Option<String>,
    },
}

impl NurtureRequest {
    pub fn campaign(&self) -> &CampaignBrief {
        match self {
            NurtureRequest::Batch { campaign, .. } => campaign,
            NurtureRequest::Reply { campaign, .. } => campaign,
        }
    }

    /// Retrieval query text: the inbound reply concatenated with the project
    /// name in reply mode, the project name alone in batch mode.
    pub fn retrieval_query(&self) -> String {
        match self {
            NurtureRequest::Batch { campaign, .. } => campaign.project_name.clone(),
            NurtureRequest::Reply {
                campaign, inbound, ..
            } => {
                if inbound.trim().is_empty() {
                    campaign.project_name.clone()
                } else {
                    format!("{} {}", inbound, campaign.project_name)
                }
            }
        }
    }
}

/// Terminal state of one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurtureOutcome {
    /// Brochure passage retrieved for this run; empty when nothing matched.
    pub brochure: String,
    /// Populated only by batch runs, one entry per succeeded unit.
    pub messages: Vec<GeneratedMessage>,
    /// Populated only by reply runs with non-empty inbound text.
    pub ai_reply: Option<String>,
    /// Updated rolling summary; always produced.
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> CampaignBrief {
        CampaignBrief {
            project_name: "Lakeview Heights".to_string(),
            offer_details: "5% launch discount".to_string(),
        }
    }

    fn profile(name: &str) -> LeadProfile {
        LeadProfile {
            name: name.to_string(),
            unit_type: Some("2BHK".to_string()),
            min_budget: Some(4_500_000.0),
            max_budget: Some(6_000_000.0),
            prior_summary: None,
        }
    }

    #[test]
    fn test_budget_range_forms() {
        let mut p = profile("Asha");
        assert_eq!(p.budget_range(), "4500000 - 6000000");
        p.max_budget = None;
        assert_eq!(p.budget_range(), "from 4500000");
        p.min_budget = None;
        assert_eq!(p.budget_range(), "unspecified");
        p.max_budget = Some(6_000_000.0);
        assert_eq!(p.budget_range(), "up to 6000000");
    }

    #[test]
    fn test_batch_query_is_project_name() {
        let req = NurtureRequest::Batch {
            campaign: brief(),
            leads: vec![profile("Asha")],
        };
        assert_eq!(req.retrieval_query(), "Lakeview Heights");
    }

    #[test]
    fn test_reply_query_concatenates_inbound() {
        let req = NurtureRequest::Reply {
            campaign: brief(),
            lead: profile("Asha"),
            conversation_id: 1,
            inbound: "what about parking?".to_string(),
            prior_summary: None,
        };
        assert_eq!(req.retrieval_query(), "what about parking? Lakeview Heights");
    }

    #[test]
    fn test_reply_query_with_blank_inbound_falls_back() {
        let req = NurtureRequest::Reply {
            campaign: brief(),
            lead: profile("Asha"),
            conversation_id: 1,
            inbound: "   ".to_string(),
            prior_summary: None,
        };
        assert_eq!(req.retrieval_query(), "Lakeview Heights");
    }

    #[test]
    fn test_profile_from_record() {
        let record = nurture_core::types::LeadRecord {
            id: 3,
            lead_ref: "L-3".to_string(),
            name: "Bilal".to_string(),
            email: "b@example.com".to_string(),
            phone: None,
            unit_type: None,
            min_budget: None,
            max_budget: None,
            status: None,
            last_summary: Some("asked for floor plans".to_string()),
            last_contact_at: None,
        };
        let profile = LeadProfile::from_record(&record);
        assert_eq!(profile.name, "Bilal");
        assert_eq!(profile.prior_summary.as_deref(), Some("asked for floor plans"));
    }
}
