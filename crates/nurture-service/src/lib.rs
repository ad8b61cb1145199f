//! Conversation coordination for lead nurturing.
//!
//! The coordinator is the boundary between the generation pipeline and the
//! outside world: it loads records, invokes the pipeline, reconciles the
//! outcome with persistence and notification, and returns structured
//! responses. No error crosses this boundary as a panic or raw propagation;
//! every operation reports success or failure in its response.

pub mod coordinator;
pub mod types;

pub use coordinator::NurtureCoordinator;
pub use types::{
    CreateCampaignResponse, DeliveryStatus, LeadOutcome, SendMessageResponse,
    StartCampaignResponse, DEFAULT_ACKNOWLEDGMENT, DEFAULT_GREETING,
};
