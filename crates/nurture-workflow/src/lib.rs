//! Generation workflow for lead nurturing.
//!
//! Provides the four-stage orchestration pipeline (retrieve, generate,
//! summarize), the parallel per-lead message generator with failure
//! isolation, the single-reply generator, and the conversation summarizer,
//! together with the traits for the external retrieval and completion
//! services the pipeline consumes.

pub mod completion;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod prompts;
pub mod retrieval;
pub mod state;
pub mod summarizer;

pub use completion::{CompletionRequest, CompletionService, OpenAiCompletion};
pub use error::WorkflowError;
pub use generator::{MessageGenerator, ReplyGenerator};
pub use pipeline::NurturePipeline;
pub use retrieval::{BrochureRetrieval, ChromaRetrieval};
pub use state::{CampaignBrief, GeneratedMessage, LeadProfile, NurtureOutcome, NurtureRequest};
pub use summarizer::{build_transcript, Summarizer};
