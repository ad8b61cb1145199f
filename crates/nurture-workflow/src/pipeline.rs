//! The nurture pipeline: central orchestrator wiring retrieval, generation,
//! and summarization.
//!
//! Fixed topology, four stages run strictly in sequence per invocation:
//! retrieve brochure context, generate (batch fan-out or single reply),
//! summarize, return. The retrieve and summarize stages never fail on
//! empty input; the generate stage isolates per-unit failures in batch
//! mode and propagates completion failures in reply mode.

use std::sync::Arc;

use tracing::{debug, warn};

use nurture_core::config::WorkflowConfig;

use crate::completion::CompletionService;
use crate::error::WorkflowError;
use crate::generator::{MessageGenerator, ReplyGenerator};
use crate::retrieval::BrochureRetrieval;
use crate::state::{NurtureOutcome, NurtureRequest};
use crate::summarizer::{build_transcript, Summarizer};

/// Four-stage generation workflow orchestrator.
pub struct NurturePipeline {
    retrieval: Arc<dyn BrochureRetrieval>,
    generator: MessageGenerator,
    reply_generator: ReplyGenerator,
    summarizer: Summarizer,
}

impl NurturePipeline {
    pub fn new(
        retrieval: Arc<dyn BrochureRetrieval>,
        completion: Arc<dyn CompletionService>,
        config: &WorkflowConfig,
    ) -> Self {
        Self {
            retrieval,
            generator: MessageGenerator::new(Arc::clone(&completion), config),
            reply_generator: ReplyGenerator::new(Arc::clone(&completion), config),
            summarizer: Summarizer::new(completion, config),
        }
    }

    /// Run one pipeline invocation to completion.
    ///
    /// The request is consumed; the returned outcome is the terminal state.
    /// Only reply-mode completion failures and summarization failures
    /// surface as errors.
    pub async fn run(&self, request: NurtureRequest) -> Result<NurtureOutcome, WorkflowError> {
        // Stage 1: retrieve. A miss or a service failure yields empty
        // context, never a pipeline failure.
        let brochure = self.retrieve(&request).await;

        // Stage 2: generate. Stage 3: summarize, always.
        match request {
            NurtureRequest::Batch { campaign, leads } => {
                debug!(leads = leads.len(), project = %campaign.project_name, "Batch generation");
                let messages = self.generator.generate(&campaign, &leads, &brochure).await;
                let transcript = build_transcript(&messages, None, None);
                let summary = self.summarizer.summarize(&transcript).await?;
                Ok(NurtureOutcome {
                    brochure,
                    messages,
                    ai_reply: None,
                    summary,
                })
            }
            NurtureRequest::Reply {
                conversation_id,
                inbound,
                prior_summary,
                ..
            } => {
                // Empty inbound text makes the generate stage a no-op.
                let ai_reply = if inbound.trim().is_empty() {
                    None
                } else {
                    debug!(conversation_id, "Reply generation");
                    Some(
                        self.reply_generator
                            .reply(&inbound, prior_summary.as_deref(), &brochure)
                            .await?,
                    )
                };
                let transcript = build_transcript(&[], Some(&inbound), ai_reply.as_deref());
                let summary = self.summarizer.summarize(&transcript).await?;
                Ok(NurtureOutcome {
                    brochure,
                    messages: Vec::new(),
                    ai_reply,
                    summary,
                })
            }
        }
    }

    async fn retrieve(&self, request: &NurtureRequest) -> String {
        let query = request.retrieval_query();
        match self.retrieval.query(&query).await {
            Ok(passage) => {
                debug!(query = %query, hit = !passage.is_empty(), "Brochure retrieval");
                passage
            }
            Err(e) => {
                warn!(error = %e, "Brochure retrieval failed, continuing without context");
                String::new()
            }
        }
    }
}
