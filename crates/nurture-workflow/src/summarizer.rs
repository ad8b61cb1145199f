//! Conversation summarization.
//!
//! Condenses a flattened transcript into a short rolling summary via a
//! low-temperature completion call. An entirely empty transcript is valid:
//! first contact has no prior messages and no reply yet.

use std::sync::Arc;

use nurture_core::config::WorkflowConfig;

use crate::completion::{CompletionRequest, CompletionService};
use crate::error::WorkflowError;
use crate::prompts::{self, SUMMARY_SYSTEM};
use crate::state::GeneratedMessage;

/// Build the flattened transcript for summarization: generated message
/// texts joined in order, then the latest lead/AI exchange.
pub fn build_transcript(
    messages: &[GeneratedMessage],
    lead_reply: Option<&str>,
    ai_reply: Option<&str>,
) -> String {
    let joined = messages
        .iter()
        .map(|m| m.message.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{}\nLatest lead reply: {}\nAI reply: {}",
        joined,
        lead_reply.unwrap_or(""),
        ai_reply.unwrap_or(""),
    )
}

/// Summarization service over the completion endpoint.
pub struct Summarizer {
    completion: Arc<dyn CompletionService>,
    temperature: f32,
}

impl Summarizer {
    pub fn new(completion: Arc<dyn CompletionService>, config: &WorkflowConfig) -> Self {
        Self {
            completion,
            temperature: config.summary_temperature,
        }
    }

    /// Produce a short summary of the transcript.
    pub async fn summarize(&self, transcript: &str) -> Result<String, WorkflowError> {
        let request = CompletionRequest::new(prompts::summary_prompt(transcript), self.temperature)
            .with_system(SUMMARY_SYSTEM);
        self.completion.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    struct EchoCompletion;

    #[async_trait]
    impl CompletionService for EchoCompletion {
        async fn complete(&self, request: CompletionRequest) -> Result<String, WorkflowError> {
            assert_eq!(request.system.as_deref(), Some(SUMMARY_SYSTEM));
            Ok(format!("summary of: {}", request.prompt.len()))
        }
    }

    // ---- Transcript building ----

    #[test]
    fn test_transcript_joins_messages_and_exchange() {
        let messages = vec![
            GeneratedMessage {
                lead: "Asha".to_string(),
                message: "Hi Asha".to_string(),
            },
            GeneratedMessage {
                lead: "Bilal".to_string(),
                message: "Hi Bilal".to_string(),
            },
        ];
        let transcript = build_transcript(&messages, Some("tell me more"), Some("of course"));
        assert!(transcript.starts_with("Hi Asha\nHi Bilal\n"));
        assert!(transcript.contains("Latest lead reply: tell me more"));
        assert!(transcript.contains("AI reply: of course"));
    }

    #[test]
    fn test_transcript_empty_everything() {
        let transcript = build_transcript(&[], None, None);
        assert_eq!(transcript, "\nLatest lead reply: \nAI reply: ");
    }

    // ---- Summarization ----

    #[tokio::test]
    async fn test_summarize_non_empty_transcript() {
        let summarizer = Summarizer::new(Arc::new(EchoCompletion), &WorkflowConfig::default());
        let summary = summarizer
            .summarize("lead: hi\nai: hello")
            .await
            .unwrap();
        assert!(!summary.is_empty());
    }

    #[tokio::test]
    async fn test_summarize_tolerates_empty_transcript() {
        let summarizer = Summarizer::new(Arc::new(EchoCompletion), &WorkflowConfig::default());
        let transcript = build_transcript(&[], None, None);
        assert!(summarizer.summarize(&transcript).await.is_ok());
    }

    #[tokio::test]
    async fn test_summarize_uses_low_temperature() {
        struct AssertTemp;

        #[async_trait]
        impl CompletionService for AssertTemp {
            async fn complete(&self, request: CompletionRequest) -> Result<String, WorkflowError> {
                assert!((request.temperature - 0.3).abs() < f32::EPSILON);
                assert_eq!(request.max_tokens, None);
                Ok("s".to_string())
            }
        }

        let summarizer = Summarizer::new(Arc::new(AssertTemp), &WorkflowConfig::default());
        summarizer.summarize("x").await.unwrap();
    }
}
