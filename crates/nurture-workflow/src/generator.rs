//! Per-lead message generation.
//!
//! Batch mode fans one generation unit per lead onto a bounded tokio task
//! pool. Units share no mutable state; campaign and brochure context are
//! cloned into each task. A failed unit is logged and omitted from the
//! output, and never aborts its siblings.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use nurture_core::config::WorkflowConfig;

use crate::completion::{CompletionRequest, CompletionService};
use crate::error::WorkflowError;
use crate::prompts::{self, NO_SUMMARY_PLACEHOLDER};
use crate::state::{CampaignBrief, GeneratedMessage, LeadProfile};

/// Batch outreach generator with bounded parallel fan-out.
pub struct MessageGenerator {
    completion: Arc<dyn CompletionService>,
    max_concurrency: usize,
    max_tokens: u32,
    temperature: f32,
}

impl MessageGenerator {
    pub fn new(completion: Arc<dyn CompletionService>, config: &WorkflowConfig) -> Self {
        Self {
            completion,
            max_concurrency: config.max_concurrency.max(1),
            max_tokens: config.message_max_tokens,
            temperature: config.message_temperature,
        }
    }

    /// Generate one personalized message per lead.
    ///
    /// Returns results in completion order, one entry per unit that
    /// succeeded. All units settle (success or failure) before this
    /// returns. Zero leads yields an empty vec.
    pub async fn generate(
        &self,
        campaign: &CampaignBrief,
        leads: &[LeadProfile],
        brochure: &str,
    ) -> Vec<GeneratedMessage> {
        if leads.is_empty() {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut units: JoinSet<Result<GeneratedMessage, (String, WorkflowError)>> = JoinSet::new();

        for lead in leads {
            let completion = Arc::clone(&self.completion);
            let semaphore = Arc::clone(&semaphore);
            let prompt = prompts::outreach_prompt(lead, campaign, brochure);
            let name = lead.name.clone();
            let request = CompletionRequest::new(prompt, self.temperature)
                .with_max_tokens(self.max_tokens);

            units.spawn(async move {
                // Closed semaphore is unreachable; treat it as a unit failure.
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| (name.clone(), WorkflowError::Completion(e.to_string())))?;
                match completion.complete(request).await {
                    Ok(message) => Ok(GeneratedMessage {
                        lead: name,
                        message,
                    }),
                    Err(e) => Err((name, e)),
                }
            });
        }

        let mut messages = Vec::with_capacity(leads.len());
        while let Some(joined) = units.join_next().await {
            match joined {
                Ok(Ok(message)) => {
                    debug!(lead = %message.lead, "Generated outreach message");
                    messages.push(message);
                }
                Ok(Err((lead, e))) => {
                    warn!(lead = %lead, error = %e, "Message generation unit failed");
                }
                Err(e) => {
                    warn!(error = %e, "Message generation unit panicked");
                }
            }
        }
        messages
    }
}

/// Single-reply generator for an ongoing conversation.
pub struct ReplyGenerator {
    completion: Arc<dyn CompletionService>,
    temperature: f32,
}

impl ReplyGenerator {
    pub fn new(completion: Arc<dyn CompletionService>, config: &WorkflowConfig) -> Self {
        Self {
            completion,
            temperature: config.message_temperature,
        }
    }

    /// Produce exactly one reply to the inbound text.
    ///
    /// No token cap: reply length is left to the completion service
    /// default. The prior summary placeholder is substituted when absent.
    pub async fn reply(
        &self,
        inbound: &str,
        prior_summary: Option<&str>,
        brochure: &str,
    ) -> Result<String, WorkflowError> {
        let summary = prior_summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(NO_SUMMARY_PLACEHOLDER);
        let prompt = prompts::reply_prompt(inbound, summary, brochure);
        self.completion
            .complete(CompletionRequest::new(prompt, self.temperature))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Scripted completion: echoes a tag, fails for designated lead names,
    /// and tracks in-flight concurrency.
    struct StubCompletion {
        fail_for: Vec<String>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl StubCompletion {
        fn new(fail_for: &[&str]) -> Self {
            Self {
                fail_for: fail_for.iter().map(|s| s.to_string()).collect(),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionService for StubCompletion {
        async fn complete(&self, request: CompletionRequest) -> Result<String, WorkflowError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let failing = self.fail_for.iter().any(|n| request.prompt.contains(n));
            self.requests.lock().unwrap().push(request);
            if failing {
                Err(WorkflowError::Completion("rate limit".to_string()))
            } else {
                Ok("Generated message".to_string())
            }
        }
    }

    fn campaign() -> CampaignBrief {
        CampaignBrief {
            project_name: "Lakeview Heights".to_string(),
            offer_details: "5% off".to_string(),
        }
    }

    fn lead(name: &str) -> LeadProfile {
        LeadProfile {
            name: name.to_string(),
            unit_type: None,
            min_budget: None,
            max_budget: None,
            prior_summary: None,
        }
    }

    fn config(max_concurrency: usize) -> WorkflowConfig {
        WorkflowConfig {
            max_concurrency,
            ..WorkflowConfig::default()
        }
    }

    // ---- Batch generation ----

    #[tokio::test]
    async fn test_generates_one_message_per_lead() {
        let stub = Arc::new(StubCompletion::new(&[]));
        let generator = MessageGenerator::new(stub, &config(4));
        let leads = vec![lead("Asha"), lead("Bilal"), lead("Chen")];
        let messages = generator.generate(&campaign(), &leads, "").await;
        assert_eq!(messages.len(), 3);
        let mut names: Vec<_> = messages.iter().map(|m| m.lead.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Asha", "Bilal", "Chen"]);
    }

    #[tokio::test]
    async fn test_failed_unit_is_omitted_not_fatal() {
        let stub = Arc::new(StubCompletion::new(&["Bilal"]));
        let generator = MessageGenerator::new(stub, &config(4));
        let leads = vec![lead("Asha"), lead("Bilal"), lead("Chen")];
        let messages = generator.generate(&campaign(), &leads, "").await;
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.lead != "Bilal"));
    }

    #[tokio::test]
    async fn test_all_units_failing_yields_empty() {
        let stub = Arc::new(StubCompletion::new(&["Asha", "Bilal"]));
        let generator = MessageGenerator::new(stub, &config(4));
        let messages = generator
            .generate(&campaign(), &[lead("Asha"), lead("Bilal")], "")
            .await;
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_zero_leads_is_trivially_empty() {
        let stub = Arc::new(StubCompletion::new(&[]));
        let generator = MessageGenerator::new(Arc::clone(&stub) as Arc<dyn CompletionService>, &config(4));
        let messages = generator.generate(&campaign(), &[], "").await;
        assert!(messages.is_empty());
        assert!(stub.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let stub = Arc::new(StubCompletion::new(&[]));
        let generator =
            MessageGenerator::new(Arc::clone(&stub) as Arc<dyn CompletionService>, &config(2));
        let leads: Vec<LeadProfile> = (0..10).map(|i| lead(&format!("Lead{}", i))).collect();
        generator.generate(&campaign(), &leads, "").await;
        assert!(stub.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_units_carry_token_cap_and_temperature() {
        let stub = Arc::new(StubCompletion::new(&[]));
        let generator =
            MessageGenerator::new(Arc::clone(&stub) as Arc<dyn CompletionService>, &config(4));
        generator.generate(&campaign(), &[lead("Asha")], "").await;
        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, Some(200));
        assert!((requests[0].temperature - 0.7).abs() < f32::EPSILON);
    }

    // ---- Reply generation ----

    #[tokio::test]
    async fn test_reply_success() {
        let stub = Arc::new(StubCompletion::new(&[]));
        let generator = ReplyGenerator::new(stub, &WorkflowConfig::default());
        let reply = generator
            .reply("is parking included?", Some("wants 2BHK"), "2 slots")
            .await
            .unwrap();
        assert_eq!(reply, "Generated message");
    }

    #[tokio::test]
    async fn test_reply_has_no_token_cap() {
        let stub = Arc::new(StubCompletion::new(&[]));
        let generator = ReplyGenerator::new(
            Arc::clone(&stub) as Arc<dyn CompletionService>,
            &WorkflowConfig::default(),
        );
        generator.reply("hi", None, "").await.unwrap();
        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests[0].max_tokens, None);
    }

    #[tokio::test]
    async fn test_reply_substitutes_summary_placeholder() {
        let stub = Arc::new(StubCompletion::new(&[]));
        let generator = ReplyGenerator::new(
            Arc::clone(&stub) as Arc<dyn CompletionService>,
            &WorkflowConfig::default(),
        );
        generator.reply("hi", None, "").await.unwrap();
        generator.reply("hi", Some("   "), "").await.unwrap();
        let requests = stub.requests.lock().unwrap();
        assert!(requests[0].prompt.contains(NO_SUMMARY_PLACEHOLDER));
        assert!(requests[1].prompt.contains(NO_SUMMARY_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_reply_failure_propagates() {
        let stub = Arc::new(StubCompletion::new(&["parking"]));
        let generator = ReplyGenerator::new(stub, &WorkflowConfig::default());
        let err = generator.reply("parking?", None, "").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Completion(_)));
    }
}
