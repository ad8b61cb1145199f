//! Completion service trait and the OpenAI-style HTTP client.
//!
//! The pipeline treats text generation as a black-box request/response
//! service. `OpenAiCompletion` talks to any endpoint exposing the
//! `/chat/completions` wire shape; tests substitute scripted
//! implementations of the trait.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use nurture_core::config::CompletionConfig;

use crate::error::WorkflowError;

/// One completion call: a prompt, optional conversation framing, and
/// sampling parameters.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Optional system-style framing prepended to the prompt.
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    /// Token cap; `None` leaves the service default in place.
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// External text-completion service.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generate text for the request. Fails with
    /// `WorkflowError::Completion` on timeout, quota exhaustion, or a
    /// malformed response.
    async fn complete(&self, request: CompletionRequest) -> Result<String, WorkflowError>;
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Client for an OpenAI-style chat completions endpoint.
#[derive(Debug)]
pub struct OpenAiCompletion {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiCompletion {
    /// Build a client from configuration. The API key is read from the
    /// environment variable named in `config.api_key_env`.
    pub fn from_config(config: &CompletionConfig) -> Result<Self, WorkflowError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            WorkflowError::Completion(format!(
                "API key environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WorkflowError::Completion(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, WorkflowError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = request.system {
            messages.push(WireMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = WireRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WorkflowError::Completion("request timed out".to_string())
                } else {
                    WorkflowError::Completion(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(WorkflowError::Completion(format!(
                "service returned {}: {}",
                status, detail
            )));
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| WorkflowError::Completion(format!("malformed response: {}", e)))?;

        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| {
                WorkflowError::Completion("response missing message content".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = CompletionRequest::new("hello", 0.7)
            .with_system("be brief")
            .with_max_tokens(200);
        assert_eq!(req.prompt, "hello");
        assert_eq!(req.system.as_deref(), Some("be brief"));
        assert_eq!(req.max_tokens, Some(200));
    }

    #[test]
    fn test_wire_request_omits_absent_max_tokens() {
        let body = WireRequest {
            model: "gpt-4o-mini",
            messages: vec![WireMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.7,
            max_tokens: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("max_tokens"));
    }

    #[test]
    fn test_wire_request_includes_max_tokens() {
        let body = WireRequest {
            model: "gpt-4o-mini",
            messages: vec![],
            temperature: 0.3,
            max_tokens: Some(200),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"max_tokens\":200"));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = CompletionConfig {
            api_key_env: "NURTURE_TEST_KEY_DOES_NOT_EXIST".to_string(),
            ..CompletionConfig::default()
        };
        let err = OpenAiCompletion::from_config(&config).unwrap_err();
        assert!(matches!(err, WorkflowError::Completion(_)));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        std::env::set_var("NURTURE_TEST_KEY", "k");
        let config = CompletionConfig {
            base_url: "http://localhost:9999/v1/".to_string(),
            api_key_env: "NURTURE_TEST_KEY".to_string(),
            ..CompletionConfig::default()
        };
        let client = OpenAiCompletion::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/chat/completions");
    }
}
