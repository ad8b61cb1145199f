use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{NurtureError, Result};

/// Top-level configuration for the nurture application.
///
/// Loaded from `~/.nurture/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NurtureConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl NurtureConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NurtureConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NurtureError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the SQLite database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.nurture/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Generation pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Maximum number of per-lead generation units running at once.
    pub max_concurrency: usize,
    /// Token cap for batch outreach messages.
    pub message_max_tokens: u32,
    /// Temperature for outreach and reply generation.
    pub message_temperature: f32,
    /// Temperature for conversation summarization.
    pub summary_temperature: f32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            message_max_tokens: 200,
            message_temperature: 0.7,
            summary_temperature: 0.3,
        }
    }
}

/// Brochure retrieval service settings (Chroma-style HTTP endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Base URL of the retrieval service.
    pub base_url: String,
    /// Collection holding indexed brochure chunks.
    pub collection: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            collection: "brochures".to_string(),
        }
    }
}

/// Completion service settings (OpenAI-style HTTP endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the completion service.
    pub base_url: String,
    /// Model identifier passed through to the service.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Outbound notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Sender address for email notifications.
    pub from_email: String,
    /// HTTP mail relay endpoint for email delivery.
    pub relay_url: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            from_email: "noreply@example.com".to_string(),
            relay_url: "http://localhost:2525/send".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NurtureConfig::default();
        assert_eq!(config.workflow.max_concurrency, 8);
        assert_eq!(config.workflow.message_max_tokens, 200);
        assert_eq!(config.retrieval.collection, "brochures");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_src = r#"
            [workflow]
            max_concurrency = 2
        "#;
        let config: NurtureConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.workflow.max_concurrency, 2);
        // Untouched fields keep their defaults.
        assert_eq!(config.workflow.message_max_tokens, 200);
        assert_eq!(config.completion.model, "gpt-4o-mini");
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: NurtureConfig = toml::from_str("").unwrap();
        assert_eq!(config.notify.from_email, "noreply@example.com");
        assert!((config.workflow.summary_temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_round_trip() {
        let config = NurtureConfig::default();
        let s = toml::to_string_pretty(&config).unwrap();
        let back: NurtureConfig = toml::from_str(&s).unwrap();
        assert_eq!(back.completion.base_url, config.completion.base_url);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config =
            NurtureConfig::load_or_default(Path::new("/nonexistent/nurture/config.toml"));
        assert_eq!(config.workflow.max_concurrency, 8);
    }
}
