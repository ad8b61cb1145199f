//! CLI argument definitions for the nurture application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nurture — lead-nurture orchestration for real-estate campaigns.
#[derive(Parser, Debug)]
#[command(name = "nurture", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Data directory for the SQLite database.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file and exit.
    InitConfig,

    /// Register a lead.
    AddLead {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// External reference id. Generated when omitted.
        #[arg(long = "lead-ref")]
        lead_ref: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Unit type of interest, e.g. "2BHK".
        #[arg(long = "unit-type")]
        unit_type: Option<String>,
        #[arg(long = "min-budget")]
        min_budget: Option<f64>,
        #[arg(long = "max-budget")]
        max_budget: Option<f64>,
    },

    /// Create a campaign, link its shortlisted leads, and announce the
    /// offer over the configured channel.
    CreateCampaign {
        #[arg(long)]
        name: String,
        /// Project the campaign promotes.
        #[arg(long)]
        project: String,
        #[arg(long)]
        offer: String,
        #[arg(long, default_value = "email")]
        channel: String,
        /// Comma-separated lead ids.
        #[arg(long, value_delimiter = ',')]
        leads: Vec<i64>,
    },

    /// Generate and deliver personalized opening outreach for a
    /// campaign's leads.
    StartCampaign {
        #[arg(long)]
        campaign: i64,
        /// Comma-separated lead ids.
        #[arg(long, value_delimiter = ',')]
        leads: Vec<i64>,
    },

    /// Record an inbound lead message and generate the AI reply.
    SendMessage {
        #[arg(long)]
        conversation: i64,
        #[arg(long)]
        text: String,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > NURTURE_CONFIG env var > ~/.nurture/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("NURTURE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory path.
    ///
    /// Priority: --data-dir flag > config file value.
    /// Returns `None` if not overridden (use config default).
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > RUST_LOG env var > "info".
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".nurture").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".nurture").join("config.toml");
    }
    PathBuf::from("config.toml")
}
