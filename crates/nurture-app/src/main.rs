//! Nurture application binary - composition root.
//!
//! Ties together all nurture crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Open storage (SQLite with migrations)
//! 3. Build the generation pipeline (retrieval + completion clients)
//! 4. Register notification channels
//! 5. Dispatch the requested coordinator operation and print its JSON
//!    response

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use uuid::Uuid;

use nurture_core::config::NurtureConfig;
use nurture_core::error::NurtureError;
use nurture_notify::{EmailNotifier, NotifierRegistry, WhatsAppNotifier};
use nurture_service::NurtureCoordinator;
use nurture_storage::{
    CampaignRepository, ConversationRepository, Database, LeadDraft, LeadRepository, SqliteStore,
    StorageError,
};
use nurture_workflow::{
    BrochureRetrieval, ChromaRetrieval, CompletionService, NurturePipeline, OpenAiCompletion,
};

mod cli;

use cli::{CliArgs, Command};

/// Expand ~ to home directory in a path string.
fn expand_home(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

fn open_store(data_dir: &Path) -> Result<Arc<SqliteStore>, StorageError> {
    let db = Database::new(&data_dir.join("nurture.db"))?;
    Ok(Arc::new(SqliteStore::new(Arc::new(db))))
}

fn build_coordinator(
    config: &NurtureConfig,
    store: Arc<SqliteStore>,
) -> Result<NurtureCoordinator, NurtureError> {
    let retrieval: Arc<dyn BrochureRetrieval> =
        Arc::new(ChromaRetrieval::from_config(&config.retrieval));
    let completion: Arc<dyn CompletionService> =
        Arc::new(OpenAiCompletion::from_config(&config.completion)?);
    let pipeline = NurturePipeline::new(retrieval, completion, &config.workflow);

    let mut notifiers = NotifierRegistry::new();
    notifiers.register("email", Arc::new(EmailNotifier::from_config(&config.notify)));
    notifiers.register("whatsapp", Arc::new(WhatsAppNotifier));

    Ok(NurtureCoordinator::new(
        Arc::clone(&store) as Arc<dyn LeadRepository>,
        Arc::clone(&store) as Arc<dyn CampaignRepository>,
        store as Arc<dyn ConversationRepository>,
        notifiers,
        pipeline,
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Tracing.
    let filter = match args.resolve_log_level() {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting nurture v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = args.resolve_config_path();
    let config = NurtureConfig::load_or_default(&config_file);

    // Storage location.
    let data_dir = expand_home(
        &args
            .resolve_data_dir()
            .unwrap_or_else(|| config.general.data_dir.clone()),
    );

    match args.command {
        Command::InitConfig => {
            NurtureConfig::default().save(&config_file)?;
            println!("Configuration written to {}", config_file.display());
        }

        Command::AddLead {
            name,
            email,
            lead_ref,
            phone,
            unit_type,
            min_budget,
            max_budget,
        } => {
            let store = open_store(&data_dir)?;
            let draft = LeadDraft {
                lead_ref: lead_ref.unwrap_or_else(|| format!("L-{}", Uuid::new_v4())),
                name,
                email,
                phone,
                unit_type,
                min_budget,
                max_budget,
                status: None,
                last_summary: None,
            };
            let id = LeadRepository::create(&*store, &draft)?;
            println!("Created lead {} ({})", id, draft.lead_ref);
        }

        Command::CreateCampaign {
            name,
            project,
            offer,
            channel,
            leads,
        } => {
            let store = open_store(&data_dir)?;
            let coordinator = build_coordinator(&config, store)?;
            let response = coordinator
                .create_campaign(&name, &project, &offer, &channel, &leads)
                .await;
            print_json(&response)?;
        }

        Command::StartCampaign { campaign, leads } => {
            let store = open_store(&data_dir)?;
            let coordinator = build_coordinator(&config, store)?;
            let response = coordinator.start_campaign(campaign, &leads).await;
            print_json(&response)?;
        }

        Command::SendMessage { conversation, text } => {
            let store = open_store(&data_dir)?;
            let coordinator = build_coordinator(&config, store)?;
            let response = coordinator.continue_conversation(conversation, &text).await;
            print_json(&response)?;
        }
    }

    Ok(())
}
