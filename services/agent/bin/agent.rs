//! Main Entrypoint for the Synapse Lesson Agent
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Initializing the three collaborators (Firestore curriculum store,
//!    OpenAI-compatible lesson generator, Telegram message sink).
//! 4. Running the lesson progression controller exactly once and
//!    reporting the outcome through the process exit code.
//!
//! One invocation delivers at most one lesson; scheduling repeated runs
//! (and making sure they never overlap) is the caller's job.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use std::sync::Arc;
use synapse_agent::{
    config::{Config, Provider},
    firestore::FirestoreStore,
};
use synapse_core::{
    controller::{LessonProgressionController, RunOutcome},
    generator::{LessonGenerator, OpenAICompatibleGenerator},
    sink::{MessageSink, TelegramSink},
    store::CurriculumStore,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing collaborators...");

    // --- 3. Initialize Collaborators ---
    let llm_config = match &config.provider {
        Provider::OpenAI => {
            info!("Using OpenAI provider.");
            OpenAIConfig::new()
                .with_api_key(config.openai_api_key.as_ref().unwrap())
                .with_api_base("https://api.openai.com/v1/")
        }
        Provider::Gemini => {
            info!("Using Gemini provider.");
            OpenAIConfig::new()
                .with_api_key(config.gemini_api_key.as_ref().unwrap())
                .with_api_base("https://generativelanguage.googleapis.com/v1beta/openai")
        }
    };

    let store: Arc<dyn CurriculumStore> = Arc::new(FirestoreStore::new(config.firestore.clone()));
    let generator: Arc<dyn LessonGenerator> = Arc::new(OpenAICompatibleGenerator::new(
        llm_config,
        config.chat_model.clone(),
    ));
    let sink: Arc<dyn MessageSink> = Arc::new(TelegramSink::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
    ));

    let controller = LessonProgressionController::new(store, generator, sink);

    // --- 4. Run Once ---
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        "Starting lesson run"
    );
    match controller.run_once().await {
        Ok(RunOutcome::LessonDelivered { day, topic }) => {
            info!(day, topic = %topic, "Run finished: lesson delivered");
            Ok(())
        }
        Ok(RunOutcome::NoPendingLesson) => {
            info!("Run finished: curriculum exhausted, completion notice sent");
            Ok(())
        }
        Err(err) => Err(err).context("Lesson run failed"),
    }
}
