//! Curriculum Seeder
//!
//! Uploads a curriculum JSON file into Firestore, one document per
//! lesson with the day number as the document ID. Re-running is safe:
//! each upload is a full-document upsert.
//!
//! The file is a JSON array of `{day, topic, status}` objects; `status`
//! defaults to `pending` when omitted.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use synapse_agent::{config::FirestoreConfig, firestore::FirestoreStore};
use synapse_core::lesson::{LessonRecord, LessonStatus};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seed", version, about = "Upload a curriculum JSON file into Firestore")]
struct Cli {
    /// Path to the curriculum JSON file
    #[arg(short, long, default_value = "curriculum.json")]
    curriculum: PathBuf,
}

#[derive(Deserialize)]
struct CurriculumEntry {
    day: u32,
    topic: String,
    #[serde(default = "pending")]
    status: LessonStatus,
}

fn pending() -> LessonStatus {
    LessonStatus::Pending
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = FirestoreConfig::from_env().context("Failed to load Firestore configuration")?;
    let store = FirestoreStore::new(config);

    let raw = std::fs::read_to_string(&cli.curriculum)
        .with_context(|| format!("Could not read {}", cli.curriculum.display()))?;
    let entries: Vec<CurriculumEntry> =
        serde_json::from_str(&raw).context("Curriculum file is not a JSON array of lessons")?;

    info!(count = entries.len(), "Uploading curriculum");
    for entry in entries {
        let lesson = LessonRecord {
            id: entry.day.to_string(),
            day: entry.day,
            topic: entry.topic,
            status: entry.status,
        };
        store
            .put_lesson(&lesson)
            .await
            .with_context(|| format!("Failed to upload day {}", lesson.day))?;
        info!(day = lesson.day, topic = %lesson.topic, "Uploaded lesson");
    }

    info!("Upload complete");
    Ok(())
}
