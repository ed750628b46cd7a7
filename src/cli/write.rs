//! CLI `write` command: analyze, embed and store one journal entry.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;

use mindlog::config::MindlogConfig;
use mindlog::embedding::EmbeddingProvider;
use mindlog::journal::entry::compose_record;
use mindlog::journal::store::write_entry;
use mindlog::sentiment::SentimentAnalyzer;

/// Analyze, embed and store one journal entry, then print the stored record.
pub async fn write(config: &MindlogConfig, text: &str) -> Result<()> {
    anyhow::ensure!(!text.trim().is_empty(), "entry text must not be empty");

    let mut conn = mindlog::db::open_database(config.resolved_db_path())?;

    let analyzer: Arc<dyn SentimentAnalyzer> =
        Arc::from(mindlog::sentiment::create_analyzer(&config.sentiment)?);
    let provider: Arc<dyn EmbeddingProvider> =
        Arc::from(mindlog::embedding::create_provider(&config.embedding)?);

    let entry_text = text.to_string();
    let (prediction, embedding) = tokio::task::spawn_blocking(move || -> Result<_> {
        Ok((analyzer.analyze(&entry_text)?, provider.embed(&entry_text)?))
    })
    .await??;

    let record = compose_record(text, prediction, Utc::now());
    write_entry(&mut conn, &record, &embedding)?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
