//! CLI `recent` command: print the newest entries, oldest first.

use anyhow::Result;

use mindlog::config::MindlogConfig;
use mindlog::journal::search::recent_entries;

use super::search::preview;

/// Print the most recent entries, oldest first.
pub fn recent(config: &MindlogConfig, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(config.retrieval.recent_limit);
    let conn = mindlog::db::open_database(config.resolved_db_path())?;

    let records = recent_entries(&conn, limit)?;
    if records.is_empty() {
        println!("No entries yet.");
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  [{} {:.2}{}] {}",
            record.timestamp,
            record.sentiment.label,
            record.sentiment.score,
            if record.sentiment.mixed { ", mixed" } else { "" },
            record.intent.as_deref().unwrap_or("-"),
        );
        println!("    {}", preview(&record.content));
        if let Some(reflection) = &record.reflection {
            println!("    > {reflection}");
        }
    }

    Ok(())
}
