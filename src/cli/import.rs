//! `mindlog import`: load a `memory.json` array into the journal.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use mindlog::config::MindlogConfig;
use mindlog::embedding::{EmbeddingProvider, EMBEDDING_DIM};
use mindlog::journal::store::{get_entry, write_entry};
use mindlog::journal::types::JournalRecord;

/// One element of a `memory.json` export: the record plus its stored vector.
#[derive(Debug, Deserialize)]
struct ImportRecord {
    #[serde(flatten)]
    record: JournalRecord,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

#[derive(Debug, Default, PartialEq)]
struct ImportSummary {
    imported: u64,
    reembedded: u64,
    existing: u64,
    malformed: u64,
}

/// Import journal records from a JSON array file.
///
/// Stored embeddings of the right size are reused; anything else is re-embedded
/// with the local model. Records whose id already exists are skipped.
pub async fn import(config: &MindlogConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;
    let values: Vec<serde_json::Value> =
        serde_json::from_str(&json).context("failed to parse import JSON (expected an array)")?;

    let mut conn = mindlog::db::open_database(config.resolved_db_path())?;

    println!("Importing {} entries...", values.len());

    let mut provider: Option<Arc<dyn EmbeddingProvider>> = None;
    let mut summary = ImportSummary::default();

    for (index, value) in values.into_iter().enumerate() {
        let Some(item) = parse_record(index, value, &mut summary) else {
            continue;
        };
        if already_stored(&conn, &item.record)? {
            summary.existing += 1;
            continue;
        }

        let embedding = match item.embedding {
            Some(v) if v.len() == EMBEDDING_DIM => v,
            _ => {
                let ep = match provider.clone() {
                    Some(p) => p,
                    None => {
                        let p: Arc<dyn EmbeddingProvider> =
                            Arc::from(mindlog::embedding::create_provider(&config.embedding)?);
                        provider = Some(Arc::clone(&p));
                        p
                    }
                };
                let content = item.record.content.clone();
                summary.reembedded += 1;
                tokio::task::spawn_blocking(move || ep.embed(&content)).await??
            }
        };

        store_record(&mut conn, &item.record, &embedding, &mut summary)?;
    }

    println!("Import complete:");
    println!("  Entries imported:  {}", summary.imported);
    println!("  Re-embedded:       {}", summary.reembedded);
    println!("  Skipped (exist):   {}", summary.existing);
    if summary.malformed > 0 {
        println!("  Skipped (invalid): {}", summary.malformed);
    }

    Ok(())
}

fn parse_record(
    index: usize,
    value: serde_json::Value,
    summary: &mut ImportSummary,
) -> Option<ImportRecord> {
    match serde_json::from_value(value) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::warn!(index, error = %e, "skipping malformed record");
            summary.malformed += 1;
            None
        }
    }
}

/// True when the id is already in the journal. A stored copy always wins.
fn already_stored(conn: &Connection, record: &JournalRecord) -> Result<bool> {
    let Some(stored) = get_entry(conn, &record.id)? else {
        return Ok(false);
    };
    if stored != *record {
        tracing::warn!(id = %record.id, "stored entry differs from import, keeping stored copy");
    }
    Ok(true)
}

fn store_record(
    conn: &mut Connection,
    record: &JournalRecord,
    embedding: &[f32],
    summary: &mut ImportSummary,
) -> Result<()> {
    write_entry(conn, record, embedding)
        .with_context(|| format!("failed to import entry {}", record.id))?;
    summary.imported += 1;
    Ok(())
}
