//! Nearest-neighbour search over entry embeddings, and the recent-entries tail.

use anyhow::{ensure, Result};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashMap;

use crate::journal::store::{row_to_record, RECORD_COLUMNS};
use crate::journal::types::JournalRecord;

/// One semantic search hit. Lower `score` is closer.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub content: String,
    /// Squared L2 distance between the query and entry embeddings.
    pub score: f64,
    pub timestamp: String,
}

/// Nearest `top_k` entries to the query embedding, closest first.
pub fn semantic_search(
    conn: &Connection,
    query_embedding: &[f32],
    top_k: usize,
) -> Result<Vec<SearchHit>> {
    ensure!(top_k >= 1, "top_k must be at least 1");

    let neighbours = vector_search(conn, query_embedding, top_k)?;
    if neighbours.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<&str> = neighbours.iter().map(|(id, _)| id.as_str()).collect();
    let records = fetch_records(conn, &ids)?;

    let hits = neighbours
        .into_iter()
        .filter_map(|(id, distance)| {
            records.get(&id).map(|record| SearchHit {
                id: record.id.clone(),
                content: record.content.clone(),
                score: distance * distance,
                timestamp: record.timestamp.clone(),
            })
        })
        .collect();
    Ok(hits)
}

/// The last `limit` records in insertion order, oldest of them first.
/// A zero limit returns nothing.
pub fn recent_entries(conn: &Connection, limit: usize) -> Result<Vec<JournalRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM ( \
             SELECT rowid AS seq, {RECORD_COLUMNS} FROM journal_entries \
             ORDER BY rowid DESC LIMIT ?1 \
         ) ORDER BY seq"
    ))?;
    let records = stmt
        .query_map(params![limit as i64], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Vector KNN search via sqlite-vec. Returns (id, L2 distance) pairs.
fn vector_search(conn: &Connection, embedding: &[f32], limit: usize) -> Result<Vec<(String, f64)>> {
    let embedding_bytes = super::embedding_to_bytes(embedding);
    let mut stmt = conn.prepare(
        "SELECT id, distance FROM entries_vec \
         WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2",
    )?;
    let results = stmt
        .query_map(params![embedding_bytes, limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(results)
}

/// Batch-fetch records by id.
fn fetch_records(conn: &Connection, ids: &[&str]) -> Result<HashMap<String, JournalRecord>> {
    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM journal_entries WHERE id IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(ids), row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows.into_iter().map(|r| (r.id.clone(), r)).collect())
}
