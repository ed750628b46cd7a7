//! Write path and snapshot reads for the journal.
//!
//! [`write_entry`] inserts the record row and its embedding in one transaction.
//! [`fetch_all`] returns every record in insertion order, which is also what the
//! [`JournalRecordSource`] impl for [`Connection`] hands to the profile builder.

use anyhow::{ensure, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::embedding::EMBEDDING_DIM;
use crate::journal::types::{JournalRecord, Sentiment};

/// Column list shared by every record query, in [`row_to_record`] order.
pub(crate) const RECORD_COLUMNS: &str = "id, kind, content, sentiment_label, sentiment_score, \
     sentiment_mixed, intent, reflection, timestamp";

/// Anything that can hand over a full snapshot of journal records.
pub trait JournalRecordSource {
    fn fetch_all(&self) -> Result<Vec<JournalRecord>>;
}

impl JournalRecordSource for Connection {
    fn fetch_all(&self) -> Result<Vec<JournalRecord>> {
        fetch_all(self)
    }
}

impl JournalRecordSource for [JournalRecord] {
    fn fetch_all(&self) -> Result<Vec<JournalRecord>> {
        Ok(self.to_vec())
    }
}

/// Persist a record and its embedding atomically.
pub fn write_entry(conn: &mut Connection, record: &JournalRecord, embedding: &[f32]) -> Result<()> {
    ensure!(
        embedding.len() == EMBEDDING_DIM,
        "embedding has {} dimensions, expected {EMBEDDING_DIM}",
        embedding.len()
    );

    let tx = conn.transaction()?;

    tx.execute(
        &format!(
            "INSERT INTO journal_entries ({RECORD_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            record.id,
            record.kind,
            record.content,
            record.sentiment.label,
            record.sentiment.score,
            record.sentiment.mixed,
            record.intent,
            record.reflection,
            record.timestamp,
        ],
    )?;

    tx.execute(
        "INSERT INTO entries_vec (id, embedding) VALUES (?1, ?2)",
        params![record.id, super::embedding_to_bytes(embedding)],
    )?;

    tx.commit()?;
    tracing::debug!(id = %record.id, "journal entry written");
    Ok(())
}

/// Every record in insertion order.
pub fn fetch_all(conn: &Connection) -> Result<Vec<JournalRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM journal_entries ORDER BY rowid"
    ))?;
    let records = stmt
        .query_map([], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

pub fn get_entry(conn: &Connection, id: &str) -> Result<Option<JournalRecord>> {
    let record = conn
        .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM journal_entries WHERE id = ?1"),
            params![id],
            row_to_record,
        )
        .optional()?;
    Ok(record)
}

pub fn count_entries(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM journal_entries", [], |row| {
        row.get(0)
    })?;
    Ok(count as u64)
}

pub(crate) fn row_to_record(row: &Row<'_>) -> rusqlite::Result<JournalRecord> {
    Ok(JournalRecord {
        id: row.get(0)?,
        kind: row.get(1)?,
        content: row.get(2)?,
        sentiment: Sentiment {
            label: row.get(3)?,
            score: row.get(4)?,
            mixed: row.get(5)?,
        },
        intent: row.get(6)?,
        reflection: row.get(7)?,
        timestamp: row.get(8)?,
    })
}
