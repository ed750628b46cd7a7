//! SQL DDL for all mindlog tables.
//!
//! Defines `journal_entries`, the `entries_vec` (vec0) embedding table, and
//! `schema_meta`. All DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
-- Journal entries, one row per record, rowid = insertion order
CREATE TABLE IF NOT EXISTS journal_entries (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL DEFAULT 'text',
    content TEXT NOT NULL,
    sentiment_label TEXT NOT NULL,
    sentiment_score REAL NOT NULL,
    sentiment_mixed INTEGER NOT NULL DEFAULT 0,
    intent TEXT,
    reflection TEXT,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entries_timestamp ON journal_entries(timestamp);
CREATE INDEX IF NOT EXISTS idx_entries_intent ON journal_entries(intent);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// vec0 virtual table must be created separately (sqlite-vec syntax).
const VEC_TABLE_SQL: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS entries_vec USING vec0(
    id TEXT PRIMARY KEY,
    embedding FLOAT[384]
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(VEC_TABLE_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
