#![allow(dead_code)]

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use mindlog::db;
use mindlog::embedding::EMBEDDING_DIM;
use mindlog::journal::types::{JournalRecord, Sentiment};
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::load_sqlite_vec();
    let mut conn = Connection::open_in_memory().unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&mut conn).unwrap();
    conn
}

/// Generate a deterministic 384-dim embedding with a spike at position `seed`.
/// Each seed produces a distinct, orthogonal vector.
pub fn test_embedding(seed: u16) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIM];
    v[seed as usize % EMBEDDING_DIM] = 1.0;
    v
}

/// A text record with the given label, intent and timestamp.
pub fn record(id: &str, label: &str, intent: Option<&str>, timestamp: &str) -> JournalRecord {
    JournalRecord {
        id: id.to_string(),
        kind: "text".to_string(),
        content: format!("entry {id}"),
        sentiment: Sentiment {
            label: label.to_string(),
            score: 0.9,
            mixed: false,
        },
        intent: intent.map(str::to_string),
        reflection: None,
        timestamp: timestamp.to_string(),
    }
}

/// RFC 3339 timestamp `hours` before `now`.
pub fn hours_before(now: DateTime<Utc>, hours: i64) -> String {
    (now - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Insert a record via the store's write path.
pub fn insert_entry(conn: &mut Connection, record: &JournalRecord, seed: u16) {
    mindlog::journal::store::write_entry(conn, record, &test_embedding(seed)).unwrap();
}
