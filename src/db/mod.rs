pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use sqlite_vec::sqlite3_vec_init;
use std::path::Path;
use std::sync::Once;

static SQLITE_VEC_INIT: Once = Once::new();

/// Register the sqlite-vec extension globally. Safe to call multiple times.
pub fn load_sqlite_vec() {
    SQLITE_VEC_INIT.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite3_vec_init as *const (),
        )));
    });
}

/// Open (or create) the journal database at the given path, with sqlite-vec
/// loaded, schema initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    load_sqlite_vec();

    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database for testing.
#[cfg(test)]
pub fn open_memory_database() -> Result<Connection> {
    load_sqlite_vec();
    let mut conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;
    Ok(conn)
}

/// Snapshot of database state for `mindlog doctor`.
#[derive(Debug)]
pub struct HealthReport {
    pub schema_version: u32,
    pub sqlite_vec_version: String,
    pub embedding_model: Option<String>,
    pub sentiment_model: Option<String>,
    pub entry_count: u64,
    pub vector_count: u64,
    pub integrity_ok: bool,
    pub integrity_details: String,
}

pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let schema_version = migrations::get_schema_version(conn)?;
    let sqlite_vec_version: String = conn.query_row("SELECT vec_version()", [], |r| r.get(0))?;
    let embedding_model = migrations::get_embedding_model(conn)?;
    let sentiment_model = migrations::get_sentiment_model(conn)?;

    let entry_count = crate::journal::store::count_entries(conn)?;
    let vector_count: i64 = conn.query_row("SELECT COUNT(*) FROM entries_vec", [], |r| r.get(0))?;

    let integrity_details: String =
        conn.query_row("PRAGMA integrity_check", [], |r| r.get(0))?;

    Ok(HealthReport {
        schema_version,
        sqlite_vec_version,
        embedding_model,
        sentiment_model,
        entry_count,
        vector_count: vector_count as u64,
        integrity_ok: integrity_details == "ok",
        integrity_details,
    })
}
