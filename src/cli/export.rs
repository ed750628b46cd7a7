//! CLI `export` command: dump every entry as a JSON array on stdout.

use anyhow::Result;

use mindlog::config::MindlogConfig;
use mindlog::journal::store::fetch_all;

/// Export every journal record as a JSON array to stdout.
pub fn export(config: &MindlogConfig) -> Result<()> {
    let conn = mindlog::db::open_database(config.resolved_db_path())?;
    let records = fetch_all(&conn)?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    eprintln!("Exported {} entries.", records.len());

    Ok(())
}
