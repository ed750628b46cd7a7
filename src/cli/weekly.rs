//! CLI `weekly` command: print the emotional profile for a trailing window.

use anyhow::Result;

use mindlog::config::MindlogConfig;
use mindlog::journal::profile::weekly_profile;

/// Build the weekly profile from the local journal and print it as JSON.
pub fn weekly(config: &MindlogConfig, days: Option<u32>, chronological: bool) -> Result<()> {
    let days = days.unwrap_or(config.profile.default_window_days);
    anyhow::ensure!(days >= 1, "--days must be at least 1");

    let mut profile_config = config.profile.clone();
    profile_config.chronological |= chronological;

    let conn = mindlog::db::open_database(config.resolved_db_path())?;
    let profile = weekly_profile(&conn, days, &profile_config)?;

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
