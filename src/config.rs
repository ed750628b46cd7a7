use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::journal::profile;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MindlogConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub sentiment: SentimentConfig,
    pub retrieval: RetrievalConfig,
    pub profile: ProfileConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub cache_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SentimentConfig {
    pub provider: String,
    pub model: String,
    pub cache_dir: String,
    /// Class labels in logit order.
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_top_k: usize,
    pub recent_limit: usize,
}

/// Tunables for the weekly profile builder. Defaults reproduce the
/// constants in [`crate::journal::profile`].
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProfileConfig {
    pub default_window_days: u32,
    pub min_entries: usize,
    pub moderate_volatility: f64,
    pub high_volatility: f64,
    pub volume_saturation: f64,
    pub weight_volume: f64,
    pub weight_span: f64,
    pub weight_diversity: f64,
    pub diversity_denominator: f64,
    pub max_intents: usize,
    /// Sort the window by parsed timestamp before computing volatility and span.
    pub chronological: bool,
    /// Cap the diversity score at 1.0 when more than two labels show up.
    pub clamp_diversity: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            log_level: "info".into(),
            cors_origins: vec![
                "http://127.0.0.1:5500".into(),
                "http://localhost:5500".into(),
            ],
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_mindlog_dir()
            .join("journal.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let cache_dir = default_mindlog_dir()
            .join("models")
            .join("all-MiniLM-L6-v2")
            .to_string_lossy()
            .into_owned();
        Self {
            provider: "local".into(),
            model: "all-MiniLM-L6-v2".into(),
            cache_dir,
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        let cache_dir = default_mindlog_dir()
            .join("models")
            .join("distilbert-sst2")
            .to_string_lossy()
            .into_owned();
        Self {
            provider: "local".into(),
            model: "distilbert-base-uncased-finetuned-sst-2-english".into(),
            cache_dir,
            labels: vec!["NEGATIVE".into(), "POSITIVE".into()],
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: 3,
            recent_limit: 5,
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_window_days: profile::DEFAULT_WINDOW_DAYS,
            min_entries: profile::MIN_PROFILE_ENTRIES,
            moderate_volatility: profile::MODERATE_VOLATILITY,
            high_volatility: profile::HIGH_VOLATILITY,
            volume_saturation: profile::VOLUME_SATURATION,
            weight_volume: profile::WEIGHT_VOLUME,
            weight_span: profile::WEIGHT_SPAN,
            weight_diversity: profile::WEIGHT_DIVERSITY,
            diversity_denominator: profile::DIVERSITY_DENOMINATOR,
            max_intents: profile::MAX_DOMINANT_INTENTS,
            chronological: false,
            clamp_diversity: false,
        }
    }
}

/// Returns `~/.mindlog/`
pub fn default_mindlog_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mindlog")
}

/// Returns the default config file path: `~/.mindlog/config.toml`
pub fn default_config_path() -> PathBuf {
    default_mindlog_dir().join("config.toml")
}

impl MindlogConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MindlogConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MINDLOG_DB, MINDLOG_LOG_LEVEL, MINDLOG_PORT).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MINDLOG_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("MINDLOG_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("MINDLOG_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid MINDLOG_PORT"),
            }
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
