//! Private journaling with a weekly emotional profile.
//!
//! Mindlog stores short free-text journal entries. Each entry is tagged at
//! write time with a sentiment label, a mixed-emotion flag, a coarse intent,
//! a supportive reflection, and a semantic embedding. On request it summarizes
//! the trailing window of entries into a [`journal::profile::WeeklyProfile`].
//!
//! # Architecture
//!
//! - **Storage**: SQLite with [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   for nearest-neighbour search over entry embeddings
//! - **Models**: Local ONNX Runtime, all-MiniLM-L6-v2 for embeddings (384
//!   dimensions) and DistilBERT SST-2 for sentiment
//! - **Transport**: JSON over HTTP (axum), plus a CLI
//!
//! # Modules
//!
//! - [`config`]: configuration loading from TOML files and environment variables
//! - [`db`]: SQLite initialization, schema, migrations, and health checks
//! - [`embedding`]: text-to-vector pipeline
//! - [`sentiment`]: sentiment classification
//! - [`journal`]: entry records, write path, search, and the weekly profile builder
//! - [`server`]: HTTP API

pub mod config;
pub mod db;
pub mod embedding;
pub mod journal;
pub mod onnx;
pub mod sentiment;
pub mod server;
