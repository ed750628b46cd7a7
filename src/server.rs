//! HTTP API.
//!
//! [`serve`] opens the database, loads both models and runs an axum router with
//! CORS and request tracing. Handlers move all inference and SQLite work onto
//! the blocking pool.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use rusqlite::Connection;
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::MindlogConfig;
use crate::db;
use crate::embedding::{self, EmbeddingProvider};
use crate::journal::entry::compose_record;
use crate::journal::profile::{weekly_profile, WeeklyProfile};
use crate::journal::search::{recent_entries, semantic_search, SearchHit};
use crate::journal::store::write_entry;
use crate::journal::types::JournalRecord;
use crate::sentiment::{self, SentimentAnalyzer};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub embedding: Arc<dyn EmbeddingProvider>,
    pub sentiment: Arc<dyn SentimentAnalyzer>,
    pub config: Arc<MindlogConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyParams {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub top_k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

/// Open the database and load both models.
pub fn setup_shared_state(config: MindlogConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    if let Ok(Some(stored_model)) = db::migrations::get_embedding_model(&conn) {
        if stored_model != config.embedding.model {
            tracing::warn!(
                stored = %stored_model,
                configured = %config.embedding.model,
                "embedding model changed; existing vectors may not be comparable"
            );
        }
    }

    let embedding: Arc<dyn EmbeddingProvider> =
        Arc::from(embedding::create_provider(&config.embedding)?);
    tracing::info!(model = %config.embedding.model, "embedding provider ready");

    let sentiment: Arc<dyn SentimentAnalyzer> =
        Arc::from(sentiment::create_analyzer(&config.sentiment)?);
    tracing::info!(model = %config.sentiment.model, "sentiment analyzer ready");

    Ok(AppState {
        db: Arc::new(Mutex::new(conn)),
        embedding,
        sentiment,
        config: Arc::new(config),
    })
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/cognition/weekly", get(weekly))
        .route("/journal/text", post(write_text))
        .route("/memory/semantic-search", post(search))
        .route("/memory/recent", get(recent))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the HTTP server and run until ctrl-c.
pub async fn serve(config: MindlogConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = setup_shared_state(config)?;
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "mindlog listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}

fn lock_db(db: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    db.lock()
        .map_err(|e| anyhow::anyhow!("database lock poisoned: {e}"))
}

async fn blocking<T, F>(f: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

fn require_text(text: &str) -> std::result::Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".into()));
    }
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn weekly(
    State(state): State<AppState>,
    Query(params): Query<WeeklyParams>,
) -> ApiResult<WeeklyProfile> {
    let days = params.days.unwrap_or(state.config.profile.default_window_days);
    if days == 0 {
        return Err(ApiError::BadRequest("days must be at least 1".into()));
    }

    let profile = blocking(move || {
        let conn = lock_db(&state.db)?;
        weekly_profile(&*conn, days, &state.config.profile)
    })
    .await?;
    Ok(Json(profile))
}

async fn write_text(
    State(state): State<AppState>,
    Json(body): Json<TextRequest>,
) -> ApiResult<JournalRecord> {
    require_text(&body.text)?;

    let record = blocking(move || {
        let prediction = state.sentiment.analyze(&body.text)?;
        let embedding = state.embedding.embed(&body.text)?;
        let record = compose_record(&body.text, prediction, Utc::now());

        let mut conn = lock_db(&state.db)?;
        write_entry(&mut conn, &record, &embedding)?;
        Ok(record)
    })
    .await?;

    tracing::info!(
        id = %record.id,
        label = %record.sentiment.label,
        intent = record.intent.as_deref().unwrap_or_default(),
        "journal entry stored"
    );
    Ok(Json(record))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    Json(body): Json<TextRequest>,
) -> ApiResult<Vec<SearchHit>> {
    require_text(&body.text)?;
    let top_k = params.top_k.unwrap_or(state.config.retrieval.default_top_k);
    if top_k == 0 {
        return Err(ApiError::BadRequest("top_k must be at least 1".into()));
    }

    let hits = blocking(move || {
        let query = state.embedding.embed(&body.text)?;
        let conn = lock_db(&state.db)?;
        semantic_search(&conn, &query, top_k)
    })
    .await?;
    Ok(Json(hits))
}

async fn recent(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> ApiResult<Vec<JournalRecord>> {
    let limit = params.limit.unwrap_or(state.config.retrieval.recent_limit);

    let records = blocking(move || {
        let conn = lock_db(&state.db)?;
        recent_entries(&conn, limit)
    })
    .await?;
    Ok(Json(records))
}
