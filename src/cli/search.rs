//! CLI `search` command: embed a query and list the nearest entries.

use anyhow::Result;
use std::sync::Arc;

use mindlog::config::MindlogConfig;
use mindlog::embedding::EmbeddingProvider;
use mindlog::journal::search::semantic_search;

/// Run a semantic search from the terminal.
pub async fn search(config: &MindlogConfig, query: &str, top_k: Option<usize>) -> Result<()> {
    let top_k = top_k.unwrap_or(config.retrieval.default_top_k);
    anyhow::ensure!(top_k >= 1, "--top-k must be at least 1");

    let conn = mindlog::db::open_database(config.resolved_db_path())?;

    let provider: Arc<dyn EmbeddingProvider> =
        Arc::from(mindlog::embedding::create_provider(&config.embedding)?);

    let query_text = query.to_string();
    let query_embedding = tokio::task::spawn_blocking(move || provider.embed(&query_text)).await??;

    let hits = semantic_search(&conn, &query_embedding, top_k)?;

    if hits.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", hits.len());

    for (i, hit) in hits.iter().enumerate() {
        println!("  {}. {} (score: {:.4})", i + 1, hit.timestamp, hit.score);
        println!("     {}", preview(&hit.content));
        println!();
    }

    Ok(())
}

/// First 120 characters of `content`, with an ellipsis when cut.
pub(crate) fn preview(content: &str) -> String {
    match content.char_indices().nth(120) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
