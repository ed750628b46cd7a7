//! Subcommand handlers and the model downloader.

pub mod doctor;
pub mod export;
pub mod import;
pub mod recent;
pub mod search;
pub mod weekly;
pub mod write;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::io::AsyncWriteExt;

use mindlog::config::MindlogConfig;
use mindlog::onnx::model_files;

const EMBEDDING_MODEL_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx";
const EMBEDDING_TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";
const SENTIMENT_MODEL_URL: &str = concat!(
    "https://huggingface.co/distilbert/distilbert-base-uncased-finetuned-sst-2-english",
    "/resolve/main/onnx/model.onnx"
);
const SENTIMENT_TOKENIZER_URL: &str = concat!(
    "https://huggingface.co/distilbert/distilbert-base-uncased-finetuned-sst-2-english",
    "/resolve/main/tokenizer.json"
);

/// Download the embedding and sentiment models to their cache directories.
pub async fn model_download(config: &MindlogConfig) -> Result<()> {
    println!("Embedding model ({}):", config.embedding.model);
    download_model_pair(
        &mindlog::config::expand_tilde(&config.embedding.cache_dir),
        EMBEDDING_MODEL_URL,
        EMBEDDING_TOKENIZER_URL,
        "~90MB",
    )
    .await?;

    println!();
    println!("Sentiment model ({}):", config.sentiment.model);
    download_model_pair(
        &mindlog::config::expand_tilde(&config.sentiment.cache_dir),
        SENTIMENT_MODEL_URL,
        SENTIMENT_TOKENIZER_URL,
        "~270MB",
    )
    .await?;

    println!();
    println!("Model download complete. Ready for use.");
    Ok(())
}

async fn download_model_pair(
    cache_dir: &Path,
    model_url: &str,
    tokenizer_url: &str,
    approx_size: &str,
) -> Result<()> {
    std::fs::create_dir_all(cache_dir)
        .with_context(|| format!("failed to create cache dir: {}", cache_dir.display()))?;

    let (model_path, tokenizer_path) = model_files(cache_dir);

    if model_path.exists() {
        println!("  Model already exists at {}", model_path.display());
    } else {
        println!("  Downloading model.onnx ({approx_size})...");
        download_file(model_url, &model_path).await?;
        println!("  Model saved to {}", model_path.display());
    }

    if tokenizer_path.exists() {
        println!("  Tokenizer already exists at {}", tokenizer_path.display());
    } else {
        println!("  Downloading tokenizer.json...");
        download_file(tokenizer_url, &tokenizer_path).await?;
        println!("  Tokenizer saved to {}", tokenizer_path.display());
    }

    Ok(())
}

/// Download a file from a URL with progress bar. Uses atomic write (tmp + rename).
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let mut response = reqwest::get(url)
        .await
        .with_context(|| format!("HTTP request failed for {url}"))?;

    anyhow::ensure!(
        response.status().is_success(),
        "download failed with HTTP {}",
        response.status()
    );

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")?
                    .progress_chars("##-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let tmp_path = dest.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

    while let Some(chunk) = response.chunk().await.context("error reading response")? {
        file.write_all(&chunk)
            .await
            .context("error writing to file")?;
        pb.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, dest)
        .await
        .context("failed to rename temp file")?;

    pb.finish_and_clear();
    Ok(())
}
