//! Text sentiment classification.
//!
//! The [`SentimentAnalyzer`] trait is what the write path calls; the local
//! implementation runs DistilBERT fine-tuned on SST-2 through ONNX Runtime.

pub mod local;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Winning label and its softmax probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: String,
    pub score: f64,
}

/// Synchronous like [`crate::embedding::EmbeddingProvider`]; wrap calls in
/// `spawn_blocking` from async code.
pub trait SentimentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<SentimentScore>;

    fn analyze_batch(&self, texts: &[&str]) -> Result<Vec<SentimentScore>> {
        texts.iter().map(|t| self.analyze(t)).collect()
    }
}

/// Create a sentiment analyzer from config. Only `"local"` is supported.
pub fn create_analyzer(
    config: &crate::config::SentimentConfig,
) -> Result<Box<dyn SentimentAnalyzer>> {
    match config.provider.as_str() {
        "local" => {
            let analyzer = local::LocalSentimentAnalyzer::new(config)?;
            Ok(Box::new(analyzer))
        }
        other => anyhow::bail!("unknown sentiment provider: {other}. Supported: local"),
    }
}
