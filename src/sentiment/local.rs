//! DistilBERT SST-2 sentiment classifier on ONNX Runtime.

use std::sync::Mutex;

use anyhow::{Context, Result};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use ort::session::Session;
use tokenizers::Tokenizer;

use super::{SentimentAnalyzer, SentimentScore};
use crate::config::SentimentConfig;
use crate::onnx::{self, EncodedBatch};

/// DistilBERT position embedding limit.
const MAX_SEQ_LEN: usize = 512;

pub struct LocalSentimentAnalyzer {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
}

impl LocalSentimentAnalyzer {
    pub fn new(config: &SentimentConfig) -> Result<Self> {
        anyhow::ensure!(!config.labels.is_empty(), "sentiment.labels must not be empty");

        let model_dir = crate::config::expand_tilde(&config.cache_dir);
        let session = onnx::load_session(&model_dir)?;
        let tokenizer = onnx::load_tokenizer(&model_dir, MAX_SEQ_LEN)?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels: config.labels.clone(),
        })
    }
}

impl SentimentAnalyzer for LocalSentimentAnalyzer {
    fn analyze(&self, text: &str) -> Result<SentimentScore> {
        self.analyze_batch(&[text])?
            .into_iter()
            .next()
            .context("sentiment batch came back empty")
    }

    fn analyze_batch(&self, texts: &[&str]) -> Result<Vec<SentimentScore>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let batch = EncodedBatch::encode(&self.tokenizer, texts)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("sentiment session lock poisoned: {e}"))?;

        // DistilBERT takes no token_type_ids.
        let outputs = session.run(ort::inputs! {
            "input_ids" => batch.input_ids_tensor()?,
            "attention_mask" => batch.attention_mask_tensor()?,
        })?;

        let logits = outputs.get("logits").unwrap_or_else(|| &outputs[0]);
        let (shape, data) = logits
            .try_extract_tensor::<f32>()
            .context("failed to extract logits tensor")?;

        let dims: &[i64] = &shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[1] as usize == self.labels.len(),
            "unexpected logits shape: {dims:?}, expected [batch, {}]",
            self.labels.len()
        );

        let logits = ArrayView2::from_shape((dims[0] as usize, dims[1] as usize), data)?;

        logits
            .axis_iter(Axis(0))
            .map(|row| -> Result<SentimentScore> {
                let probs = softmax(row);
                let (best, score) = argmax(&probs).context("logits row is empty")?;
                Ok(SentimentScore {
                    label: self.labels[best].clone(),
                    score: f64::from(score),
                })
            })
            .collect()
    }
}

/// Numerically stable softmax over one row of logits.
fn softmax(logits: ArrayView1<'_, f32>) -> Array1<f32> {
    let max = logits.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
    let exp = logits.mapv(|x| (x - max).exp());
    let total = exp.sum();
    exp / total
}

/// Index and value of the largest element; first wins on ties.
fn argmax(values: &Array1<f32>) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
}
