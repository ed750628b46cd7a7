//! Local ONNX Runtime embedding provider.
//!
//! Implements [`EmbeddingProvider`] using the all-MiniLM-L6-v2 model via `ort`:
//! tokenize, run the encoder, mean-pool token vectors under the attention mask,
//! then L2-normalize.

use std::sync::Mutex;

use anyhow::{Context, Result};
use ndarray::{Array1, ArrayView3};
use ort::session::Session;
use tokenizers::Tokenizer;

use super::{EmbeddingProvider, EMBEDDING_DIM};
use crate::config::EmbeddingConfig;
use crate::onnx::{self, EncodedBatch};

/// Maximum sequence length for all-MiniLM-L6-v2 (trained at 256).
const MAX_SEQ_LEN: usize = 256;

pub struct LocalEmbeddingProvider {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
}

impl LocalEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model_dir = crate::config::expand_tilde(&config.cache_dir);
        let session = onnx::load_session(&model_dir)?;
        let tokenizer = onnx::load_tokenizer(&model_dir, MAX_SEQ_LEN)?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }
}

impl EmbeddingProvider for LocalEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .context("embedding batch came back empty")
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let batch = EncodedBatch::encode(&self.tokenizer, texts)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("embedding session lock poisoned: {e}"))?;

        let outputs = session.run(ort::inputs! {
            "input_ids" => batch.input_ids_tensor()?,
            "attention_mask" => batch.attention_mask_tensor()?,
            "token_type_ids" => batch.token_type_ids_tensor()?,
        })?;

        // Output name varies by export; fall back to the first output.
        let hidden = outputs
            .get("token_embeddings")
            .or_else(|| outputs.get("last_hidden_state"))
            .unwrap_or_else(|| &outputs[0]);

        let (shape, data) = hidden
            .try_extract_tensor::<f32>()
            .context("failed to extract token_embeddings tensor")?;

        let dims: &[i64] = &shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[2] == EMBEDDING_DIM as i64,
            "unexpected token_embeddings shape: {dims:?}, expected [batch, seq, {EMBEDDING_DIM}]"
        );

        let token_embeddings =
            ArrayView3::from_shape((dims[0] as usize, dims[1] as usize, dims[2] as usize), data)?;

        Ok(mean_pool(token_embeddings, &batch.attention_mask, batch.seq_len))
    }
}

/// Mask-weighted mean over the sequence axis, one L2-normalized vector per row.
/// `mask` is row-major with stride `mask_stride`.
fn mean_pool(
    token_embeddings: ArrayView3<'_, f32>,
    mask: &[i64],
    mask_stride: usize,
) -> Vec<Vec<f32>> {
    token_embeddings
        .outer_iter()
        .enumerate()
        .map(|(b, tokens)| {
            let mut sum = Array1::<f32>::zeros(tokens.ncols());
            let mut count = 0.0f32;

            for (s, token) in tokens.outer_iter().enumerate() {
                let weight = mask[b * mask_stride + s] as f32;
                if weight > 0.0 {
                    sum.scaled_add(weight, &token);
                    count += weight;
                }
            }

            if count > 0.0 {
                sum /= count;
            }
            l2_normalize(sum)
        })
        .collect()
}

/// L2-normalize a vector. A zero vector is returned unchanged.
fn l2_normalize(mut v: Array1<f32>) -> Vec<f32> {
    let norm = v.dot(&v).sqrt();
    if norm > 0.0 {
        v /= norm;
    }
    v.to_vec()
}
