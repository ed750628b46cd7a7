//! Shared ONNX Runtime plumbing for the local text models.
//!
//! Both the embedding model and the sentiment classifier are BERT-family
//! encoders exported to ONNX next to a HuggingFace `tokenizer.json`. This module
//! loads that pair from a model directory and turns a batch of strings into the
//! flat `i64` tensors the sessions expect.

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Paths of the model pair inside `dir`.
pub fn model_files(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join(MODEL_FILE), dir.join(TOKENIZER_FILE))
}

/// Load `model.onnx` from `dir` into a session.
pub fn load_session(dir: &Path) -> Result<Session> {
    let (model_path, _) = model_files(dir);
    anyhow::ensure!(
        model_path.exists(),
        "ONNX model not found at {}. Run `mindlog model download` first.",
        model_path.display()
    );

    let session = Session::builder()?
        .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
        .with_intra_threads(4)?
        .commit_from_file(&model_path)
        .with_context(|| format!("failed to load ONNX model {}", model_path.display()))?;

    tracing::info!(model = %model_path.display(), "ONNX model loaded");
    Ok(session)
}

/// Load `tokenizer.json` from `dir`, truncating to `max_len` and padding each
/// batch to its longest member.
pub fn load_tokenizer(dir: &Path, max_len: usize) -> Result<Tokenizer> {
    let (_, tokenizer_path) = model_files(dir);
    anyhow::ensure!(
        tokenizer_path.exists(),
        "Tokenizer not found at {}. Run `mindlog model download` first.",
        tokenizer_path.display()
    );

    let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| anyhow::anyhow!("failed to load tokenizer: {e}"))?;

    tokenizer
        .with_truncation(Some(tokenizers::TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| anyhow::anyhow!("failed to set truncation: {e}"))?;

    tokenizer.with_padding(Some(tokenizers::PaddingParams {
        strategy: tokenizers::PaddingStrategy::BatchLongest,
        ..Default::default()
    }));

    tracing::info!(tokenizer = %tokenizer_path.display(), "tokenizer loaded");
    Ok(tokenizer)
}

/// A tokenized batch, row-major `[batch, seq_len]`.
pub struct EncodedBatch {
    pub batch_size: usize,
    pub seq_len: usize,
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

impl EncodedBatch {
    pub fn encode(tokenizer: &Tokenizer, texts: &[&str]) -> Result<Self> {
        let encodings = tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenization failed: {e}"))?;

        let batch_size = encodings.len();
        let seq_len = encodings.first().map_or(0, |e| e.get_ids().len());

        let mut input_ids = Vec::with_capacity(batch_size * seq_len);
        let mut attention_mask = Vec::with_capacity(batch_size * seq_len);
        for encoding in &encodings {
            input_ids.extend(encoding.get_ids().iter().map(|&id| i64::from(id)));
            attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| i64::from(m)));
        }

        Ok(Self {
            batch_size,
            seq_len,
            input_ids,
            attention_mask,
        })
    }

    fn shape(&self) -> Vec<i64> {
        vec![self.batch_size as i64, self.seq_len as i64]
    }

    pub fn input_ids_tensor(&self) -> Result<Tensor<i64>> {
        Ok(Tensor::from_array((
            self.shape(),
            self.input_ids.clone().into_boxed_slice(),
        ))?)
    }

    pub fn attention_mask_tensor(&self) -> Result<Tensor<i64>> {
        Ok(Tensor::from_array((
            self.shape(),
            self.attention_mask.clone().into_boxed_slice(),
        ))?)
    }

    /// All zeros: single-sentence input, no segment B.
    pub fn token_type_ids_tensor(&self) -> Result<Tensor<i64>> {
        let zeros = vec![0i64; self.batch_size * self.seq_len];
        Ok(Tensor::from_array((self.shape(), zeros.into_boxed_slice()))?)
    }
}
