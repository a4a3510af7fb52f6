// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! Runs a sentence-transformer exported to ONNX (by default
//! paraphrase-multilingual-MiniLM-L12-v2) through ONNX Runtime.
//!
//! Features:
//! - ONNX model loading from disk
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - Tokenization with truncation, batch padding done here
//! - Single and batch embedding generation
//! - Mean pooling over token embeddings
//! - Output dimension discovered at load time

use crate::embeddings::pooling::{l2_normalize, pool_output};
use crate::embeddings::TextEncoder;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ndarray::Array2;
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

/// Runtime knobs for [`OnnxEmbeddingModel`]
#[derive(Debug, Clone)]
pub struct OnnxModelOptions {
    /// Maximum tokens per text; longer inputs are truncated
    pub max_length: usize,
    /// L2-normalize every output vector
    pub normalize: bool,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

impl Default for OnnxModelOptions {
    fn default() -> Self {
        Self {
            max_length: 128,
            normalize: false,
            intra_threads: 4,
        }
    }
}

/// Token ids and mask for one padded batch, flattened row-major
struct EncodedBatch {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    batch_size: usize,
    seq_len: usize,
}

/// ONNX-based sentence embedding model
///
/// # Thread Safety
/// All fields are wrapped in Arc for cheap cloning. The session needs
/// exclusive access to run, so inferences serialize on its mutex.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
    max_length: usize,
    normalize: bool,
    /// BERT-style graphs take token_type_ids, XLM-R style graphs don't
    uses_token_type_ids: bool,
    pad_id: i64,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .field("normalize", &self.normalize)
            .field("uses_token_type_ids", &self.uses_token_type_ids)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Creates a new ONNX embedding model from disk paths
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found or invalid
    /// - Tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - The validation inference yields an output shape that can't be pooled
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(
    ///     "paraphrase-multilingual-MiniLM-L12-v2",
    ///     "./models/paraphrase-multilingual-MiniLM-L12-v2/onnx/model.onnx",
    ///     "./models/paraphrase-multilingual-MiniLM-L12-v2/tokenizer.json",
    ///     OnnxModelOptions::default(),
    /// ).await?;
    /// ```
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        options: OnnxModelOptions,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }
        if options.max_length == 0 {
            anyhow::bail!("max_length must be greater than 0");
        }

        let session = build_session(model_path, options.intra_threads)?;
        info!("ONNX embedding model loaded from {}", model_path.display());

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: options.max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Failed to configure tokenizer truncation: {}", e))?;
        // padding is applied per batch in encode_texts
        tokenizer.with_padding(None);
        let pad_id = ["<pad>", "[PAD]"]
            .iter()
            .find_map(|token| tokenizer.token_to_id(token))
            .unwrap_or(0) as i64;

        let uses_token_type_ids = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");
        debug!(
            "Model {} inputs: {:?}",
            model_name,
            session.inputs.iter().map(|i| i.name.as_str()).collect::<Vec<_>>()
        );

        let mut model = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension: 0,
            max_length: options.max_length,
            normalize: options.normalize,
            uses_token_type_ids,
            pad_id,
        };

        // Discover the output dimension with one validation inference
        let probe = model.run_batch(&["validation test".to_string()])?;
        let dimension = probe.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            anyhow::bail!("Model {} produced an empty embedding", model.model_name);
        }
        model.dimension = dimension;

        info!(
            "Embedding model {} ready ({} dimensions, max {} tokens)",
            model.model_name, model.dimension, model.max_length
        );
        Ok(model)
    }

    /// Counts non-padding tokens in a text, special tokens included
    pub async fn count_tokens(&self, text: &str) -> Result<usize> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        Ok(encoding.get_attention_mask().iter().map(|&m| m as usize).sum())
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn encode_texts(&self, texts: &[String]) -> Result<EncodedBatch> {
        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let seq_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(texts.len() * seq_len);
        let mut attention_mask = Vec::with_capacity(texts.len() * seq_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            input_ids.extend(ids.iter().map(|&id| id as i64));
            attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));

            let padding_needed = seq_len - ids.len();
            input_ids.extend(std::iter::repeat(self.pad_id).take(padding_needed));
            attention_mask.extend(std::iter::repeat(0i64).take(padding_needed));
        }

        Ok(EncodedBatch {
            input_ids,
            attention_mask,
            batch_size: texts.len(),
            seq_len,
        })
    }

    /// Tokenizes, runs the session and pools; blocking
    fn run_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let batch = self.encode_texts(texts)?;
        let shape = (batch.batch_size, batch.seq_len);

        let input_ids_array = Array2::from_shape_vec(shape, batch.input_ids)
            .context("Failed to create input_ids array")?;
        let attention_mask_array = Array2::from_shape_vec(shape, batch.attention_mask.clone())
            .context("Failed to create attention_mask array")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("ONNX session mutex poisoned"))?;

        let outputs = if self.uses_token_type_ids {
            let token_type_ids_array = Array2::<i64>::zeros(shape);
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids_array)?,
                "attention_mask" => Value::from_array(attention_mask_array)?,
                "token_type_ids" => Value::from_array(token_type_ids_array)?
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids_array)?,
                "attention_mask" => Value::from_array(attention_mask_array)?
            ])?
        };

        // Index [0] rather than a name: exports disagree on output names
        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let mut embeddings = pool_output(output.view(), &batch.attention_mask, batch.seq_len)
            .ok_or_else(|| {
                anyhow!(
                    "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, hidden] or [batch, hidden])",
                    output.shape()
                )
            })?;

        if embeddings.len() != texts.len() {
            anyhow::bail!(
                "Model returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            );
        }

        for (i, embedding) in embeddings.iter_mut().enumerate() {
            if self.dimension != 0 && embedding.len() != self.dimension {
                anyhow::bail!(
                    "Unexpected embedding dimension at index {}: {} (expected {})",
                    i,
                    embedding.len(),
                    self.dimension
                );
            }
            if self.normalize {
                l2_normalize(embedding);
            }
        }

        Ok(embeddings)
    }
}

/// Builds a session, trying CUDA before falling back to CPU
fn build_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    info!("Initializing ONNX Runtime session");

    let cuda_result = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .context("Failed to set CUDA execution provider")
        .and_then(|builder| {
            builder
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .context("Failed to set optimization level")
        })
        .and_then(|builder| {
            builder
                .with_intra_threads(intra_threads)
                .context("Failed to set intra threads")
        })
        .and_then(|builder| {
            builder
                .commit_from_file(model_path)
                .context("Failed to load ONNX model with CUDA")
        });

    match cuda_result {
        Ok(session) => {
            info!("Session created with CUDA execution provider requested");
            Ok(session)
        }
        Err(e) => {
            warn!("CUDA execution provider unavailable: {:#}", e);
            warn!("Falling back to CPU execution provider");
            Session::builder()
                .context("Failed to create session builder")?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .context("Failed to set CPU execution provider")?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .context("Failed to set optimization level")?
                .with_intra_threads(intra_threads)
                .context("Failed to set intra threads")?
                .commit_from_file(model_path)
                .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
        }
    }
}

#[async_trait]
impl TextEncoder for OnnxEmbeddingModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| anyhow!("Model returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let model = self.clone();
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || model.run_batch(&texts))
            .await
            .context("Embedding task panicked")?
    }
}
