// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding Model Holder
//!
//! Owns the one model the process serves. It is loaded once before the HTTP
//! listener binds and shared read-only with every handler afterwards.

use crate::embeddings::{
    resolve_model_files, EncodeInput, Encoded, OnnxEmbeddingModel, OnnxModelOptions, TextEncoder,
};
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_REPO_ID: &str = "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";
pub const DEFAULT_ONNX_FILE: &str = "onnx/model.onnx";

/// Where to find the model and how to run it
#[derive(Debug, Clone)]
pub struct EmbeddingModelConfig {
    /// HuggingFace Hub repository id
    pub repo_id: String,
    /// Local ONNX graph; must be paired with `tokenizer_path`
    pub model_path: Option<PathBuf>,
    /// Local tokenizer.json; must be paired with `model_path`
    pub tokenizer_path: Option<PathBuf>,
    /// ONNX graph path inside the Hub repository
    pub onnx_file: String,
    /// Hub cache directory, hf-hub's default when unset
    pub cache_dir: Option<PathBuf>,
    pub options: OnnxModelOptions,
}

impl Default for EmbeddingModelConfig {
    fn default() -> Self {
        Self {
            repo_id: DEFAULT_REPO_ID.to_string(),
            model_path: None,
            tokenizer_path: None,
            onnx_file: DEFAULT_ONNX_FILE.to_string(),
            cache_dir: None,
            options: OnnxModelOptions::default(),
        }
    }
}

impl EmbeddingModelConfig {
    /// Short model name: the last segment of the repository id
    pub fn model_name(&self) -> &str {
        self.repo_id.rsplit('/').next().unwrap_or(&self.repo_id)
    }
}

/// Process-wide holder of the loaded embedding model
///
/// # Example
/// ```ignore
/// let holder = ModelHolder::load(&EmbeddingModelConfig::default()).await?;
/// let embedding = holder.embed("Hello world").await?;
/// assert_eq!(embedding.len(), holder.dimension());
/// ```
#[derive(Clone)]
pub struct ModelHolder {
    encoder: Arc<dyn TextEncoder>,
}

impl std::fmt::Debug for ModelHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHolder")
            .field("model_name", &self.model_name())
            .field("dimension", &self.dimension())
            .finish()
    }
}

impl ModelHolder {
    /// Resolves the model files and loads the ONNX model
    ///
    /// Any failure here is meant to be fatal to the caller; there is no retry
    /// and no fallback model.
    pub async fn load(config: &EmbeddingModelConfig) -> Result<Self> {
        info!("Loading embedding model: {}", config.model_name());

        let files = resolve_model_files(config).await?;
        let model = OnnxEmbeddingModel::new(
            config.model_name(),
            files.model_path,
            files.tokenizer_path,
            config.options.clone(),
        )
        .await?;

        info!(
            "Successfully loaded model: {} ({} dimensions)",
            model.model_name(),
            model.dimension()
        );
        Ok(Self::from_encoder(Arc::new(model)))
    }

    /// Wraps an already-built encoder
    pub fn from_encoder(encoder: Arc<dyn TextEncoder>) -> Self {
        Self { encoder }
    }

    /// Embeds one text or a batch, returning the matching shape
    pub async fn encode(&self, input: EncodeInput) -> Result<Encoded> {
        self.encoder.encode(input).await
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self.encode(EncodeInput::Single(text.to_string())).await? {
            Encoded::Single(vector) => Ok(vector),
            Encoded::Batch(_) => Err(anyhow!("Encoder returned a batch for a single text")),
        }
    }

    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self.encode(EncodeInput::Batch(texts.to_vec())).await? {
            Encoded::Batch(vectors) => Ok(vectors),
            Encoded::Single(_) => Err(anyhow!("Encoder returned a single vector for a batch")),
        }
    }

    pub fn model_name(&self) -> &str {
        self.encoder.model_name()
    }

    pub fn dimension(&self) -> usize {
        self.encoder.dimension()
    }
}
