// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embedding models
//!
//! The [`TextEncoder`] trait is the seam between the HTTP surface and the
//! concrete model. Production traffic goes through [`OnnxEmbeddingModel`];
//! tests and benchmarks plug in [`DeterministicEncoder`].

pub mod deterministic;
pub mod hub;
pub mod model_holder;
pub mod onnx_model;
pub mod pooling;

pub use deterministic::DeterministicEncoder;
pub use hub::{resolve_model_files, ModelFiles};
pub use model_holder::{EmbeddingModelConfig, ModelHolder};
pub use onnx_model::{OnnxEmbeddingModel, OnnxModelOptions};

use anyhow::Result;
use async_trait::async_trait;

/// Input accepted by [`TextEncoder::encode`]
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeInput {
    Single(String),
    Batch(Vec<String>),
}

/// Output of [`TextEncoder::encode`], shaped like the input
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Single(Vec<f32>),
    Batch(Vec<Vec<f32>>),
}

impl Encoded {
    /// Number of vectors carried
    pub fn len(&self) -> usize {
        match self {
            Encoded::Single(_) => 1,
            Encoded::Batch(vectors) => vectors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A loaded sentence embedding model
///
/// Implementations must be immutable after construction so one instance can
/// be shared across concurrent request handlers.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Model identifier, e.g. "paraphrase-multilingual-MiniLM-L12-v2"
    fn model_name(&self) -> &str;

    /// Length of every vector this model produces
    fn dimension(&self) -> usize;

    /// Embeds a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeds several texts, preserving input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embeds either one text or a batch, returning the matching shape
    async fn encode(&self, input: EncodeInput) -> Result<Encoded> {
        match input {
            EncodeInput::Single(text) => self.embed(&text).await.map(Encoded::Single),
            EncodeInput::Batch(texts) => self.embed_batch(&texts).await.map(Encoded::Batch),
        }
    }
}
