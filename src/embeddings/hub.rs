// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model file resolution
//!
//! Local paths win when both are configured; otherwise the ONNX graph and
//! tokenizer are fetched from the HuggingFace Hub (or reused from its cache).

use crate::embeddings::EmbeddingModelConfig;
use anyhow::{Context, Result};
use hf_hub::api::tokio::ApiBuilder;
use std::path::PathBuf;
use tracing::info;

/// On-disk locations of the files a model needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Finds or downloads the model files described by `config`
pub async fn resolve_model_files(config: &EmbeddingModelConfig) -> Result<ModelFiles> {
    match (&config.model_path, &config.tokenizer_path) {
        (Some(model_path), Some(tokenizer_path)) => {
            info!(
                "Using local model files: {} / {}",
                model_path.display(),
                tokenizer_path.display()
            );
            Ok(ModelFiles {
                model_path: model_path.clone(),
                tokenizer_path: tokenizer_path.clone(),
            })
        }
        (None, None) => download_model_files(config).await,
        _ => anyhow::bail!(
            "Both a model path and a tokenizer path are required to load {} from disk",
            config.repo_id
        ),
    }
}

async fn download_model_files(config: &EmbeddingModelConfig) -> Result<ModelFiles> {
    info!("Fetching {} from the HuggingFace Hub", config.repo_id);

    let mut builder = ApiBuilder::new().with_progress(false);
    if let Some(cache_dir) = &config.cache_dir {
        builder = builder.with_cache_dir(cache_dir.clone());
    }
    let api = builder
        .build()
        .context("Failed to create HuggingFace Hub client")?;
    let repo = api.model(config.repo_id.clone());

    let tokenizer_path = repo
        .get(TOKENIZER_FILE)
        .await
        .with_context(|| format!("Failed to fetch {} for {}", TOKENIZER_FILE, config.repo_id))?;
    let model_path = repo
        .get(&config.onnx_file)
        .await
        .with_context(|| format!("Failed to fetch {} for {}", config.onnx_file, config.repo_id))?;

    info!("Model files ready at {}", model_path.display());
    Ok(ModelFiles {
        model_path,
        tokenizer_path,
    })
}
