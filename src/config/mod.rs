// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Process configuration
//!
//! Every option can come from a command-line flag or an environment variable
//! (a `.env` file is loaded first). The bind address is always 0.0.0.0.

use crate::embeddings::model_holder::{DEFAULT_ONNX_FILE, DEFAULT_REPO_ID};
use crate::embeddings::{EmbeddingModelConfig, OnnxModelOptions};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8001;

/// Sentence embedding HTTP API
#[derive(Parser, Debug, Clone)]
#[command(name = "embedding-api")]
#[command(version)]
#[command(about = "Serves sentence embeddings over HTTP", long_about = None)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// HuggingFace Hub repository of the sentence-transformer
    #[arg(long = "model", env = "EMBEDDING_MODEL", default_value = DEFAULT_REPO_ID)]
    pub model: String,

    /// Local ONNX model file (requires --tokenizer-path)
    #[arg(long, env = "EMBEDDING_MODEL_PATH", requires = "tokenizer_path")]
    pub model_path: Option<PathBuf>,

    /// Local tokenizer.json (requires --model-path)
    #[arg(long, env = "EMBEDDING_TOKENIZER_PATH", requires = "model_path")]
    pub tokenizer_path: Option<PathBuf>,

    /// ONNX file inside the Hub repository
    #[arg(long, env = "EMBEDDING_ONNX_FILE", default_value = DEFAULT_ONNX_FILE)]
    pub onnx_file: String,

    /// HuggingFace Hub cache directory
    #[arg(long, env = "EMBEDDING_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Maximum tokens per text; longer texts are truncated
    #[arg(long, env = "EMBEDDING_MAX_LENGTH", default_value_t = 128,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub max_length: u32,

    /// L2-normalize embeddings
    #[arg(long, env = "EMBEDDING_NORMALIZE")]
    pub normalize: bool,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "EMBEDDING_INTRA_THREADS", default_value_t = 4,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub intra_threads: u32,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }

    pub fn model_config(&self) -> EmbeddingModelConfig {
        EmbeddingModelConfig {
            repo_id: self.model.clone(),
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            onnx_file: self.onnx_file.clone(),
            cache_dir: self.cache_dir.clone(),
            options: OnnxModelOptions {
                max_length: self.max_length as usize,
                normalize: self.normalize,
                intra_threads: self.intra_threads as usize,
            },
        }
    }
}
