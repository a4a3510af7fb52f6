// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use embedding_api::{
    api::{start_server, AppState},
    config::ServerConfig,
    embeddings::ModelHolder,
    version,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();

    tracing::info!("Starting embedding API {}", version::get_version_string());
    tracing::info!(
        "Model: {} (max {} tokens, normalize: {})",
        config.model,
        config.max_length,
        config.normalize
    );

    // The model must be ready before the listener binds; failure is fatal
    let model_config = config.model_config();
    let model = ModelHolder::load(&model_config)
        .await
        .with_context(|| format!("Failed to load embedding model {}", model_config.repo_id))?;
    tracing::info!(
        "Model loaded successfully: {} ({} dimensions)",
        model.model_name(),
        model.dimension()
    );

    let addr = config.bind_addr();
    let port = addr.port();
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("API Endpoints:");
    println!("  Health:       GET  http://localhost:{}/health", port);
    println!("  Embed:        POST http://localhost:{}/embed", port);
    println!("  Embed batch:  POST http://localhost:{}/embed-batch", port);
    println!("  RAG search:   POST http://localhost:{}/rag/search", port);
    println!("\nTest with curl:");
    println!("  curl -X POST http://localhost:{}/embed \\", port);
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"text\": \"Hello world\"}}'");
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    start_server(AppState::new(model), addr).await?;

    tracing::info!("Goodbye!");
    Ok(())
}
