// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed and POST /embed-batch handlers

use crate::api::embed::{EmbedBatchRequest, EmbedBatchResponse, EmbedRequest, EmbedResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::debug;

/// POST /embed handler
///
/// Returns 400 when `text` is missing or empty and 500 with the model's
/// error message when encoding fails.
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(request) = payload?;
    let text = request.validate()?;

    let embedding = state
        .model
        .embed(text)
        .await
        .map_err(|e| ApiError::internal("Embed", e))?;

    debug!("Embedded text of {} bytes", text.len());
    Ok(Json(embedding.into()))
}

/// POST /embed-batch handler
///
/// Embeds all texts in one model call; the response keeps input order.
pub async fn embed_batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedBatchRequest>, JsonRejection>,
) -> Result<Json<EmbedBatchResponse>, ApiError> {
    let Json(request) = payload?;
    let texts = request.validate()?;

    let embeddings = state
        .model
        .embed_batch(texts)
        .await
        .map_err(|e| ApiError::internal("Batch embed", e))?;

    debug!("Embedded batch of {} texts", embeddings.len());
    Ok(Json(embeddings.into()))
}
