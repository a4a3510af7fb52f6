// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::http_server::AppState;
use crate::api::search::{SearchRequest, SearchResponse};
use crate::api::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

/// POST /rag/search handler
///
/// Embeds the query through the same path as POST /embed, so both return
/// identical vectors for identical text.
pub async fn search_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload?;
    let query = request.validate()?;

    let embedding = state
        .model
        .embed(query)
        .await
        .map_err(|e| ApiError::internal("Search", e))?;

    Ok(Json(embedding.into()))
}
