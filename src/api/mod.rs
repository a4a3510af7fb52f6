// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod http_server;
pub mod search;

pub use embed::{
    embed_batch_handler, embed_handler, EmbedBatchRequest, EmbedBatchResponse, EmbedRequest,
    EmbedResponse,
};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
pub use search::{search_handler, SearchRequest, SearchResponse};
