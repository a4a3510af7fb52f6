// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! RAG search API Module
//!
//! POST /rag/search currently embeds the query and returns the vector; no
//! document retrieval happens yet.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::search_handler;
pub use request::SearchRequest;
pub use response::SearchResponse;
