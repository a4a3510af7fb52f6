// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::ApiError;
use serde::{Deserialize, Serialize};

pub const QUERY_REQUIRED: &str = "query required";

/// Request body for POST /rag/search
///
/// ```json
/// { "query": "what is an embedding?" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

impl SearchRequest {
    pub fn validate(&self) -> Result<&str, ApiError> {
        match self.query.as_deref() {
            Some(query) if !query.is_empty() => Ok(query),
            _ => Err(ApiError::bad_request(QUERY_REQUIRED)),
        }
    }
}
