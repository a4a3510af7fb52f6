// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

/// Response body for POST /rag/search: the query vector only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub embedding: Vec<f32>,
}

impl From<Vec<f32>> for SearchResponse {
    fn from(embedding: Vec<f32>) -> Self {
        Self { embedding }
    }
}
