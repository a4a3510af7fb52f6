// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request bodies for POST /embed and POST /embed-batch
//!
//! Fields are optional at the serde level so that an absent field and an
//! empty one fail validation the same way, with the same message.

use crate::api::ApiError;
use serde::{Deserialize, Serialize};

pub const TEXT_REQUIRED: &str = "Text is required";
pub const TEXTS_REQUIRED: &str = "Texts array is required";

/// Request body for POST /embed
///
/// # Example
/// ```json
/// { "text": "Hello world" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl EmbedRequest {
    /// Returns the text to embed, or a 400 if it is missing or empty
    pub fn validate(&self) -> Result<&str, ApiError> {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(ApiError::bad_request(TEXT_REQUIRED)),
        }
    }
}

/// Request body for POST /embed-batch
///
/// # Example
/// ```json
/// { "texts": ["Hello world", "Another text"] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedBatchRequest {
    #[serde(default)]
    pub texts: Option<Vec<String>>,
}

impl EmbedBatchRequest {
    /// Returns the texts to embed, or a 400 if the array is missing or empty
    ///
    /// Individual entries are not inspected; an empty string inside a
    /// non-empty batch is embedded like any other text.
    pub fn validate(&self) -> Result<&[String], ApiError> {
        match self.texts.as_deref() {
            Some(texts) if !texts.is_empty() => Ok(texts),
            _ => Err(ApiError::bad_request(TEXTS_REQUIRED)),
        }
    }
}
