// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the embedding API

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Full version string with feature description
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"), "-sentence-embeddings");

/// Build date
pub const BUILD_DATE: &str = "2026-10-17";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "single-embed",
    "batch-embed",
    "query-embed",
    "onnx-runtime",
    "hf-hub-download",
];

/// Get formatted version string
pub fn get_version_string() -> String {
    format!("{} ({})", VERSION, BUILD_DATE)
}
