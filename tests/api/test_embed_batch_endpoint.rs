// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed-batch tests

use super::helpers::{as_vector, post_json, test_app, TEST_DIMENSION};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_batch_length_matches_input() {
    for count in [1usize, 3, 10] {
        let texts: Vec<String> = (0..count).map(|i| format!("text number {}", i)).collect();
        let body = json!({ "texts": texts }).to_string();

        let (status, response) = post_json(test_app(), "/embed-batch", &body).await;

        assert_eq!(status, StatusCode::OK);
        let embeddings = response["embeddings"].as_array().unwrap();
        assert_eq!(embeddings.len(), count);
        for embedding in embeddings {
            assert_eq!(as_vector(embedding).len(), TEST_DIMENSION);
        }
    }
}

#[tokio::test]
async fn test_batch_preserves_order() {
    let app = test_app();
    let texts = ["first", "second", "third"];

    let body = json!({ "texts": texts }).to_string();
    let (_, batch) = post_json(app.clone(), "/embed-batch", &body).await;
    let embeddings = batch["embeddings"].as_array().unwrap();

    for (text, batch_embedding) in texts.iter().zip(embeddings) {
        let body = json!({ "text": text }).to_string();
        let (_, single) = post_json(app.clone(), "/embed", &body).await;
        assert_eq!(&single["embedding"], batch_embedding, "text: {}", text);
    }
}

#[tokio::test]
async fn test_batch_with_duplicates() {
    let body = json!({ "texts": ["dup", "other", "dup"] }).to_string();
    let (_, response) = post_json(test_app(), "/embed-batch", &body).await;
    let embeddings = response["embeddings"].as_array().unwrap();

    assert_eq!(embeddings[0], embeddings[2]);
    assert_ne!(embeddings[0], embeddings[1]);
}

#[tokio::test]
async fn test_batch_empty_array() {
    let (status, response) = post_json(test_app(), "/embed-batch", r#"{"texts": []}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Texts array is required");
}

#[tokio::test]
async fn test_batch_missing_texts() {
    let (status, response) = post_json(test_app(), "/embed-batch", r#"{"text": "one"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Texts array is required");
}
