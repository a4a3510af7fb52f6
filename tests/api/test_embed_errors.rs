// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Error handling tests across the embedding routes
//!
//! - Model failures surface as 500 with the error message
//! - Malformed bodies are client errors
//! - Unknown routes and wrong methods use the router defaults
//! - Concurrent requests don't interfere with each other

use super::helpers::{failing_app, get, post_json, send, test_app, TEST_DIMENSION};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;

#[tokio::test]
async fn test_embed_model_failure_returns_500() {
    let (status, response) = post_json(failing_app(), "/embed", r#"{"text": "hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "ONNX inference failed: out of memory");
}

#[tokio::test]
async fn test_batch_model_failure_returns_500() {
    let (status, response) =
        post_json(failing_app(), "/embed-batch", r#"{"texts": ["a", "b"]}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "ONNX inference failed: out of memory");
}

#[tokio::test]
async fn test_validation_runs_before_model() {
    // a failing model must not turn a client error into a server error
    let (status, _) = post_json(failing_app(), "/embed", r#"{"text": ""}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(failing_app(), "/embed-batch", r#"{"texts": []}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_client_error() {
    for uri in ["/embed", "/embed-batch", "/rag/search"] {
        let (status, response) = post_json(test_app(), uri, "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert!(response["error"].is_string(), "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_wrong_field_type_is_client_error() {
    let (status, response) = post_json(test_app(), "/embed", r#"{"text": 42}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());

    let (status, _) = post_json(test_app(), "/embed-batch", r#"{"texts": "one"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_content_type_is_client_error() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/embed")
        .body(Body::from(r#"{"text": "hello"}"#))
        .unwrap();

    let (status, response) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = get(test_app(), "/v1/embed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_on_embed_is_405() {
    let (status, _) = get(test_app(), "/embed").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_concurrent_requests_are_isolated() {
    let app = test_app();

    let requests = (0..16).map(|i| {
        let app = app.clone();
        async move {
            if i % 2 == 0 {
                let body = json!({ "text": format!("text {}", i) }).to_string();
                post_json(app, "/embed", &body).await
            } else {
                post_json(app, "/embed", r#"{"text": ""}"#).await
            }
        }
    });
    let results = futures_util::future::join_all(requests).await;

    for (i, (status, response)) in results.into_iter().enumerate() {
        if i % 2 == 0 {
            assert_eq!(status, StatusCode::OK);
            assert_eq!(response["embedding"].as_array().unwrap().len(), TEST_DIMENSION);
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }
}
