// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ModelHolder tests
//!
//! Loading failures must be reported (the binary treats them as fatal) and
//! the holder must hand out the encoder's vectors unchanged.

use embedding_api::embeddings::{
    DeterministicEncoder, EmbeddingModelConfig, EncodeInput, Encoded, ModelHolder,
};
use std::sync::Arc;

#[tokio::test]
async fn test_load_with_nonexistent_paths_fails() {
    let config = EmbeddingModelConfig {
        model_path: Some("/nonexistent/path/model.onnx".into()),
        tokenizer_path: Some("/nonexistent/path/tokenizer.json".into()),
        ..EmbeddingModelConfig::default()
    };

    let result = ModelHolder::load(&config).await;

    assert!(result.is_err(), "Should fail with invalid model path");
    let error_msg = format!("{}", result.unwrap_err());
    assert!(
        error_msg.contains("not found"),
        "Error message should mention file not found: {}",
        error_msg
    );
}

#[tokio::test]
async fn test_load_with_only_tokenizer_path_fails() {
    let config = EmbeddingModelConfig {
        tokenizer_path: Some("/models/tokenizer.json".into()),
        ..EmbeddingModelConfig::default()
    };

    assert!(ModelHolder::load(&config).await.is_err());
}

#[tokio::test]
async fn test_encode_shapes_follow_input() {
    let encoder = DeterministicEncoder::new("test-model", 48);
    let holder = ModelHolder::from_encoder(Arc::new(encoder.clone()));

    match holder
        .encode(EncodeInput::Single("hello".to_string()))
        .await
        .unwrap()
    {
        Encoded::Single(vector) => assert_eq!(vector.len(), 48),
        other => panic!("expected a single vector, got {:?}", other),
    }

    let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    match holder.encode(EncodeInput::Batch(texts.clone())).await.unwrap() {
        Encoded::Batch(vectors) => {
            assert_eq!(vectors.len(), 3);
            for (text, vector) in texts.iter().zip(&vectors) {
                assert_eq!(vector, &holder.embed(text).await.unwrap());
            }
        }
        other => panic!("expected a batch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_holder_is_shareable_across_tasks() {
    let holder = Arc::new(ModelHolder::from_encoder(Arc::new(DeterministicEncoder::new(
        "test-model",
        16,
    ))));

    let mut handles = Vec::new();
    for i in 0..8 {
        let holder = holder.clone();
        handles.push(tokio::spawn(async move {
            holder.embed(&format!("task {}", i)).await.unwrap()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().len(), 16);
    }
}
