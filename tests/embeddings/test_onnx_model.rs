// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Model tests against real model files
//!
//! Ignored by default. Point EMBEDDING_MODEL_PATH and
//! EMBEDDING_TOKENIZER_PATH at an exported sentence-transformer, e.g.
//! paraphrase-multilingual-MiniLM-L12-v2/onnx/model.onnx and its
//! tokenizer.json, then run with `--ignored`.

use embedding_api::embeddings::{OnnxEmbeddingModel, OnnxModelOptions, TextEncoder};

async fn load_model(options: OnnxModelOptions) -> OnnxEmbeddingModel {
    let model_path =
        std::env::var("EMBEDDING_MODEL_PATH").expect("EMBEDDING_MODEL_PATH must be set");
    let tokenizer_path =
        std::env::var("EMBEDDING_TOKENIZER_PATH").expect("EMBEDDING_TOKENIZER_PATH must be set");

    OnnxEmbeddingModel::new("test-model", model_path, tokenizer_path, options)
        .await
        .expect("Failed to load model")
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm_a * norm_b)
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_model_loads_and_reports_dimension() {
    let model = load_model(OnnxModelOptions::default()).await;

    assert_eq!(model.model_name(), "test-model");
    assert!(model.dimension() > 0);
}

#[tokio::test]
#[ignore]
async fn test_embed_matches_dimension() {
    let model = load_model(OnnxModelOptions::default()).await;

    let embedding = model.embed("Hello world").await.unwrap();
    assert_eq!(embedding.len(), model.dimension());
    assert!(embedding.iter().all(|v| v.is_finite()));
}

#[tokio::test]
#[ignore]
async fn test_batch_matches_single_embeddings() {
    let model = load_model(OnnxModelOptions::default()).await;
    let texts = vec![
        "short".to_string(),
        "a considerably longer sentence that forces padding in the batch".to_string(),
    ];

    let batch = model.embed_batch(&texts).await.unwrap();
    assert_eq!(batch.len(), 2);

    // padding must not leak into the pooled vector
    for (text, batch_vector) in texts.iter().zip(&batch) {
        let single = model.embed(text).await.unwrap();
        assert!(cosine(&single, batch_vector) > 0.999, "text: {}", text);
    }
}

#[tokio::test]
#[ignore]
async fn test_similar_texts_are_closer() {
    let model = load_model(OnnxModelOptions::default()).await;

    let cat = model.embed("The cat sits on the mat").await.unwrap();
    let kitten = model.embed("A kitten is sitting on a rug").await.unwrap();
    let finance = model.embed("Quarterly revenue grew by ten percent").await.unwrap();

    assert!(cosine(&cat, &kitten) > cosine(&cat, &finance));
}

#[tokio::test]
#[ignore]
async fn test_normalized_output_has_unit_length() {
    let model = load_model(OnnxModelOptions {
        normalize: true,
        ..OnnxModelOptions::default()
    })
    .await;

    let embedding = model.embed("normalize me").await.unwrap();
    let magnitude = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((magnitude - 1.0).abs() < 1e-3);
}

#[tokio::test]
#[ignore]
async fn test_long_input_is_truncated() {
    let model = load_model(OnnxModelOptions {
        max_length: 16,
        ..OnnxModelOptions::default()
    })
    .await;

    let long_text = "word ".repeat(500);
    assert!(model.count_tokens(&long_text).await.unwrap() <= 16);
    assert_eq!(
        model.embed(&long_text).await.unwrap().len(),
        model.dimension()
    );
}

#[tokio::test]
#[ignore]
async fn test_empty_batch_returns_empty() {
    let model = load_model(OnnxModelOptions::default()).await;
    assert!(model.embed_batch(&[]).await.unwrap().is_empty());
}
