// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Pooling of token-level model output into sentence vectors

use ndarray::{ArrayView2, ArrayViewD, Axis};

/// Mean of token embeddings weighted by the attention mask
///
/// `tokens` is `[seq_len, hidden_dim]`; `mask` holds one entry per token
/// (1 for real tokens, 0 for padding). Mask entries beyond `seq_len` are
/// ignored.
pub fn mean_pool(tokens: ArrayView2<'_, f32>, mask: &[i64]) -> Vec<f32> {
    let hidden_dim = tokens.shape()[1];
    let mut pooled = vec![0.0f32; hidden_dim];
    let mut sum_mask = 0.0f32;

    for (row, &mask_value) in tokens.axis_iter(Axis(0)).zip(mask) {
        let weight = mask_value as f32;
        if weight == 0.0 {
            continue;
        }
        sum_mask += weight;
        for (acc, value) in pooled.iter_mut().zip(row.iter()) {
            *acc += value * weight;
        }
    }

    let denominator = sum_mask.max(1e-9);
    for val in &mut pooled {
        *val /= denominator;
    }
    pooled
}

/// Turns a `[batch, seq, hidden]` or `[batch, hidden]` model output into one
/// vector per batch item
///
/// `mask` is the flattened `[batch, seq]` attention mask fed to the model.
pub fn pool_output(output: ArrayViewD<'_, f32>, mask: &[i64], seq_len: usize) -> Option<Vec<Vec<f32>>> {
    match output.ndim() {
        3 => {
            let batch = output.shape()[0];
            let mut vectors = Vec::with_capacity(batch);
            for batch_idx in 0..batch {
                let item = output
                    .index_axis(Axis(0), batch_idx)
                    .into_dimensionality::<ndarray::Ix2>()
                    .ok()?;
                let start = batch_idx * seq_len;
                let item_mask = mask.get(start..start + seq_len)?;
                vectors.push(mean_pool(item, item_mask));
            }
            Some(vectors)
        }
        // already pooled by the graph
        2 => Some(
            output
                .axis_iter(Axis(0))
                .map(|row| row.iter().copied().collect())
                .collect(),
        ),
        _ => None,
    }
}

/// Scales `vector` to unit length in place; the zero vector is left as is
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
