// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classifier adapter: wraps the pre-trained lesion model
//!
//! The model artifact is loaded once at startup and shared read-only across
//! requests. Output interpretation (sigmoid head vs softmax head) is fixed at
//! load time from the shape the model actually produces.

pub mod onnx;

use async_trait::async_trait;
use ndarray::Array4;
use thiserror::Error;

pub use onnx::OnnxClassifier;

/// Class labels in the model's output order
pub const CLASS_LABELS: [&str; 2] = ["Benign", "Malignant"];

/// Sigmoid decision threshold, inclusive toward the positive class
pub const POSITIVE_THRESHOLD: f32 = 0.5;

/// Errors from classifier loading and inference
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model artifact not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to load model: {0}")]
    Load(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// A single prediction: one label from the fixed label set plus a confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: &'static str,
    pub confidence: f32,
}

/// How to interpret the model's raw output, decided once at load time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputHead {
    /// Single scalar per example: probability of the positive class
    Binary,
    /// One score per class: argmax wins
    Multiclass { classes: usize },
}

/// Inference seam between the HTTP layer and the model runtime
#[async_trait]
pub trait Classify: Send + Sync {
    async fn predict(&self, tensor: Array4<f32>) -> Result<Prediction, ClassifierError>;
}

/// Map raw output scores to a label and confidence
///
/// Binary heads treat the scalar as P(positive); at or above the threshold
/// the positive class wins with that value, below it the negative class wins
/// with the complement. Multiclass heads take the argmax.
pub fn interpret_scores(head: OutputHead, scores: &[f32]) -> Result<Prediction, ClassifierError> {
    match head {
        OutputHead::Binary => {
            let p = *scores
                .first()
                .ok_or_else(|| ClassifierError::Inference("model produced no output".into()))?;
            if p >= POSITIVE_THRESHOLD {
                Ok(Prediction {
                    label: CLASS_LABELS[1],
                    confidence: p,
                })
            } else {
                Ok(Prediction {
                    label: CLASS_LABELS[0],
                    confidence: 1.0 - p,
                })
            }
        }
        OutputHead::Multiclass { classes } => {
            if scores.len() != classes {
                return Err(ClassifierError::Inference(format!(
                    "expected {} class scores, got {}",
                    classes,
                    scores.len()
                )));
            }
            let (index, max) = scores.iter().enumerate().fold(
                (0usize, f32::NEG_INFINITY),
                |(best_i, best_v), (i, &v)| {
                    if v > best_v {
                        (i, v)
                    } else {
                        (best_i, best_v)
                    }
                },
            );
            let label = CLASS_LABELS.get(index).copied().ok_or_else(|| {
                ClassifierError::Inference(format!(
                    "class index {} outside label set of {}",
                    index,
                    CLASS_LABELS.len()
                ))
            })?;
            Ok(Prediction {
                label,
                confidence: max,
            })
        }
    }
}
