// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX classifier wrapper
//!
//! Loads the trained lesion model via ONNX Runtime (CPU execution provider)
//! and exposes a single `predict` operation. A validation inference runs at
//! load time so a broken artifact fails startup instead of the first request,
//! and so the output head (sigmoid vs softmax) is decided exactly once.

use ndarray::{Array4, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use super::{interpret_scores, Classify, ClassifierError, OutputHead, Prediction};
use crate::vision::IMG_SIZE;

/// ONNX-backed lesion classifier
///
/// # Thread Safety
/// `ort::Session::run` takes `&mut self`, so the session sits behind an
/// `Arc<Mutex>`; concurrent requests serialize on the forward pass while the
/// rest of the struct stays read-only.
#[derive(Clone)]
pub struct OnnxClassifier {
    session: Arc<Mutex<Session>>,
    input_name: String,
    head: OutputHead,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_name", &self.input_name)
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Loads the model artifact from disk
    ///
    /// Runs one zero-tensor inference to validate the artifact and fix the
    /// output head. Any failure here is fatal to startup: the service must
    /// not come up with a half-initialized classifier.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(ClassifierError::ModelNotFound(
                model_path.display().to_string(),
            ));
        }

        let mut session = Session::builder()
            .map_err(|e| ClassifierError::Load(e.to_string()))?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(|e| ClassifierError::Load(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ClassifierError::Load(e.to_string()))?
            .with_intra_threads(4)
            .map_err(|e| ClassifierError::Load(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| {
                ClassifierError::Load(format!("{}: {}", model_path.display(), e))
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| ClassifierError::Load("model declares no inputs".into()))?;

        // Validation inference: a zeroed input tells us the output arity
        let probe = Array4::<f32>::zeros((1, IMG_SIZE as usize, IMG_SIZE as usize, 3));
        let scores = run_forward(&mut session, &input_name, probe)
            .map_err(|e| ClassifierError::Load(format!("validation inference failed: {}", e)))?;

        let head = match scores.len() {
            0 => return Err(ClassifierError::Load("model produced no output".into())),
            1 => OutputHead::Binary,
            n => OutputHead::Multiclass { classes: n },
        };

        info!(
            "Model loaded successfully from {} (input '{}', head {:?})",
            model_path.display(),
            input_name,
            head
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            head,
        })
    }

    /// Returns the output head fixed at load time
    pub fn head(&self) -> OutputHead {
        self.head
    }
}

#[async_trait::async_trait]
impl Classify for OnnxClassifier {
    async fn predict(&self, tensor: Array4<f32>) -> Result<Prediction, ClassifierError> {
        let scores = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| ClassifierError::Inference("session lock poisoned".into()))?;
            run_forward(&mut session, &self.input_name, tensor)?
        };
        interpret_scores(self.head, &scores)
    }
}

/// Run one forward pass and flatten the first example's scores
fn run_forward(
    session: &mut Session,
    input_name: &str,
    tensor: Array4<f32>,
) -> Result<Vec<f32>, ClassifierError> {
    let input = Value::from_array(tensor)
        .map_err(|e| ClassifierError::Inference(e.to_string()))?;

    let outputs = session
        .run(ort::inputs![input_name => input])
        .map_err(|e| ClassifierError::Inference(e.to_string()))?;

    // Index [0] instead of a name: output names vary across exported models
    let output = outputs[0]
        .try_extract_array::<f32>()
        .map_err(|e| ClassifierError::Inference(e.to_string()))?;

    // [batch, scores...] with batch size 1, or already a bare score vector
    let scores: Vec<f32> = if output.ndim() > 1 {
        output.index_axis(Axis(0), 0).iter().copied().collect()
    } else {
        output.iter().copied().collect()
    };

    Ok(scores)
}
