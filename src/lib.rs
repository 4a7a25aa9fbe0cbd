// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod config;
pub mod vision;

// Re-export main types
pub use api::{build_router, start_server, ApiError, AppState, ErrorResponse, PredictResponse};
pub use classifier::{
    Classify, ClassifierError, OnnxClassifier, OutputHead, Prediction, CLASS_LABELS,
};
pub use config::ServiceConfig;
pub use vision::{allowed_file, preprocess_image, PreprocessError, IMG_SIZE};
