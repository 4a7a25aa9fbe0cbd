// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction endpoint: POST /predict
//!
//! Accepts a multipart upload (field `file`), preprocesses the image and
//! runs the classifier. Stateless across requests.

use axum::extract::{Host, OriginalUri, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::errors::ApiError;
use super::http_server::AppState;
use crate::vision::{self, PreprocessError, MAX_IMAGE_SIZE};
use axum_extra::extract::multipart::MultipartRejection;
use axum_extra::extract::Multipart;

/// Successful prediction reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub confidence: f64,
    pub endpoint: String,
    pub timestamp: String,
    pub status: String,
}

/// POST /predict - Classify an uploaded lesion image
///
/// Validation happens in request order: file field present, filename
/// non-empty, extension allowed, image decodable. Client mistakes come back
/// as 400 with a reason; everything else is a generic 500 with the detail
/// logged.
pub async fn predict_handler(
    State(state): State<AppState>,
    Host(host): Host,
    OriginalUri(uri): OriginalUri,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    // A body that is not multipart/form-data carries no file field; keep the
    // JSON error envelope instead of the extractor's plain-text rejection
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Request body is not multipart/form-data: {}", rejection);
            return Err(ApiError::NoFileUploaded);
        }
    };

    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read multipart stream: {}", e);
                return Err(ApiError::Unexpected);
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();

        // Stream the upload with the size cap enforced here, so an oversized
        // file is a 400 rather than tripping the transport body limit
        let mut data: Vec<u8> = Vec::new();
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    data.extend_from_slice(&chunk);
                    if data.len() > MAX_IMAGE_SIZE {
                        warn!(
                            "Rejected upload '{}': exceeds {} byte limit",
                            filename, MAX_IMAGE_SIZE
                        );
                        return Err(ApiError::InvalidInput(
                            PreprocessError::TooLarge(data.len(), MAX_IMAGE_SIZE).to_string(),
                        ));
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read uploaded file body: {}", e);
                    return Err(ApiError::Unexpected);
                }
            }
        }
        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(ApiError::NoFileUploaded);
    };

    if filename.is_empty() {
        return Err(ApiError::EmptyFilename);
    }

    let tensor = match vision::preprocess_image(&filename, &data) {
        Ok(tensor) => tensor,
        Err(
            err @ (PreprocessError::InvalidFileType
            | PreprocessError::InvalidImage
            | PreprocessError::EmptyData
            | PreprocessError::TooLarge(..)),
        ) => {
            warn!("Rejected upload '{}': {}", filename, err);
            return Err(ApiError::InvalidInput(err.to_string()));
        }
        Err(err) => {
            error!("Image processing error for '{}': {}", filename, err);
            return Err(ApiError::ProcessingFailed);
        }
    };

    let prediction = match state.classifier.predict(tensor).await {
        Ok(prediction) => prediction,
        Err(e) => {
            error!("Prediction error: {}", e);
            return Err(ApiError::PredictionFailed);
        }
    };

    info!(
        "Prediction: {} ({:.2}%)",
        prediction.label,
        prediction.confidence * 100.0
    );

    Ok(Json(PredictResponse {
        prediction: prediction.label.to_string(),
        confidence: round_confidence(prediction.confidence),
        endpoint: format!("http://{}{}", host, uri),
        timestamp: Utc::now().to_rfc3339(),
        status: "success".to_string(),
    }))
}

/// Round a confidence to 4 decimal places for the wire
pub fn round_confidence(confidence: f32) -> f64 {
    (confidence as f64 * 10_000.0).round() / 10_000.0
}
