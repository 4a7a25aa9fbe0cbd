// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire shape of every error reply: `{"error": <message>}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-level errors with their HTTP status mapping
///
/// Client input problems carry their message to the caller; server-side
/// failures reply with a fixed generic message and keep the detail in the
/// log.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Multipart form has no `file` field
    NoFileUploaded,
    /// `file` field present but the filename is empty
    EmptyFilename,
    /// Bad extension, corrupt image, or similar client input problem
    InvalidInput(String),
    /// Unexpected preprocessing failure
    ProcessingFailed,
    /// Model forward pass failed
    PredictionFailed,
    /// Anything else; detail is logged, never returned
    Unexpected,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFileUploaded | ApiError::EmptyFilename | ApiError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ProcessingFailed | ApiError::PredictionFailed | ApiError::Unexpected => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::NoFileUploaded => "No file uploaded".to_string(),
            ApiError::EmptyFilename => "Empty filename".to_string(),
            ApiError::InvalidInput(msg) => msg.clone(),
            ApiError::ProcessingFailed => "Failed to process image".to_string(),
            ApiError::PredictionFailed => "Failed to generate prediction".to_string(),
            ApiError::Unexpected => "An unexpected error occurred".to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
