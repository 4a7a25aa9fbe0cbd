// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers for endpoint tests: stub classifiers, multipart request
//! builders, and response body decoding.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use skin_lesion_api::api::{build_router, AppState};
use skin_lesion_api::classifier::{Classify, ClassifierError, Prediction, CLASS_LABELS};
use std::io::Cursor;
use std::sync::Arc;

/// Classifier stub returning a fixed prediction
pub struct StubClassifier {
    pub prediction: Prediction,
}

#[async_trait]
impl Classify for StubClassifier {
    async fn predict(&self, _tensor: Array4<f32>) -> Result<Prediction, ClassifierError> {
        Ok(self.prediction)
    }
}

/// Classifier stub whose forward pass always fails
pub struct FailingClassifier;

#[async_trait]
impl Classify for FailingClassifier {
    async fn predict(&self, _tensor: Array4<f32>) -> Result<Prediction, ClassifierError> {
        Err(ClassifierError::Inference("forward pass failed".into()))
    }
}

pub fn router_with(classifier: Arc<dyn Classify>) -> Router {
    build_router(AppState::new(classifier))
}

/// Router backed by a stub predicting Benign at 0.87654321
pub fn benign_router() -> Router {
    router_with(Arc::new(StubClassifier {
        prediction: Prediction {
            label: CLASS_LABELS[0],
            confidence: 0.87654321,
        },
    }))
}

pub const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Build a raw multipart/form-data body with a single field
pub fn multipart_body(field_name: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field_name, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n", field_name).as_bytes(),
        ),
    }
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST /predict request with one multipart field
pub fn predict_request(field_name: &str, filename: Option<&str>, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("host", "localhost:10000")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field_name, filename, content)))
        .unwrap()
}

pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A small valid PNG generated in memory
pub fn tiny_png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([180, 90, 60])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("Failed to encode test PNG");
    buf
}
