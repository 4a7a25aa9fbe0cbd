// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Endpoint tests for GET / and route registration

use super::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "localhost:10000")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_home_returns_service_descriptor() {
    let app = benign_router();
    let response = app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    assert_eq!(body["name"], "Skin Cancer Detection API");
    assert_eq!(body["status"], "running");
    assert_eq!(
        body["usage"],
        "Send a POST request with image file to /predict endpoint"
    );
    assert_eq!(body["endpoints"]["documentation"], "http://localhost:10000/");
    assert_eq!(
        body["endpoints"]["prediction"],
        "http://localhost:10000/predict (POST)"
    );
}

#[tokio::test]
async fn test_home_echoes_request_host() {
    let app = benign_router();
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("host", "lesions.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(
        body["endpoints"]["prediction"],
        "http://lesions.example.com/predict (POST)"
    );
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = benign_router();
    let response = app.oneshot(get_request("/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_on_predict_is_not_allowed() {
    let app = benign_router();
    let response = app.oneshot(get_request("/predict")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
