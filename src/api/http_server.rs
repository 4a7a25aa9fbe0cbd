// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, Host},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::predict::predict_handler;
use crate::classifier::Classify;
use crate::config::ServiceConfig;
use crate::vision::MAX_IMAGE_SIZE;

pub const SERVICE_NAME: &str = "Skin Cancer Detection API";

/// Shared per-process state: the classifier, loaded once before serving
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classify>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classify>) -> Self {
        Self { classifier }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // API information
        .route("/", get(home_handler))
        // Prediction endpoint
        .route("/predict", post(predict_handler))
        // Uploads can exceed axum's default 2MB body cap; the handler
        // enforces MAX_IMAGE_SIZE itself while streaming, so this outer
        // limit only backstops runaway bodies
        .layer(DefaultBodyLimit::max(2 * MAX_IMAGE_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(config: &ServiceConfig, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Static service descriptor returned by GET /
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub status: String,
    pub endpoints: ServiceEndpoints,
    pub usage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    pub documentation: String,
    pub prediction: String,
}

/// GET / - API information
async fn home_handler(Host(host): Host) -> Json<ServiceInfo> {
    let base_url = format!("http://{}", host);
    Json(ServiceInfo {
        name: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        endpoints: ServiceEndpoints {
            documentation: format!("{}/", base_url),
            prediction: format!("{}/predict (POST)", base_url),
        },
        usage: "Send a POST request with image file to /predict endpoint".to_string(),
    })
}
