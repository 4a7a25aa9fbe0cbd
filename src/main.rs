// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use skin_lesion_api::{
    api::{start_server, AppState},
    classifier::OnnxClassifier,
    config::ServiceConfig,
};
use std::{env, fs::OpenOptions, sync::Arc};
use tracing::info;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    let config = ServiceConfig::from_env()?;

    // Log to stdout and an append-only file, like the original deployment
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("failed to open log file {}", config.log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stdout.and(Arc::new(log_file)))
        .init();

    info!("Starting {}...", skin_lesion_api::api::SERVICE_NAME);

    // The model must load before any route becomes reachable; a broken
    // artifact aborts startup here
    let classifier = OnnxClassifier::load(&config.model_path)
        .with_context(|| format!("failed to load model from {}", config.model_path.display()))?;
    info!("Classifier ready (head: {:?})", classifier.head());

    let state = AppState::new(Arc::new(classifier));
    start_server(&config, state).await
}
