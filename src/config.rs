// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment-driven service configuration

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_MODEL_PATH: &str = "./model/skin_cancer_model.onnx";
pub const DEFAULT_LOG_PATH: &str = "./api.log";

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP listen port (`PORT`)
    pub port: u16,
    /// Path to the trained ONNX artifact (`MODEL_PATH`)
    pub model_path: PathBuf,
    /// Append-only log file (`LOG_PATH`)
    pub log_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl ServiceConfig {
    /// Builds the configuration from environment variables, falling back to
    /// defaults for anything unset. A `PORT` that does not parse is a startup
    /// error rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value: {}", value))?,
            Err(_) => DEFAULT_PORT,
        };

        let model_path = env::var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH));

        let log_path = env::var("LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_PATH));

        Ok(Self {
            port,
            model_path,
            log_path,
        })
    }
}
