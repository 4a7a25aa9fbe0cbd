// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision module: upload validation and image preprocessing
//!
//! Turns an uploaded byte stream into the fixed-shape normalized tensor the
//! classifier expects. All state is request-local.

pub mod preprocess;

pub use preprocess::{
    allowed_file, preprocess_image, PreprocessError, ALLOWED_EXTENSIONS, IMG_SIZE, MAX_IMAGE_SIZE,
};
