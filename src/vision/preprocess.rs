// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload validation and image-to-tensor preprocessing

use image::imageops::FilterType;
use ndarray::Array4;
use thiserror::Error;

/// Model input width and height in pixels
pub const IMG_SIZE: u32 = 224;

/// Maximum upload size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// File extensions accepted for upload (matched case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Custom error types for upload preprocessing
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Invalid file type. Allowed types: png, jpg, jpeg")]
    InvalidFileType,

    #[error("Invalid image format or corrupted file")]
    InvalidImage,

    #[error("Image data is empty")]
    EmptyData,

    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Failed to build input tensor: {0}")]
    Internal(String),
}

/// Check if the claimed filename carries an allowed image extension
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Preprocess an uploaded image for classifier inference
///
/// Validates the claimed filename extension, decodes the bytes, converts to
/// RGB, resizes to `IMG_SIZE` x `IMG_SIZE` and scales pixels by 1/255.
///
/// # Returns
/// * `Ok(Array4<f32>)` - NHWC tensor of shape [1, 224, 224, 3], values in [0, 1]
/// * `Err(PreprocessError)` - If validation or decoding fails
pub fn preprocess_image(filename: &str, bytes: &[u8]) -> Result<Array4<f32>, PreprocessError> {
    if !allowed_file(filename) {
        return Err(PreprocessError::InvalidFileType);
    }

    if bytes.is_empty() {
        return Err(PreprocessError::EmptyData);
    }

    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(PreprocessError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    // The extension is only a claim; decoding goes by content
    let img = image::load_from_memory(bytes).map_err(|_| PreprocessError::InvalidImage)?;

    let resized = img.resize_exact(IMG_SIZE, IMG_SIZE, FilterType::Lanczos3);
    let rgb = resized.to_rgb8();

    let size = IMG_SIZE as usize;
    let mut data = Vec::with_capacity(size * size * 3);
    for pixel in rgb.pixels() {
        for c in 0..3 {
            data.push(pixel[c] as f32 / 255.0);
        }
    }

    // RgbImage iterates row-major, so the flat buffer is already HWC order
    Array4::from_shape_vec((1, size, size, 3), data)
        .map_err(|e| PreprocessError::Internal(e.to_string()))
}
