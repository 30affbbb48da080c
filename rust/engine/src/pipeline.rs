// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External services feeding a reconstruction: landmark detection and
//! facial metric analysis, plus the encoded image they both consume.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use neuroface_core::{FaceAnalysis, FaceMetrics, Landmark};
use thiserror::Error;

use crate::error::{EngineError, Result};

/// Image MIME types accepted in data URLs
const DATA_URL_TYPES: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Failure reported by a detector or analyzer backend
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("No face detected")]
    NoFaceDetected,

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Encoded image bytes (PNG, JPEG, WebP) held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    bytes: Bytes,
    mime: Option<String>,
}

impl EncodedImage {
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: None,
        }
    }

    /// Decode a `data:image/<type>;base64,<payload>` URL
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:image/")
            .ok_or_else(|| EngineError::InvalidImage("not an image data URL".into()))?;
        let (kind, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| EngineError::InvalidImage("data URL is not base64 encoded".into()))?;
        let kind = kind.to_ascii_lowercase();
        if !DATA_URL_TYPES.contains(&kind.as_str()) {
            return Err(EngineError::InvalidImage(format!("unsupported image type '{}'", kind)));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| EngineError::InvalidImage(e.to_string()))?;
        Ok(Self {
            bytes: Bytes::from(bytes),
            mime: Some(format!("image/{}", kind)),
        })
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// MIME type when known from a data URL
    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Finds the landmarks of exactly one face in an image
#[async_trait(?Send)]
pub trait LandmarkDetector {
    async fn detect(&mut self, image: &EncodedImage) -> std::result::Result<FaceAnalysis, ServiceError>;

    /// Clear state carried over from previous images
    fn reset(&mut self) {}
}

/// Estimates coarse facial proportions from an image
#[async_trait(?Send)]
pub trait MetricAnalyzer {
    async fn analyze(&self, image: &EncodedImage) -> std::result::Result<FaceMetrics, ServiceError>;
}

/// Detector returning a fixed landmark set, or no face when empty
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    landmarks: Vec<Landmark>,
    calls: usize,
    resets: usize,
}

impl StaticDetector {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks,
            calls: 0,
            resets: 0,
        }
    }

    /// Number of `detect` calls so far
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn resets(&self) -> usize {
        self.resets
    }
}

#[async_trait(?Send)]
impl LandmarkDetector for StaticDetector {
    async fn detect(&mut self, _image: &EncodedImage) -> std::result::Result<FaceAnalysis, ServiceError> {
        self.calls += 1;
        if self.landmarks.is_empty() {
            return Err(ServiceError::NoFaceDetected);
        }
        Ok(FaceAnalysis::from_landmarks(self.landmarks.clone()))
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

/// Analyzer returning fixed metrics, or failing when it has none
#[derive(Debug, Clone, Default)]
pub struct StaticAnalyzer {
    metrics: Option<FaceMetrics>,
}

impl StaticAnalyzer {
    pub fn new(metrics: FaceMetrics) -> Self {
        Self { metrics: Some(metrics) }
    }

    /// Analyzer whose every call fails
    pub fn failing() -> Self {
        Self { metrics: None }
    }
}

#[async_trait(?Send)]
impl MetricAnalyzer for StaticAnalyzer {
    async fn analyze(&self, _image: &EncodedImage) -> std::result::Result<FaceMetrics, ServiceError> {
        self.metrics
            .clone()
            .ok_or_else(|| ServiceError::Backend("analyzer unavailable".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_decodes() {
        let image = EncodedImage::from_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(image.bytes().as_ref(), b"hello");
        assert_eq!(image.mime(), Some("image/png"));
    }

    #[test]
    fn test_data_url_rejections() {
        for url in [
            "hello",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png,hello",
            "data:image/gif;base64,aGVsbG8=",
            "data:image/jpeg;base64,***",
        ] {
            assert!(
                matches!(EncodedImage::from_data_url(url), Err(EngineError::InvalidImage(_))),
                "{} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_raw_bytes() {
        let image = EncodedImage::from_bytes(vec![0xff, 0xd8, 0xff]);
        assert_eq!(image.len(), 3);
        assert!(image.mime().is_none());
    }
}
