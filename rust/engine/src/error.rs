// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for reconstruction sessions and the scene.

use thiserror::Error;

/// Prompt shown to the user when no face could be scanned
pub const RETRY_PROMPT: &str = "Scan failed. Try a well-lit frontal photo.";

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine error types.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Detection produced no usable face; `reason` is the detector's message
    #[error("{prompt}")]
    DetectionFailure { prompt: &'static str, reason: String },

    #[error("Landmark set is empty")]
    EmptyLandmarkSet,

    #[error("Cannot accept an image while {0:?}")]
    Busy(neuroface_core::AppState),

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),

    #[error("Geometry error: {0}")]
    Geometry(#[from] neuroface_geometry::Error),
}

impl EngineError {
    pub fn detection_failure(reason: impl Into<String>) -> Self {
        EngineError::DetectionFailure {
            prompt: RETRY_PROMPT,
            reason: reason.into(),
        }
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            EngineError::DetectionFailure { prompt, .. } => (*prompt).to_string(),
            other => other.to_string(),
        }
    }
}
