// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # NeuroFace Core
//!
//! Data model shared by the NeuroFace geometry and engine crates.
//!
//! ## Overview
//!
//! - **Landmarks**: detected facial keypoints in image-normalized space
//! - **Feature topology**: named landmark index contours (lips, eyes, brows, oval)
//! - **Application state**: the host-owned phase enum the engine reacts to
//! - **Facial metrics**: scalar shape parameters from an external analyzer
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use neuroface_core::{FeatureKind, Landmark};
//!
//! let landmarks: Vec<Landmark> = detector_output();
//! for index in FeatureKind::LeftEye.indices() {
//!     if let Some(landmark) = landmarks.get(*index) {
//!         println!("{:?}", landmark);
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for landmarks, metrics and state

pub mod error;
pub mod features;
pub mod landmark;
pub mod metrics;
pub mod state;

pub use error::{Error, Result};
pub use features::FeatureKind;
pub use landmark::{generate_test_landmarks, Landmark, REFERENCE_LANDMARK_COUNT};
pub use metrics::{FaceAnalysis, FaceMetrics};
pub use state::AppState;
