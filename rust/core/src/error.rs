// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across the reconstruction pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Empty landmark set: at least one landmark is required")]
    EmptyLandmarkSet,

    #[error("Landmark {index} is not finite: ({x}, {y}, {z})")]
    NonFiniteLandmark { index: usize, x: f64, y: f64, z: f64 },
}
