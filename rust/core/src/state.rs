// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host application phases

/// Phase of the hosting application.
///
/// Owned by the host; the engine only reads it to pick a rotation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AppState {
    /// Landing screen, nothing scanned yet
    #[default]
    Landing,
    /// Waiting for an image
    Idle,
    /// Landmark detection and metric analysis in flight
    Analyzing,
    /// Reconstruction reveal animation running
    Generating,
    /// Reveal finished, model locked in
    Complete,
}

impl AppState {
    /// Check if a new image may be submitted in this phase
    #[inline]
    pub fn accepts_upload(self) -> bool {
        matches!(self, AppState::Idle | AppState::Complete)
    }
}
