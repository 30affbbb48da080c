// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Results delivered by the external detector and analyzer

use crate::landmark::Landmark;

/// Normalized scalar shape parameters from the facial metric analyzer.
///
/// Reference ranges: `jaw_width` 0.8 narrow to 1.2 wide, `face_height` 0.9
/// short to 1.3 long, `cheekbone_prominence` 0.1 flat to 0.5 prominent,
/// `chin_taper` 0.5 pointy to 1.0 square.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FaceMetrics {
    pub jaw_width: f64,
    pub face_height: f64,
    pub cheekbone_prominence: f64,
    pub chin_taper: f64,
    pub description: String,
}

impl FaceMetrics {
    /// Parameters substituted when analysis fails
    pub fn fallback() -> Self {
        Self {
            jaw_width: 1.0,
            face_height: 1.1,
            cheekbone_prominence: 0.2,
            chin_taper: 0.8,
            description: "Analysis failed, using default topology.".to_string(),
        }
    }
}

impl Default for FaceMetrics {
    fn default() -> Self {
        Self::fallback()
    }
}

/// One face's landmark result plus a display description
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceAnalysis {
    pub landmarks: Vec<Landmark>,
    pub description: String,
}

impl FaceAnalysis {
    /// Wrap detector output with the standard keypoint description
    pub fn from_landmarks(landmarks: Vec<Landmark>) -> Self {
        let description = format!(
            "Detected {} facial keypoints via Neural Mesh.",
            landmarks.len()
        );
        Self { landmarks, description }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_metrics() {
        let metrics = FaceMetrics::default();
        assert_eq!(metrics.jaw_width, 1.0);
        assert_eq!(metrics.face_height, 1.1);
        assert_eq!(metrics.cheekbone_prominence, 0.2);
        assert_eq!(metrics.chin_taper, 0.8);
        assert!(metrics.description.contains("default topology"));
    }

    #[test]
    fn test_analysis_description_counts_keypoints() {
        let analysis = FaceAnalysis::from_landmarks(vec![Landmark::default(); 468]);
        assert_eq!(
            analysis.description,
            "Detected 468 facial keypoints via Neural Mesh."
        );
    }
}
