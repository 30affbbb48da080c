// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named landmark contours of the 468-point face mesh topology.
//!
//! Closed contours (lips, eyes, oval) repeat their first index at the end so
//! that a polyline drawn through them in order closes on itself.

const LIPS_OUTER: &[usize] = &[
    61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 409, 270, 269, 267, 0, 37, 39, 40, 185, 61,
];
const LIPS_INNER: &[usize] = &[
    78, 191, 80, 81, 82, 13, 312, 311, 310, 415, 308, 324, 318, 402, 317, 14, 87, 178, 88, 95, 78,
];
const LEFT_EYE: &[usize] = &[33, 160, 158, 133, 153, 144, 33];
const RIGHT_EYE: &[usize] = &[362, 385, 387, 263, 373, 380, 362];
const LEFT_EYEBROW: &[usize] = &[70, 63, 105, 66, 107, 55, 65, 52, 53, 46];
const RIGHT_EYEBROW: &[usize] = &[336, 296, 334, 293, 300, 276, 283, 282, 295, 285];
const FACE_OVAL: &[usize] = &[
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109, 10,
];

/// A named facial feature contour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FeatureKind {
    LipsOuter,
    LipsInner,
    LeftEye,
    RightEye,
    LeftEyebrow,
    RightEyebrow,
    FaceOval,
}

impl FeatureKind {
    /// All features in declaration order
    pub const ALL: [FeatureKind; 7] = [
        FeatureKind::LipsOuter,
        FeatureKind::LipsInner,
        FeatureKind::LeftEye,
        FeatureKind::RightEye,
        FeatureKind::LeftEyebrow,
        FeatureKind::RightEyebrow,
        FeatureKind::FaceOval,
    ];

    /// Ordered landmark indices tracing this feature
    #[inline]
    pub fn indices(self) -> &'static [usize] {
        match self {
            FeatureKind::LipsOuter => LIPS_OUTER,
            FeatureKind::LipsInner => LIPS_INNER,
            FeatureKind::LeftEye => LEFT_EYE,
            FeatureKind::RightEye => RIGHT_EYE,
            FeatureKind::LeftEyebrow => LEFT_EYEBROW,
            FeatureKind::RightEyebrow => RIGHT_EYEBROW,
            FeatureKind::FaceOval => FACE_OVAL,
        }
    }

    /// Feature name as used by the face mesh topology tables
    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::LipsOuter => "lipsOuter",
            FeatureKind::LipsInner => "lipsInner",
            FeatureKind::LeftEye => "leftEye",
            FeatureKind::RightEye => "rightEye",
            FeatureKind::LeftEyebrow => "leftEyebrow",
            FeatureKind::RightEyebrow => "rightEyebrow",
            FeatureKind::FaceOval => "faceOval",
        }
    }
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::REFERENCE_LANDMARK_COUNT;

    #[test]
    fn test_all_indices_address_reference_topology() {
        for kind in FeatureKind::ALL {
            assert!(
                kind.indices().iter().all(|&i| i < REFERENCE_LANDMARK_COUNT),
                "{} has an index outside the reference topology",
                kind
            );
        }
    }

    #[test]
    fn test_contour_lengths() {
        assert_eq!(FeatureKind::LipsOuter.indices().len(), 21);
        assert_eq!(FeatureKind::LeftEye.indices().len(), 7);
        assert_eq!(FeatureKind::LeftEyebrow.indices().len(), 10);
        assert_eq!(FeatureKind::FaceOval.indices().len(), 37);
    }

    #[test]
    fn test_names() {
        assert_eq!(FeatureKind::LipsOuter.to_string(), "lipsOuter");
        assert_eq!(FeatureKind::FaceOval.name(), "faceOval");
    }
}
