// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facial landmark records

use crate::features::FeatureKind;

/// Number of landmarks produced by the reference face mesh detector
/// (without iris refinement).
pub const REFERENCE_LANDMARK_COUNT: usize = 468;

/// A single detected facial keypoint.
///
/// `x` and `y` are fractions of the image width and height (`[0, 1]`, y grows
/// downward). `z` is a relative depth estimate on roughly the same scale as
/// `x`, smaller values being closer to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Check that all three coordinates are finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Generate a deterministic synthetic landmark set for tests and demos.
///
/// The face oval traces a circle of radius 0.3 around the image center
/// (0.5, 0.5); eyes, brows and lips sit at plausible positions inside it and
/// every remaining index fills the disk on a sunflower spiral. Indices past
/// `count` are simply not generated, so feature lookups on short sets fail to
/// resolve the same way a truncated detector result would.
pub fn generate_test_landmarks(count: usize) -> Vec<Landmark> {
    const CENTER: (f64, f64) = (0.5, 0.5);
    const OVAL_RADIUS: f64 = 0.3;
    const FILL_RADIUS: f64 = 0.27;
    let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());

    let mut landmarks: Vec<Landmark> = (0..count)
        .map(|i| {
            let r = FILL_RADIUS * ((i as f64 + 0.5) / count as f64).sqrt();
            let theta = i as f64 * golden_angle;
            let depth = -0.06 * (1.0 - (r / FILL_RADIUS).powi(2));
            Landmark::new(
                CENTER.0 + r * theta.cos(),
                CENTER.1 + r * theta.sin(),
                depth,
            )
        })
        .collect();

    let mut place = |indices: &[usize], f: &dyn Fn(f64) -> Landmark| {
        // Closed contours repeat their first index at the end
        let unique = if indices.len() > 1 && indices.first() == indices.last() {
            &indices[..indices.len() - 1]
        } else {
            indices
        };
        for (k, &index) in unique.iter().enumerate() {
            if let Some(slot) = landmarks.get_mut(index) {
                *slot = f(k as f64 / unique.len() as f64);
            }
        }
    };

    let tau = std::f64::consts::TAU;
    place(FeatureKind::FaceOval.indices(), &|t: f64| {
        let angle = t * tau;
        Landmark::new(
            CENTER.0 + OVAL_RADIUS * angle.sin(),
            CENTER.1 - OVAL_RADIUS * angle.cos(),
            0.02,
        )
    });
    for (kind, cx) in [(FeatureKind::LeftEye, 0.39), (FeatureKind::RightEye, 0.61)] {
        place(kind.indices(), &move |t: f64| {
            let angle = t * tau;
            Landmark::new(cx + 0.045 * angle.cos(), 0.42 + 0.018 * angle.sin(), -0.03)
        });
    }
    for (kind, cx) in [(FeatureKind::LeftEyebrow, 0.39), (FeatureKind::RightEyebrow, 0.61)] {
        place(kind.indices(), &move |t: f64| {
            let dx = (t - 0.5) * 0.12;
            Landmark::new(cx + dx, 0.36 + 40.0 * dx * dx * 0.1, -0.035)
        });
    }
    place(FeatureKind::LipsOuter.indices(), &|t: f64| {
        let angle = t * tau;
        Landmark::new(0.5 - 0.08 * angle.cos(), 0.67 + 0.03 * angle.sin(), -0.04)
    });
    place(FeatureKind::LipsInner.indices(), &|t: f64| {
        let angle = t * tau;
        Landmark::new(0.5 - 0.06 * angle.cos(), 0.67 + 0.012 * angle.sin(), -0.035)
    });

    landmarks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_set_has_requested_count() {
        let landmarks = generate_test_landmarks(REFERENCE_LANDMARK_COUNT);
        assert_eq!(landmarks.len(), REFERENCE_LANDMARK_COUNT);
        assert!(landmarks.iter().all(Landmark::is_finite));
    }

    #[test]
    fn test_generated_oval_bounds_the_set() {
        let landmarks = generate_test_landmarks(REFERENCE_LANDMARK_COUNT);
        let min_x = landmarks.iter().map(|l| l.x).fold(f64::MAX, f64::min);
        let max_x = landmarks.iter().map(|l| l.x).fold(f64::MIN, f64::max);
        let min_y = landmarks.iter().map(|l| l.y).fold(f64::MAX, f64::min);
        let max_y = landmarks.iter().map(|l| l.y).fold(f64::MIN, f64::max);

        assert!((min_x - 0.2).abs() < 1e-9);
        assert!((max_x - 0.8).abs() < 1e-9);
        assert!((min_y - 0.2).abs() < 1e-9);
        assert!((max_y - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_short_set_skips_out_of_range_indices() {
        let landmarks = generate_test_landmarks(10);
        assert_eq!(landmarks.len(), 10);
    }

    #[test]
    fn test_non_finite_detection() {
        assert!(Landmark::new(0.1, 0.2, 0.3).is_finite());
        assert!(!Landmark::new(f64::NAN, 0.2, 0.3).is_finite());
        assert!(!Landmark::new(0.1, f64::INFINITY, 0.3).is_finite());
    }
}
