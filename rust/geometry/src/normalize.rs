// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Landmark normalization into model space
//!
//! Image space has its origin in the top-left corner with y growing
//! downward, and depth shrinks toward the camera. Model space is centered on
//! the face, y grows upward and +z points at the viewer.

use crate::error::Result;
use nalgebra::{Point2, Point3};
use neuroface_core::{Error as CoreError, Landmark};

/// Normalization parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeConfig {
    /// Model-space length the larger face dimension is scaled to
    pub target_span: f64,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self { target_span: 1.6 }
    }
}

/// Landmarks mapped into model space, index-aligned with the input
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCloud {
    /// One point per input landmark, same order
    pub points: Vec<Point3<f64>>,
    /// Bounding-box midpoint in image space
    pub center: Point2<f64>,
    /// Isotropic image-to-model scale factor
    pub scale: f64,
}

impl NormalizedCloud {
    /// Point for landmark `index`, if the detector produced one
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Point3<f64>> {
        self.points.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Planar bounds `(min, max)` of the cloud
    pub fn bounds_xy(&self) -> (Point2<f64>, Point2<f64>) {
        planar_bounds(self.points.iter().map(|p| (p.x, p.y)))
    }
}

fn planar_bounds(points: impl Iterator<Item = (f64, f64)>) -> (Point2<f64>, Point2<f64>) {
    let mut min = Point2::new(f64::MAX, f64::MAX);
    let mut max = Point2::new(f64::MIN, f64::MIN);
    for (x, y) in points {
        min.x = min.x.min(x);
        min.y = min.y.min(y);
        max.x = max.x.max(x);
        max.y = max.y.max(y);
    }
    (min, max)
}

/// Center and scale landmarks so the larger of face width and height spans
/// `config.target_span` model units.
///
/// Fails on an empty set or on any non-finite coordinate. A set whose
/// bounding box has zero extent keeps a scale of 1.0.
pub fn normalize_landmarks(landmarks: &[Landmark], config: &NormalizeConfig) -> Result<NormalizedCloud> {
    if landmarks.is_empty() {
        return Err(CoreError::EmptyLandmarkSet.into());
    }
    if let Some((index, l)) = landmarks.iter().enumerate().find(|(_, l)| !l.is_finite()) {
        return Err(CoreError::NonFiniteLandmark {
            index,
            x: l.x,
            y: l.y,
            z: l.z,
        }
        .into());
    }

    let (min, max) = planar_bounds(landmarks.iter().map(|l| (l.x, l.y)));
    let center = Point2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    let extent = (max.x - min.x).max(max.y - min.y);

    let scale = if extent > f64::EPSILON {
        config.target_span / extent
    } else {
        tracing::warn!(
            landmarks = landmarks.len(),
            "Landmark set has zero planar extent, keeping unit scale"
        );
        1.0
    };

    let points = landmarks
        .iter()
        .map(|l| {
            Point3::new(
                (l.x - center.x) * scale,
                -(l.y - center.y) * scale,
                -l.z * scale,
            )
        })
        .collect();

    Ok(NormalizedCloud { points, center, scale })
}
