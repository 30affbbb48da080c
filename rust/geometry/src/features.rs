// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Feature overlays: eye spheres, mouth tube and contour polylines
//!
//! Every feature is built from the landmark indices of its contour. Indices
//! that fall outside the landmark set are skipped; a feature whose remaining
//! points cannot form its primitive is omitted rather than reported as an
//! error.

use crate::curve::CatmullRomCurve;
use crate::group::{Primitive, SubMesh, SubMeshRole};
use crate::lines::LineBuffer;
use crate::mesh::Mesh;
use crate::style::MaterialStyle;
use crate::tube::{closed_tube, TubeParams};
use nalgebra::{Point3, Vector3};
use neuroface_core::FeatureKind;
use smallvec::SmallVec;
use std::sync::Arc;

/// Points gathered for one contour; the 37-point face oval is the longest
pub type ContourPoints = SmallVec<[Point3<f64>; 64]>;

/// Feature overlay parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureConfig {
    /// Eye sphere radius as a fraction of the eye's horizontal span
    pub eye_radius_factor: f64,
    pub eye_width_segments: u32,
    pub eye_height_segments: u32,
    /// Depth offset keeping eye spheres in front of the surface
    pub eye_depth_offset: f64,
    pub mouth_depth_offset: f64,
    pub mouth_tube: TubeParams,
    pub contour_depth_offset: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            eye_radius_factor: 0.35,
            eye_width_segments: 16,
            eye_height_segments: 12,
            eye_depth_offset: 0.04,
            mouth_depth_offset: 0.02,
            mouth_tube: TubeParams::default(),
            contour_depth_offset: 0.015,
        }
    }
}

/// Collect the points of `kind` in contour order, skipping unresolved indices
pub fn gather_points(points: &[Point3<f64>], kind: FeatureKind) -> ContourPoints {
    kind.indices()
        .iter()
        .filter_map(|&i| points.get(i).copied())
        .collect()
}

/// Wireframe sphere centered on the gathered eye contour.
///
/// Returns `None` when no index resolves. A single point yields a
/// zero-radius sphere at that point.
pub fn eye_mesh(points: &[Point3<f64>], kind: FeatureKind, config: &FeatureConfig) -> Option<Mesh> {
    let gathered = gather_points(points, kind);
    if gathered.is_empty() {
        return None;
    }

    let mut sum = Vector3::zeros();
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for p in &gathered {
        sum += p.coords;
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
    }
    let centroid = sum / gathered.len() as f64;
    let radius = (max_x - min_x) * config.eye_radius_factor;

    let mut mesh = match Mesh::uv_sphere(radius, config.eye_width_segments, config.eye_height_segments) {
        Ok(mesh) => mesh,
        Err(e) => {
            tracing::warn!(feature = %kind, error = %e, "Skipping eye");
            return None;
        }
    };
    mesh.translate(centroid + Vector3::new(0.0, 0.0, config.eye_depth_offset));
    Some(mesh)
}

/// Closed tube along the outer lip contour.
///
/// Returns `None` when fewer than two distinct lip points resolve.
pub fn mouth_mesh(points: &[Point3<f64>], config: &FeatureConfig) -> Option<Mesh> {
    let offset = Vector3::new(0.0, 0.0, config.mouth_depth_offset);
    let lips: ContourPoints = gather_points(points, FeatureKind::LipsOuter)
        .into_iter()
        .map(|p| p + offset)
        .collect();

    match CatmullRomCurve::closed(&lips) {
        Ok(curve) => Some(closed_tube(&curve, &config.mouth_tube)),
        Err(e) => {
            tracing::debug!(resolved = lips.len(), error = %e, "Omitting mouth");
            None
        }
    }
}

/// Unsmoothed polyline through the contour, lifted off the surface.
///
/// Returns `None` when fewer than two points resolve.
pub fn contour_line(points: &[Point3<f64>], kind: FeatureKind, config: &FeatureConfig) -> Option<LineBuffer> {
    let offset = Vector3::new(0.0, 0.0, config.contour_depth_offset);
    let lifted: ContourPoints = gather_points(points, kind)
        .into_iter()
        .map(|p| p + offset)
        .collect();
    if lifted.len() < 2 {
        tracing::debug!(feature = %kind, resolved = lifted.len(), "Omitting contour");
        return None;
    }
    Some(LineBuffer::from_points(&lifted))
}

/// Build every feature overlay that the landmark set supports
pub fn synthesize_features(points: &[Point3<f64>], config: &FeatureConfig) -> Vec<SubMesh> {
    let mut out = Vec::with_capacity(6);

    for (kind, role) in [
        (FeatureKind::LeftEye, SubMeshRole::LeftEye),
        (FeatureKind::RightEye, SubMeshRole::RightEye),
    ] {
        if let Some(mesh) = eye_mesh(points, kind, config) {
            out.push(SubMesh::new(role, Primitive::Triangles(Arc::new(mesh)), MaterialStyle::EYE));
        }
    }

    if let Some(mesh) = mouth_mesh(points, config) {
        out.push(SubMesh::new(
            SubMeshRole::Mouth,
            Primitive::Triangles(Arc::new(mesh)),
            MaterialStyle::MOUTH,
        ));
    }

    for (kind, role) in [
        (FeatureKind::LeftEyebrow, SubMeshRole::LeftEyebrow),
        (FeatureKind::RightEyebrow, SubMeshRole::RightEyebrow),
        (FeatureKind::FaceOval, SubMeshRole::FaceOval),
    ] {
        if let Some(line) = contour_line(points, kind, config) {
            out.push(SubMesh::new(role, Primitive::LineStrip(Arc::new(line)), MaterialStyle::CONTOUR));
        }
    }

    out
}
