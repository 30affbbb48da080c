// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Base head mesh deformation
//!
//! A unit UV sphere is stretched into a head-like ellipsoid, then its
//! front-facing vertices are pulled toward nearby landmarks while the back
//! of the skull is compressed and the lower half tapered toward the jaw.

use crate::error::Result;
use crate::lines::LineBuffer;
use crate::mesh::Mesh;
use crate::normalize::NormalizedCloud;
use crate::spatial::{NearestNeighbor, SpatialIndexKind};
use nalgebra::Point3;

/// Base mesh deformation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformConfig {
    /// Sphere segments around the vertical axis
    pub width_segments: u32,
    /// Sphere segments from pole to pole
    pub height_segments: u32,
    /// Vertical elongation applied before landmark influence
    pub vertical_stretch: f64,
    /// Horizontal narrowing applied before landmark influence
    pub horizontal_scale: f64,
    /// Vertices with z above this belong to the face region
    pub face_depth_threshold: f64,
    /// Depth multiplier flattening the face region
    pub face_flatten: f64,
    /// Landmarks farther than this leave a face vertex untouched
    pub falloff_radius: f64,
    /// Influence lost per unit of planar distance
    pub falloff_slope: f64,
    /// Fraction of the influence applied to x and y
    pub planar_pull: f64,
    /// Fraction of the influence applied to depth
    pub depth_pull: f64,
    /// Added to landmark depth before pulling toward it
    pub forward_bias: f64,
    /// Skull vertices with z below this are compressed
    pub back_depth_threshold: f64,
    /// Depth multiplier for the back of the skull
    pub back_depth_scale: f64,
    /// Skull vertices with y below this are tapered
    pub taper_start: f64,
    /// Taper lost per unit below `taper_start`
    pub taper_rate: f64,
    /// Nearest-landmark query structure
    pub spatial_index: SpatialIndexKind,
}

impl Default for DeformConfig {
    fn default() -> Self {
        Self {
            width_segments: 48,
            height_segments: 36,
            vertical_stretch: 1.3,
            horizontal_scale: 0.9,
            face_depth_threshold: 0.1,
            face_flatten: 0.6,
            falloff_radius: 0.35,
            falloff_slope: 2.5,
            planar_pull: 0.6,
            depth_pull: 0.8,
            forward_bias: 0.3,
            back_depth_threshold: -0.5,
            back_depth_scale: 0.9,
            taper_start: -0.5,
            taper_rate: 0.5,
            spatial_index: SpatialIndexKind::Linear,
        }
    }
}

/// Deformed head surface and its wireframe
#[derive(Debug, Clone)]
pub struct DeformedHead {
    /// Deformed sphere with recomputed normals
    pub surface: Mesh,
    /// Unique tessellation edges of `surface`
    pub wireframe: LineBuffer,
    /// Vertices classified into the face region
    pub face_vertices: usize,
    /// Face vertices actually moved by a landmark
    pub influenced_vertices: usize,
}

/// Region a base vertex was classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexRegion {
    Face { influenced: bool },
    Skull,
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Deform a single base-sphere vertex.
///
/// `landmarks` must be the set `neighbors` was built over.
pub fn deform_vertex<N: NearestNeighbor + ?Sized>(
    vertex: Point3<f64>,
    landmarks: &[Point3<f64>],
    neighbors: &N,
    config: &DeformConfig,
) -> (Point3<f64>, VertexRegion) {
    let mut v = vertex;
    v.y *= config.vertical_stretch;
    v.x *= config.horizontal_scale;

    if v.z > config.face_depth_threshold {
        v.z *= config.face_flatten;

        let mut influenced = false;
        if let Some(hit) = neighbors.nearest(v.x, v.y) {
            let distance = hit.distance();
            if distance < config.falloff_radius {
                if let Some(target) = landmarks.get(hit.index) {
                    let influence = (1.0 - distance * config.falloff_slope).max(0.0);
                    v.x = lerp(v.x, target.x, influence * config.planar_pull);
                    v.y = lerp(v.y, target.y, influence * config.planar_pull);
                    v.z = lerp(v.z, target.z + config.forward_bias, influence * config.depth_pull);
                    influenced = influence > 0.0;
                }
            }
        }
        (v, VertexRegion::Face { influenced })
    } else {
        if v.z < config.back_depth_threshold {
            v.z *= config.back_depth_scale;
        }
        if v.y < config.taper_start {
            let taper = 1.0 - (v.y - config.taper_start).abs() * config.taper_rate;
            v.x *= taper;
            v.z *= taper;
        }
        (v, VertexRegion::Skull)
    }
}

/// Deform the base sphere toward a normalized landmark cloud using the
/// query structure selected in `config`.
pub fn deform_head(cloud: &NormalizedCloud, config: &DeformConfig) -> Result<DeformedHead> {
    let neighbors = config
        .spatial_index
        .build(&cloud.points, config.falloff_radius);
    deform_head_with(&cloud.points, neighbors.as_ref(), config)
}

/// Deform the base sphere with a caller-supplied nearest-neighbor query.
///
/// An empty landmark set leaves the face region at its flattened ellipsoid
/// shape.
pub fn deform_head_with<N: NearestNeighbor + ?Sized>(
    landmarks: &[Point3<f64>],
    neighbors: &N,
    config: &DeformConfig,
) -> Result<DeformedHead> {
    let mut surface = Mesh::uv_sphere(1.0, config.width_segments, config.height_segments)?;

    let mut face_vertices = 0;
    let mut influenced_vertices = 0;
    for i in 0..surface.vertex_count() {
        let (deformed, region) = deform_vertex(surface.position(i), landmarks, neighbors, config);
        if let VertexRegion::Face { influenced } = region {
            face_vertices += 1;
            if influenced {
                influenced_vertices += 1;
            }
        }
        surface.set_position(i, deformed);
    }
    surface.compute_normals();

    #[cfg(feature = "debug_geometry")]
    {
        let (min, max) = surface.bounds();
        tracing::debug!(?min, ?max, "deformed head bounds");
    }

    tracing::debug!(
        vertices = surface.vertex_count(),
        face_vertices,
        influenced_vertices,
        landmarks = landmarks.len(),
        "Deformed base head mesh"
    );

    let wireframe = LineBuffer::wireframe(&surface);
    Ok(DeformedHead {
        surface,
        wireframe,
        face_vertices,
        influenced_vertices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::LinearScan;
    use approx::assert_relative_eq;

    #[test]
    fn test_skull_vertex_is_only_prescaled() {
        let config = DeformConfig::default();
        let landmarks = [Point3::new(0.0, 0.0, 0.0)];
        let scan = LinearScan::new(&landmarks);

        let (v, region) = deform_vertex(Point3::new(1.0, 0.0, 0.0), &landmarks, &scan, &config);
        assert_eq!(region, VertexRegion::Skull);
        assert_relative_eq!(v.x, 0.9);
        assert_relative_eq!(v.y, 0.0);
    }

    #[test]
    fn test_back_of_skull_is_compressed() {
        let config = DeformConfig::default();
        let scan = LinearScan::new(&[]);
        let (v, _) = deform_vertex(Point3::new(0.0, 0.0, -1.0), &[], &scan, &config);
        assert_relative_eq!(v.z, -0.9);
    }

    #[test]
    fn test_lower_skull_tapers() {
        let config = DeformConfig::default();
        let scan = LinearScan::new(&[]);
        // y = -0.6 stretches to -0.78, 0.28 below the taper start
        let (v, _) = deform_vertex(Point3::new(0.5, -0.6, -0.2), &[], &scan, &config);
        let taper = 1.0 - 0.28 * 0.5;
        assert_relative_eq!(v.x, 0.45 * taper, epsilon = 1e-12);
        assert_relative_eq!(v.z, -0.2 * taper, epsilon = 1e-12);
    }

    #[test]
    fn test_face_vertex_pulled_toward_landmark() {
        let config = DeformConfig::default();
        let landmarks = [Point3::new(0.1, 0.0, 0.05)];
        let scan = LinearScan::new(&landmarks);

        let (v, region) = deform_vertex(Point3::new(0.0, 0.0, 1.0), &landmarks, &scan, &config);
        assert_eq!(region, VertexRegion::Face { influenced: true });

        // Flattened z = 0.6, distance 0.1, influence 0.75
        assert_relative_eq!(v.x, 0.1 * 0.75 * 0.6, epsilon = 1e-12);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.z, 0.6 + (0.35 - 0.6) * 0.75 * 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_face_vertex_beyond_falloff_is_flattened_only() {
        let config = DeformConfig::default();
        let landmarks = [Point3::new(0.5, 0.5, 0.0)];
        let scan = LinearScan::new(&landmarks);

        let (v, region) = deform_vertex(Point3::new(0.0, 0.0, 1.0), &landmarks, &scan, &config);
        assert_eq!(region, VertexRegion::Face { influenced: false });
        assert_relative_eq!(v.z, 0.6);
        assert_relative_eq!(v.x, 0.0);
    }

    #[test]
    fn test_empty_landmarks_keep_ellipsoid() {
        let config = DeformConfig::default();
        let head = deform_head_with(&[], &LinearScan::new(&[]), &config).unwrap();
        assert_eq!(head.influenced_vertices, 0);
        assert!(head.face_vertices > 0);
        assert_eq!(head.surface.vertex_count(), 49 * 37);
    }
}
