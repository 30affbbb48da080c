// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tube extrusion along a closed curve

use crate::curve::CatmullRomCurve;
use crate::mesh::Mesh;
use nalgebra::{Rotation3, Unit, Vector3};
use std::f64::consts::TAU;

/// Tube cross-section and sampling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeParams {
    /// Samples along the curve
    pub tubular_segments: u32,
    /// Tube radius
    pub radius: f64,
    /// Vertices around the cross-section
    pub radial_segments: u32,
}

impl Default for TubeParams {
    fn default() -> Self {
        Self {
            tubular_segments: 64,
            radius: 0.008,
            radial_segments: 6,
        }
    }
}

/// Rotation-minimizing frames along the curve
struct Frames {
    tangents: Vec<Vector3<f64>>,
    normals: Vec<Vector3<f64>>,
    binormals: Vec<Vector3<f64>>,
}

fn rotate(v: Vector3<f64>, axis: Vector3<f64>, angle: f64) -> Vector3<f64> {
    match Unit::try_new(axis, 1e-12) {
        Some(axis) => Rotation3::from_axis_angle(&axis, angle) * v,
        None => v,
    }
}

/// Parallel-transport frames, twisted evenly so the last frame meets the
/// first on a closed curve.
fn closed_frames(curve: &CatmullRomCurve, segments: usize) -> Frames {
    let tangents: Vec<Vector3<f64>> = (0..=segments)
        .map(|i| curve.tangent_at(i as f64 / segments as f64))
        .collect();

    // Seed the first normal perpendicular to the tangent's smallest axis
    let t0 = tangents[0];
    let mut axis = Vector3::x();
    let mut smallest = t0.x.abs();
    if t0.y.abs() <= smallest {
        smallest = t0.y.abs();
        axis = Vector3::y();
    }
    if t0.z.abs() <= smallest {
        axis = Vector3::z();
    }
    let side = t0.cross(&axis).try_normalize(1e-12).unwrap_or_else(Vector3::y);

    let mut normals = Vec::with_capacity(segments + 1);
    let mut binormals = Vec::with_capacity(segments + 1);
    normals.push(t0.cross(&side));
    binormals.push(t0.cross(&normals[0]));

    for i in 1..=segments {
        let mut normal = normals[i - 1];
        let bend = tangents[i - 1].cross(&tangents[i]);
        if bend.norm() > f64::EPSILON {
            let theta = tangents[i - 1].dot(&tangents[i]).clamp(-1.0, 1.0).acos();
            normal = rotate(normal, bend, theta);
        }
        normals.push(normal);
        binormals.push(tangents[i].cross(&normal));
    }

    let mut theta = normals[0].dot(&normals[segments]).clamp(-1.0, 1.0).acos() / segments as f64;
    if tangents[0].dot(&normals[0].cross(&normals[segments])) > 0.0 {
        theta = -theta;
    }
    for i in 1..=segments {
        normals[i] = rotate(normals[i], tangents[i], theta * i as f64);
        binormals[i] = tangents[i].cross(&normals[i]);
    }

    Frames {
        tangents,
        normals,
        binormals,
    }
}

/// Sweep a circular cross-section along a closed curve.
///
/// The last ring repeats the first ring's frame so the seam closes
/// exactly. Produces `(tubular + 1) * (radial + 1)` vertices and
/// `tubular * radial * 6` indices.
pub fn closed_tube(curve: &CatmullRomCurve, params: &TubeParams) -> Mesh {
    let segments = params.tubular_segments.max(1) as usize;
    let radial = params.radial_segments.max(3) as usize;
    let frames = closed_frames(curve, segments);

    let mut mesh = Mesh::with_capacity((segments + 1) * (radial + 1), segments * radial * 6);
    for ring in 0..=segments {
        let i = if ring == segments { 0 } else { ring };
        let center = curve.point_at(i as f64 / segments as f64);
        let (n, b) = (frames.normals[i], frames.binormals[i]);
        for j in 0..=radial {
            let (sin, cos) = (j as f64 / radial as f64 * TAU).sin_cos();
            let normal = (n * -cos + b * sin)
                .try_normalize(1e-12)
                .unwrap_or_else(|| frames.tangents[i]);
            mesh.add_vertex(center + normal * params.radius, normal);
        }
    }

    let stride = (radial + 1) as u32;
    for j in 1..=segments as u32 {
        for i in 1..=radial as u32 {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            mesh.add_triangle(a, b, d);
            mesh.add_triangle(b, c, d);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn ring_curve() -> CatmullRomCurve {
        let points: Vec<_> = (0..20)
            .map(|k| {
                let a = k as f64 / 20.0 * TAU;
                Point3::new(0.1 * a.cos(), 0.04 * a.sin(), 0.0)
            })
            .collect();
        CatmullRomCurve::closed(&points).unwrap()
    }

    #[test]
    fn test_tube_counts() {
        let tube = closed_tube(&ring_curve(), &TubeParams::default());
        assert_eq!(tube.vertex_count(), 65 * 7);
        assert_eq!(tube.indices.len(), 64 * 6 * 6);
    }

    #[test]
    fn test_tube_vertices_sit_at_radius() {
        let curve = ring_curve();
        let params = TubeParams::default();
        let tube = closed_tube(&curve, &params);
        let stride = params.radial_segments as usize + 1;
        for ring in 0..params.tubular_segments as usize {
            let center = curve.point_at(ring as f64 / params.tubular_segments as f64);
            for j in 0..stride {
                let p = tube.position(ring * stride + j);
                // f32 storage limits precision
                assert_relative_eq!(nalgebra::distance(&p, &center), 0.008, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_seam_closes() {
        let params = TubeParams::default();
        let tube = closed_tube(&ring_curve(), &params);
        let stride = params.radial_segments as usize + 1;
        let last = params.tubular_segments as usize * stride;
        for j in 0..stride {
            assert_eq!(tube.position(j), tube.position(last + j));
        }
    }

    #[test]
    fn test_frames_stay_orthonormal() {
        let frames = closed_frames(&ring_curve(), 64);
        for i in 0..=64 {
            assert_relative_eq!(frames.normals[i].norm(), 1.0, epsilon = 1e-6);
            assert!(frames.normals[i].dot(&frames.tangents[i]).abs() < 1e-6);
        }
    }
}
