// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use std::f64::consts::{PI, TAU};

/// Indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Tessellate a UV sphere centered at the origin.
    ///
    /// Produces `(width_segments + 1) * (height_segments + 1)` vertices laid
    /// out row by row from the north pole (+Y) to the south pole. The seam
    /// column is duplicated and the pole rows emit a single triangle per
    /// quad. Azimuth 0 points along -X and a quarter turn points along +Z.
    pub fn uv_sphere(radius: f64, width_segments: u32, height_segments: u32) -> Result<Self> {
        if width_segments < 3 || height_segments < 2 {
            return Err(Error::InvalidTessellation(format!(
                "sphere needs at least 3x2 segments, got {}x{}",
                width_segments, height_segments
            )));
        }

        let columns = width_segments as usize + 1;
        let rows = height_segments as usize + 1;
        let mut mesh = Mesh::with_capacity(
            columns * rows,
            width_segments as usize * (height_segments as usize * 2 - 2) * 3,
        );

        for iy in 0..rows {
            let v = iy as f64 / height_segments as f64;
            let (sin_theta, cos_theta) = (v * PI).sin_cos();
            for ix in 0..columns {
                let u = ix as f64 / width_segments as f64;
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();
                let direction = Vector3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                mesh.add_vertex(Point3::from(direction * radius), direction);
            }
        }

        let at = |iy: usize, ix: usize| (iy * columns + ix) as u32;
        let last_row = height_segments as usize - 1;
        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = at(iy, ix + 1);
                let b = at(iy, ix);
                let c = at(iy + 1, ix);
                let d = at(iy + 1, ix + 1);
                if iy != 0 {
                    mesh.add_triangle(a, b, d);
                }
                if iy != last_row {
                    mesh.add_triangle(b, c, d);
                }
            }
        }

        Ok(mesh)
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Read a vertex position
    #[inline]
    pub fn position(&self, index: usize) -> Point3<f64> {
        let i = index * 3;
        Point3::new(
            self.positions[i] as f64,
            self.positions[i + 1] as f64,
            self.positions[i + 2] as f64,
        )
    }

    /// Overwrite a vertex position
    #[inline]
    pub fn set_position(&mut self, index: usize, position: Point3<f64>) {
        let i = index * 3;
        self.positions[i] = position.x as f32;
        self.positions[i + 1] = position.y as f32;
        self.positions[i + 2] = position.z as f32;
    }

    /// Translate every vertex by `offset`
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for chunk in self.positions.chunks_exact_mut(3) {
            chunk[0] = (chunk[0] as f64 + offset.x) as f32;
            chunk[1] = (chunk[1] as f64 + offset.y) as f32;
            chunk[2] = (chunk[2] as f64 + offset.z) as f32;
        }
    }

    /// Recompute vertex normals from triangle faces.
    ///
    /// Face normals are accumulated unnormalized, so larger triangles weigh
    /// more. Vertices touched only by degenerate triangles get a zero normal.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.vertex_count();
        if vertex_count == 0 {
            return;
        }

        let mut normals = vec![Vector3::<f64>::zeros(); vertex_count];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let v0 = self.position(i0);
            let v1 = self.position(i1);
            let v2 = self.position(i2);

            let normal = (v1 - v0).cross(&(v2 - v0));
            normals[i0] += normal;
            normals[i1] += normal;
            normals[i2] += normal;
        }

        self.normals.clear();
        self.normals.reserve(vertex_count * 3);
        for normal in normals {
            let normalized = normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
            self.normals.push(normalized.x as f32);
            self.normals.push(normalized.y as f32);
            self.normals.push(normalized.z as f32);
        }
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.positions, vec![1.0, 2.0, 3.0]);
        assert_eq!(mesh.normals, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_uv_sphere_counts() {
        let sphere = Mesh::uv_sphere(1.0, 48, 36).unwrap();
        assert_eq!(sphere.vertex_count(), 49 * 37);
        // Pole rows contribute one triangle per quad instead of two
        assert_eq!(sphere.triangle_count(), 48 * (36 * 2 - 2));
        assert_eq!(sphere.normals.len(), sphere.positions.len());
    }

    #[test]
    fn test_uv_sphere_vertices_on_radius() {
        let sphere = Mesh::uv_sphere(0.8, 24, 24).unwrap();
        for i in 0..sphere.vertex_count() {
            let p = sphere.position(i);
            assert!((p.coords.norm() - 0.8).abs() < 1e-5);
        }
        let (min, max) = sphere.bounds();
        assert!((max.y - 0.8).abs() < 1e-6);
        assert!((min.y + 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_uv_sphere_front_is_positive_z() {
        let sphere = Mesh::uv_sphere(1.0, 4, 2).unwrap();
        // Equator row, quarter turn
        let p = sphere.position(5 + 1);
        assert!((p.z - 1.0).abs() < 1e-6);
        assert!(p.x.abs() < 1e-6);
    }

    #[test]
    fn test_uv_sphere_rejects_coarse_tessellation() {
        assert!(Mesh::uv_sphere(1.0, 2, 8).is_err());
        assert!(Mesh::uv_sphere(1.0, 8, 1).is_err());
    }

    #[test]
    fn test_compute_normals_point_outward() {
        let mut sphere = Mesh::uv_sphere(1.0, 16, 12).unwrap();
        sphere.compute_normals();

        let mut referenced = vec![false; sphere.vertex_count()];
        for &i in &sphere.indices {
            referenced[i as usize] = true;
        }

        for i in 0..sphere.vertex_count() {
            let p = sphere.position(i).coords;
            let n = Vector3::new(
                sphere.normals[i * 3] as f64,
                sphere.normals[i * 3 + 1] as f64,
                sphere.normals[i * 3 + 2] as f64,
            );
            if referenced[i] {
                assert!(p.dot(&n) > 0.0, "normal {} points inward", i);
            } else {
                // Last pole column belongs to no triangle
                assert_eq!(n, Vector3::zeros(), "unreferenced vertex {} has a normal", i);
            }
        }
        assert!(referenced.iter().any(|r| !r));
    }

    #[test]
    fn test_translate() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        mesh.translate(Vector3::new(0.0, 0.0, 0.04));
        assert!((mesh.positions[2] - 0.04).abs() < 1e-7);
    }
}
