// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Non-indexed line geometry: wireframe segments and polylines

use crate::mesh::Mesh;
use nalgebra::Point3;
use rustc_hash::FxHashSet;

/// Exact vertex position as hashable bits
type PositionKey = [u32; 3];

#[inline]
fn position_key(p: &[f32]) -> PositionKey {
    // -0.0 and 0.0 are the same point
    let bits = |v: f32| if v == 0.0 { 0 } else { v.to_bits() };
    [bits(p[0]), bits(p[1]), bits(p[2])]
}

/// Flat list of line vertices.
///
/// Interpreted either as independent segments (vertex pairs) or as a
/// connected strip, depending on the primitive that owns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineBuffer {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from points in order
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut positions = Vec::new();
        for p in points {
            positions.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }
        Self { positions }
    }

    /// Extract the unique triangle edges of `mesh` as segment pairs.
    ///
    /// Edges are unique by endpoint position, so coincident vertices (pole
    /// fans, split seams) do not repeat an edge. They are emitted in the
    /// order their first triangle appears in the index buffer, so a partial
    /// draw range reveals the wireframe in tessellation order.
    pub fn wireframe(mesh: &Mesh) -> Self {
        let mut seen: FxHashSet<(PositionKey, PositionKey)> = FxHashSet::default();
        let mut positions = Vec::with_capacity(mesh.indices.len() * 6);

        let key_of = |index: u32| {
            let i = index as usize * 3;
            position_key(&mesh.positions[i..i + 3])
        };

        for tri in mesh.indices.chunks_exact(3) {
            for j in 0..3 {
                let a = tri[j];
                let b = tri[(j + 1) % 3];
                let (ka, kb) = (key_of(a), key_of(b));
                if seen.insert((ka.min(kb), ka.max(kb))) {
                    for index in [a, b] {
                        let i = index as usize * 3;
                        positions.extend_from_slice(&mesh.positions[i..i + 3]);
                    }
                }
            }
        }

        Self { positions }
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Check if buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0)];
        let buffer = LineBuffer::from_points(&points);
        assert_eq!(buffer.vertex_count(), 2);
        assert_eq!(buffer.positions, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_wireframe_shares_edges() {
        // Two triangles sharing the 1-2 edge: 5 unique edges
        let mut mesh = Mesh::new();
        for p in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            mesh.add_vertex(Point3::new(p.0, p.1, 0.0), nalgebra::Vector3::z());
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(2, 1, 3);

        let wire = LineBuffer::wireframe(&mesh);
        assert_eq!(wire.vertex_count(), 10);
    }

    #[test]
    fn test_wireframe_dedupes_coincident_vertices() {
        // Second triangle repeats vertices 1 and 2 at new indices
        let mut mesh = Mesh::new();
        for p in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            mesh.add_vertex(Point3::new(p.0, p.1, 0.0), nalgebra::Vector3::z());
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(4, 3, 5);

        let wire = LineBuffer::wireframe(&mesh);
        assert_eq!(wire.vertex_count(), 10);
    }

    #[test]
    fn test_sphere_pole_edges_collapse() {
        // The north pole row repeats one point per column
        let sphere = Mesh::uv_sphere(1.0, 8, 4).unwrap();
        let wire = LineBuffer::wireframe(&sphere);

        let mut index_edges = FxHashSet::default();
        for tri in sphere.indices.chunks_exact(3) {
            for j in 0..3 {
                let (a, b) = (tri[j], tri[(j + 1) % 3]);
                index_edges.insert((a.min(b), a.max(b)));
            }
        }
        assert!(wire.vertex_count() / 2 < index_edges.len());

        let mut keys = FxHashSet::default();
        for seg in wire.positions.chunks_exact(6) {
            let (a, b) = (position_key(&seg[0..3]), position_key(&seg[3..6]));
            assert!(keys.insert((a.min(b), a.max(b))), "edge emitted twice");
        }
    }

    #[test]
    fn test_wireframe_of_empty_mesh() {
        assert!(LineBuffer::wireframe(&Mesh::new()).is_empty());
    }
}
