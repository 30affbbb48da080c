// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Renderable head group: styled sub-meshes with per-mesh draw ranges

use crate::lines::LineBuffer;
use crate::mesh::Mesh;
use crate::style::MaterialStyle;
use std::sync::Arc;

/// What a sub-mesh depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubMeshRole {
    Placeholder,
    SkullWireframe,
    SkullPoints,
    LeftEye,
    RightEye,
    Mouth,
    LeftEyebrow,
    RightEyebrow,
    FaceOval,
}

impl SubMeshRole {
    pub fn name(self) -> &'static str {
        match self {
            SubMeshRole::Placeholder => "placeholder",
            SubMeshRole::SkullWireframe => "skullWireframe",
            SubMeshRole::SkullPoints => "skullPoints",
            SubMeshRole::LeftEye => "leftEye",
            SubMeshRole::RightEye => "rightEye",
            SubMeshRole::Mouth => "mouth",
            SubMeshRole::LeftEyebrow => "leftEyebrow",
            SubMeshRole::RightEyebrow => "rightEyebrow",
            SubMeshRole::FaceOval => "faceOval",
        }
    }
}

/// Geometry buffer plus how to assemble it.
///
/// Buffers are reference counted so that several sub-meshes can draw the
/// same vertices with different primitives and styles.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// Indexed triangles
    Triangles(Arc<Mesh>),
    /// One sprite per element of the mesh
    Points(Arc<Mesh>),
    /// Independent segments from consecutive vertex pairs
    LineSegments(Arc<LineBuffer>),
    /// Connected polyline
    LineStrip(Arc<LineBuffer>),
}

impl Primitive {
    /// Drawable elements: index count when indexed, vertex count otherwise
    #[inline]
    pub fn element_count(&self) -> usize {
        match self {
            Primitive::Triangles(mesh) | Primitive::Points(mesh) => {
                if mesh.indices.is_empty() {
                    mesh.vertex_count()
                } else {
                    mesh.indices.len()
                }
            }
            Primitive::LineSegments(lines) | Primitive::LineStrip(lines) => lines.vertex_count(),
        }
    }

    /// Vertex count of the underlying buffer
    pub fn vertex_count(&self) -> usize {
        match self {
            Primitive::Triangles(mesh) | Primitive::Points(mesh) => mesh.vertex_count(),
            Primitive::LineSegments(lines) | Primitive::LineStrip(lines) => lines.vertex_count(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Triangles(_) => "triangles",
            Primitive::Points(_) => "points",
            Primitive::LineSegments(_) => "lineSegments",
            Primitive::LineStrip(_) => "lineStrip",
        }
    }
}

/// Window of elements submitted for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    pub start: usize,
    /// `None` draws through the end of the buffer
    pub count: Option<usize>,
}

impl DrawRange {
    pub const FULL: DrawRange = DrawRange { start: 0, count: None };

    /// Elements actually drawn out of `total`
    #[inline]
    pub fn resolve(&self, total: usize) -> usize {
        let available = total.saturating_sub(self.start);
        self.count.map_or(available, |c| c.min(available))
    }
}

impl Default for DrawRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Uniform access to a drawable's element count and draw range
pub trait DrawRangeTarget {
    fn element_count(&self) -> usize;
    fn draw_range(&self) -> DrawRange;
    fn set_draw_range(&mut self, start: usize, count: usize);

    /// Elements the current range submits
    fn drawn_elements(&self) -> usize {
        self.draw_range().resolve(self.element_count())
    }
}

/// Styled geometry within a group
#[derive(Debug, Clone)]
pub struct SubMesh {
    pub role: SubMeshRole,
    pub primitive: Primitive,
    pub style: MaterialStyle,
    pub visible: bool,
    draw_range: DrawRange,
}

impl SubMesh {
    pub fn new(role: SubMeshRole, primitive: Primitive, style: MaterialStyle) -> Self {
        Self {
            role,
            primitive,
            style,
            visible: true,
            draw_range: DrawRange::FULL,
        }
    }
}

impl DrawRangeTarget for SubMesh {
    #[inline]
    fn element_count(&self) -> usize {
        self.primitive.element_count()
    }

    #[inline]
    fn draw_range(&self) -> DrawRange {
        self.draw_range
    }

    #[inline]
    fn set_draw_range(&mut self, start: usize, count: usize) {
        self.draw_range = DrawRange {
            start,
            count: Some(count),
        };
    }
}

/// All sub-meshes of one reconstruction, transformed together
#[derive(Debug, Clone)]
pub struct RenderableGroup {
    id: u64,
    sub_meshes: Vec<SubMesh>,
    /// Rotation about the vertical axis in radians
    pub rotation_y: f64,
}

impl RenderableGroup {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            sub_meshes: Vec::new(),
            rotation_y: 0.0,
        }
    }

    /// Identifier assigned by the owner, unique per scene
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Reassign the identifier
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Append a sub-mesh; empty geometry is dropped
    pub fn add(&mut self, sub_mesh: SubMesh) {
        if sub_mesh.primitive.vertex_count() > 0 {
            self.sub_meshes.push(sub_mesh);
        }
    }

    pub fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    pub fn sub_meshes_mut(&mut self) -> impl Iterator<Item = &mut SubMesh> {
        self.sub_meshes.iter_mut()
    }

    /// First sub-mesh with `role`
    pub fn find(&self, role: SubMeshRole) -> Option<&SubMesh> {
        self.sub_meshes.iter().find(|s| s.role == role)
    }

    pub fn contains(&self, role: SubMeshRole) -> bool {
        self.find(role).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sub_meshes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sub_meshes.is_empty()
    }

    /// Sum of element counts over all sub-meshes
    pub fn total_elements(&self) -> usize {
        self.sub_meshes.iter().map(|s| s.element_count()).sum()
    }

    /// Sum of currently drawn elements over all sub-meshes
    pub fn drawn_elements(&self) -> usize {
        self.sub_meshes.iter().map(|s| s.drawn_elements()).sum()
    }

    /// Release the group's geometry
    pub fn dispose(self) {
        tracing::debug!(
            group = self.id,
            sub_meshes = self.sub_meshes.len(),
            elements = self.total_elements(),
            "Disposing renderable group"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn triangle() -> Arc<Mesh> {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        mesh.add_triangle(0, 1, 2);
        Arc::new(mesh)
    }

    #[test]
    fn test_element_counts() {
        let mesh = triangle();
        assert_eq!(Primitive::Triangles(mesh.clone()).element_count(), 3);
        assert_eq!(Primitive::Points(mesh.clone()).element_count(), 3);

        let lines = Arc::new(LineBuffer::from_points(&[
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]));
        assert_eq!(Primitive::LineStrip(lines.clone()).element_count(), 4);
        assert_eq!(Primitive::LineSegments(lines).element_count(), 4);
    }

    #[test]
    fn test_draw_range_resolution() {
        assert_eq!(DrawRange::FULL.resolve(10), 10);
        assert_eq!(DrawRange { start: 0, count: Some(4) }.resolve(10), 4);
        assert_eq!(DrawRange { start: 8, count: Some(4) }.resolve(10), 2);
        assert_eq!(DrawRange { start: 12, count: None }.resolve(10), 0);
    }

    #[test]
    fn test_sub_mesh_draw_range() {
        let mut sub = SubMesh::new(
            SubMeshRole::SkullPoints,
            Primitive::Points(triangle()),
            MaterialStyle::SKULL_POINTS,
        );
        assert_eq!(sub.drawn_elements(), 3);
        sub.set_draw_range(0, 0);
        assert_eq!(sub.drawn_elements(), 0);
        sub.set_draw_range(0, 2);
        assert_eq!(sub.drawn_elements(), 2);
    }

    #[test]
    fn test_group_drops_empty_geometry() {
        let mut group = RenderableGroup::new(7);
        group.add(SubMesh::new(
            SubMeshRole::LeftEyebrow,
            Primitive::LineStrip(Arc::new(LineBuffer::new())),
            MaterialStyle::CONTOUR,
        ));
        group.add(SubMesh::new(
            SubMeshRole::SkullPoints,
            Primitive::Points(triangle()),
            MaterialStyle::SKULL_POINTS,
        ));
        assert_eq!(group.len(), 1);
        assert!(group.contains(SubMeshRole::SkullPoints));
        assert!(!group.contains(SubMeshRole::LeftEyebrow));
        assert_eq!(group.id(), 7);
    }
}
