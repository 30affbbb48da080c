// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Landmarks to renderable head group

use crate::deform::{deform_head, DeformConfig};
use crate::error::Result;
use crate::features::{synthesize_features, FeatureConfig};
use crate::group::{Primitive, RenderableGroup, SubMesh, SubMeshRole};
use crate::mesh::Mesh;
use crate::normalize::{normalize_landmarks, NormalizeConfig};
use crate::style::MaterialStyle;
use neuroface_core::Landmark;
use std::sync::Arc;

/// Placeholder sphere radius
pub const PLACEHOLDER_RADIUS: f64 = 0.8;
/// Placeholder sphere segments in both directions
pub const PLACEHOLDER_SEGMENTS: u32 = 24;

/// Full head synthesis configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadConfig {
    pub normalize: NormalizeConfig,
    pub deform: DeformConfig,
    pub features: FeatureConfig,
}

/// Build the head group for a landmark set.
///
/// The skull is drawn twice from one deformed surface: its unique edges as
/// line segments and its vertices as points. Feature overlays follow.
pub fn build_head_group(landmarks: &[Landmark], config: &HeadConfig) -> Result<RenderableGroup> {
    let cloud = normalize_landmarks(landmarks, &config.normalize)?;
    let head = deform_head(&cloud, &config.deform)?;

    let mut group = RenderableGroup::new(0);
    group.add(SubMesh::new(
        SubMeshRole::SkullWireframe,
        Primitive::LineSegments(Arc::new(head.wireframe)),
        MaterialStyle::SKULL_WIREFRAME,
    ));
    group.add(SubMesh::new(
        SubMeshRole::SkullPoints,
        Primitive::Points(Arc::new(head.surface)),
        MaterialStyle::SKULL_POINTS,
    ));
    for sub_mesh in synthesize_features(&cloud.points, &config.features) {
        group.add(sub_mesh);
    }

    tracing::info!(
        landmarks = landmarks.len(),
        scale = cloud.scale,
        sub_meshes = group.len(),
        elements = group.total_elements(),
        "Built head group"
    );
    Ok(group)
}

/// Wireframe sphere shown before any reconstruction
pub fn placeholder_group() -> Result<RenderableGroup> {
    let sphere = Mesh::uv_sphere(PLACEHOLDER_RADIUS, PLACEHOLDER_SEGMENTS, PLACEHOLDER_SEGMENTS)?;
    let mut group = RenderableGroup::new(0);
    group.add(SubMesh::new(
        SubMeshRole::Placeholder,
        Primitive::Triangles(Arc::new(sphere)),
        MaterialStyle::PLACEHOLDER,
    ));
    Ok(group)
}
