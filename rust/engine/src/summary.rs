// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializable description of a renderable group

use neuroface_geometry::{Blending, DrawRangeTarget, RenderableGroup};
use serde::Serialize;

/// One sub-mesh as reported to the host
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMeshSummary {
    pub role: &'static str,
    pub primitive: &'static str,
    pub vertices: usize,
    pub elements: usize,
    pub drawn: usize,
    pub color: String,
    pub opacity: f32,
    pub additive: bool,
}

/// Group contents after a reconstruction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: u64,
    pub rotation_y: f64,
    pub total_elements: usize,
    pub drawn_elements: usize,
    pub sub_meshes: Vec<SubMeshSummary>,
}

impl GroupSummary {
    pub fn from_group(group: &RenderableGroup) -> Self {
        let sub_meshes = group
            .sub_meshes()
            .iter()
            .map(|s| SubMeshSummary {
                role: s.role.name(),
                primitive: s.primitive.kind(),
                vertices: s.primitive.vertex_count(),
                elements: s.element_count(),
                drawn: s.drawn_elements(),
                color: s.style.hex(),
                opacity: s.style.opacity,
                additive: s.style.blending == Blending::Additive,
            })
            .collect();

        Self {
            id: group.id(),
            rotation_y: group.rotation_y,
            total_elements: group.total_elements(),
            drawn_elements: group.drawn_elements(),
            sub_meshes,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
