// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! NeuroFace Geometry
//!
//! Procedural head synthesis from facial landmarks: normalization into model
//! space, deformation of a base sphere, feature overlays and the renderable
//! group that carries them, all built on nalgebra.
//!
//! ```no_run
//! use neuroface_core::generate_test_landmarks;
//! use neuroface_geometry::{build_head_group, HeadConfig};
//!
//! let landmarks = generate_test_landmarks(468);
//! let group = build_head_group(&landmarks, &HeadConfig::default())?;
//! println!("{} sub-meshes", group.len());
//! # Ok::<(), neuroface_geometry::Error>(())
//! ```

pub mod curve;
pub mod deform;
pub mod error;
pub mod features;
pub mod group;
pub mod head;
pub mod lines;
pub mod mesh;
pub mod normalize;
pub mod spatial;
pub mod style;
pub mod tube;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use curve::CatmullRomCurve;
pub use deform::{deform_head, deform_head_with, deform_vertex, DeformConfig, DeformedHead, VertexRegion};
pub use error::{Error, Result};
pub use features::{synthesize_features, FeatureConfig};
pub use group::{DrawRange, DrawRangeTarget, Primitive, RenderableGroup, SubMesh, SubMeshRole};
pub use head::{build_head_group, placeholder_group, HeadConfig};
pub use lines::LineBuffer;
pub use mesh::Mesh;
pub use normalize::{normalize_landmarks, NormalizeConfig, NormalizedCloud};
pub use spatial::{GridIndex, LinearScan, NearestNeighbor, Neighbor, SpatialIndexKind};
pub use style::{Blending, MaterialStyle};
pub use tube::{closed_tube, TubeParams};
