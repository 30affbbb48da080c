// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end head synthesis over generated landmark sets.

use approx::assert_relative_eq;
use neuroface_core::{generate_test_landmarks, FeatureKind, Landmark, REFERENCE_LANDMARK_COUNT};
use neuroface_geometry::{
    build_head_group, normalize_landmarks, DrawRangeTarget, HeadConfig, NormalizeConfig, Primitive,
    RenderableGroup, SpatialIndexKind, SubMeshRole,
};

fn skull_positions(group: &RenderableGroup) -> Vec<f32> {
    match group.find(SubMeshRole::SkullPoints).map(|s| &s.primitive) {
        Some(Primitive::Points(mesh)) => mesh.positions.clone(),
        other => panic!("unexpected skull points primitive: {:?}", other.map(|p| p.kind())),
    }
}

#[test]
fn test_reference_oval_scenario() {
    let landmarks = generate_test_landmarks(REFERENCE_LANDMARK_COUNT);

    let cloud = normalize_landmarks(&landmarks, &NormalizeConfig::default()).unwrap();
    let (min, max) = cloud.bounds_xy();
    assert_relative_eq!((max.x - min.x).max(max.y - min.y), 1.6, epsilon = 1e-12);
    assert_relative_eq!(min.x + max.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(min.y + max.y, 0.0, epsilon = 1e-12);

    let group = build_head_group(&landmarks, &HeadConfig::default()).unwrap();
    let points = group.find(SubMeshRole::SkullPoints).unwrap();
    assert_eq!(points.primitive.vertex_count(), 49 * 37);

    for role in [
        SubMeshRole::SkullWireframe,
        SubMeshRole::LeftEye,
        SubMeshRole::RightEye,
        SubMeshRole::Mouth,
        SubMeshRole::LeftEyebrow,
        SubMeshRole::RightEyebrow,
        SubMeshRole::FaceOval,
    ] {
        assert!(group.contains(role), "missing {}", role.name());
    }

    // Every element is drawn until an animator restricts the range
    assert_eq!(group.drawn_elements(), group.total_elements());
}

#[test]
fn test_deformation_is_deterministic() {
    let landmarks = generate_test_landmarks(REFERENCE_LANDMARK_COUNT);
    let config = HeadConfig::default();
    let a = build_head_group(&landmarks, &config).unwrap();
    let b = build_head_group(&landmarks, &config).unwrap();

    let pa = skull_positions(&a);
    let pb = skull_positions(&b);
    assert_eq!(pa.len(), pb.len());
    assert!(pa.iter().zip(&pb).all(|(x, y)| x.to_bits() == y.to_bits()));
}

#[test]
fn test_grid_index_matches_linear_scan() {
    let landmarks = generate_test_landmarks(REFERENCE_LANDMARK_COUNT);
    let mut config = HeadConfig::default();

    config.deform.spatial_index = SpatialIndexKind::Linear;
    let linear = build_head_group(&landmarks, &config).unwrap();
    config.deform.spatial_index = SpatialIndexKind::Grid;
    let grid = build_head_group(&landmarks, &config).unwrap();

    assert_eq!(skull_positions(&linear), skull_positions(&grid));
}

#[test]
fn test_short_set_omits_mouth_without_panicking() {
    // Only lip index 0 resolves in a 17-point set
    let landmarks = generate_test_landmarks(17);
    let group = build_head_group(&landmarks, &HeadConfig::default()).unwrap();

    assert!(!group.contains(SubMeshRole::Mouth));
    assert!(!group.contains(SubMeshRole::LeftEye));
    assert!(group.contains(SubMeshRole::SkullWireframe));
    assert!(group.contains(SubMeshRole::SkullPoints));
}

#[test]
fn test_collapsed_lips_omit_only_mouth() {
    let mut landmarks = generate_test_landmarks(REFERENCE_LANDMARK_COUNT);
    for &i in FeatureKind::LipsOuter.indices() {
        landmarks[i] = Landmark::new(0.5, 0.67, 0.0);
    }

    let group = build_head_group(&landmarks, &HeadConfig::default()).unwrap();
    assert!(!group.contains(SubMeshRole::Mouth));
    assert_eq!(group.len(), 7);
}

#[test]
fn test_zero_width_eye_still_renders() {
    let mut landmarks = generate_test_landmarks(REFERENCE_LANDMARK_COUNT);
    for &i in FeatureKind::LeftEye.indices() {
        landmarks[i] = Landmark::new(0.39, 0.42, 0.0);
    }

    let group = build_head_group(&landmarks, &HeadConfig::default()).unwrap();
    let eye = group.find(SubMeshRole::LeftEye).unwrap();
    assert_eq!(eye.element_count(), 16 * 22 * 3);
}
