use super::*;
use crate::error::ErrorKind;
use crate::solids::extrude::{cap, extrude, Polygon2D};
use approx::assert_relative_eq;
use glam::{DMat4, DVec2};
use std::collections::HashMap;

fn cube(center: DVec2) -> Mesh {
    extrude(&Polygon2D::rectangle(center, DVec2::splat(2.0)), 0.0, 2.0)
}

/// Every directed edge appears once and its reverse once.
fn is_closed_manifold(mesh: &Mesh) -> bool {
    let mut edges: HashMap<(u32, u32), usize> = HashMap::new();
    for t in mesh.triangles() {
        for k in 0..3 {
            *edges.entry((t[k], t[(k + 1) % 3])).or_default() += 1;
        }
    }
    edges
        .iter()
        .all(|(&(a, b), &count)| count == 1 && edges.get(&(b, a)) == Some(&1))
}

fn bounds(mesh: &Mesh) -> (DVec3, DVec3) {
    mesh.vertices().iter().fold(
        (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
        |(min, max), v| (min.min(*v), max.max(*v)),
    )
}

fn signed_volume(mesh: &Mesh) -> f64 {
    (0..mesh.triangle_count())
        .map(|i| {
            let [a, b, c] = mesh.triangle_positions(i);
            a.dot(b.cross(c)) / 6.0
        })
        .sum()
}

#[test]
fn test_split_shells_weld_into_closed_solid() {
    let full = cube(DVec2::ZERO);
    let (first, second) = full.triangles().split_at(6);

    let outward = Mesh::from_parts(full.vertices().to_vec(), first.to_vec());
    let flipped = second.iter().map(|t| [t[0], t[2], t[1]]).collect();
    let inward = Mesh::from_parts(full.vertices().to_vec(), flipped);

    let solids = [
        Solid::new(SolidRole::Platform, Orientation::Outward, outward),
        Solid::new(SolidRole::Wall, Orientation::Inward, inward),
    ];
    let merged = assemble(&solids, &BuildConfig::default(), &mut NoProgress).unwrap();

    assert_eq!(merged.mesh.vertex_count(), 8);
    assert!(is_closed_manifold(&merged.mesh));
    assert_relative_eq!(signed_volume(&merged.mesh), 8.0, epsilon = 1e-9);
    assert_eq!(merged.triangle_roles[..6], [SolidRole::Platform; 6]);
    assert_eq!(merged.triangle_roles[6..], [SolidRole::Wall; 6]);
}

#[test]
fn test_inward_plate_faces_down() {
    let plate = cap(&Polygon2D::rectangle(DVec2::ZERO, DVec2::splat(4.0)), -1.0);
    let solids = [Solid::new(SolidRole::Wall, Orientation::Inward, plate)];
    let merged = assemble(&solids, &BuildConfig::default(), &mut NoProgress).unwrap();
    for n in merged.mesh.normals().unwrap() {
        assert_relative_eq!(n.z, -1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_weld_respects_tolerance() {
    let config = BuildConfig::default();
    let tol = config.weld_tolerance;
    let tri = |offset: f64| {
        Mesh::from_parts(
            vec![
                DVec3::new(offset, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    };
    let near = [
        Solid::new(SolidRole::Terrain, Orientation::Outward, tri(0.0)),
        Solid::new(SolidRole::Terrain, Orientation::Outward, tri(tol * 0.5)),
    ];
    let merged = assemble(&near, &config, &mut NoProgress).unwrap();
    assert_eq!(merged.mesh.vertex_count(), 3);
    assert_eq!(merged.mesh.vertex(0), DVec3::ZERO);

    let far = [
        Solid::new(SolidRole::Terrain, Orientation::Outward, tri(0.0)),
        Solid::new(SolidRole::Terrain, Orientation::Outward, tri(tol * 3.0)),
    ];
    let merged = assemble(&far, &config, &mut NoProgress).unwrap();
    assert_eq!(merged.mesh.vertex_count(), 4);
}

#[test]
fn test_welder_picks_first_vertex_across_cells() {
    let mut welder = Welder::new(0.1);
    let a = welder.insert(DVec3::new(0.099, 0.0, 0.0));
    let b = welder.insert(DVec3::new(0.101, 0.0, 0.0));
    let c = welder.insert(DVec3::new(0.5, 0.0, 0.0));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(welder.into_vertices()[0], DVec3::new(0.099, 0.0, 0.0));
}

#[test]
fn test_degenerate_triangles_are_culled() {
    let mesh = Mesh::from_parts(
        vec![
            DVec3::ZERO,
            DVec3::X,
            DVec3::Y,
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(5.0, 5.0, 5.0),
        ],
        vec![[0, 1, 2], [0, 1, 3]],
    );
    let solids = [Solid::new(SolidRole::Terrain, Orientation::Outward, mesh)];
    let merged = assemble(&solids, &BuildConfig::default(), &mut NoProgress).unwrap();
    assert_eq!(merged.triangle_count(), 1);
    assert_eq!(merged.stats.degenerate_triangles, 1);
    assert_eq!(merged.mesh.vertex_count(), 3);
    assert_eq!(merged.mesh.normals().map(<[DVec3]>::len), Some(3));
    assert!(merged.mesh.validate(BuildConfig::default().degenerate_area_epsilon));
}

#[test]
fn test_empty_input_is_empty_result() {
    let err = assemble(&[], &BuildConfig::default(), &mut NoProgress).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);

    let only_empty = [Solid::new(SolidRole::Text, Orientation::Outward, Mesh::new())];
    let err = assemble(&only_empty, &BuildConfig::default(), &mut NoProgress).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);

    let flat = Mesh::from_parts(vec![DVec3::ZERO, DVec3::X, DVec3::X * 2.0], vec![[0, 1, 2]]);
    let degenerate = [Solid::new(SolidRole::Terrain, Orientation::Outward, flat)];
    let err = assemble(&degenerate, &BuildConfig::default(), &mut NoProgress).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
}

#[test]
fn test_progress_reports_stages_in_order() {
    let solids = [Solid::new(SolidRole::Platform, Orientation::Outward, cube(DVec2::ZERO))];
    let mut seen = Vec::new();
    let mut progress = |stage: ExportStage| -> Result<(), String> {
        seen.push(stage);
        Ok(())
    };
    assemble(&solids, &BuildConfig::default(), &mut progress).unwrap();
    assert_eq!(seen, ExportStage::ALL[..7].to_vec());
}

#[test]
fn test_progress_error_aborts() {
    let solids = [Solid::new(SolidRole::Platform, Orientation::Outward, cube(DVec2::ZERO))];
    let mut progress = |stage: ExportStage| -> Result<(), String> {
        if stage == ExportStage::Weld {
            Err("user cancelled".to_string())
        } else {
            Ok(())
        }
    };
    let err = assemble(&solids, &BuildConfig::default(), &mut progress).unwrap_err();
    match err {
        BuildError::Aborted { stage, message } => {
            assert_eq!(stage, ExportStage::Weld);
            assert_eq!(message, "user cancelled");
        }
        other => panic!("expected abort, got {other:?}"),
    }
}

#[test]
fn test_transforms_are_applied() {
    let quarter = DMat4::from_rotation_z(std::f64::consts::FRAC_PI_2);
    let solid = Solid::new(SolidRole::Platform, Orientation::Outward, cube(DVec2::new(10.0, 0.0)))
        .with_transform(quarter);
    let merged = assemble(&[solid], &BuildConfig::default(), &mut NoProgress).unwrap();
    let (min, max) = bounds(&merged.mesh);
    assert_relative_eq!(min.x, -1.0, epsilon = 1e-9);
    assert_relative_eq!(max.x, 1.0, epsilon = 1e-9);
    assert_relative_eq!(min.y, 9.0, epsilon = 1e-9);
    assert_relative_eq!(max.y, 11.0, epsilon = 1e-9);
}

#[test]
fn test_assembly_is_deterministic() {
    let solids = [
        Solid::new(SolidRole::Platform, Orientation::Outward, cube(DVec2::ZERO)),
        Solid::new(SolidRole::Text, Orientation::Outward, cube(DVec2::new(1.0, 1.0))),
    ];
    let a = assemble(&solids, &BuildConfig::default(), &mut NoProgress).unwrap();
    let b = assemble(&solids, &BuildConfig::default(), &mut NoProgress).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.role_codes().len(), a.triangle_count());
}
