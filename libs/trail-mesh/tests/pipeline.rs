use std::collections::HashMap;

use config::BuildConfig;
use glam::DVec3;
use pipeline_types::{BuildRequest, Fidelity, GeoPoint, GridSample, ShapeKind, SolidRole, TrackSample};
use trail_mesh::export::export_filename;
use trail_mesh::mesh::triangle_area;
use trail_mesh::{assemble_model, build_model, export_stl, BuildSupervisor, ErrorKind, Mesh, NoProgress};

fn valley_request(shape: ShapeKind) -> BuildRequest {
    let mut points = Vec::new();
    for r in 0..30 {
        for c in 0..30 {
            let lat = 45.0 + r as f64 * 0.002;
            let lon = 8.0 + c as f64 * 0.003;
            // A v-shaped valley running north-south.
            let elevation = 900.0 + 4000.0 * (lon - 8.0435).abs();
            points.push((GeoPoint::new(lat, lon), Some(elevation)));
        }
    }
    let track = (0..40)
        .map(|i| TrackSample::new(45.005 + i as f64 * 0.001, 8.0435, None))
        .collect();
    BuildRequest {
        grid: GridSample::indexed(points),
        track,
        width: 150.0,
        elevation_multiplier: 1.5,
        shape,
        rotation_degrees: 0.0,
        emboss_text: None,
        platform_height: None,
        fidelity: Fidelity::Full,
    }
}

fn bounds(mesh: &Mesh) -> (DVec3, DVec3) {
    mesh.vertices().iter().fold(
        (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
        |(min, max), v| (min.min(*v), max.max(*v)),
    )
}

fn facet_vertices(stl: &str) -> Vec<[f64; 3]> {
    stl.lines()
        .filter_map(|line| line.trim_start().strip_prefix("vertex "))
        .map(|coords| {
            let v: Vec<f64> = coords.split(' ').map(|c| c.parse().unwrap()).collect();
            [v[0], v[1], v[2]]
        })
        .collect()
}

#[test]
fn every_shape_exports_a_printable_document() {
    let config = BuildConfig::default();
    for shape in ShapeKind::ALL {
        let output = build_model(&valley_request(shape), &config, None).unwrap();
        let stl = export_stl(&output, "valley", &config, &mut NoProgress).unwrap();

        assert!(stl.starts_with("solid valley\n"), "{shape}");
        assert!(stl.ends_with("endsolid valley\n"), "{shape}");
        let vertices = facet_vertices(&stl);
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len() % 3, 0);

        let min_x = vertices.iter().map(|v| v[0]).fold(f64::INFINITY, f64::min);
        let max_x = vertices.iter().map(|v| v[0]).fold(f64::NEG_INFINITY, f64::max);
        let span = max_x - min_x;
        assert!(span > 100.0 && span < 170.0, "{shape} spans {span}");

        // Facets read back from the document keep a printable area.
        for facet in vertices.chunks_exact(3) {
            let [a, b, c] = [facet[0], facet[1], facet[2]].map(DVec3::from);
            let area = triangle_area(a, b, c);
            assert!(area > config.degenerate_area_epsilon, "{shape}: facet area {area}");
        }
    }
}

#[test]
fn every_shape_assembles_into_a_closed_solid() {
    let config = BuildConfig::default();
    for shape in ShapeKind::ALL {
        let output = build_model(&valley_request(shape), &config, None).unwrap();
        let merged = assemble_model(&output, &config, &mut NoProgress).unwrap();

        let mut uses: HashMap<(u32, u32), usize> = HashMap::new();
        for t in merged.mesh.triangles() {
            for k in 0..3 {
                let (a, b) = (t[k], t[(k + 1) % 3]);
                *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        let open = uses.values().filter(|&&n| n == 1).count();
        let shared = uses.values().filter(|&&n| n > 2).count();
        assert_eq!((open, shared), (0, 0), "{shape}: {} edges", uses.len());
    }
}

#[test]
fn path_follows_the_valley_floor() {
    let config = BuildConfig::default();
    let output = build_model(&valley_request(ShapeKind::Square), &config, None).unwrap();
    assert_eq!(output.stats.fallback_points, 0);

    let path = output
        .solids
        .iter()
        .find(|s| s.role == SolidRole::Path)
        .unwrap();
    let (min, max) = bounds(&path.mesh);
    // The tube rides just above the lowest terrain line.
    assert!(min.z > output.stats.terrain_min_z - config.path_radius - 1e-6);
    assert!(max.z < output.stats.terrain_min_z + config.path_z_offset + config.path_radius + 1.0);
}

#[test]
fn rotated_export_keeps_its_footprint() {
    let config = BuildConfig::default();
    let mut request = valley_request(ShapeKind::Circle);
    let plain = export_stl(&build_model(&request, &config, None).unwrap(), "c", &config, &mut NoProgress).unwrap();
    request.rotation_degrees = 90.0;
    let turned = export_stl(&build_model(&request, &config, None).unwrap(), "c", &config, &mut NoProgress).unwrap();

    assert_eq!(facet_vertices(&plain).len(), facet_vertices(&turned).len());
    assert_ne!(plain, turned);
}

#[test]
fn invalid_request_reports_precondition() {
    let mut request = valley_request(ShapeKind::Hexagon);
    request.track.clear();
    let err = build_model(&request, &BuildConfig::default(), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);
}

#[test]
fn export_filename_describes_the_model() {
    let request = valley_request(ShapeKind::Triangle);
    assert_eq!(
        export_filename("valley walk.gpx", &request, 1_700_000_000),
        "valley_walk_triangle_150mm_x1.5_1700000000.stl"
    );
}

#[test]
fn newer_build_supersedes_older() {
    let supervisor = BuildSupervisor::new();
    let config = BuildConfig::default();
    let first = supervisor.begin();
    let second = supervisor.begin();
    let stale = build_model(&valley_request(ShapeKind::Square), &config, None).unwrap();
    let fresh = build_model(&valley_request(ShapeKind::Hexagon), &config, None).unwrap();
    assert!(supervisor.finish(first, stale).is_none());
    assert!(supervisor.finish(second, fresh).is_some());
}
