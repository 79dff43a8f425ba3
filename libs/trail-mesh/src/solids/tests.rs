use super::extrude::{cap, extrude, Polygon2D};
use super::*;
use crate::assemble::{assemble, NoProgress};
use crate::shape::Shape;
use crate::terrain::ScaledVertex;
use approx::assert_relative_eq;
use config::BuildConfig;
use glam::{DVec2, DVec3};
use pipeline_types::{BuildWarning, ShapeKind};
use std::collections::HashMap;

fn square_terrain() -> Triangulation {
    let mut vertices = Vec::new();
    for j in 0..4 {
        for i in 0..4 {
            let p = DVec3::new(i as f64 * 5.0 - 7.5, j as f64 * 5.0 - 7.5, (i + j) as f64);
            vertices.push(ScaledVertex::new(p, vertices.len()));
        }
    }
    Triangulation::from_vertices(vertices)
}

/// Sum of signed tetrahedron volumes; positive for an outward closed mesh.
fn signed_volume(mesh: &Mesh) -> f64 {
    (0..mesh.triangle_count())
        .map(|i| {
            let [a, b, c] = mesh.triangle_positions(i);
            a.dot(b.cross(c)) / 6.0
        })
        .sum()
}

fn bounds(mesh: &Mesh) -> (DVec3, DVec3) {
    mesh.vertices().iter().fold(
        (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
        |(min, max), v| (min.min(*v), max.max(*v)),
    )
}

fn face_normal(mesh: &Mesh, i: usize) -> DVec3 {
    let [a, b, c] = mesh.triangle_positions(i);
    (b - a).cross(c - a).normalize()
}

#[test]
fn test_walls_have_two_triangles_per_hull_edge() {
    let tri = square_terrain();
    let walls = build_walls(&tri, -5.0);
    assert_eq!(walls.mesh.triangle_count(), 2 * tri.hull().len());
    assert_eq!(walls.role, SolidRole::Wall);
    assert_eq!(walls.orientation, Orientation::Inward);
}

#[test]
fn test_walls_face_inward_as_authored() {
    let tri = square_terrain();
    let walls = build_walls(&tri, -5.0);
    for i in 0..walls.mesh.triangle_count() {
        let [a, b, c] = walls.mesh.triangle_positions(i);
        let centroid = (a + b + c) / 3.0;
        let n = face_normal(&walls.mesh, i);
        assert!(n.truncate().dot(centroid.truncate()) < 0.0);
        assert_relative_eq!(n.z, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_walls_reach_base_plane() {
    let tri = square_terrain();
    let walls = build_walls(&tri, -3.0);
    let (min, _) = bounds(&walls.mesh);
    assert_eq!(min.z, -3.0);
}

#[test]
fn test_empty_triangulation_gives_empty_solids() {
    let tri = Triangulation::default();
    assert!(build_walls(&tri, 0.0).is_empty());
    assert!(build_terrain(&tri).is_empty());
}

#[test]
fn test_terrain_faces_up() {
    let terrain = build_terrain(&square_terrain());
    assert_eq!(terrain.orientation, Orientation::Outward);
    for i in 0..terrain.mesh.triangle_count() {
        assert!(face_normal(&terrain.mesh, i).z > 0.0);
    }
}

/// Terrain, walls and base welded together.
fn closed_model(shape: &Shape, config: &BuildConfig) -> Mesh {
    let tri = square_terrain();
    let solids = [
        build_terrain(&tri),
        build_walls(&tri, -5.0),
        build_base(shape, &tri, -5.0, config),
    ];
    assemble(&solids, config, &mut NoProgress).unwrap().mesh
}

fn undirected_edge_uses(mesh: &Mesh) -> HashMap<(u32, u32), usize> {
    let mut edges = HashMap::new();
    for t in mesh.triangles() {
        for k in 0..3 {
            let (a, b) = (t[k], t[(k + 1) % 3]);
            *edges.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    edges
}

#[test]
fn test_base_top_lies_on_base_plane() {
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Hexagon, 40.0, &config);
    let base = build_base(&shape, &square_terrain(), -2.0, &config);
    assert_eq!(base.role, SolidRole::Base);
    assert_eq!(base.orientation, Orientation::Outward);

    let bottom = -2.0 - config.base_plate_thickness;
    for v in base.mesh.vertices() {
        assert!(v.z == -2.0 || v.z == bottom, "stray z {}", v.z);
    }
    // The plate reaches past the outline but not past the grown outline.
    let (min, max) = bounds(&base.mesh);
    assert_eq!(max.z, -2.0);
    assert_eq!(min.z, bottom);
    for v in base.mesh.vertices() {
        assert!(shape.contains(v.truncate() / config.base_overlap_factor));
    }
    assert!(base.mesh.vertices().iter().any(|v| !shape.contains(v.truncate())));
}

#[test]
fn test_base_band_meets_wall_bottoms() {
    let tri = square_terrain();
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Square, 30.0, &config);
    let base = build_base(&shape, &tri, -5.0, &config);
    for &i in tri.hull() {
        let bottom = tri.vertex(i).xy().extend(-5.0);
        assert!(base.mesh.vertices().contains(&bottom));
    }
}

#[test]
fn test_base_closes_terrain_and_walls() {
    let config = BuildConfig::default();
    for kind in ShapeKind::ALL {
        let shape = Shape::new(kind, 60.0, &config);
        let mesh = closed_model(&shape, &config);
        let open: Vec<_> = undirected_edge_uses(&mesh)
            .into_iter()
            .filter(|&(_, uses)| uses != 2)
            .collect();
        assert!(open.is_empty(), "{kind}: {} unmatched edges", open.len());
        assert!(signed_volume(&mesh) > 0.0);
    }
}

#[test]
fn test_closed_square_model_volume() {
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Square, 30.0, &config);
    let mesh = closed_model(&shape, &config);

    // Planar terrain z = (x + y + 15) / 5 averages 3 over the hull, 8 above
    // the base plane; the plate is the grown 30.3 square.
    let shell = 15.0 * 15.0 * 8.0;
    let plate = 30.3 * 30.3 * config.base_plate_thickness;
    assert_relative_eq!(signed_volume(&mesh), shell + plate, epsilon = 1e-6);
}

#[test]
fn test_base_without_hull_is_plain_slab() {
    let config = BuildConfig::builder().circle_segments(24).build().unwrap();
    let shape = Shape::new(ShapeKind::Circle, 40.0, &config);
    let base = build_base(&shape, &Triangulation::default(), 0.0, &config);
    assert_eq!(base.mesh.vertex_count(), 48);
    assert_eq!(base.mesh.triangle_count(), 2 * 22 + 2 * 24);
    assert!(signed_volume(&base.mesh) > 0.0);
}

#[test]
fn test_extrude_is_closed_and_outward() {
    let square = Polygon2D::rectangle(DVec2::new(3.0, 4.0), DVec2::new(2.0, 6.0));
    let mesh = extrude(&square, 1.0, 6.0);
    assert_relative_eq!(signed_volume(&mesh), 2.0 * 6.0 * 5.0, epsilon = 1e-9);

    // Clockwise input extrudes the same way.
    let mut cw = square.clone();
    cw.outer.reverse();
    assert_relative_eq!(signed_volume(&extrude(&cw, 1.0, 6.0)), 60.0, epsilon = 1e-9);
}

#[test]
fn test_extrude_with_hole() {
    let outer = Polygon2D::rectangle(DVec2::ZERO, DVec2::splat(10.0)).outer;
    let hole = Polygon2D::rectangle(DVec2::ZERO, DVec2::splat(4.0)).outer;
    let ring = Polygon2D::with_holes(outer, vec![hole]);
    let mesh = extrude(&ring, 0.0, 1.0);
    assert_relative_eq!(signed_volume(&mesh), 100.0 - 16.0, epsilon = 1e-9);
}

#[test]
fn test_extrude_rejects_inverted_range() {
    let square = Polygon2D::rectangle(DVec2::ZERO, DVec2::ONE);
    assert!(extrude(&square, 2.0, 1.0).is_empty());
    assert!(cap(&Polygon2D::new(vec![DVec2::ZERO, DVec2::X]), 0.0).is_empty());
}

#[test]
fn test_platform_layout_near_bottom_edge() {
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Square, 100.0, &config);
    let layout = PlatformLayout::new(&shape, -2.0, 30.0, None, &config);
    let radius = shape.bounding_radius();

    assert_relative_eq!(layout.width(), radius * config.platform_width_factor, epsilon = 1e-9);
    assert_relative_eq!(layout.depth(), radius * config.platform_depth_factor, epsilon = 1e-9);
    assert_relative_eq!(layout.rect.min_y, -50.0 + radius * config.platform_margin_factor);
    assert_eq!(layout.bottom_z, -2.0);
    assert_eq!(layout.top_z, 30.0 + config.platform_clearance);

    let explicit = PlatformLayout::new(&shape, -2.0, 30.0, Some(5.0), &config);
    assert_eq!(explicit.top_z, 3.0);
}

#[test]
fn test_platform_stays_inside_every_outline() {
    let config = BuildConfig::default();
    for kind in ShapeKind::ALL {
        let shape = Shape::new(kind, 100.0, &config);
        let layout = PlatformLayout::new(&shape, 0.0, 10.0, None, &config);
        assert!(layout.width() > 0.0, "{kind}");
        for corner in [
            DVec2::new(layout.rect.min_x, layout.rect.min_y),
            DVec2::new(layout.rect.max_x, layout.rect.min_y),
            DVec2::new(layout.rect.min_x, layout.rect.max_y),
            DVec2::new(layout.rect.max_x, layout.rect.max_y),
        ] {
            assert!(shape.contains(corner), "{kind} corner {corner}");
        }
    }
}

#[test]
fn test_platform_solid_is_closed_prism() {
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Square, 100.0, &config);
    let layout = PlatformLayout::new(&shape, 0.0, 10.0, None, &config);
    let platform = build_platform(&layout);
    assert_eq!(platform.role, SolidRole::Platform);
    let expected = layout.width() * layout.depth() * layout.top_z;
    assert_relative_eq!(signed_volume(&platform.mesh), expected, epsilon = 1e-6);
}

#[test]
fn test_path_overlap_uses_buffer() {
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Square, 100.0, &config);
    let layout = PlatformLayout::new(&shape, 0.0, 10.0, None, &config);
    let track = [
        DVec2::new(0.0, layout.center().y),
        DVec2::new(0.0, layout.rect.max_y + 0.5),
        DVec2::new(0.0, layout.rect.max_y + 2.0),
        DVec2::new(0.0, 40.0),
    ];
    assert_eq!(count_path_overlap(&layout, track, 1.0), 2);
    assert_eq!(count_path_overlap(&layout, track, 0.0), 1);
}

fn block_letters(text: &str, size: f64) -> Result<Vec<Vec<DVec2>>, String> {
    // One square glyph per character, each with a square counter.
    Ok(text
        .chars()
        .enumerate()
        .flat_map(|(i, _)| {
            let x = i as f64 * size;
            let outer = Polygon2D::rectangle(DVec2::new(x, 0.0), DVec2::splat(size * 0.8)).outer;
            let mut hole = Polygon2D::rectangle(DVec2::new(x, 0.0), DVec2::splat(size * 0.3)).outer;
            hole.reverse();
            [outer, hole]
        })
        .collect())
}

#[test]
fn test_short_text_fits_without_warning() {
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Square, 100.0, &config);
    let layout = PlatformLayout::new(&shape, 0.0, 10.0, None, &config);
    let text = build_text("A", &block_letters, &layout, &config).unwrap();

    assert!(text.warning.is_none());
    assert_eq!(text.solid.role, SolidRole::Text);
    let (min, max) = bounds(&text.solid.mesh);
    assert_relative_eq!(min.z, layout.top_z);
    assert_relative_eq!(max.z, layout.top_z + config.text_emboss_height);
    let size = layout.depth() * config.text_size_factor;
    let expected = (0.64 - 0.09) * size * size * config.text_emboss_height;
    assert_relative_eq!(signed_volume(&text.solid.mesh), expected, epsilon = 1e-6);
}

#[test]
fn test_wide_text_is_scaled_and_warns() {
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Square, 100.0, &config);
    let layout = PlatformLayout::new(&shape, 0.0, 10.0, None, &config);
    let text = build_text("MOUNTAIN TRAIL", &block_letters, &layout, &config).unwrap();

    let Some(BuildWarning::TextScaledToFit { scale }) = text.warning else {
        panic!("expected a fit warning, got {:?}", text.warning);
    };
    assert!(scale < 1.0);
    let (min, max) = bounds(&text.solid.mesh);
    assert!(max.x - min.x <= layout.width() * config.text_max_width_ratio + 1e-9);
    assert!(layout.rect.contains(min.truncate()));
    assert!(layout.rect.contains(max.truncate()));
}

#[test]
fn test_glyph_failure_is_downstream_error() {
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Square, 100.0, &config);
    let layout = PlatformLayout::new(&shape, 0.0, 10.0, None, &config);
    let failing = |_: &str, _: f64| -> Result<Vec<Vec<DVec2>>, String> { Err("no font".into()) };
    let err = build_text("X", &failing, &layout, &config).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::Downstream);
}

#[test]
fn test_empty_outline_gives_empty_text() {
    let config = BuildConfig::default();
    let shape = Shape::new(ShapeKind::Square, 100.0, &config);
    let layout = PlatformLayout::new(&shape, 0.0, 10.0, None, &config);
    let nothing = |_: &str, _: f64| -> Result<Vec<Vec<DVec2>>, String> { Ok(Vec::new()) };
    let text = build_text(" ", &nothing, &layout, &config).unwrap();
    assert!(text.solid.is_empty());
    assert!(text.warning.is_none());
}

#[test]
fn test_path_tube_is_closed_and_outward() {
    let points = [
        DVec3::new(0.0, 0.0, 1.0),
        DVec3::new(10.0, 0.0, 1.0),
        DVec3::new(10.0, 0.0, 1.0),
        DVec3::new(20.0, 5.0, 2.0),
    ];
    let path = build_path(&points, 0.5, 8);
    assert_eq!(path.role, SolidRole::Path);
    // 3 distinct points: 2 ring spans + 2 caps
    assert_eq!(path.mesh.triangle_count(), 2 * 8 * 2 + 2 * 8);
    assert!(signed_volume(&path.mesh) > 0.0);
}

#[test]
fn test_straight_tube_volume() {
    let path = build_path(&[DVec3::ZERO, DVec3::new(0.0, 10.0, 0.0)], 1.0, 64);
    // Inscribed 64-gon prism
    let polygon_area = 0.5 * 64.0 * (std::f64::consts::TAU / 64.0).sin();
    assert_relative_eq!(signed_volume(&path.mesh), polygon_area * 10.0, epsilon = 1e-9);
}

#[test]
fn test_degenerate_path_is_empty() {
    assert!(build_path(&[DVec3::ONE, DVec3::ONE], 0.5, 8).is_empty());
    assert!(build_path(&[], 0.5, 8).is_empty());
}
