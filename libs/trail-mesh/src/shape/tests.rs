use super::*;
use approx::assert_relative_eq;

fn shape(kind: ShapeKind) -> Shape {
    Shape::new(kind, 20.0, &BuildConfig::default())
}

#[test]
fn test_kind_round_trips() {
    for kind in ShapeKind::ALL {
        assert_eq!(shape(kind).kind(), kind);
    }
}

#[test]
fn test_origin_is_inside_every_shape() {
    for kind in ShapeKind::ALL {
        assert!(shape(kind).contains(DVec2::ZERO), "{kind} should contain origin");
    }
}

#[test]
fn test_square_boundary_is_inclusive() {
    let square = shape(ShapeKind::Square);
    assert!(square.contains(DVec2::new(10.0, 10.0)));
    assert!(square.contains(DVec2::new(10.0, 0.0)));
    assert!(!square.contains(DVec2::new(10.0 + 1e-6, 0.0)));
}

#[test]
fn test_rectangle_uses_aspect() {
    let rect = shape(ShapeKind::Rectangle);
    let bbox = rect.bounding_box();
    assert_relative_eq!(bbox.height(), 20.0 * config::constants::RECTANGLE_ASPECT);
    assert!(rect.contains(DVec2::new(9.0, 6.9)));
    assert!(!rect.contains(DVec2::new(0.0, 7.1)));
}

#[test]
fn test_circle_squared_distance() {
    let circle = shape(ShapeKind::Circle);
    assert!(circle.contains(DVec2::new(10.0, 0.0)));
    assert!(circle.contains(DVec2::new(7.0, 7.0)));
    assert!(!circle.contains(DVec2::new(7.1, 7.1)));
    assert!(circle.vertices().is_empty());
}

#[test]
fn test_hexagon_vertices_and_edges() {
    let hex = shape(ShapeKind::Hexagon);
    let verts = hex.vertices();
    assert_eq!(verts.len(), 6);
    for v in &verts {
        assert_relative_eq!(v.length(), 10.0, epsilon = 1e-12);
        assert!(hex.contains(*v));
    }
    // Flat bottom edge at -r * sin(60deg)
    let bottom = -10.0 * (PI / 3.0).sin();
    assert!(hex.contains(DVec2::new(0.0, bottom)));
    assert!(!hex.contains(DVec2::new(0.0, bottom - 1e-6)));
    // Corner region cut off by the slanted edge
    assert!(!hex.contains(DVec2::new(9.0, 8.0)));
}

#[test]
fn test_triangle_points_up() {
    let tri = shape(ShapeKind::Triangle);
    let bbox = tri.bounding_box();
    assert_relative_eq!(bbox.max_y, 10.0);
    assert_relative_eq!(bbox.min_y, -5.0);
    assert!(tri.contains(DVec2::new(0.0, 9.9)));
    assert!(!tri.contains(DVec2::new(5.0, 9.0)));
}

#[test]
fn test_vertices_are_counter_clockwise() {
    for kind in ShapeKind::ALL {
        let outline = shape(kind).outline(32);
        assert!(signed_area(&outline) > 0.0, "{kind} outline should be CCW");
    }
}

#[test]
fn test_bounding_box_covers_outline() {
    for kind in ShapeKind::ALL {
        let s = shape(kind);
        let bbox = s.bounding_box().expanded(1e-9);
        for v in s.outline(64) {
            assert!(bbox.contains(v));
            assert!(v.length() <= s.bounding_radius() + 1e-9);
        }
    }
}

#[test]
fn test_polygon_contains_rejects_degenerate_polygon() {
    assert!(!polygon_contains(&[DVec2::ZERO, DVec2::X], DVec2::ZERO));
}
