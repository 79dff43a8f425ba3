//! Base plate.
//!
//! The plate is a slab under the model whose top face lies on `base_z`.
//! That face is the band between the terrain hull and the outline grown by
//! the overlap factor, so its inner edges are exactly the bottom edges of
//! the skirt walls. Terrain, walls and base then close into one shell.
//!
//! The band is cut into one convex slice per hull edge: rays from the hull
//! centroid through each hull vertex meet the grown outline, and the
//! outline corners between two rays belong to that slice.

use std::f64::consts::TAU;

use config::BuildConfig;
use glam::{DVec2, DVec3};
use pipeline_types::{Orientation, SolidRole};

use super::extrude::{extrude, Polygon2D};
use super::Solid;
use crate::mesh::Mesh;
use crate::shape::{signed_area, Shape};
use crate::terrain::Triangulation;

/// One vertex of the plate's outer ring.
#[derive(Debug, Clone, Copy)]
struct RingPoint {
    position: DVec2,
    angle: f64,
    /// Hull vertex whose ray produced this point; `None` for outline corners.
    hull: Option<usize>,
}

/// The base plate from `base_z - base_plate_thickness` up to `base_z`.
///
/// Falls back to a plain slab over the grown outline when the
/// triangulation has no usable hull.
pub fn build_base(
    shape: &Shape,
    triangulation: &Triangulation,
    base_z: f64,
    config: &BuildConfig,
) -> Solid {
    let mut outline: Vec<DVec2> = shape
        .outline(config.circle_segments)
        .into_iter()
        .map(|p| p * config.base_overlap_factor)
        .collect();
    if signed_area(&outline) < 0.0 {
        outline.reverse();
    }
    let bottom = base_z - config.base_plate_thickness;

    let hull: Vec<DVec2> = triangulation
        .hull()
        .iter()
        .map(|&i| triangulation.vertex(i).xy())
        .collect();

    let mesh = match outer_ring(&hull, &outline, 2.0 * config.weld_tolerance) {
        Some((center, ring)) => plate(&hull, &ring, center, base_z, bottom),
        None => extrude(&Polygon2D::new(outline), bottom, base_z),
    };
    Solid::new(SolidRole::Base, Orientation::Outward, mesh)
}

/// Ray projections of the hull onto `outline` merged with the outline
/// corners, counter-clockwise, plus the hull centroid the rays start from.
///
/// Corners within `min_gap` of a projection are dropped so the two cannot
/// weld into one vertex.
fn outer_ring(hull: &[DVec2], outline: &[DVec2], min_gap: f64) -> Option<(DVec2, Vec<RingPoint>)> {
    if hull.len() < 3 || outline.len() < 3 || signed_area(hull) <= 0.0 {
        return None;
    }
    let center = hull.iter().copied().sum::<DVec2>() / hull.len() as f64;
    let angle = |p: DVec2| {
        let d = p - center;
        d.y.atan2(d.x).rem_euclid(TAU)
    };

    let mut ring = Vec::with_capacity(hull.len() + outline.len());
    for (i, &h) in hull.iter().enumerate() {
        let position = ray_exit(outline, center, h - center)?;
        if position.distance(center) <= h.distance(center) {
            return None;
        }
        ring.push(RingPoint {
            position,
            angle: angle(h),
            hull: Some(i),
        });
    }
    for &corner in outline {
        if ring.iter().any(|p| p.position.distance(corner) < min_gap) {
            continue;
        }
        ring.push(RingPoint {
            position: corner,
            angle: angle(corner),
            hull: None,
        });
    }
    ring.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    Some((center, ring))
}

/// Where the ray `origin + t * dir` (t > 0) leaves the convex `ring`.
fn ray_exit(ring: &[DVec2], origin: DVec2, dir: DVec2) -> Option<DVec2> {
    let mut exit: Option<f64> = None;
    for (k, &a) in ring.iter().enumerate() {
        let edge = ring[(k + 1) % ring.len()] - a;
        let denom = dir.perp_dot(edge);
        if denom.abs() < f64::EPSILON {
            continue;
        }
        let w = a - origin;
        let t = w.perp_dot(edge) / denom;
        let s = w.perp_dot(dir) / denom;
        if t > 0.0 && (-1e-12..=1.0 + 1e-12).contains(&s) {
            exit = Some(exit.map_or(t, |best: f64| best.max(t)));
        }
    }
    exit.map(|t| origin + dir * t)
}

/// Vertex layout: hull at `top`, ring at `top`, ring at `bottom`, then the
/// bottom center.
fn plate(hull: &[DVec2], ring: &[RingPoint], center: DVec2, top: f64, bottom: f64) -> Mesh {
    let (n, r) = (hull.len(), ring.len());
    let mut mesh = Mesh::with_capacity(n + 2 * r + 1, n + 4 * r);
    for h in hull {
        mesh.add_vertex(h.extend(top));
    }
    for p in ring {
        mesh.add_vertex(p.position.extend(top));
    }
    for p in ring {
        mesh.add_vertex(p.position.extend(bottom));
    }
    let hub = mesh.add_vertex(DVec3::new(center.x, center.y, bottom));

    let top_ring = |k: usize| (n + k % r) as u32;
    let bottom_ring = |k: usize| (n + r + k % r) as u32;

    // Top band, one fan per hull edge, facing up.
    let rays: Vec<usize> = (0..r).filter(|&k| ring[k].hull.is_some()).collect();
    for (s, &start) in rays.iter().enumerate() {
        let end = rays[(s + 1) % rays.len()];
        let span = (end + r - start) % r;
        let span = if span == 0 { r } else { span };
        let (Some(from), Some(to)) = (ring[start].hull, ring[end].hull) else {
            continue;
        };
        let apex = from as u32;
        for k in start..start + span {
            mesh.add_triangle(apex, top_ring(k), top_ring(k + 1));
        }
        mesh.add_triangle(apex, top_ring(start + span), to as u32);
    }

    for k in 0..r {
        mesh.add_quad(bottom_ring(k), bottom_ring(k + 1), top_ring(k + 1), top_ring(k));
        mesh.add_triangle(hub, bottom_ring(k + 1), bottom_ring(k));
    }
    mesh
}
