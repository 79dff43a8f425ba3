//! # Path Tube
//!
//! A capped tube along the draped track. Ring frames are carried along the
//! polyline by parallel transport, so the tube does not twist at bends.

use config::constants::EPSILON;
use glam::{DQuat, DVec3};
use pipeline_types::{Orientation, SolidRole};
use std::f64::consts::TAU;

use super::Solid;
use crate::mesh::Mesh;

/// Builds a tube of `radius` with `segments` sides through `points`.
///
/// Consecutive duplicates are skipped. Fewer than two distinct points
/// give an empty solid.
pub fn build_path(points: &[DVec3], radius: f64, segments: u32) -> Solid {
    let empty = || Solid::new(SolidRole::Path, Orientation::Outward, Mesh::new());

    let mut centers: Vec<DVec3> = Vec::with_capacity(points.len());
    for &p in points {
        if centers.last().map_or(true, |last| last.distance(p) > EPSILON) {
            centers.push(p);
        }
    }
    if centers.len() < 2 || segments < 3 || radius <= 0.0 {
        return empty();
    }

    let tangents = tangents(&centers);
    let n = centers.len();
    let s = segments as usize;
    let mut mesh = Mesh::with_capacity(n * s + 2, 2 * s * n);

    let mut normal = tangents[0].any_orthonormal_vector();
    for (i, (&center, &tangent)) in centers.iter().zip(&tangents).enumerate() {
        if i > 0 {
            normal = DQuat::from_rotation_arc(tangents[i - 1], tangent) * normal;
            normal = (normal - tangent * normal.dot(tangent)).normalize_or_zero();
            if normal == DVec3::ZERO {
                normal = tangent.any_orthonormal_vector();
            }
        }
        let binormal = tangent.cross(normal);
        for k in 0..s {
            let angle = TAU * k as f64 / s as f64;
            let offset = normal * angle.cos() + binormal * angle.sin();
            mesh.add_vertex(center + offset * radius);
        }
    }

    let ring = |i: usize, k: usize| (i * s + k % s) as u32;
    for i in 0..n - 1 {
        for k in 0..s {
            mesh.add_triangle(ring(i, k), ring(i, k + 1), ring(i + 1, k + 1));
            mesh.add_triangle(ring(i, k), ring(i + 1, k + 1), ring(i + 1, k));
        }
    }

    let start = mesh.add_vertex(centers[0]);
    let end = mesh.add_vertex(centers[n - 1]);
    for k in 0..s {
        mesh.add_triangle(start, ring(0, k + 1), ring(0, k));
        mesh.add_triangle(end, ring(n - 1, k), ring(n - 1, k + 1));
    }

    Solid::new(SolidRole::Path, Orientation::Outward, mesh)
}

/// Unit tangents: central differences inside, one-sided at the ends.
fn tangents(centers: &[DVec3]) -> Vec<DVec3> {
    let n = centers.len();
    (0..n)
        .map(|i| {
            let prev = centers[i.saturating_sub(1)];
            let next = centers[(i + 1).min(n - 1)];
            let t = (next - prev).normalize_or_zero();
            if t == DVec3::ZERO {
                // Doubled-back point: fall back to the incoming segment.
                (centers[i] - prev).normalize_or_zero()
            } else {
                t
            }
        })
        .collect()
}
