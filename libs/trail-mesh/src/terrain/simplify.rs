//! Lossy grid decimation for low-detail builds.
//!
//! Vertices are bucketed into a uniform grid of roughly `target` cells.
//! A cell whose elevation range exceeds the threshold keeps its lowest and
//! highest vertex; any other cell keeps its first vertex. Output keeps the
//! input order, so the result depends only on the input and the target.

use std::collections::HashMap;

use super::ScaledVertex;

#[derive(Debug, Clone, Copy)]
struct Cell {
    first: usize,
    min: usize,
    max: usize,
}

/// Reduces `vertices` to about `target` representatives.
///
/// Inputs already at or below `target`, or with no planar extent, are
/// returned unchanged.
pub fn simplify(vertices: &[ScaledVertex], target: usize, threshold: f64) -> Vec<ScaledVertex> {
    if target == 0 || vertices.len() <= target {
        return vertices.to_vec();
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in vertices {
        min_x = min_x.min(v.position.x);
        max_x = max_x.max(v.position.x);
        min_y = min_y.min(v.position.y);
        max_y = max_y.max(v.position.y);
    }

    let area = (max_x - min_x) * (max_y - min_y);
    if !(area > 0.0 && area.is_finite()) {
        return vertices.to_vec();
    }
    let cell_size = (area / target as f64).sqrt();

    let mut cells: HashMap<(i64, i64), Cell> = HashMap::new();
    for (i, v) in vertices.iter().enumerate() {
        let key = (
            ((v.position.x - min_x) / cell_size).floor() as i64,
            ((v.position.y - min_y) / cell_size).floor() as i64,
        );
        let cell = cells.entry(key).or_insert(Cell {
            first: i,
            min: i,
            max: i,
        });
        if v.position.z < vertices[cell.min].position.z {
            cell.min = i;
        }
        if v.position.z > vertices[cell.max].position.z {
            cell.max = i;
        }
    }

    let mut keep = vec![false; vertices.len()];
    for cell in cells.values() {
        let range = vertices[cell.max].position.z - vertices[cell.min].position.z;
        if range > threshold {
            keep[cell.min] = true;
            keep[cell.max] = true;
        } else {
            keep[cell.first] = true;
        }
    }

    vertices
        .iter()
        .zip(keep)
        .filter_map(|(v, kept)| kept.then_some(*v))
        .collect()
}
