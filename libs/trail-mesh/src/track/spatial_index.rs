//! # Triangle Grid
//!
//! Uniform 2D hash grid over triangle bounding boxes. A point query returns
//! every triangle whose (slightly expanded) bounding box covers the point,
//! in ascending triangle order, so the first hit matches a linear scan.

use std::collections::HashMap;

use crate::terrain::Triangulation;
use glam::DVec2;

/// Cell size relative to the mean triangle footprint.
const CELL_SIZE_FACTOR: f64 = 2.0;

/// Bounding-box padding so near-edge hits accepted by the barycentric
/// tolerance are never filtered out by the grid.
const BOX_PADDING: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
}

impl CellCoord {
    fn from_position(pos: DVec2, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i64,
            y: (pos.y / cell_size).floor() as i64,
        }
    }
}

/// Spatial index over a [`Triangulation`].
#[derive(Debug, Clone)]
pub struct TriangleGrid {
    grid: HashMap<CellCoord, Vec<usize>>,
    cell_size: f64,
}

impl TriangleGrid {
    pub fn new(triangulation: &Triangulation) -> Self {
        let count = triangulation.triangle_count();
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for v in triangulation.vertices() {
            min = min.min(v.xy());
            max = max.max(v.xy());
        }

        let extent = max - min;
        let area = extent.x * extent.y;
        let cell_size = if count > 0 && area > 0.0 && area.is_finite() {
            (area / count as f64).sqrt() * CELL_SIZE_FACTOR
        } else {
            extent.max_element().max(1.0)
        };
        let cell_size = if cell_size.is_finite() { cell_size } else { 1.0 };

        let mut grid: HashMap<CellCoord, Vec<usize>> = HashMap::new();
        for i in 0..count {
            let [a, b, c] = triangulation.triangle_positions(i);
            let (a, b, c) = (a.truncate(), b.truncate(), c.truncate());
            let lo = CellCoord::from_position(a.min(b).min(c) - BOX_PADDING, cell_size);
            let hi = CellCoord::from_position(a.max(b).max(c) + BOX_PADDING, cell_size);
            for cx in lo.x..=hi.x {
                for cy in lo.y..=hi.y {
                    grid.entry(CellCoord { x: cx, y: cy }).or_default().push(i);
                }
            }
        }

        Self { grid, cell_size }
    }

    /// Candidate triangles for `p`, ascending.
    pub fn candidates(&self, p: DVec2) -> &[usize] {
        self.grid
            .get(&CellCoord::from_position(p, self.cell_size))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}
