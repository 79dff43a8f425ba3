//! # Prism Extrusion
//!
//! Extrudes a 2D polygon (with holes) between two z planes. Caps are
//! triangulated with earcut; every emitted face points out of the prism.

use crate::mesh::Mesh;
use crate::shape::signed_area;
use glam::{DVec2, DVec3};

/// A 2D polygon for extrusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    /// Outer boundary vertices.
    pub outer: Vec<DVec2>,
    /// Inner holes.
    pub holes: Vec<Vec<DVec2>>,
}

impl Polygon2D {
    pub fn new(outer: Vec<DVec2>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    pub fn with_holes(outer: Vec<DVec2>, holes: Vec<Vec<DVec2>>) -> Self {
        Self { outer, holes }
    }

    /// Axis-aligned rectangle centered on `center`.
    pub fn rectangle(center: DVec2, size: DVec2) -> Self {
        let h = size / 2.0;
        Self::new(vec![
            DVec2::new(center.x - h.x, center.y - h.y),
            DVec2::new(center.x + h.x, center.y - h.y),
            DVec2::new(center.x + h.x, center.y + h.y),
            DVec2::new(center.x - h.x, center.y + h.y),
        ])
    }

    pub fn vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Outer ring counter-clockwise, holes clockwise.
    pub fn normalized(mut self) -> Self {
        if signed_area(&self.outer) < 0.0 {
            self.outer.reverse();
        }
        for hole in &mut self.holes {
            if signed_area(hole) > 0.0 {
                hole.reverse();
            }
        }
        self
    }

    /// All ring vertices, outer first, in the order used by
    /// [`triangulate`](Self::triangulate).
    pub fn flattened(&self) -> Vec<DVec2> {
        let mut points = Vec::with_capacity(self.vertex_count());
        points.extend_from_slice(&self.outer);
        for hole in &self.holes {
            points.extend_from_slice(hole);
        }
        points
    }

    /// Counter-clockwise cap triangles indexing [`flattened`](Self::flattened).
    ///
    /// Zero-area ears are dropped. Returns nothing if earcut fails.
    pub fn triangulate(&self) -> Vec<[usize; 3]> {
        if self.outer.len() < 3 {
            return Vec::new();
        }
        let points = self.flattened();
        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();

        let mut hole_indices = Vec::with_capacity(self.holes.len());
        let mut offset = self.outer.len();
        for hole in &self.holes {
            hole_indices.push(offset);
            offset += hole.len();
        }

        let indices = earcutr::earcut(&coords, &hole_indices, 2).unwrap_or_default();

        indices
            .chunks_exact(3)
            .filter_map(|t| {
                let (a, b, c) = (points[t[0]], points[t[1]], points[t[2]]);
                let cross = (b - a).perp_dot(c - a);
                if cross > 0.0 {
                    Some([t[0], t[1], t[2]])
                } else if cross < 0.0 {
                    Some([t[0], t[2], t[1]])
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Flat cap at `z`, facing up.
pub fn cap(polygon: &Polygon2D, z: f64) -> Mesh {
    let points = polygon.flattened();
    let mut mesh = Mesh::with_capacity(points.len(), points.len());
    for p in &points {
        mesh.add_vertex(p.extend(z));
    }
    for [a, b, c] in polygon.triangulate() {
        mesh.add_triangle(a as u32, b as u32, c as u32);
    }
    mesh
}

/// Closed prism from `bottom` to `top`.
///
/// Returns an empty mesh for `top <= bottom` or a polygon without area.
///
/// # Example
///
/// ```rust
/// use trail_mesh::solids::extrude::{extrude, Polygon2D};
/// use glam::DVec2;
///
/// let square = Polygon2D::rectangle(DVec2::ZERO, DVec2::splat(10.0));
/// let mesh = extrude(&square, 0.0, 5.0);
/// // 4 side quads plus two 2-triangle caps
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn extrude(polygon: &Polygon2D, bottom: f64, top: f64) -> Mesh {
    if !(top > bottom) {
        return Mesh::new();
    }
    let polygon = polygon.clone().normalized();
    let cap_triangles = polygon.triangulate();
    if cap_triangles.is_empty() {
        return Mesh::new();
    }

    let points = polygon.flattened();
    let n = points.len();
    let mut mesh = Mesh::with_capacity(n * 2, n * 2 + cap_triangles.len() * 2);

    for p in &points {
        mesh.add_vertex(DVec3::new(p.x, p.y, bottom));
    }
    for p in &points {
        mesh.add_vertex(DVec3::new(p.x, p.y, top));
    }

    let n = n as u32;
    for [a, b, c] in &cap_triangles {
        let (a, b, c) = (*a as u32, *b as u32, *c as u32);
        mesh.add_triangle(a, c, b);
        mesh.add_triangle(a + n, b + n, c + n);
    }

    // Sides: outer CCW and holes CW both put the solid on the left.
    let mut start = 0u32;
    for ring_len in std::iter::once(polygon.outer.len()).chain(polygon.holes.iter().map(Vec::len)) {
        let len = ring_len as u32;
        for i in 0..len {
            let b0 = start + i;
            let b1 = start + (i + 1) % len;
            mesh.add_triangle(b0, b1, b1 + n);
            mesh.add_triangle(b0, b1 + n, b0 + n);
        }
        start += len;
    }

    mesh
}
