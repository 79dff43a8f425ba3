//! # Terrain Triangulator
//!
//! Filters grid samples into the model outline, scales them into output
//! units and triangulates the planar point set.
//!
//! ## Pipeline
//!
//! ```text
//! GridSample ─► project ─► Shape::contains ─► ScaledVertex ─► Delaunay
//!                                                 │
//!                                     (low detail) simplify
//! ```
//!
//! Triangles are normalized to counter-clockwise order seen from above, so
//! the surface's authored normals face up. The hull is counter-clockwise as
//! well.

pub mod simplify;

use crate::mesh::Mesh;
use crate::projection::{ElevationScale, PointProjector};
use crate::shape::Shape;
use glam::{DVec2, DVec3};
use pipeline_types::GridSample;
use robust::Coord;

pub use simplify::simplify;

/// A grid sample inside the outline, in output units.
///
/// `original_index` is the sample's identity from [`GridSample`]; it is
/// never reassigned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledVertex {
    pub position: DVec3,
    pub original_index: usize,
}

impl ScaledVertex {
    pub fn new(position: DVec3, original_index: usize) -> Self {
        Self {
            position,
            original_index,
        }
    }

    pub fn xy(&self) -> DVec2 {
        self.position.truncate()
    }
}

/// Projects, filters and scales grid samples.
///
/// Samples outside `shape` (tested in the unrotated local frame) or with
/// non-finite coordinates are dropped. Survivors keep their input order.
pub fn scale_samples(
    grid: &[GridSample],
    shape: &Shape,
    projector: &PointProjector,
    elevation: &ElevationScale,
) -> Vec<ScaledVertex> {
    grid.iter()
        .filter(|s| s.point().is_finite())
        .filter_map(|s| {
            let local = projector.geo_to_local(s.point());
            shape.contains(local).then(|| {
                ScaledVertex::new(local.extend(elevation.z(s.elevation)), s.original_index())
            })
        })
        .collect()
}

/// Planar Delaunay triangulation of scaled vertices.
///
/// Every index in `triangles` and `hull` is an offset into `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    vertices: Vec<ScaledVertex>,
    triangles: Vec<[usize; 3]>,
    hull: Vec<usize>,
}

impl Triangulation {
    /// Triangulates the `(x, y)` projection of `vertices`.
    ///
    /// Fewer than three distinct, non-collinear points yield no triangles
    /// and an empty hull.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trail_mesh::terrain::{ScaledVertex, Triangulation};
    /// use glam::DVec3;
    ///
    /// let tri = Triangulation::from_vertices(vec![
    ///     ScaledVertex::new(DVec3::new(0.0, 0.0, 10.0), 0),
    ///     ScaledVertex::new(DVec3::new(10.0, 0.0, 20.0), 1),
    ///     ScaledVertex::new(DVec3::new(5.0, 10.0, 30.0), 2),
    /// ]);
    /// assert_eq!(tri.triangle_count(), 1);
    /// assert_eq!(tri.hull().len(), 3);
    /// ```
    pub fn from_vertices(vertices: Vec<ScaledVertex>) -> Self {
        if vertices.len() < 3 {
            return Self {
                vertices,
                ..Self::default()
            };
        }

        let points: Vec<delaunator::Point> = vertices
            .iter()
            .map(|v| delaunator::Point {
                x: v.position.x,
                y: v.position.y,
            })
            .collect();
        let delaunay = delaunator::triangulate(&points);

        let mut triangles = Vec::with_capacity(delaunay.triangles.len() / 3);
        for c in delaunay.triangles.chunks_exact(3) {
            let orientation = orient(&vertices, c[0], c[1], c[2]);
            if orientation > 0.0 {
                triangles.push([c[0], c[1], c[2]]);
            } else if orientation < 0.0 {
                triangles.push([c[0], c[2], c[1]]);
            }
        }

        let mut hull = if triangles.is_empty() {
            Vec::new()
        } else {
            delaunay.hull
        };
        if hull_signed_area(&vertices, &hull) < 0.0 {
            hull.reverse();
        }

        Self {
            vertices,
            triangles,
            hull,
        }
    }

    pub fn vertices(&self) -> &[ScaledVertex] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> &ScaledVertex {
        &self.vertices[index]
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Ordered, cyclic boundary (counter-clockwise).
    pub fn hull(&self) -> &[usize] {
        &self.hull
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_positions(&self, index: usize) -> [DVec3; 3] {
        let [a, b, c] = self.triangles[index];
        [
            self.vertices[a].position,
            self.vertices[b].position,
            self.vertices[c].position,
        ]
    }

    /// Lowest and highest vertex z, or `None` without vertices.
    ///
    /// Single pass over the vertex array.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let first = self.vertices.first()?.position.z;
        let mut min_z = first;
        let mut max_z = first;
        for v in &self.vertices[1..] {
            let z = v.position.z;
            if z < min_z {
                min_z = z;
            }
            if z > max_z {
                max_z = z;
            }
        }
        Some((min_z, max_z))
    }

    /// Surface mesh: one triangle per Delaunay triangle, normals up.
    pub fn to_mesh(&self) -> Mesh {
        let vertices = self.vertices.iter().map(|v| v.position).collect();
        let triangles = self
            .triangles
            .iter()
            .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
            .collect();
        Mesh::from_parts(vertices, triangles)
    }
}

/// A triangulated terrain with its vertical extents.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainSurface {
    pub triangulation: Triangulation,
    pub min_z: f64,
    pub max_z: f64,
    /// Always `min_z - base_thickness`.
    pub base_z: f64,
}

impl TerrainSurface {
    /// Returns `None` when the triangulation has no vertices.
    pub fn new(triangulation: Triangulation, base_thickness: f64) -> Option<Self> {
        let (min_z, max_z) = triangulation.z_range()?;
        Some(Self {
            triangulation,
            min_z,
            max_z,
            base_z: min_z - base_thickness,
        })
    }
}

fn coord(v: &ScaledVertex) -> Coord<f64> {
    Coord {
        x: v.position.x,
        y: v.position.y,
    }
}

fn orient(vertices: &[ScaledVertex], a: usize, b: usize, c: usize) -> f64 {
    robust::orient2d(
        coord(&vertices[a]),
        coord(&vertices[b]),
        coord(&vertices[c]),
    )
}

fn hull_signed_area(vertices: &[ScaledVertex], hull: &[usize]) -> f64 {
    let ring: Vec<DVec2> = hull.iter().map(|&i| vertices[i].xy()).collect();
    crate::shape::signed_area(&ring)
}
