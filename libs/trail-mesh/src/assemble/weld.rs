//! Tolerance-based vertex welding.
//!
//! Positions are hashed into cells of `tolerance` size. A new position
//! joins the lowest-indexed existing vertex within `tolerance` in its own
//! or any of the 26 neighboring cells, otherwise it becomes a new vertex.
//! The first position seen is kept as the representative, so the result
//! depends only on insertion order.

use std::collections::HashMap;

use glam::DVec3;

type CellKey = (i64, i64, i64);

#[derive(Debug, Clone)]
pub struct Welder {
    tolerance: f64,
    cells: HashMap<CellKey, Vec<u32>>,
    vertices: Vec<DVec3>,
}

impl Welder {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cells: HashMap::new(),
            vertices: Vec::new(),
        }
    }

    pub fn with_capacity(tolerance: f64, capacity: usize) -> Self {
        Self {
            tolerance,
            cells: HashMap::with_capacity(capacity),
            vertices: Vec::with_capacity(capacity),
        }
    }

    fn key(&self, p: DVec3) -> CellKey {
        let q = (p / self.tolerance).floor();
        (q.x as i64, q.y as i64, q.z as i64)
    }

    /// Index of the vertex `p` welds to.
    pub fn insert(&mut self, p: DVec3) -> u32 {
        if self.tolerance > 0.0 {
            let (kx, ky, kz) = self.key(p);
            let mut best: Option<u32> = None;
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(bucket) = self.cells.get(&(kx + dx, ky + dy, kz + dz)) else {
                            continue;
                        };
                        for &i in bucket {
                            if best.is_some_and(|b| b <= i) {
                                continue;
                            }
                            if self.vertices[i as usize].distance(p) <= self.tolerance {
                                best = Some(i);
                            }
                        }
                    }
                }
            }
            if let Some(index) = best {
                return index;
            }
        }

        let index = self.vertices.len() as u32;
        self.vertices.push(p);
        if self.tolerance > 0.0 {
            let key = self.key(p);
            self.cells.entry(key).or_default().push(index);
        }
        index
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn into_vertices(self) -> Vec<DVec3> {
        self.vertices
    }
}
