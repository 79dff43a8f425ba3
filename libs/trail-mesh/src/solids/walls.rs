//! Skirt walls.

use glam::DVec3;
use pipeline_types::{Orientation, SolidRole};

use super::Solid;
use crate::mesh::Mesh;
use crate::terrain::Triangulation;

/// One quad per hull edge, from the surface down to `base_z`.
///
/// A hull of `H` vertices yields exactly `2H` triangles. Each quad runs
/// `a_top, b_top, b_bottom, a_bottom` along the counter-clockwise hull,
/// which faces into the model, so the solid is tagged
/// [`Orientation::Inward`].
pub fn build_walls(triangulation: &Triangulation, base_z: f64) -> Solid {
    let hull = triangulation.hull();
    let h = hull.len();
    let mut mesh = Mesh::with_capacity(h * 2, h * 2);

    for &index in hull {
        let top = triangulation.vertex(index).position;
        mesh.add_vertex(top);
        mesh.add_vertex(DVec3::new(top.x, top.y, base_z));
    }

    for i in 0..h {
        let j = (i + 1) % h;
        let (a_top, a_bottom) = ((2 * i) as u32, (2 * i + 1) as u32);
        let (b_top, b_bottom) = ((2 * j) as u32, (2 * j + 1) as u32);
        mesh.add_quad(a_top, b_top, b_bottom, a_bottom);
    }

    Solid::new(SolidRole::Wall, Orientation::Inward, mesh)
}
