//! ASCII STL writer.
//!
//! Numbers are written with `{:e}`, the shortest form that parses back to
//! the same `f64`. Identical meshes give identical bytes, and a facet kept
//! by the assembler keeps its exact area in the document.

use std::fmt::{self, Write};

use glam::DVec3;

use crate::error::{BuildError, BuildResult};
use crate::mesh::Mesh;

/// Solid name used when the given one is blank.
const DEFAULT_SOLID_NAME: &str = "model";

/// Replaces whitespace so the name stays a single STL token.
pub fn solid_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() || c.is_control() { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        DEFAULT_SOLID_NAME.to_string()
    } else {
        cleaned
    }
}

/// Writes `mesh` as one `solid … endsolid` document.
///
/// Facet normals come from each triangle's winding.
pub fn write_stl<W: Write>(mesh: &Mesh, name: &str, out: &mut W) -> fmt::Result {
    let name = solid_name(name);
    writeln!(out, "solid {name}")?;
    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle_positions(i);
        let n = (b - a).cross(c - a).normalize_or_zero();
        writeln!(out, "  facet normal {}", triple(n))?;
        writeln!(out, "    outer loop")?;
        for v in [a, b, c] {
            writeln!(out, "      vertex {}", triple(v))?;
        }
        writeln!(out, "    endloop")?;
        writeln!(out, "  endfacet")?;
    }
    writeln!(out, "endsolid {name}")
}

/// Serializes `mesh` into a new string.
///
/// # Example
///
/// ```rust
/// use trail_mesh::export::to_stl_string;
/// use trail_mesh::Mesh;
/// use glam::DVec3;
///
/// let mesh = Mesh::from_parts(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![[0, 1, 2]]);
/// let stl = to_stl_string(&mesh, "demo").unwrap();
/// assert!(stl.starts_with("solid demo\n"));
/// assert!(stl.contains("facet normal 0e0 0e0 1e0"));
/// assert!(stl.ends_with("endsolid demo\n"));
/// ```
pub fn to_stl_string(mesh: &Mesh, name: &str) -> BuildResult<String> {
    let mut out = String::with_capacity(64 + mesh.triangle_count() * 256);
    write_stl(mesh, name, &mut out).map_err(|e| BuildError::export(e.to_string()))?;
    Ok(out)
}

fn triple(v: DVec3) -> String {
    format!("{:e} {:e} {:e}", v.x, v.y, v.z)
}
