//! # Mesh Assembler
//!
//! Merges tagged solids into one indexed, outward-facing mesh.
//!
//! ## Stages
//!
//! ```text
//! Collect ─► Deindex ─► Orient ─► Concatenate ─► Weld ─► Normals ─► Cull
//! ```
//!
//! [`ExportProgress`] is called once before each stage, in order. An
//! `Err` from the callback aborts assembly with [`BuildError::Aborted`].

mod weld;

pub use weld::Welder;

use config::BuildConfig;
use glam::DVec3;
use pipeline_types::{ExportStage, Orientation, SolidRole};
use tracing::debug;

use crate::error::{BuildError, BuildResult};
use crate::mesh::{triangle_area, Mesh};
use crate::solids::Solid;

/// Receives export stages as they start.
pub trait ExportProgress {
    fn on_stage(&mut self, stage: ExportStage) -> Result<(), String>;
}

/// Progress sink that accepts every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ExportProgress for NoProgress {
    fn on_stage(&mut self, _stage: ExportStage) -> Result<(), String> {
        Ok(())
    }
}

impl<F> ExportProgress for F
where
    F: FnMut(ExportStage) -> Result<(), String>,
{
    fn on_stage(&mut self, stage: ExportStage) -> Result<(), String> {
        self(stage)
    }
}

/// Reports `stage`, turning a refusal into [`BuildError::Aborted`].
pub fn report(progress: &mut dyn ExportProgress, stage: ExportStage) -> BuildResult<()> {
    progress
        .on_stage(stage)
        .map_err(|message| BuildError::Aborted { stage, message })
}

/// Counters gathered while assembling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub input_triangles: usize,
    pub input_vertices: usize,
    pub welded_vertices: usize,
    pub degenerate_triangles: usize,
}

/// The merged model: one mesh plus the role of each triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMesh {
    pub mesh: Mesh,
    /// Parallel to `mesh.triangles()`.
    pub triangle_roles: Vec<SolidRole>,
    pub stats: AssemblyStats,
}

impl ExportMesh {
    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    pub fn role_codes(&self) -> Vec<u8> {
        self.triangle_roles.iter().map(|r| r.code()).collect()
    }
}

struct Collected<'a> {
    solid: &'a Solid,
    positions: Vec<DVec3>,
}

struct Soup {
    role: SolidRole,
    orientation: Orientation,
    triangles: Vec<[DVec3; 3]>,
}

/// Runs every assembly stage over `solids`.
///
/// Fails with [`BuildError::EmptyResult`] when no triangle is collected or
/// none survives culling.
///
/// # Example
///
/// ```rust
/// use trail_mesh::assemble::{assemble, NoProgress};
/// use trail_mesh::solids::extrude::{extrude, Polygon2D};
/// use trail_mesh::solids::Solid;
/// use pipeline_types::{Orientation, SolidRole};
/// use config::BuildConfig;
/// use glam::DVec2;
///
/// let cube = extrude(&Polygon2D::rectangle(DVec2::ZERO, DVec2::ONE), 0.0, 1.0);
/// let solid = Solid::new(SolidRole::Platform, Orientation::Outward, cube);
/// let merged = assemble(&[solid], &BuildConfig::default(), &mut NoProgress).unwrap();
/// assert_eq!(merged.mesh.vertex_count(), 8);
/// assert_eq!(merged.triangle_count(), 12);
/// ```
pub fn assemble(
    solids: &[Solid],
    config: &BuildConfig,
    progress: &mut dyn ExportProgress,
) -> BuildResult<ExportMesh> {
    let mut stats = AssemblyStats::default();

    report(progress, ExportStage::Collect)?;
    let collected: Vec<Collected> = solids
        .iter()
        .filter(|s| !s.mesh.is_empty())
        .map(|solid| Collected {
            solid,
            positions: solid
                .mesh
                .vertices()
                .iter()
                .map(|v| solid.transform.transform_point3(*v))
                .collect(),
        })
        .collect();
    stats.input_triangles = collected.iter().map(|c| c.solid.mesh.triangle_count()).sum();
    if stats.input_triangles == 0 {
        return Err(BuildError::empty("no geometry to export"));
    }

    report(progress, ExportStage::Deindex)?;
    let mut soups: Vec<Soup> = collected
        .iter()
        .map(|c| Soup {
            role: c.solid.role,
            orientation: c.solid.orientation,
            triangles: c
                .solid
                .mesh
                .triangles()
                .iter()
                .map(|t| t.map(|i| c.positions[i as usize]))
                .collect(),
        })
        .collect();

    report(progress, ExportStage::Orient)?;
    for soup in soups.iter_mut().filter(|s| s.orientation == Orientation::Inward) {
        for t in &mut soup.triangles {
            t.swap(1, 2);
        }
        soup.orientation = Orientation::Outward;
    }

    report(progress, ExportStage::Concatenate)?;
    let mut triangles: Vec<[DVec3; 3]> = Vec::with_capacity(stats.input_triangles);
    let mut roles: Vec<SolidRole> = Vec::with_capacity(stats.input_triangles);
    for soup in soups {
        roles.extend(std::iter::repeat(soup.role).take(soup.triangles.len()));
        triangles.extend(soup.triangles);
    }
    stats.input_vertices = triangles.len() * 3;

    report(progress, ExportStage::Weld)?;
    let mut welder = Welder::with_capacity(config.weld_tolerance, triangles.len());
    let indexed: Vec<[u32; 3]> = triangles
        .iter()
        .map(|t| t.map(|p| welder.insert(p)))
        .collect();
    stats.welded_vertices = welder.vertex_count();
    let mut mesh = Mesh::from_parts(welder.into_vertices(), indexed);
    debug!(
        vertices = stats.input_vertices,
        welded = stats.welded_vertices,
        "welded export vertices"
    );

    report(progress, ExportStage::Normals)?;
    mesh.compute_normals();

    report(progress, ExportStage::Cull)?;
    let (mesh, roles) = cull_degenerate(&mesh, &roles, config.degenerate_area_epsilon);
    stats.degenerate_triangles = stats.input_triangles - mesh.triangle_count();
    debug!(dropped = stats.degenerate_triangles, "culled degenerate triangles");
    if mesh.is_empty() {
        return Err(BuildError::empty("every triangle was degenerate"));
    }
    debug_assert!(mesh.validate(config.degenerate_area_epsilon));

    Ok(ExportMesh {
        mesh,
        triangle_roles: roles,
        stats,
    })
}

/// Keeps triangles with area above `min_area` and compacts the vertices.
fn cull_degenerate(mesh: &Mesh, roles: &[SolidRole], min_area: f64) -> (Mesh, Vec<SolidRole>) {
    let vertices = mesh.vertices();
    let normals = mesh.normals();
    let mut remap: Vec<Option<u32>> = vec![None; vertices.len()];
    let mut kept_vertices = Vec::new();
    let mut kept_normals = Vec::new();
    let mut kept_triangles = Vec::with_capacity(mesh.triangle_count());
    let mut kept_roles = Vec::with_capacity(roles.len());

    for (i, tri) in mesh.triangles().iter().enumerate() {
        let [a, b, c] = tri.map(|v| vertices[v as usize]);
        if !(triangle_area(a, b, c) > min_area) {
            continue;
        }
        let mapped = tri.map(|v| {
            *remap[v as usize].get_or_insert_with(|| {
                kept_vertices.push(vertices[v as usize]);
                if let Some(n) = normals {
                    kept_normals.push(n[v as usize]);
                }
                (kept_vertices.len() - 1) as u32
            })
        });
        kept_triangles.push(mapped);
        kept_roles.push(roles[i]);
    }

    let mut culled = Mesh::from_parts(kept_vertices, kept_triangles);
    if normals.is_some() {
        culled.set_normals(kept_normals);
    }
    (culled, kept_roles)
}

#[cfg(test)]
mod tests;
