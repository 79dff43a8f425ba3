//! # Build Orchestrator
//!
//! One deterministic pass from a [`BuildRequest`] to tagged solids, and
//! on demand to an STL document.
//!
//! ## Stages
//!
//! 1. Validate the request
//! 2. Fit the projector to the grid and scale elevations
//! 3. Filter, (optionally) simplify and triangulate the grid
//! 4. Drape the track onto the surface
//! 5. Lay out the text platform and collect warnings
//! 6. Build the solids; terrain/walls and base/path run under `rayon::join`,
//!    glyph outlining stays on the calling thread
//! 7. Attach the output rotation to every solid
//!
//! Each stage runs inside a `debug_span!` named after it. The pipeline is a
//! pure function of its inputs; nothing is cached between calls.

mod supervisor;
mod validate;

pub use supervisor::{BuildSupervisor, BuildTicket};
pub use validate::validate_request;

use config::BuildConfig;
use pipeline_types::{BuildRequest, BuildWarning, ExportStage, Fidelity};
use tracing::{debug, debug_span, warn};

use crate::assemble::{assemble, report, ExportMesh, ExportProgress};
use crate::error::{BuildError, BuildResult};
use crate::export::to_stl_string;
use crate::projection::{ElevationScale, GeoBounds, PointProjector};
use crate::shape::Shape;
use crate::solids::{
    build_base, build_path, build_platform, build_terrain, build_text, build_walls,
    count_path_overlap, GlyphOutliner, PlatformLayout, Solid,
};
use crate::terrain::{scale_samples, simplify, TerrainSurface, Triangulation};
use crate::track::interpolate_track;

/// Counters describing one build.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuildStats {
    pub grid_samples: usize,
    /// Samples inside the outline (after simplification).
    pub kept_samples: usize,
    pub triangles: usize,
    pub hull_size: usize,
    pub track_points: usize,
    pub interpolated_points: usize,
    pub fallback_points: usize,
    pub terrain_min_z: f64,
    pub terrain_max_z: f64,
    pub base_z: f64,
}

/// Everything a host needs to render or export the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    /// Terrain, walls, base, path, then platform and text when present.
    pub solids: Vec<Solid>,
    pub warnings: Vec<BuildWarning>,
    pub stats: BuildStats,
    pub projector: PointProjector,
}

impl ModelOutput {
    /// Single attention signal shared by every warning kind.
    pub fn needs_attention(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Builds all solids for `request`.
///
/// Text is embossed only when the request carries non-blank text and
/// `glyphs` is provided.
///
/// # Errors
///
/// - [`BuildError::InvalidInput`] for a request failing validation or an
///   invalid `config`
/// - [`BuildError::EmptyResult`] when no surface can be triangulated
/// - [`BuildError::Glyph`] when the outline capability fails
pub fn build_model(
    request: &BuildRequest,
    config: &BuildConfig,
    glyphs: Option<&dyn GlyphOutliner>,
) -> BuildResult<ModelOutput> {
    {
        let _span = debug_span!("validate").entered();
        validate_request(request)?;
        config.validate()?;
    }

    let (projector, elevation) = {
        let _span = debug_span!("project").entered();
        let bounds = GeoBounds::from_points(request.grid.iter().map(|s| s.point()))
            .ok_or_else(|| BuildError::invalid_input("no elevation grid samples"))?;
        let projector = PointProjector::fit(&bounds, request.width, request.rotation_degrees)?;
        let elevation = ElevationScale::from_grid(
            &request.grid,
            projector.units_per_meter(),
            request.elevation_multiplier,
        );
        (projector, elevation)
    };

    let shape = Shape::new(request.shape, request.width, config);

    let surface = {
        let _span = debug_span!("triangulate", shape = %request.shape).entered();
        let mut vertices = scale_samples(&request.grid, &shape, &projector, &elevation);
        debug!(grid = request.grid.len(), kept = vertices.len(), "filtered grid samples");
        if request.fidelity == Fidelity::Low {
            vertices = simplify(
                &vertices,
                config.low_detail_target_points,
                config.low_detail_elevation_threshold,
            );
            debug!(kept = vertices.len(), "simplified grid samples");
        }
        if vertices.is_empty() {
            return Err(BuildError::empty("no grid samples fall inside the outline"));
        }

        let triangulation = Triangulation::from_vertices(vertices);
        if triangulation.is_empty() {
            return Err(BuildError::empty("grid samples inside the outline form no surface"));
        }
        debug!(
            triangles = triangulation.triangle_count(),
            hull = triangulation.hull().len(),
            "triangulated terrain"
        );
        TerrainSurface::new(triangulation, config.base_thickness)
            .ok_or_else(|| BuildError::empty("terrain has no vertices"))?
    };

    let track = {
        let _span = debug_span!("interpolate").entered();
        let track = interpolate_track(
            &request.track,
            &surface.triangulation,
            &projector,
            &elevation,
            request.fidelity,
            config,
        );
        let fallback = track.iter().filter(|p| !p.interpolated).count();
        if fallback > 0 {
            warn!(fallback, total = track.len(), "track points outside the terrain surface");
        }
        track
    };

    let mut warnings = Vec::new();
    let emboss = match (request.emboss_text.as_deref().map(str::trim), glyphs) {
        (Some(text), Some(glyphs)) if !text.is_empty() => {
            let _span = debug_span!("platform").entered();
            let layout = PlatformLayout::new(
                &shape,
                surface.base_z,
                surface.max_z,
                request.platform_height,
                config,
            );
            // Every raw sample counts, including ones low detail skips.
            let raw = request.track.iter().map(|s| projector.geo_to_local(s.point()));
            let overlap = count_path_overlap(&layout, raw, config.platform_path_buffer);
            if overlap > 0 {
                warn!(points = overlap, "track overlaps the text platform");
                warnings.push(BuildWarning::PathOverlapsPlatform { points: overlap });
            }
            Some((text, glyphs, layout))
        }
        _ => None,
    };

    let solids = {
        let _span = debug_span!("solids").entered();
        let path_points: Vec<_> = track.iter().map(|p| p.position).collect();
        let (surface_solids, outer_solids) = rayon::join(
            || {
                [
                    build_terrain(&surface.triangulation),
                    build_walls(&surface.triangulation, surface.base_z),
                ]
            },
            || {
                [
                    build_base(&shape, &surface.triangulation, surface.base_z, config),
                    build_path(&path_points, config.path_radius, config.path_segments),
                ]
            },
        );

        let mut solids: Vec<Solid> = surface_solids.into_iter().chain(outer_solids).collect();
        if let Some((text, glyphs, layout)) = &emboss {
            solids.push(build_platform(layout));
            let embossed = build_text(text, *glyphs, layout, config)?;
            if let Some(warning) = embossed.warning {
                warn!(?warning, "text scaled to fit the platform");
                warnings.push(warning);
            }
            solids.push(embossed.solid);
        }

        let transform = projector.output_transform();
        solids
            .into_iter()
            .map(|s| s.with_transform(transform))
            .collect::<Vec<_>>()
    };

    let stats = BuildStats {
        grid_samples: request.grid.len(),
        kept_samples: surface.triangulation.vertices().len(),
        triangles: surface.triangulation.triangle_count(),
        hull_size: surface.triangulation.hull().len(),
        track_points: track.len(),
        interpolated_points: track.iter().filter(|p| p.interpolated).count(),
        fallback_points: track.iter().filter(|p| !p.interpolated).count(),
        terrain_min_z: surface.min_z,
        terrain_max_z: surface.max_z,
        base_z: surface.base_z,
    };

    Ok(ModelOutput {
        solids,
        warnings,
        stats,
        projector,
    })
}

/// Assembles the model's solids into one export mesh.
pub fn assemble_model(
    output: &ModelOutput,
    config: &BuildConfig,
    progress: &mut dyn ExportProgress,
) -> BuildResult<ExportMesh> {
    let _span = debug_span!("assemble", solids = output.solids.len()).entered();
    assemble(&output.solids, config, progress)
}

/// Assembles and serializes the model as an ASCII STL document.
///
/// `progress` sees every [`ExportStage`] in order, ending with
/// [`ExportStage::Serialize`].
pub fn export_stl(
    output: &ModelOutput,
    name: &str,
    config: &BuildConfig,
    progress: &mut dyn ExportProgress,
) -> BuildResult<String> {
    let merged = assemble_model(output, config, progress)?;
    report(progress, ExportStage::Serialize)?;
    let _span = debug_span!("serialize", triangles = merged.triangle_count()).entered();
    to_stl_string(&merged.mesh, name)
}
