//! # Solid Builders
//!
//! Sub-meshes that, together with the terrain surface, close the model:
//!
//! - **base**: slab under the whole model, its top face on `base_z`
//! - **walls**: skirt from the terrain hull down to `base_z`
//! - **platform**: rectangular pad carrying the embossed text
//! - **text**: extruded glyph outlines on top of the platform
//! - **path**: tube following the draped track
//!
//! Every builder works in the unrotated local frame. The caller attaches
//! the output transform.

pub mod base;
pub mod extrude;
pub mod path;
pub mod platform;
pub mod text;
pub mod walls;

pub use base::build_base;
pub use path::build_path;
pub use platform::{build_platform, count_path_overlap, PlatformLayout};
pub use text::{build_text, GlyphOutliner, TextSolid};
pub use walls::build_walls;

use crate::mesh::Mesh;
use crate::terrain::Triangulation;
use glam::DMat4;
use pipeline_types::{Orientation, SolidRole};

/// A tagged sub-mesh of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub role: SolidRole,
    /// Side the authored winding faces.
    pub orientation: Orientation,
    pub mesh: Mesh,
    /// World transform applied at assembly.
    pub transform: DMat4,
}

impl Solid {
    pub fn new(role: SolidRole, orientation: Orientation, mesh: Mesh) -> Self {
        Self {
            role,
            orientation,
            mesh,
            transform: DMat4::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: DMat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// Terrain surface solid, normals up.
pub fn build_terrain(triangulation: &Triangulation) -> Solid {
    Solid::new(
        SolidRole::Terrain,
        Orientation::Outward,
        triangulation.to_mesh(),
    )
}

#[cfg(test)]
mod tests;
