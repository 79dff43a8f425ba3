//! # Trail Mesh
//!
//! Turns an elevation grid and a ground track into a watertight,
//! 3D-printable solid and serializes it as ASCII STL.
//!
//! ## Architecture
//!
//! ```text
//! BuildRequest → projection → terrain → track → solids → assemble → export (STL)
//! ```
//!
//! ## Modules
//!
//! - **projection**: geographic ↔ model-space mapping and elevation scaling
//! - **shape**: model outlines (circle, square, hexagon, rectangle, triangle)
//! - **terrain**: filtering, simplification and Delaunay triangulation
//! - **track**: surface lookup and track draping
//! - **solids**: terrain, walls, base, platform, text and path solids
//! - **assemble**: orientation, welding and culling into one mesh
//! - **export**: STL serialization and export file naming
//! - **pipeline**: request validation and orchestration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trail_mesh::{build_model, export_stl, NoProgress};
//!
//! let output = build_model(&request, &BuildConfig::default(), None)?;
//! let stl = export_stl(&output, "ride", &BuildConfig::default(), &mut NoProgress)?;
//! ```

pub mod assemble;
pub mod error;
pub mod export;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod shape;
pub mod solids;
pub mod terrain;
pub mod track;

pub use assemble::{ExportMesh, ExportProgress, NoProgress};
pub use error::{BuildError, BuildResult, ErrorKind};
pub use mesh::Mesh;
pub use pipeline::{
    assemble_model, build_model, export_stl, BuildStats, BuildSupervisor, BuildTicket,
    ModelOutput,
};
pub use solids::{GlyphOutliner, Solid};
