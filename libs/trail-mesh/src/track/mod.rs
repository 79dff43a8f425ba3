//! # Track Interpolator
//!
//! Drapes the ground track onto the terrain surface.
//!
//! Each track point is projected into the local frame and located in the
//! triangulation by a barycentric sign test. Inside a triangle its height
//! is the weighted vertex height; outside it falls back to the point's own
//! recorded elevation. A constant offset lifts the path above the surface.

mod interpolate;
mod spatial_index;

pub use interpolate::{barycentric, interpolate_track, SurfaceLocator, TrackPoint};
pub use spatial_index::TriangleGrid;
