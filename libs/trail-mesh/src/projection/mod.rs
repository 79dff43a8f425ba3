//! # Point Projector
//!
//! Similarity transform between geographic coordinates and the model plane.
//!
//! ## Frames
//!
//! ```text
//! GeoPoint ──geo_to_local──► local (unrotated) ──rotate──► planar (output)
//! ```
//!
//! All containment tests, triangulation and interpolation happen in the
//! local frame. The forward rotation is applied once, to every emitted
//! solid, through [`PointProjector::output_transform`].

mod bounds;
mod elevation;

pub use bounds::{linspace, GeoBounds};
pub use elevation::ElevationScale;

use crate::error::{BuildError, BuildResult};
use config::constants::METERS_PER_DEGREE;
use glam::{DMat4, DVec2};
use pipeline_types::GeoPoint;

/// Equirectangular projection around a fixed center, scaled to output
/// units, with an optional rotation about the center.
///
/// # Example
///
/// ```rust
/// use trail_mesh::projection::PointProjector;
/// use pipeline_types::GeoPoint;
///
/// let projector = PointProjector::new(GeoPoint::new(46.0, 7.0), 1000.0, 30.0);
/// let p = projector.geo_to_planar(GeoPoint::new(46.0, 7.0));
/// assert_eq!(p.x, 0.0);
/// assert_eq!(p.y, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointProjector {
    center: GeoPoint,
    cos_lat: f64,
    /// Output units per planar degree.
    scale: f64,
    rotation: f64,
    rotation_cos: f64,
    rotation_sin: f64,
}

impl PointProjector {
    /// Creates a projector centered on `center` with `scale` output units
    /// per degree and a counter-clockwise rotation in degrees.
    pub fn new(center: GeoPoint, scale: f64, rotation_degrees: f64) -> Self {
        let rotation = rotation_degrees.to_radians();
        Self {
            center,
            cos_lat: center.lat.to_radians().cos(),
            scale,
            rotation,
            rotation_cos: rotation.cos(),
            rotation_sin: rotation.sin(),
        }
    }

    /// Fits a projector so the larger planar extent of `bounds` spans
    /// `width` output units.
    pub fn fit(bounds: &GeoBounds, width: f64, rotation_degrees: f64) -> BuildResult<Self> {
        let center = bounds.center();
        let cos_lat = center.lat.to_radians().cos();
        let extent_x = (bounds.max_lon - bounds.min_lon) * cos_lat;
        let extent_y = bounds.max_lat - bounds.min_lat;
        let extent = extent_x.max(extent_y);

        if !(extent > 0.0 && extent.is_finite()) {
            return Err(BuildError::invalid_input(
                "grid samples span no geographic area",
            ));
        }

        Ok(Self::new(center, width / extent, rotation_degrees))
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation_radians(&self) -> f64 {
        self.rotation
    }

    /// Output units per meter of elevation.
    pub fn units_per_meter(&self) -> f64 {
        self.scale / METERS_PER_DEGREE
    }

    /// Projects into the unrotated local frame.
    pub fn geo_to_local(&self, p: GeoPoint) -> DVec2 {
        DVec2::new(
            (p.lon - self.center.lon) * self.cos_lat * self.scale,
            (p.lat - self.center.lat) * self.scale,
        )
    }

    /// Inverse of [`geo_to_local`](Self::geo_to_local).
    pub fn local_to_geo(&self, p: DVec2) -> GeoPoint {
        GeoPoint::new(
            self.center.lat + p.y / self.scale,
            self.center.lon + p.x / (self.cos_lat * self.scale),
        )
    }

    /// Projects into the rotated output frame.
    pub fn geo_to_planar(&self, p: GeoPoint) -> DVec2 {
        self.rotate(self.geo_to_local(p))
    }

    /// Inverse of [`geo_to_planar`](Self::geo_to_planar).
    pub fn planar_to_geo(&self, p: DVec2) -> GeoPoint {
        self.local_to_geo(self.unrotate(p))
    }

    /// Local frame → output frame.
    pub fn rotate(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x * self.rotation_cos - p.y * self.rotation_sin,
            p.x * self.rotation_sin + p.y * self.rotation_cos,
        )
    }

    /// Output frame → local frame.
    pub fn unrotate(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x * self.rotation_cos + p.y * self.rotation_sin,
            -p.x * self.rotation_sin + p.y * self.rotation_cos,
        )
    }

    /// Transform attached to every emitted solid.
    pub fn output_transform(&self) -> DMat4 {
        DMat4::from_rotation_z(self.rotation)
    }
}
