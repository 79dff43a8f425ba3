//! # Configuration Constants
//!
//! Centralized constants for the trail model pipeline. Geometry tolerances,
//! solid dimensions, simplification parameters and request limits are
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Solids**: Base, path and platform dimensions in output units (mm)
//! - **Detail**: Low-detail simplification parameters
//! - **Limits**: Accepted ranges for request parameters

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Distance below which two exported vertices are welded into one.
///
/// Seams between sub-meshes (wall/base, terrain/wall) are closed by this
/// weld, so it must exceed the numerical noise of the builders while staying
/// far below printable feature size.
///
/// # Example
///
/// ```rust
/// use config::constants::{EPSILON, WELD_TOLERANCE};
/// assert!(WELD_TOLERANCE > EPSILON);
/// ```
pub const WELD_TOLERANCE: f64 = 1e-4;

/// Minimum triangle area kept in the exported mesh.
///
/// Triangles collapsed by welding or built from zero-thickness input fall
/// below this threshold and are discarded.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-9;

/// Minimum absolute barycentric determinant.
///
/// Triangles whose 2D determinant is smaller than this are skipped during
/// interpolation instead of dividing by (nearly) zero.
pub const BARYCENTRIC_EPSILON: f64 = 1e-12;

/// Slack allowed on barycentric weights so points on shared edges are found.
pub const BARYCENTRIC_TOLERANCE: f64 = 1e-9;

/// Distance from a shape boundary that still counts as inside.
///
/// # Example
///
/// ```rust
/// use config::constants::CONTAINMENT_TOLERANCE;
/// let on_edge = (10.0_f64 - 10.0).abs() <= CONTAINMENT_TOLERANCE;
/// assert!(on_edge);
/// ```
pub const CONTAINMENT_TOLERANCE: f64 = 1e-9;

// =============================================================================
// PROJECTION CONSTANTS
// =============================================================================

/// Approximate length of one degree of latitude in meters.
///
/// Converts sample elevations (meters) into the planar unit of the
/// projection (degrees) before output scaling.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

// =============================================================================
// SOLID CONSTANTS
// =============================================================================

/// Thickness of the base below the lowest terrain vertex.
///
/// # Example
///
/// ```rust
/// use config::constants::BASE_THICKNESS;
///
/// let terrain_min_z = 0.0;
/// let base_z = terrain_min_z - BASE_THICKNESS;
/// assert_eq!(base_z, -2.0);
/// ```
pub const BASE_THICKNESS: f64 = 2.0;

/// Scale applied to the shape outline when building the base plate.
///
/// Slightly above 1.0 so the base always covers the filtered terrain
/// footprint despite triangulation edge effects.
pub const BASE_OVERLAP_FACTOR: f64 = 1.01;

/// Thickness of the base plate, which hangs below the base plane.
pub const BASE_PLATE_THICKNESS: f64 = 0.6;

/// Height of the path centerline above the interpolated terrain surface.
pub const PATH_Z_OFFSET: f64 = 0.5;

/// Radius of the path tube.
pub const PATH_RADIUS: f64 = 0.5;

/// Number of sides of the path tube cross-section.
pub const PATH_SEGMENTS: u32 = 8;

/// Number of segments approximating circular outlines.
pub const CIRCLE_SEGMENTS: u32 = 96;

/// Height / width ratio of the rectangle shape.
pub const RECTANGLE_ASPECT: f64 = 0.7;

/// Minimum number of segments of any polygonal approximation.
pub const MIN_SEGMENTS: u32 = 3;

// =============================================================================
// PLATFORM AND TEXT CONSTANTS
// =============================================================================

/// Platform width as a fraction of the shape's bounding radius.
pub const PLATFORM_WIDTH_FACTOR: f64 = 0.9;

/// Platform depth as a fraction of the shape's bounding radius.
pub const PLATFORM_DEPTH_FACTOR: f64 = 0.2;

/// Gap between the platform and the shape's lower edge, as a fraction of
/// the bounding radius.
pub const PLATFORM_MARGIN_FACTOR: f64 = 0.08;

/// Height of the platform top above the highest terrain vertex.
pub const PLATFORM_CLEARANCE: f64 = 1.0;

/// Safety buffer around the platform rectangle used for path overlap tests.
pub const PLATFORM_PATH_BUFFER: f64 = 1.0;

/// Initial text size as a fraction of the platform depth.
pub const TEXT_SIZE_FACTOR: f64 = 0.6;

/// Largest fraction of the platform width the text may occupy.
///
/// # Example
///
/// ```rust
/// use config::constants::TEXT_MAX_WIDTH_RATIO;
///
/// let platform_width = 40.0;
/// let text_width = 39.0;
/// assert!(text_width > platform_width * TEXT_MAX_WIDTH_RATIO);
/// ```
pub const TEXT_MAX_WIDTH_RATIO: f64 = 0.95;

/// Largest fraction of the platform depth the text may occupy.
pub const TEXT_MAX_HEIGHT_RATIO: f64 = 0.8;

/// Height of the embossed glyphs above the platform top.
pub const TEXT_EMBOSS_HEIGHT: f64 = 1.0;

// =============================================================================
// DETAIL CONSTANTS
// =============================================================================

/// Target number of terrain vertices kept by low-detail simplification.
pub const LOW_DETAIL_TARGET_POINTS: usize = 4_000;

/// Elevation range inside a simplification cell above which both the
/// lowest and the highest vertex are kept.
pub const LOW_DETAIL_ELEVATION_THRESHOLD: f64 = 0.5;

/// Maximum number of track points processed in low-detail mode.
pub const LOW_DETAIL_MAX_TRACK_POINTS: usize = 1_000;

/// In low-detail mode every n-th track point keeps its raw elevation
/// instead of being interpolated.
pub const LOW_DETAIL_RAW_EVERY: usize = 4;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Smallest accepted model width.
pub const MIN_MODEL_WIDTH: f64 = 10.0;

/// Largest accepted model width.
pub const MAX_MODEL_WIDTH: f64 = 500.0;

/// Default model width.
pub const DEFAULT_MODEL_WIDTH: f64 = 100.0;

/// Largest accepted elevation multiplier.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_ELEVATION_MULTIPLIER;
///
/// let requested = 20.0;
/// assert!(requested > MAX_ELEVATION_MULTIPLIER);
/// ```
pub const MAX_ELEVATION_MULTIPLIER: f64 = 15.0;

/// Minimum number of track points required to build a path.
pub const MIN_TRACK_POINTS: usize = 2;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

#[cfg(test)]
mod tests;
