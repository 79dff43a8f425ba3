//! # Text Platform
//!
//! Rectangular pad near the bottom edge of the outline, sized from the
//! shape's bounding radius:
//!
//! ```text
//!        ┌──────────────── outline ───────────────┐
//!        │                                        │
//!        │     ┌──────── width ────────┐          │
//!        │     │        platform       │ depth    │
//!        │     └───────────────────────┘          │
//!        │                margin                  │
//!        └────────────────────────────────────────┘
//! ```

use config::BuildConfig;
use glam::DVec2;
use pipeline_types::{Orientation, SolidRole};

use super::extrude::{extrude, Polygon2D};
use super::Solid;
use crate::shape::{BoundingBox, Shape};

/// Bisection steps when narrowing the platform to fit the outline.
const FIT_ITERATIONS: u32 = 40;

/// Placement and height of the platform in the local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformLayout {
    pub rect: BoundingBox,
    pub bottom_z: f64,
    pub top_z: f64,
}

impl PlatformLayout {
    /// Lays out the platform for `shape`.
    ///
    /// The top sits `platform_clearance` above the highest terrain point,
    /// or `height` above `base_z` when given. The width is narrowed when
    /// the proportional rectangle would leave the outline.
    pub fn new(
        shape: &Shape,
        base_z: f64,
        terrain_max_z: f64,
        height: Option<f64>,
        config: &BuildConfig,
    ) -> Self {
        let radius = shape.bounding_radius();
        let depth = radius * config.platform_depth_factor;
        let margin = radius * config.platform_margin_factor;
        let bbox = shape.bounding_box();
        let min_y = bbox.min_y + margin;
        let max_y = min_y + depth;
        let width = fit_width(shape, min_y, max_y, radius * config.platform_width_factor);

        let top_z = match height {
            Some(h) => base_z + h,
            None => terrain_max_z + config.platform_clearance,
        };

        Self {
            rect: BoundingBox {
                min_x: -width / 2.0,
                max_x: width / 2.0,
                min_y,
                max_y,
            },
            bottom_z: base_z,
            top_z,
        }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.rect.min_x + self.rect.max_x) / 2.0,
            (self.rect.min_y + self.rect.max_y) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn depth(&self) -> f64 {
        self.rect.height()
    }
}

/// Widest symmetric rectangle between `min_y` and `max_y`, up to
/// `max_width`, whose corners lie inside `shape`.
fn fit_width(shape: &Shape, min_y: f64, max_y: f64, max_width: f64) -> f64 {
    let fits = |width: f64| {
        let half = width / 2.0;
        [min_y, max_y].iter().all(|&y| {
            shape.contains(DVec2::new(half, y)) && shape.contains(DVec2::new(-half, y))
        })
    };
    if fits(max_width) {
        return max_width;
    }
    let (mut lo, mut hi) = (0.0, max_width);
    for _ in 0..FIT_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Platform prism from `bottom_z` to `top_z`.
pub fn build_platform(layout: &PlatformLayout) -> Solid {
    let rect = Polygon2D::rectangle(layout.center(), DVec2::new(layout.width(), layout.depth()));
    Solid::new(
        SolidRole::Platform,
        Orientation::Outward,
        extrude(&rect, layout.bottom_z, layout.top_z),
    )
}

/// Track positions (local frame) on the platform rectangle grown by
/// `buffer`.
pub fn count_path_overlap<I>(layout: &PlatformLayout, track: I, buffer: f64) -> usize
where
    I: IntoIterator<Item = DVec2>,
{
    let area = layout.rect.expanded(buffer);
    track.into_iter().filter(|&p| area.contains(p)).count()
}
