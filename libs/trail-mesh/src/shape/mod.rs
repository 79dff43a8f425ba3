//! # Model Outline
//!
//! Region test for the printable outline. Every shape is centered at the
//! origin of the unrotated local frame; rotation is applied by the caller.
//!
//! Polygonal shapes test containment against their canonical vertex list
//! (boundary inclusive); the circle uses a squared-distance test.

use config::constants::CONTAINMENT_TOLERANCE;
use config::BuildConfig;
use glam::DVec2;
use pipeline_types::ShapeKind;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Axis-aligned 2D bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Returns the box grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_y: self.min_y - margin,
            max_y: self.max_y + margin,
        }
    }
}

/// Model outline in output units.
///
/// # Example
///
/// ```rust
/// use trail_mesh::shape::Shape;
/// use pipeline_types::ShapeKind;
/// use config::BuildConfig;
/// use glam::DVec2;
///
/// let square = Shape::new(ShapeKind::Square, 20.0, &BuildConfig::default());
/// assert!(square.contains(DVec2::new(9.0, -9.0)));
/// assert!(!square.contains(DVec2::new(11.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Regular hexagon with flat top and bottom edges.
    Hexagon { radius: f64 },
    Square { half_side: f64 },
    Rectangle { half_width: f64, half_height: f64 },
    Circle { radius: f64 },
    /// Equilateral triangle pointing up, flat bottom edge.
    Triangle { radius: f64 },
}

impl Shape {
    /// Creates the outline of `kind` spanning `width` along the x axis.
    pub fn new(kind: ShapeKind, width: f64, config: &BuildConfig) -> Self {
        let half = width / 2.0;
        match kind {
            ShapeKind::Hexagon => Shape::Hexagon { radius: half },
            ShapeKind::Square => Shape::Square { half_side: half },
            ShapeKind::Rectangle => Shape::Rectangle {
                half_width: half,
                half_height: half * config.rectangle_aspect,
            },
            ShapeKind::Circle => Shape::Circle { radius: half },
            ShapeKind::Triangle => Shape::Triangle { radius: half },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Hexagon { .. } => ShapeKind::Hexagon,
            Shape::Square { .. } => ShapeKind::Square,
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Triangle { .. } => ShapeKind::Triangle,
        }
    }

    /// Returns true when `p` lies inside or on the boundary.
    pub fn contains(&self, p: DVec2) -> bool {
        match *self {
            Shape::Circle { radius } => {
                let limit = radius + CONTAINMENT_TOLERANCE;
                p.length_squared() <= limit * limit
            }
            Shape::Square { half_side } => {
                p.x.abs() <= half_side + CONTAINMENT_TOLERANCE
                    && p.y.abs() <= half_side + CONTAINMENT_TOLERANCE
            }
            Shape::Rectangle {
                half_width,
                half_height,
            } => {
                p.x.abs() <= half_width + CONTAINMENT_TOLERANCE
                    && p.y.abs() <= half_height + CONTAINMENT_TOLERANCE
            }
            Shape::Hexagon { .. } | Shape::Triangle { .. } => {
                polygon_contains(&self.vertices(), p)
            }
        }
    }

    /// Canonical counter-clockwise vertex list; empty for the circle.
    pub fn vertices(&self) -> Vec<DVec2> {
        match *self {
            Shape::Hexagon { radius } => regular_polygon(radius, 6, 0.0),
            Shape::Square { half_side } => rectangle(half_side, half_side),
            Shape::Rectangle {
                half_width,
                half_height,
            } => rectangle(half_width, half_height),
            Shape::Circle { .. } => Vec::new(),
            Shape::Triangle { radius } => regular_polygon(radius, 3, FRAC_PI_2),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match *self {
            Shape::Circle { radius } => BoundingBox {
                min_x: -radius,
                max_x: radius,
                min_y: -radius,
                max_y: radius,
            },
            Shape::Square { half_side } => BoundingBox {
                min_x: -half_side,
                max_x: half_side,
                min_y: -half_side,
                max_y: half_side,
            },
            Shape::Rectangle {
                half_width,
                half_height,
            } => BoundingBox {
                min_x: -half_width,
                max_x: half_width,
                min_y: -half_height,
                max_y: half_height,
            },
            Shape::Hexagon { radius } => {
                let half_height = radius * (PI / 3.0).sin();
                BoundingBox {
                    min_x: -radius,
                    max_x: radius,
                    min_y: -half_height,
                    max_y: half_height,
                }
            }
            Shape::Triangle { radius } => {
                let half_base = radius * (PI / 3.0).sin();
                BoundingBox {
                    min_x: -half_base,
                    max_x: half_base,
                    min_y: -radius / 2.0,
                    max_y: radius,
                }
            }
        }
    }

    /// Distance from the origin to the farthest boundary point.
    pub fn bounding_radius(&self) -> f64 {
        match *self {
            Shape::Hexagon { radius } | Shape::Circle { radius } | Shape::Triangle { radius } => {
                radius
            }
            Shape::Square { half_side } => half_side * std::f64::consts::SQRT_2,
            Shape::Rectangle {
                half_width,
                half_height,
            } => half_width.hypot(half_height),
        }
    }

    /// Boundary polygon: the vertex list, or a `segments`-gon for the circle.
    pub fn outline(&self, segments: u32) -> Vec<DVec2> {
        match *self {
            Shape::Circle { radius } => regular_polygon(radius, segments.max(3), 0.0),
            _ => self.vertices(),
        }
    }
}

fn regular_polygon(radius: f64, sides: u32, start_angle: f64) -> Vec<DVec2> {
    (0..sides)
        .map(|i| {
            let angle = start_angle + TAU * i as f64 / sides as f64;
            DVec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn rectangle(half_width: f64, half_height: f64) -> Vec<DVec2> {
    vec![
        DVec2::new(-half_width, -half_height),
        DVec2::new(half_width, -half_height),
        DVec2::new(half_width, half_height),
        DVec2::new(-half_width, half_height),
    ]
}

/// Even-odd ray casting with an inclusive boundary band.
pub fn polygon_contains(polygon: &[DVec2], p: DVec2) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];

        if distance_to_segment(p, a, b) <= CONTAINMENT_TOLERANCE {
            return true;
        }

        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Signed area of a closed ring; positive for counter-clockwise order.
pub fn signed_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        twice += a.perp_dot(b);
    }
    twice / 2.0
}

#[cfg(test)]
mod tests;
