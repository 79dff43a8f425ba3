//! Meters of elevation → output units.

use pipeline_types::GridSample;

/// Maps raw elevations onto the model's z axis.
///
/// The lowest known grid elevation sits at `z = 0`. Missing elevations are
/// treated as that minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationScale {
    min_elevation: f64,
    units_per_meter: f64,
    multiplier: f64,
}

impl ElevationScale {
    pub fn new(min_elevation: f64, units_per_meter: f64, multiplier: f64) -> Self {
        Self {
            min_elevation,
            units_per_meter,
            multiplier,
        }
    }

    /// Uses the lowest finite elevation in `grid`, or 0 when none is known.
    pub fn from_grid(grid: &[GridSample], units_per_meter: f64, multiplier: f64) -> Self {
        let mut min_elevation = f64::INFINITY;
        for e in grid.iter().filter_map(|s| s.elevation) {
            if e.is_finite() && e < min_elevation {
                min_elevation = e;
            }
        }
        if !min_elevation.is_finite() {
            min_elevation = 0.0;
        }
        Self::new(min_elevation, units_per_meter, multiplier)
    }

    pub fn min_elevation(&self) -> f64 {
        self.min_elevation
    }

    /// Output z for a raw elevation in meters.
    pub fn z(&self, elevation: Option<f64>) -> f64 {
        let e = elevation
            .filter(|e| e.is_finite())
            .unwrap_or(self.min_elevation);
        (e - self.min_elevation) * self.units_per_meter * self.multiplier
    }
}
