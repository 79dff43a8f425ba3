//! Geographic bounds and the evenly spaced sample grid handed to the
//! elevation service.

use pipeline_types::GeoPoint;

/// Axis-aligned latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Smallest bounds containing every point, or `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        for p in iter {
            bounds.min_lat = bounds.min_lat.min(p.lat);
            bounds.max_lat = bounds.max_lat.max(p.lat);
            bounds.min_lon = bounds.min_lon.min(p.lon);
            bounds.max_lon = bounds.max_lon.max(p.lon);
        }
        Some(bounds)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Grows each side by `factor` times the extent, keeping the center.
    ///
    /// ```
    /// use trail_mesh::projection::GeoBounds;
    /// let b = GeoBounds { min_lat: 0.0, max_lat: 1.0, min_lon: 0.0, max_lon: 2.0 };
    /// let p = b.padded(0.2);
    /// assert!((p.min_lat + 0.2).abs() < 1e-12);
    /// assert!((p.max_lon - 2.4).abs() < 1e-12);
    /// ```
    pub fn padded(&self, factor: f64) -> Self {
        let center = self.center();
        let half_lat = (self.max_lat - self.min_lat) * (1.0 + 2.0 * factor) / 2.0;
        let half_lon = (self.max_lon - self.min_lon) * (1.0 + 2.0 * factor) / 2.0;
        Self {
            min_lat: center.lat - half_lat,
            max_lat: center.lat + half_lat,
            min_lon: center.lon - half_lon,
            max_lon: center.lon + half_lon,
        }
    }

    /// Row-major `resolution × resolution` grid, south to north, west to
    /// east, including both edges.
    pub fn sample_grid(&self, resolution: usize) -> Vec<GeoPoint> {
        let lats = linspace(self.min_lat, self.max_lat, resolution);
        let lons = linspace(self.min_lon, self.max_lon, resolution);
        lats.iter()
            .flat_map(|&lat| lons.iter().map(move |&lon| GeoPoint::new(lat, lon)))
            .collect()
    }
}

/// `num` evenly spaced values from `start` to `stop` inclusive; a single
/// value yields the midpoint.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    if num <= 1 {
        return vec![(start + stop) / 2.0];
    }
    let last = num - 1;
    let step = (stop - start) / last as f64;
    (0..num)
        .map(|i| if i == last { stop } else { start + i as f64 * step })
        .collect()
}
