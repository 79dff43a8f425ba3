use config::constants::{BARYCENTRIC_EPSILON, BARYCENTRIC_TOLERANCE};
use config::BuildConfig;
use glam::{DVec2, DVec3};
use pipeline_types::{Fidelity, TrackSample};

use super::TriangleGrid;
use crate::projection::{ElevationScale, PointProjector};
use crate::terrain::Triangulation;

/// Barycentric weights `(wa, wb, wc)` of `p` in triangle `abc`.
///
/// Returns `None` for a (near-)singular triangle.
///
/// ```
/// use trail_mesh::track::barycentric;
/// use glam::DVec2;
///
/// let w = barycentric(
///     DVec2::new(1.0, 1.0),
///     DVec2::new(0.0, 0.0),
///     DVec2::new(3.0, 0.0),
///     DVec2::new(0.0, 3.0),
/// )
/// .unwrap();
/// assert!((w.x + w.y + w.z - 1.0).abs() < 1e-12);
/// ```
pub fn barycentric(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> Option<DVec3> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let det = v0.perp_dot(v1);
    if det.abs() < BARYCENTRIC_EPSILON {
        return None;
    }
    let wb = v2.perp_dot(v1) / det;
    let wc = v0.perp_dot(v2) / det;
    Some(DVec3::new(1.0 - wb - wc, wb, wc))
}

/// Point-in-triangle lookup over a triangulation.
#[derive(Debug, Clone)]
pub struct SurfaceLocator<'a> {
    triangulation: &'a Triangulation,
    index: TriangleGrid,
}

impl<'a> SurfaceLocator<'a> {
    pub fn new(triangulation: &'a Triangulation) -> Self {
        Self {
            triangulation,
            index: TriangleGrid::new(triangulation),
        }
    }

    /// First triangle (lowest index) containing `p`, with its weights.
    pub fn locate(&self, p: DVec2) -> Option<(usize, DVec3)> {
        self.index.candidates(p).iter().find_map(|&t| {
            let [a, b, c] = self.triangulation.triangle_positions(t);
            let w = barycentric(p, a.truncate(), b.truncate(), c.truncate())?;
            (w.min_element() >= -BARYCENTRIC_TOLERANCE).then_some((t, w))
        })
    }

    /// Interpolated surface height at `p`, if `p` is on the surface.
    pub fn elevation_at(&self, p: DVec2) -> Option<f64> {
        let (t, w) = self.locate(p)?;
        let [a, b, c] = self.triangulation.triangle_positions(t);
        Some(w.x * a.z + w.y * b.z + w.z * c.z)
    }
}

/// A draped track point in the local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub position: DVec3,
    /// False when the recorded elevation was used.
    pub interpolated: bool,
}

/// Projects and drapes `track` onto the surface.
///
/// In [`Fidelity::Low`] the track is subsampled with a stride that caps it at
/// `low_detail_max_track_points` (plus the last point, always kept), and every
/// `low_detail_raw_every`-th kept point uses its recorded elevation
/// without a surface lookup.
pub fn interpolate_track(
    track: &[TrackSample],
    triangulation: &Triangulation,
    projector: &PointProjector,
    elevation: &ElevationScale,
    fidelity: Fidelity,
    config: &BuildConfig,
) -> Vec<TrackPoint> {
    let locator = SurfaceLocator::new(triangulation);
    let selected = select_points(track, fidelity, config.low_detail_max_track_points);
    let raw_every = config.low_detail_raw_every.max(1);

    selected
        .iter()
        .enumerate()
        .map(|(k, sample)| {
            let xy = projector.geo_to_local(sample.point());
            let skip_lookup = fidelity == Fidelity::Low && k % raw_every == raw_every - 1;
            let surface = if skip_lookup {
                None
            } else {
                locator.elevation_at(xy)
            };
            let interpolated = surface.is_some();
            let z = surface.unwrap_or_else(|| elevation.z(sample.elevation));
            TrackPoint {
                position: xy.extend(z + config.path_z_offset),
                interpolated,
            }
        })
        .collect()
}

fn select_points(track: &[TrackSample], fidelity: Fidelity, cap: usize) -> Vec<TrackSample> {
    if fidelity == Fidelity::Full || cap == 0 || track.len() <= cap {
        return track.to_vec();
    }
    let stride = track.len().div_ceil(cap);
    let mut selected: Vec<TrackSample> = track.iter().step_by(stride).copied().collect();
    if (track.len() - 1) % stride != 0 {
        if let Some(last) = track.last() {
            selected.push(*last);
        }
    }
    selected
}
