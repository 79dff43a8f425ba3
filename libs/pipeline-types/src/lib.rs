//! Plain data shared between the geometry core and its hosts.
//!
//! Everything here is serializable so the browser façade can hand requests
//! and results across the JavaScript boundary as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Elevation sample of the terrain surface.
///
/// `original_index` is the sample's stable identity. It is assigned once at
/// creation and carried unchanged through filtering and triangulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSample {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    original_index: usize,
}

impl GridSample {
    pub fn new(original_index: usize, lat: f64, lon: f64, elevation: Option<f64>) -> Self {
        Self {
            lat,
            lon,
            elevation,
            original_index,
        }
    }

    /// Creates samples whose identity is their position in `points`.
    ///
    /// ```
    /// use pipeline_types::{GeoPoint, GridSample};
    /// let samples = GridSample::indexed(vec![
    ///     (GeoPoint::new(1.0, 2.0), Some(10.0)),
    ///     (GeoPoint::new(1.5, 2.5), None),
    /// ]);
    /// assert_eq!(samples[1].original_index(), 1);
    /// ```
    pub fn indexed<I>(points: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (GeoPoint, Option<f64>)>,
    {
        points
            .into_iter()
            .enumerate()
            .map(|(i, (p, elevation))| Self::new(i, p.lat, p.lon, elevation))
            .collect()
    }

    pub fn original_index(&self) -> usize {
        self.original_index
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Sample of the ground track. Consumed once, in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
}

impl TrackSample {
    pub fn new(lat: f64, lon: f64, elevation: Option<f64>) -> Self {
        Self {
            lat,
            lon,
            elevation,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Outline of the printed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Hexagon,
    Square,
    Rectangle,
    Circle,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Hexagon,
        ShapeKind::Square,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Triangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Square => "square",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detail level of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    #[default]
    Full,
    /// Lossy terrain simplification and subsampled track interpolation.
    Low,
}

/// Role of a sub-mesh in the assembled model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolidRole {
    Terrain,
    Wall,
    Base,
    Platform,
    Text,
    Path,
}

impl SolidRole {
    /// Compact numeric tag used in flat per-triangle buffers.
    pub fn code(self) -> u8 {
        match self {
            SolidRole::Terrain => 0,
            SolidRole::Wall => 1,
            SolidRole::Base => 2,
            SolidRole::Platform => 3,
            SolidRole::Text => 4,
            SolidRole::Path => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SolidRole::Terrain => "terrain",
            SolidRole::Wall => "wall",
            SolidRole::Base => "base",
            SolidRole::Platform => "platform",
            SolidRole::Text => "text",
            SolidRole::Path => "path",
        }
    }
}

/// Side a sub-mesh's authored winding faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Outward,
    /// Normals point into the solid and must be reversed before export.
    Inward,
}

/// Stages of the export, reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStage {
    Collect,
    Deindex,
    Orient,
    Concatenate,
    Weld,
    Normals,
    Cull,
    Serialize,
}

impl ExportStage {
    pub const ALL: [ExportStage; 8] = [
        ExportStage::Collect,
        ExportStage::Deindex,
        ExportStage::Orient,
        ExportStage::Concatenate,
        ExportStage::Weld,
        ExportStage::Normals,
        ExportStage::Cull,
        ExportStage::Serialize,
    ];

    /// Human-readable progress text.
    pub fn label(self) -> &'static str {
        match self {
            ExportStage::Collect => "Collecting geometry",
            ExportStage::Deindex => "Expanding triangles",
            ExportStage::Orient => "Fixing face orientation",
            ExportStage::Concatenate => "Merging solids",
            ExportStage::Weld => "Welding vertices",
            ExportStage::Normals => "Computing normals",
            ExportStage::Cull => "Removing degenerate triangles",
            ExportStage::Serialize => "Writing STL",
        }
    }
}

/// One model generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub grid: Vec<GridSample>,
    pub track: Vec<TrackSample>,
    /// Target model width in output units (mm).
    pub width: f64,
    pub elevation_multiplier: f64,
    pub shape: ShapeKind,
    #[serde(default)]
    pub rotation_degrees: f64,
    #[serde(default)]
    pub emboss_text: Option<String>,
    /// Absolute platform height above the base plane; derived from the
    /// terrain when absent.
    #[serde(default)]
    pub platform_height: Option<f64>,
    #[serde(default)]
    pub fidelity: Fidelity,
}

/// Non-fatal conditions raised while building the text platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BuildWarning {
    /// Track points fall on (or near) the platform.
    PathOverlapsPlatform { points: usize },
    /// The text was shrunk by `scale` to fit the platform.
    TextScaledToFit { scale: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_round_trips_through_json() {
        let json = r#"{
            "grid": [{"lat": 1.0, "lon": 2.0, "elevation": 5.0, "originalIndex": 0}],
            "track": [{"lat": 1.0, "lon": 2.0, "elevation": null}],
            "width": 100.0,
            "elevationMultiplier": 1.5,
            "shape": "hexagon"
        }"#;
        let request: BuildRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.shape, ShapeKind::Hexagon);
        assert_eq!(request.fidelity, Fidelity::Full);
        assert_eq!(request.rotation_degrees, 0.0);
        assert!(request.emboss_text.is_none());
        assert_eq!(request.grid[0].original_index(), 0);
        assert_eq!(request.track[0].elevation, None);
    }

    #[test]
    fn test_indexed_assigns_positions() {
        let samples = GridSample::indexed((0..4).map(|i| (GeoPoint::new(i as f64, 0.0), None)));
        let indices: Vec<usize> = samples.iter().map(GridSample::original_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_role_codes_are_unique() {
        let roles = [
            SolidRole::Terrain,
            SolidRole::Wall,
            SolidRole::Base,
            SolidRole::Platform,
            SolidRole::Text,
            SolidRole::Path,
        ];
        let mut codes: Vec<u8> = roles.iter().map(|r| r.code()).collect();
        codes.dedup();
        assert_eq!(codes.len(), roles.len());
    }

    #[test]
    fn test_export_stages_are_ordered() {
        assert!(ExportStage::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let json = serde_json::to_string(&BuildWarning::TextScaledToFit { scale: 0.5 }).unwrap();
        assert!(json.contains("\"kind\":\"textScaledToFit\""));
    }
}
