//! Immutable build configuration passed explicitly into every builder.
//!
//! Two configurations can coexist in the same process without touching
//! shared state, which keeps tests of alternative settings independent.

use std::fmt;

use crate::constants::*;

/// Immutable snapshot of every tunable the geometry core reads.
///
/// # Examples
/// ```
/// use config::BuildConfig;
/// let cfg = BuildConfig::default();
/// assert!(cfg.base_overlap_factor > 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildConfig {
    /// Base thickness below the lowest terrain vertex.
    pub base_thickness: f64,
    /// Outline scale of the base plate (> 1.0).
    pub base_overlap_factor: f64,
    /// Thickness of the base plate below `base_z`.
    pub base_plate_thickness: f64,
    /// Path centerline offset above the terrain.
    pub path_z_offset: f64,
    /// Path tube radius.
    pub path_radius: f64,
    /// Path tube side count.
    pub path_segments: u32,
    /// Segment count for circular outlines.
    pub circle_segments: u32,
    /// Height / width ratio of the rectangle shape.
    pub rectangle_aspect: f64,
    /// Vertex weld distance used by the assembler.
    pub weld_tolerance: f64,
    /// Minimum kept triangle area.
    pub degenerate_area_epsilon: f64,
    /// Target terrain vertex count in low-detail mode.
    pub low_detail_target_points: usize,
    /// Cell elevation range that keeps both extremes in low-detail mode.
    pub low_detail_elevation_threshold: f64,
    /// Track point cap in low-detail mode.
    pub low_detail_max_track_points: usize,
    /// Every n-th low-detail track point skips interpolation.
    pub low_detail_raw_every: usize,
    /// Platform width relative to the shape's bounding radius.
    pub platform_width_factor: f64,
    /// Platform depth relative to the shape's bounding radius.
    pub platform_depth_factor: f64,
    /// Platform distance from the shape's lower edge relative to the radius.
    pub platform_margin_factor: f64,
    /// Platform top height above the highest terrain vertex.
    pub platform_clearance: f64,
    /// Buffer around the platform used when testing path overlap.
    pub platform_path_buffer: f64,
    /// Initial text size relative to the platform depth.
    pub text_size_factor: f64,
    /// Maximum text width relative to the platform width.
    pub text_max_width_ratio: f64,
    /// Maximum text height relative to the platform depth.
    pub text_max_height_ratio: f64,
    /// Glyph extrusion height above the platform.
    pub text_emboss_height: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            base_thickness: BASE_THICKNESS,
            base_overlap_factor: BASE_OVERLAP_FACTOR,
            base_plate_thickness: BASE_PLATE_THICKNESS,
            path_z_offset: PATH_Z_OFFSET,
            path_radius: PATH_RADIUS,
            path_segments: PATH_SEGMENTS,
            circle_segments: CIRCLE_SEGMENTS,
            rectangle_aspect: RECTANGLE_ASPECT,
            weld_tolerance: WELD_TOLERANCE,
            degenerate_area_epsilon: DEGENERATE_AREA_EPSILON,
            low_detail_target_points: LOW_DETAIL_TARGET_POINTS,
            low_detail_elevation_threshold: LOW_DETAIL_ELEVATION_THRESHOLD,
            low_detail_max_track_points: LOW_DETAIL_MAX_TRACK_POINTS,
            low_detail_raw_every: LOW_DETAIL_RAW_EVERY,
            platform_width_factor: PLATFORM_WIDTH_FACTOR,
            platform_depth_factor: PLATFORM_DEPTH_FACTOR,
            platform_margin_factor: PLATFORM_MARGIN_FACTOR,
            platform_clearance: PLATFORM_CLEARANCE,
            platform_path_buffer: PLATFORM_PATH_BUFFER,
            text_size_factor: TEXT_SIZE_FACTOR,
            text_max_width_ratio: TEXT_MAX_WIDTH_RATIO,
            text_max_height_ratio: TEXT_MAX_HEIGHT_RATIO,
            text_emboss_height: TEXT_EMBOSS_HEIGHT,
        }
    }
}

impl BuildConfig {
    /// Starts a builder seeded with the default values.
    ///
    /// # Examples
    /// ```
    /// use config::BuildConfig;
    /// let cfg = BuildConfig::builder().path_radius(0.8).build().expect("valid config");
    /// assert_eq!(cfg.path_radius, 0.8);
    /// ```
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder {
            config: Self::default(),
        }
    }

    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("base_thickness", self.base_thickness)?;
        positive("base_plate_thickness", self.base_plate_thickness)?;
        positive("path_radius", self.path_radius)?;
        positive("rectangle_aspect", self.rectangle_aspect)?;
        positive("weld_tolerance", self.weld_tolerance)?;
        positive("degenerate_area_epsilon", self.degenerate_area_epsilon)?;
        positive("platform_width_factor", self.platform_width_factor)?;
        positive("platform_depth_factor", self.platform_depth_factor)?;
        positive("text_size_factor", self.text_size_factor)?;
        positive("text_emboss_height", self.text_emboss_height)?;
        non_negative("path_z_offset", self.path_z_offset)?;
        non_negative("platform_margin_factor", self.platform_margin_factor)?;
        non_negative("platform_clearance", self.platform_clearance)?;
        non_negative("platform_path_buffer", self.platform_path_buffer)?;
        non_negative(
            "low_detail_elevation_threshold",
            self.low_detail_elevation_threshold,
        )?;
        ratio("text_max_width_ratio", self.text_max_width_ratio)?;
        ratio("text_max_height_ratio", self.text_max_height_ratio)?;

        if !(self.base_overlap_factor > 1.0 && self.base_overlap_factor.is_finite()) {
            return Err(ConfigError::InvalidOverlapFactor(self.base_overlap_factor));
        }
        if self.path_segments < MIN_SEGMENTS {
            return Err(ConfigError::InvalidSegments(self.path_segments));
        }
        if self.circle_segments < MIN_SEGMENTS {
            return Err(ConfigError::InvalidSegments(self.circle_segments));
        }
        if self.low_detail_target_points == 0 {
            return Err(ConfigError::InvalidCount("low_detail_target_points"));
        }
        if self.low_detail_max_track_points < MIN_TRACK_POINTS {
            return Err(ConfigError::InvalidCount("low_detail_max_track_points"));
        }
        if self.low_detail_raw_every < 2 {
            return Err(ConfigError::InvalidCount("low_detail_raw_every"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn ratio(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRatio { field, value })
    }
}

/// Builder for [`BuildConfig`] that validates on [`build`](Self::build).
#[derive(Debug, Clone, Copy)]
pub struct BuildConfigBuilder {
    config: BuildConfig,
}

macro_rules! setters {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Sets `", stringify!($name), "`.")]
            pub fn $name(mut self, value: $ty) -> Self {
                self.config.$name = value;
                self
            }
        )*
    };
}

impl BuildConfigBuilder {
    setters! {
        base_thickness: f64,
        base_overlap_factor: f64,
        base_plate_thickness: f64,
        path_z_offset: f64,
        path_radius: f64,
        path_segments: u32,
        circle_segments: u32,
        rectangle_aspect: f64,
        weld_tolerance: f64,
        degenerate_area_epsilon: f64,
        low_detail_target_points: usize,
        low_detail_elevation_threshold: f64,
        low_detail_max_track_points: usize,
        low_detail_raw_every: usize,
        platform_width_factor: f64,
        platform_depth_factor: f64,
        platform_margin_factor: f64,
        platform_clearance: f64,
        platform_path_buffer: f64,
        text_size_factor: f64,
        text_max_width_ratio: f64,
        text_max_height_ratio: f64,
        text_emboss_height: f64,
    }

    /// Validates and returns the configuration.
    ///
    /// # Examples
    /// ```
    /// use config::{BuildConfig, ConfigError};
    /// let err = BuildConfig::builder().path_segments(2).build().unwrap_err();
    /// assert_eq!(err, ConfigError::InvalidSegments(2));
    /// ```
    pub fn build(self) -> Result<BuildConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A length or factor that must be strictly positive was not.
    NotPositive { field: &'static str, value: f64 },
    /// A value that must be zero or positive was negative.
    Negative { field: &'static str, value: f64 },
    /// A ratio outside `(0, 1]`.
    InvalidRatio { field: &'static str, value: f64 },
    /// Base overlap factor below 1.0.
    InvalidOverlapFactor(f64),
    /// Segment count too small to form a polygon.
    InvalidSegments(u32),
    /// A count that is zero or too small to be useful.
    InvalidCount(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotPositive { field, value } => {
                write!(f, "{field} must be positive: {value}")
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{field} must not be negative: {value}")
            }
            ConfigError::InvalidRatio { field, value } => {
                write!(f, "{field} must be within (0, 1]: {value}")
            }
            ConfigError::InvalidOverlapFactor(value) => {
                write!(f, "base_overlap_factor must be > 1.0: {value}")
            }
            ConfigError::InvalidSegments(value) => {
                write!(f, "segment count must be >= {MIN_SEGMENTS}: {value}")
            }
            ConfigError::InvalidCount(field) => write!(f, "{field} is too small"),
        }
    }
}

impl std::error::Error for ConfigError {}
