//! # Config Crate
//!
//! Centralized configuration for the trail model pipeline. Every magic
//! number used by the geometry core lives in [`constants`], and the
//! immutable [`BuildConfig`] snapshot carries them into each builder.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{BASE_THICKNESS, EPSILON};
//! use config::BuildConfig;
//!
//! let cfg = BuildConfig::default();
//! assert_eq!(cfg.base_thickness, BASE_THICKNESS);
//!
//! let thick = BuildConfig::builder().base_thickness(4.0).build().unwrap();
//! assert!((thick.base_thickness - 4.0).abs() < EPSILON);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Explicit**: Builders receive a `BuildConfig`, never global state
//! - **Browser-Safe**: No platform-specific values

pub mod build_config;
pub mod constants;

pub use build_config::{BuildConfig, BuildConfigBuilder, ConfigError};
