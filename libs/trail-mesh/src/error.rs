//! # Build Errors
//!
//! Typed failures of the trail model pipeline. Every error carries a
//! [`ErrorKind`] so callers can tell "fix the parameters" apart from
//! "nothing to build".
//!
//! Geometric degeneracy (zero-area triangles, singular barycentric systems)
//! is never an error: the offending element is skipped where it occurs.

use pipeline_types::ExportStage;
use thiserror::Error;

/// Coarse classification of a [`BuildError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or out-of-range input, detected before any geometry work.
    Precondition,
    /// Input was valid but produced no printable geometry.
    EmptyResult,
    /// An external capability or the serializer failed.
    Downstream,
    /// A progress callback refused to continue.
    Aborted,
}

/// Errors that can occur while building or exporting a model.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid request parameters or configuration.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// No geometry survived filtering or assembly.
    #[error("Empty result: {message}")]
    EmptyResult { message: String },

    /// The glyph outline capability failed.
    #[error("Glyph outline failed: {message}")]
    Glyph { message: String },

    /// Writing the export buffer failed.
    #[error("Export failed: {message}")]
    Export { message: String },

    /// A progress callback aborted the export.
    #[error("Export aborted at {stage:?}: {message}")]
    Aborted { stage: ExportStage, message: String },
}

impl BuildError {
    /// Creates a precondition error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an empty-result error.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::EmptyResult {
            message: message.into(),
        }
    }

    /// Creates a glyph capability error.
    pub fn glyph(message: impl Into<String>) -> Self {
        Self::Glyph {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// Returns the error's kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::InvalidInput { .. } => ErrorKind::Precondition,
            BuildError::EmptyResult { .. } => ErrorKind::EmptyResult,
            BuildError::Glyph { .. } | BuildError::Export { .. } => ErrorKind::Downstream,
            BuildError::Aborted { .. } => ErrorKind::Aborted,
        }
    }
}

impl From<config::ConfigError> for BuildError {
    fn from(err: config::ConfigError) -> Self {
        Self::invalid_input(err.to_string())
    }
}

/// Result type alias for pipeline operations.
pub type BuildResult<T> = Result<T, BuildError>;
