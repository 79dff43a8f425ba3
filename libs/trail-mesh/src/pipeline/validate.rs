//! Request preconditions, checked before any geometry work.

use config::constants::{MAX_ELEVATION_MULTIPLIER, MAX_MODEL_WIDTH, MIN_MODEL_WIDTH, MIN_TRACK_POINTS};
use pipeline_types::BuildRequest;

use crate::error::{BuildError, BuildResult};

/// Rejects requests that cannot produce a model.
///
/// # Errors
///
/// [`BuildError::InvalidInput`] when:
/// - the grid is empty or the track has fewer than two points
/// - the width is outside `MIN_MODEL_WIDTH..=MAX_MODEL_WIDTH`
/// - the multiplier is outside `(0, MAX_ELEVATION_MULTIPLIER]`
/// - a coordinate, the rotation or the platform height is not finite
pub fn validate_request(request: &BuildRequest) -> BuildResult<()> {
    if request.grid.is_empty() {
        return Err(BuildError::invalid_input("no elevation grid samples"));
    }
    if request.track.len() < MIN_TRACK_POINTS {
        return Err(BuildError::invalid_input(format!(
            "track needs at least {MIN_TRACK_POINTS} points, got {}",
            request.track.len()
        )));
    }
    if !(MIN_MODEL_WIDTH..=MAX_MODEL_WIDTH).contains(&request.width) {
        return Err(BuildError::invalid_input(format!(
            "model width {} is outside {MIN_MODEL_WIDTH}..={MAX_MODEL_WIDTH}",
            request.width
        )));
    }
    let multiplier = request.elevation_multiplier;
    if !(multiplier > 0.0 && multiplier <= MAX_ELEVATION_MULTIPLIER) {
        return Err(BuildError::invalid_input(format!(
            "elevation multiplier {multiplier} is outside (0, {MAX_ELEVATION_MULTIPLIER}]"
        )));
    }
    if !request.rotation_degrees.is_finite() {
        return Err(BuildError::invalid_input("rotation must be finite"));
    }
    if let Some(height) = request.platform_height {
        if !(height > 0.0 && height.is_finite()) {
            return Err(BuildError::invalid_input(format!(
                "platform height {height} must be positive"
            )));
        }
    }
    if let Some(i) = request.grid.iter().position(|s| !s.point().is_finite()) {
        return Err(BuildError::invalid_input(format!(
            "grid sample {i} has a non-finite coordinate"
        )));
    }
    if let Some(i) = request.track.iter().position(|s| !s.point().is_finite()) {
        return Err(BuildError::invalid_input(format!(
            "track point {i} has a non-finite coordinate"
        )));
    }
    Ok(())
}
