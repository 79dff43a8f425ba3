//! Tests for the centralized configuration constants.

use super::*;

#[test]
fn tolerances_are_ordered() {
    assert!(EPSILON < CONTAINMENT_TOLERANCE * 10.0);
    assert!(WELD_TOLERANCE > EPSILON);
    assert!(DEGENERATE_AREA_EPSILON < WELD_TOLERANCE);
    assert!(BARYCENTRIC_EPSILON < BARYCENTRIC_TOLERANCE);
}

#[test]
fn base_overlap_exceeds_one() {
    assert!(BASE_OVERLAP_FACTOR > 1.0);
    assert!(BASE_OVERLAP_FACTOR < 1.1, "overlap should stay a small margin");
}

#[test]
fn request_limits_are_consistent() {
    assert!(MIN_MODEL_WIDTH < DEFAULT_MODEL_WIDTH);
    assert!(DEFAULT_MODEL_WIDTH < MAX_MODEL_WIDTH);
    assert!(MAX_ELEVATION_MULTIPLIER > 1.0);
    assert_eq!(MIN_TRACK_POINTS, 2);
}

#[test]
fn approx_helpers_follow_epsilon() {
    assert!(approx_equal(1.0, 1.0 + EPSILON / 2.0));
    assert!(!approx_equal(1.0, 1.0 + EPSILON * 2.0));
    assert!(approx_zero(-EPSILON / 2.0));
    assert!(!approx_zero(0.1));
}
