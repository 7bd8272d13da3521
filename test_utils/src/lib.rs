//! Utility helpers for tests.
//!
//! Builders for actors, registries and worlds live in [`physics`]; the
//! assertions below compare vectors with an explicit tolerance.
pub mod physics;

use glam::DVec3;

/// Assert that `actual` is within `tolerance` of `expected` on every axis.
///
/// # Panics
/// Panics with both vectors in the message if any component differs by more
/// than `tolerance`.
pub fn assert_vec_near(actual: DVec3, expected: DVec3, tolerance: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff.max_element() <= tolerance,
        "expected {expected} within {tolerance}, got {actual}"
    );
}

/// Assert that every component of `value` is finite.
///
/// # Panics
/// Panics if any component is NaN or infinite.
pub fn assert_finite(value: DVec3) {
    assert!(value.is_finite(), "{value} is not finite");
}
