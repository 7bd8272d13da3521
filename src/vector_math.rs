//! Basic vector math helper functions.
//! Small helpers for safe normalisation and planar measurements.
use glam::{DVec2, DVec3};

/// Returns the unit vector in the direction of `vector`, or `fallback` when
/// the input is non-finite or too short to normalise.
///
/// # Examples
///
/// ```
/// use glam::DVec3;
/// use feltcraft::vector_math::normalize_or;
/// let unit = normalize_or(DVec3::new(3.0, 0.0, 4.0), DVec3::X);
/// assert!((unit.x - 0.6).abs() < 1e-12);
/// assert!((unit.z - 0.8).abs() < 1e-12);
///
/// assert_eq!(normalize_or(DVec3::ZERO, DVec3::X), DVec3::X);
/// ```
#[must_use]
pub fn normalize_or(vector: DVec3, fallback: DVec3) -> DVec3 {
    if !vector.is_finite() {
        return fallback;
    }
    vector.try_normalize().unwrap_or(fallback)
}

/// Projects a vector onto the XZ plane.
#[must_use]
pub const fn planar(vector: DVec3) -> DVec2 {
    DVec2::new(vector.x, vector.z)
}

/// Forward and right basis vectors for a yaw angle about +Y.
///
/// Yaw zero faces `-Z` with `+X` to the right; positive yaw turns
/// counter-clockwise when viewed from above.
#[must_use]
pub fn yaw_basis(yaw: f64) -> (DVec3, DVec3) {
    let (sin, cos) = yaw.sin_cos();
    let forward = DVec3::new(-sin, 0.0, -cos);
    let right = DVec3::new(cos, 0.0, -sin);
    (forward, right)
}
