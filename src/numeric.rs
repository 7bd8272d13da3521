//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between floating-point world
//! coordinates and the integer grid used for block placement.

/// Round a world coordinate to the nearest grid index, clamping into `i32`.
///
/// Halfway values round towards positive infinity, so `-2.5` lands on `-2`.
/// Returns `None` for non-finite input.
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i32 bounds before casting."
)]
#[must_use]
pub fn round_to_grid(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let rounded = (value + 0.5).floor();
    let clamped = rounded.clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    Some(clamped as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.49, Some(0))]
    #[case(0.5, Some(1))]
    #[case(-0.5, Some(0))]
    #[case(-2.5, Some(-2))]
    #[case(-2.51, Some(-3))]
    #[case(-2.7, Some(-3))]
    #[case(1.0e12, Some(i32::MAX))]
    #[case(f64::NAN, None)]
    #[case(f64::INFINITY, None)]
    fn rounds_world_coordinates(#[case] value: f64, #[case] expected: Option<i32>) {
        assert_eq!(round_to_grid(value), expected);
    }
}
