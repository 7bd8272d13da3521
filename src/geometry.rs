//! Axis-aligned bounding boxes and the tests performed on them.
//!
//! Every collision query in the integrator reduces to [`Aabb::intersects`].
//! Boxes are built fresh per query from an object's centre and half extents,
//! so they carry no identity of their own.

use glam::DVec3;

/// Axis-aligned bounding box with `min <= max` on every axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

/// Where a ray first enters a box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the (unit) ray direction.
    pub distance: f64,
    /// World-space hit point.
    pub point: DVec3,
    /// Outward normal of the face that was hit.
    pub normal: DVec3,
}

impl Aabb {
    /// Builds a box from two corners, reordering components so `min <= max`.
    #[must_use]
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Builds a box centred on `center` with the given half extents.
    ///
    /// # Examples
    ///
    /// ```
    /// use glam::DVec3;
    /// use feltcraft::geometry::Aabb;
    /// let cube = Aabb::from_center_half_extents(DVec3::ZERO, DVec3::splat(0.5));
    /// assert_eq!(cube.top(), 0.5);
    /// assert_eq!(cube.bottom(), -0.5);
    /// ```
    #[must_use]
    pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Builds the box of an upright actor standing with its feet at `feet`.
    #[must_use]
    pub fn from_feet(feet: DVec3, radius: f64, height: f64) -> Self {
        Self::new(
            DVec3::new(feet.x - radius, feet.y, feet.z - radius),
            DVec3::new(feet.x + radius, feet.y + height, feet.z + radius),
        )
    }

    /// Closed-interval overlap test on all three axes.
    ///
    /// Touching faces count as intersecting.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Height of the upper face.
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.max.y
    }

    /// Height of the lower face.
    #[must_use]
    pub const fn bottom(&self) -> f64 {
        self.min.y
    }

    /// Centre point of the box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns `true` when the box has zero volume.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.cmpge(self.max).any()
    }

    /// Slab test of a ray against the box.
    ///
    /// `direction` must be unit length for the returned distance to be in
    /// world units. Rays starting inside the box report no hit.
    #[must_use]
    pub fn raycast(&self, origin: DVec3, direction: DVec3) -> Option<RayHit> {
        let mut t_enter = f64::NEG_INFINITY;
        let mut t_exit = f64::INFINITY;
        let mut normal = DVec3::ZERO;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f64::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (near, far, sign) = if d > 0.0 {
                ((lo - o) / d, (hi - o) / d, -1.0)
            } else {
                ((hi - o) / d, (lo - o) / d, 1.0)
            };
            if near > t_enter {
                t_enter = near;
                normal = DVec3::ZERO;
                normal[axis] = sign;
            }
            t_exit = t_exit.min(far);
            if t_enter > t_exit {
                return None;
            }
        }

        if t_enter < 0.0 {
            return None;
        }
        Some(RayHit {
            distance: t_enter,
            point: origin + direction * t_enter,
            normal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn unit_cube_at(x: f64, y: f64, z: f64) -> Aabb {
        Aabb::from_center_half_extents(DVec3::new(x, y, z), DVec3::splat(0.5))
    }

    #[rstest]
    #[case::overlapping(unit_cube_at(0.5, 0.0, 0.0), true)]
    #[case::touching_face(unit_cube_at(1.0, 0.0, 0.0), true)]
    #[case::separated_on_x(unit_cube_at(1.01, 0.0, 0.0), false)]
    #[case::separated_on_y(unit_cube_at(0.0, 1.5, 0.0), false)]
    #[case::separated_on_z(unit_cube_at(0.0, 0.0, -2.0), false)]
    fn closed_interval_intersection(#[case] other: Aabb, #[case] expected: bool) {
        let origin = unit_cube_at(0.0, 0.0, 0.0);
        assert_eq!(origin.intersects(&other), expected);
        assert_eq!(other.intersects(&origin), expected);
    }

    #[test]
    fn actor_box_extends_up_from_feet() {
        let actor = Aabb::from_feet(DVec3::new(1.0, 2.0, 3.0), 0.3, 1.7);
        assert_relative_eq!(actor.bottom(), 2.0);
        assert_relative_eq!(actor.top(), 3.7);
        assert_relative_eq!(actor.min.x, 0.7);
        assert_relative_eq!(actor.max.z, 3.3);
    }

    #[test]
    fn ray_from_above_hits_top_face() {
        let cube = unit_cube_at(0.0, 0.0, 0.0);
        let hit = cube
            .raycast(DVec3::new(0.1, 5.0, 0.1), DVec3::NEG_Y)
            .expect("ray should hit the cube");
        assert_relative_eq!(hit.distance, 4.5);
        assert_eq!(hit.normal, DVec3::Y);
        assert_relative_eq!(hit.point.y, 0.5);
    }

    #[test]
    fn ray_from_side_reports_side_normal() {
        let cube = unit_cube_at(0.0, 0.0, 0.0);
        let hit = cube
            .raycast(DVec3::new(-3.0, 0.0, 0.0), DVec3::X)
            .expect("ray should hit the cube");
        assert_eq!(hit.normal, DVec3::NEG_X);
        assert_relative_eq!(hit.point.x, -0.5);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let cube = unit_cube_at(0.0, 0.0, 0.0);
        assert!(cube.raycast(DVec3::new(0.0, 5.0, 0.0), DVec3::Y).is_none());
    }

    #[test]
    fn degenerate_box_is_empty() {
        let flat = Aabb::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0));
        assert!(flat.is_empty());
        assert!(!unit_cube_at(0.0, 0.0, 0.0).is_empty());
    }
}
