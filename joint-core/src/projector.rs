//! Projection of a point into the annulus around a joint.
//!
//! A joint with radius `r`, stretch limit `s` and retract limit `t` accepts
//! children whose distance from it lies in `[r * t, r * s]`. [`project`]
//! moves a candidate child position onto the nearest point of that band
//! along the ray from the joint's center.

use crate::point::Point2D;

/// The band of valid distances `[min, max]` around a joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annulus {
    pub min: f32,
    pub max: f32,
}

impl Annulus {
    /// Builds the annulus `[radius * retract_limit, radius * stretch_limit]`.
    pub fn new(radius: f32, stretch_limit: f32, retract_limit: f32) -> Self {
        Self {
            min: radius * retract_limit,
            max: radius * stretch_limit,
        }
    }

    #[inline]
    pub fn contains(&self, distance: f32) -> bool {
        self.min <= distance && distance <= self.max
    }

    /// Clamps `distance` into `[min, max]`.
    ///
    /// Unlike [`f32::clamp`] this does not panic when `min > max`; the upper
    /// bound wins.
    #[inline]
    pub fn clamp(&self, distance: f32) -> f32 {
        distance.max(self.min).min(self.max)
    }

    /// How far `distance` lies outside the band, `0.0` when inside.
    pub fn violation(&self, distance: f32) -> f32 {
        if distance < self.min {
            self.min - distance
        } else if distance > self.max {
            distance - self.max
        } else {
            0.0
        }
    }
}

/// Clamps `candidate` into the annulus centered at `center`.
///
/// 1. If `candidate` coincides with `center` there is no direction to
///    project along, and `candidate` is returned unchanged.
/// 2. If its distance already lies in
///    `[radius * retract_limit, radius * stretch_limit]`, it is returned
///    unchanged.
/// 3. Otherwise the point on the same ray at the clamped distance is
///    returned.
///
/// ### Parameters
/// - `center` - Position of the constraining (parent) joint.
/// - `radius` - Radius of the parent joint.
/// - `candidate` - Proposed position of the child.
/// - `stretch_limit` - Multiplier for the maximum distance.
/// - `retract_limit` - Multiplier for the minimum distance.
///
/// ### Returns
/// The projected position. The function is pure and never fails.
pub fn project(
    center: Point2D,
    radius: f32,
    candidate: Point2D,
    stretch_limit: f32,
    retract_limit: f32,
) -> Point2D {
    let vector = candidate - center;
    let distance = vector.length();

    if distance == 0.0 {
        return candidate;
    }

    let annulus = Annulus::new(radius, stretch_limit, retract_limit);
    if annulus.contains(distance) {
        return candidate;
    }

    // Subnormal offsets have a length but no representable direction.
    let Ok(direction) = vector.normalize() else {
        return candidate;
    };
    center + direction * annulus.clamp(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    const STRETCH: f32 = 1.10;
    const RETRACT: f32 = 0.90;

    #[test]
    fn candidate_inside_annulus_is_unchanged() {
        let center = Point2D::new(10.0, 10.0);
        let candidate = Point2D::new(10.0, 35.0);
        assert_eq!(project(center, 25.0, candidate, STRETCH, RETRACT), candidate);

        // Both bounds are inclusive.
        let on_max = Point2D::new(10.0 + 25.0 * STRETCH, 10.0);
        assert_eq!(project(center, 25.0, on_max, STRETCH, RETRACT), on_max);
    }

    #[test]
    fn zero_distance_is_a_no_op() {
        let center = Point2D::new(-3.0, 4.0);
        assert_eq!(project(center, 25.0, center, STRETCH, RETRACT), center);
    }

    #[test]
    fn too_far_is_pulled_onto_outer_edge() {
        let center = Point2D::new(150.0, 100.0);
        let candidate = Point2D::new(100.0, 100.0);
        let p = project(center, 25.0, candidate, STRETCH, RETRACT);
        assert_relative_eq!(p.x, 122.5, epsilon = 1e-4);
        assert_relative_eq!(p.y, 100.0);
    }

    #[test]
    fn too_close_is_pushed_onto_inner_edge() {
        let center = Point2D::new(0.0, 0.0);
        let candidate = Point2D::new(0.0, -1.0);
        let p = project(center, 10.0, candidate, 2.0, 0.5);
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, -5.0, epsilon = 1e-5);
    }

    #[test]
    fn projected_points_satisfy_the_annulus() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let center = Point2D::new(
                rng.random_range(-500.0..500.0),
                rng.random_range(-500.0..500.0),
            );
            let candidate = Point2D::new(
                rng.random_range(-500.0..500.0),
                rng.random_range(-500.0..500.0),
            );
            let radius = rng.random_range(1.0..60.0);
            let stretch = rng.random_range(1.0..2.0);
            let retract = rng.random_range(0.05..=1.0);

            let p = project(center, radius, candidate, stretch, retract);
            let d = p.distance(center);
            let tol = 1e-3 * (1.0 + d);
            assert!(
                d >= radius * retract - tol && d <= radius * stretch + tol,
                "distance {d} outside [{}, {}]",
                radius * retract,
                radius * stretch
            );

            // A second projection leaves the point where it is.
            let again = project(center, radius, p, stretch, retract);
            assert_relative_eq!(again.x, p.x, epsilon = 1e-3);
            assert_relative_eq!(again.y, p.y, epsilon = 1e-3);
        }
    }

    #[test]
    fn annulus_helpers() {
        let a = Annulus::new(10.0, 1.5, 0.5);
        assert_eq!(a, Annulus { min: 5.0, max: 15.0 });
        assert!(a.contains(5.0) && a.contains(15.0));
        assert!(!a.contains(4.9));
        assert_eq!(a.clamp(20.0), 15.0);
        assert_eq!(a.clamp(1.0), 5.0);
        assert_eq!(a.violation(2.0), 3.0);
        assert_eq!(a.violation(10.0), 0.0);
        assert_eq!(a.violation(16.0), 1.0);
    }
}
