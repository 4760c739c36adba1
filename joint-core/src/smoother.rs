//! Smoothing of the externally supplied anchor target.
//!
//! Hosts deliver a raw target (the pointer) once per tick. Feeding it
//! straight into [`JointTree::update`](crate::tree::JointTree::update) makes
//! the anchor jump; [`smooth`] instead moves the anchor a fraction of the
//! way each tick, which converges exponentially toward the target.

use crate::{config::FollowConfig, error::ConfigError, point::Point2D};

/// Returns `current + (target - current) * rate`.
///
/// - `rate >= 1` returns `target` exactly.
/// - `rate <= 0` (or NaN) returns `current` exactly.
/// - A step too small to change `current` lands on `target`, so repeated
///   smoothing reaches the target exactly after finitely many steps.
pub fn smooth(current: Point2D, target: Point2D, rate: f32) -> Point2D {
    if rate >= 1.0 {
        return target;
    }
    if !(rate > 0.0) {
        return current;
    }
    let next = current + (target - current) * rate;
    if next == current { target } else { next }
}

/// Turns elapsed time into an interpolation rate for [`smooth`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorSmoother {
    /// Fraction of the remaining distance covered per second, or `None`
    /// to jump straight to the target.
    speed: Option<f32>,
}

impl AnchorSmoother {
    /// No smoothing: the anchor is placed exactly on the target.
    pub const fn instant() -> Self {
        Self { speed: None }
    }

    /// Exponential follow with `rate = speed * dt`.
    pub const fn exponential(speed: f32) -> Self {
        Self { speed: Some(speed) }
    }

    #[inline]
    pub fn speed(&self) -> Option<f32> {
        self.speed
    }

    /// Interpolation rate for a tick of `dt` seconds.
    ///
    /// Negative or non-finite `dt` counts as no elapsed time.
    pub fn rate(&self, dt: f32) -> f32 {
        match self.speed {
            None => 1.0,
            Some(speed) if dt.is_finite() && dt > 0.0 => speed * dt,
            Some(_) => 0.0,
        }
    }

    /// Where the anchor should be after a tick of `dt` seconds.
    ///
    /// A non-finite `target` is ignored and the anchor stays at `current`.
    pub fn step(&self, current: Point2D, target: Point2D, dt: f32) -> Point2D {
        if !target.is_finite() {
            return current;
        }
        smooth(current, target, self.rate(dt))
    }
}

impl Default for AnchorSmoother {
    fn default() -> Self {
        Self::instant()
    }
}

impl TryFrom<&FollowConfig> for AnchorSmoother {
    type Error = ConfigError;

    fn try_from(cfg: &FollowConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(if cfg.smooth {
            Self::exponential(cfg.speed)
        } else {
            Self::instant()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn smooth_moves_a_fraction_of_the_way() {
        let p = smooth(Point2D::new(0.0, 0.0), Point2D::new(10.0, -20.0), 0.25);
        assert_eq!(p, Point2D::new(2.5, -5.0));
    }

    #[test]
    fn rate_of_one_or_more_snaps_to_target() {
        let target = Point2D::new(0.1, 0.7);
        assert_eq!(smooth(Point2D::new(3.0, 3.0), target, 1.0), target);
        assert_eq!(smooth(Point2D::new(3.0, 3.0), target, 5.0), target);
    }

    #[test]
    fn non_positive_rate_keeps_current() {
        let current = Point2D::new(3.0, 3.0);
        assert_eq!(smooth(current, Point2D::ZERO, 0.0), current);
        assert_eq!(smooth(current, Point2D::ZERO, -1.0), current);
        assert_eq!(smooth(current, Point2D::ZERO, f32::NAN), current);
    }

    #[test]
    fn repeated_smoothing_converges_monotonically() {
        let target = Point2D::new(10.0, -4.0);
        let mut current = Point2D::new(-6.0, 8.0);
        let mut last = current.distance(target);

        for _ in 0..20 {
            current = smooth(current, target, 0.3);
            let d = current.distance(target);
            assert!(d < last, "distance did not shrink: {d} >= {last}");
            last = d;
        }

        for _ in 0..200 {
            current = smooth(current, target, 0.3);
        }
        assert_relative_eq!(current.x, target.x, epsilon = 1e-4);
        assert_relative_eq!(current.y, target.y, epsilon = 1e-4);
    }

    #[test]
    fn repeated_smoothing_lands_exactly_on_target() {
        let target = Point2D::new(100.3, -47.7);
        let mut current = Point2D::ZERO;
        let mut steps = 0;

        while current != target {
            current = smooth(current, target, 0.192);
            steps += 1;
            assert!(steps < 1_000, "stalled at {current}");
        }
    }

    #[test]
    fn step_ignores_non_finite_target() {
        let s = AnchorSmoother::exponential(10.0);
        let current = Point2D::new(1.0, 2.0);
        assert_eq!(s.step(current, Point2D::new(f32::NAN, 0.0), 0.1), current);
        assert_eq!(
            AnchorSmoother::instant().step(current, Point2D::new(0.0, f32::INFINITY), 0.1),
            current
        );
    }

    #[test]
    fn smoother_rate_follows_dt() {
        let s = AnchorSmoother::exponential(10.0);
        assert_relative_eq!(s.rate(0.016), 0.16, epsilon = 1e-6);
        assert_eq!(s.rate(-0.5), 0.0);
        assert_eq!(s.rate(f32::INFINITY), 0.0);
        assert_eq!(AnchorSmoother::instant().rate(0.0), 1.0);
    }

    #[test]
    fn smoother_from_follow_config() {
        let cfg = FollowConfig {
            smooth: true,
            speed: 4.0,
        };
        assert_eq!(AnchorSmoother::try_from(&cfg).unwrap().speed(), Some(4.0));

        let cfg = FollowConfig {
            smooth: false,
            ..cfg
        };
        assert_eq!(
            AnchorSmoother::try_from(&cfg).unwrap(),
            AnchorSmoother::instant()
        );
    }

    #[test]
    fn smoother_rejects_bad_follow_speed() {
        for speed in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            let cfg = FollowConfig {
                smooth: true,
                speed,
            };
            assert!(matches!(
                AnchorSmoother::try_from(&cfg),
                Err(ConfigError::InvalidValue { field: "speed", .. })
            ));
        }
    }
}
