use std::fmt;
use std::ops::{Add, Mul, Sub};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A 2-D coordinate with value semantics.
///
/// Equality is exact floating-point equality on both components; no
/// epsilon is applied. Arithmetic delegates to [`glam::Vec2`], and the two
/// types convert freely into each other so hosts can keep using glam.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean norm of the point seen as a vector from the origin.
    #[inline]
    pub fn length(self) -> f32 {
        Vec2::from(self).length()
    }

    /// `true` when neither component is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        Vec2::from(self).is_finite()
    }

    /// Euclidean distance between two points.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Multiplies both components by `k`.
    #[inline]
    pub fn scale(self, k: f32) -> Self {
        (Vec2::from(self) * k).into()
    }

    /// Divides both components by `k`.
    ///
    /// ### Errors
    /// [`GeometryError::DivisionByZero`] when `k == 0`.
    pub fn divide(self, k: f32) -> Result<Self, GeometryError> {
        if k == 0.0 {
            return Err(GeometryError::DivisionByZero);
        }
        Ok((Vec2::from(self) / k).into())
    }

    /// Returns the unit vector pointing the same way.
    ///
    /// Callers must special-case zero-length vectors themselves.
    ///
    /// ### Errors
    /// [`GeometryError::DegenerateVector`] when the length is zero (or so
    /// small that its reciprocal is not finite).
    pub fn normalize(self) -> Result<Self, GeometryError> {
        Vec2::from(self)
            .try_normalize()
            .map(Self::from)
            .ok_or(GeometryError::DegenerateVector)
    }
}

impl Add for Point2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        (Vec2::from(self) + Vec2::from(rhs)).into()
    }
}

impl Sub for Point2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        (Vec2::from(self) - Vec2::from(rhs)).into()
    }
}

impl Mul<f32> for Point2D {
    type Output = Self;

    fn mul(self, k: f32) -> Self {
        self.scale(k)
    }
}

impl From<Vec2> for Point2D {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point2D> for Vec2 {
    fn from(p: Point2D) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<(f32, f32)> for Point2D {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn arithmetic_is_componentwise() {
        let a = Point2D::new(1.0, 2.0);
        let b = Point2D::new(3.0, -4.0);

        assert_eq!(a + b, Point2D::new(4.0, -2.0));
        assert_eq!(a - b, Point2D::new(-2.0, 6.0));
        assert_eq!(b * 0.5, Point2D::new(1.5, -2.0));
        assert_eq!(a.divide(2.0), Ok(Point2D::new(0.5, 1.0)));
    }

    #[test]
    fn divide_by_zero_is_an_error() {
        let p = Point2D::new(1.0, 1.0);
        assert_eq!(p.divide(0.0), Err(GeometryError::DivisionByZero));
        assert_eq!(p.divide(-0.0), Err(GeometryError::DivisionByZero));
    }

    #[test]
    fn equality_is_exact() {
        let a = Point2D::new(0.1, 0.2);
        let b = Point2D::new(0.1 + f32::EPSILON, 0.2);
        assert_ne!(a, b);
        assert_eq!(a, Point2D::new(0.1, 0.2));
    }

    #[test]
    fn length_and_distance() {
        assert_relative_eq!(Point2D::new(3.0, 4.0).length(), 5.0);
        assert_relative_eq!(
            Point2D::new(1.0, 1.0).distance(Point2D::new(4.0, 5.0)),
            5.0
        );
    }

    #[test]
    fn normalize_returns_unit_vector() {
        let n = Point2D::new(0.0, -8.0).normalize().unwrap();
        assert_eq!(n, Point2D::new(0.0, -1.0));
        assert_relative_eq!(Point2D::new(2.0, 7.0).normalize().unwrap().length(), 1.0);
    }

    #[test]
    fn finiteness_checks_both_components() {
        assert!(Point2D::new(1.0, -2.0).is_finite());
        assert!(!Point2D::new(f32::NAN, 0.0).is_finite());
        assert!(!Point2D::new(0.0, f32::NEG_INFINITY).is_finite());
    }

    #[test]
    fn normalize_zero_vector_is_degenerate() {
        assert_eq!(Point2D::ZERO.normalize(), Err(GeometryError::DegenerateVector));
    }

    #[test]
    fn converts_to_and_from_glam() {
        let p = Point2D::new(2.5, -1.0);
        let v: Vec2 = p.into();
        assert_eq!(v, Vec2::new(2.5, -1.0));
        assert_eq!(Point2D::from(v), p);
        assert_eq!(Point2D::from((2.5, -1.0)), p);
    }

    #[test]
    fn display_shows_both_components() {
        assert_eq!(Point2D::new(1.5, -2.0).to_string(), "(1.5, -2)");
    }
}
