//! 2D vector primitive.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Tolerance used by [`Point2::is_equal_approx`]
pub const APPROX_EPSILON: f64 = 1e-5;

/// Represents a 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ZERO: Point2 = Point2 { x: 0.0, y: 0.0 };

    /// Creates a new point with the given X and Y coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn dot(&self, other: Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product
    pub fn cross(&self, other: Point2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(*self)
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: Point2) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: Point2) -> f64 {
        (other - *self).length_squared()
    }

    /// Unit vector, or zero for a zero-length vector
    pub fn normalized(&self) -> Point2 {
        let len = self.length();
        if len == 0.0 {
            Point2::ZERO
        } else {
            Point2::new(self.x / len, self.y / len)
        }
    }

    /// Unit vector from this point towards `other`
    pub fn direction_to(&self, other: Point2) -> Point2 {
        (other - *self).normalized()
    }

    /// Angle of this vector from the positive X axis
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Signed angle from this vector to `other`, in (-π, π]
    pub fn angle_to(&self, other: Point2) -> f64 {
        self.cross(other).atan2(self.dot(other))
    }

    /// Angle of the line from this point to `other`
    pub fn angle_to_point(&self, other: Point2) -> f64 {
        (other - *self).angle()
    }

    /// Rotated counter-clockwise by `angle` radians about the origin
    pub fn rotated(&self, angle: f64) -> Point2 {
        let (sin, cos) = angle.sin_cos();
        Point2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Perpendicular vector, rotated 90° clockwise
    pub fn orthogonal_cw(&self) -> Point2 {
        Point2::new(self.y, -self.x)
    }

    pub fn lerp(&self, other: Point2, t: f64) -> Point2 {
        *self + (other - *self) * t
    }

    pub fn is_equal_approx(&self, other: Point2) -> bool {
        (self.x - other.x).abs() < APPROX_EPSILON && (self.y - other.y).abs() < APPROX_EPSILON
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2 {
    fn add_assign(&mut self, rhs: Point2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2 {
    type Output = Point2;

    fn neg(self) -> Point2 {
        Point2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Point2::new(x, y)
    }
}

/// Closest point to `to` on the segment `a`-`b`
pub fn closest_point_on_segment(to: Point2, a: Point2, b: Point2) -> Point2 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return a;
    }
    let t = ((to - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_to_is_signed() {
        let x = Point2::new(1.0, 0.0);
        let y = Point2::new(0.0, 1.0);
        assert!((x.angle_to(y) - FRAC_PI_2).abs() < 1e-12);
        assert!((y.angle_to(x) + FRAC_PI_2).abs() < 1e-12);
        assert_eq!(x.angle_to(Point2::ZERO), 0.0);
    }

    #[test]
    fn test_rotation() {
        let p = Point2::new(2.0, 0.0).rotated(PI);
        assert!(p.is_equal_approx(Point2::new(-2.0, 0.0)));
    }

    #[test]
    fn test_closest_point_on_segment() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Point2::new(4.0, 3.0), a, b), Point2::new(4.0, 0.0));
        assert_eq!(closest_point_on_segment(Point2::new(-4.0, 3.0), a, b), a);
        assert_eq!(closest_point_on_segment(Point2::new(1.0, 1.0), a, a), a);
    }
}
