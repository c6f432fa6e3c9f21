//! 2D vector value type.
//!
//! [`Vector2`] is a plain `Copy` value. Assigning or passing a vector always
//! copies it, so two fields (for example an entity's `position` and
//! `prev_position`) can never alias the same storage.
//!
//! The in-place operations take `&mut self` and return `&mut Self` so they can
//! be chained:
//!
//! ```
//! use enjin::math::vector::{Axis, Vector2};
//!
//! let mut v = Vector2::new(3.0, 4.0);
//! v.multiply(2.0, Axis::Both).inverse(Axis::Y);
//! assert_eq!(v, Vector2::new(6.0, -8.0));
//! ```
//!
//! Every operation can be restricted to one axis through [`Axis`]. For
//! [`Vector2::accelerate`] and [`Vector2::decelerate`] the mask is applied by
//! computing the full-vector result and then restoring the suppressed axis to
//! its value from before the call. This is not the same as running the
//! operation in one dimension: the heading used for the step still depends on
//! both components.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::math::geometry::{find_angle, move_toward, point_distance};

/// Axis mask for vector operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    X,
    Y,
    #[default]
    Both,
}

impl Axis {
    pub fn has_x(self) -> bool {
        matches!(self, Axis::X | Axis::Both)
    }

    pub fn has_y(self) -> bool {
        matches!(self, Axis::Y | Axis::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    pub const fn zero_vec() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Add `other` into this vector.
    pub fn add_vector(&mut self, other: Vector2, axis: Axis) -> &mut Self {
        if axis.has_x() {
            self.x += other.x;
        }
        if axis.has_y() {
            self.y += other.y;
        }
        self
    }

    /// Add a displacement of `distance` along `angle` (degrees).
    pub fn add_heading(&mut self, angle: f32, distance: f32, axis: Axis) -> &mut Self {
        let step = move_toward(angle, distance);
        self.add_vector(step, axis)
    }

    pub fn multiply(&mut self, scaler: f32, axis: Axis) -> &mut Self {
        if axis.has_x() {
            self.x *= scaler;
        }
        if axis.has_y() {
            self.y *= scaler;
        }
        self
    }

    pub fn divide(&mut self, denominator: f32, axis: Axis) -> &mut Self {
        if axis.has_x() {
            self.x /= denominator;
        }
        if axis.has_y() {
            self.y /= denominator;
        }
        self
    }

    /// Flip the sign of the masked components.
    pub fn inverse(&mut self, axis: Axis) -> &mut Self {
        if axis.has_x() {
            self.x = -self.x;
        }
        if axis.has_y() {
            self.y = -self.y;
        }
        self
    }

    pub fn zero(&mut self, axis: Axis) -> &mut Self {
        if axis.has_x() {
            self.x = 0.0;
        }
        if axis.has_y() {
            self.y = 0.0;
        }
        self
    }

    /// Grow the magnitude by `amount` along the current heading.
    ///
    /// A zero vector has no heading and stays zero.
    pub fn accelerate(&mut self, amount: f32, axis: Axis) -> &mut Self {
        let before = *self;
        let step = move_toward(self.heading(), amount);
        self.add_vector(step, Axis::Both);
        self.restore_unmasked(before, axis);
        self
    }

    /// Shrink the magnitude by `|amount|`, never below zero, keeping the heading.
    pub fn decelerate(&mut self, amount: f32, axis: Axis) -> &mut Self {
        if self.x == 0.0 && self.y == 0.0 {
            return self;
        }
        let before = *self;
        let remaining = (self.magnitude(Axis::Both) - amount.abs()).max(0.0);
        let heading = self.heading();
        let scaled = if heading >= 0.0 {
            move_toward(heading, remaining)
        } else {
            Vector2::zero_vec()
        };
        self.zero(Axis::Both).add_vector(scaled, axis);
        self.restore_unmasked(before, axis);
        self
    }

    /// Scale to unit length. The zero vector is left untouched.
    pub fn normalize(&mut self) -> &mut Self {
        let heading = self.heading();
        if heading < 0.0 {
            return self;
        }
        *self = move_toward(heading, 1.0);
        self
    }

    /// Non-mutating variant of [`Vector2::normalize`].
    pub fn normalized(self) -> Vector2 {
        let mut copy = self;
        copy.normalize();
        copy
    }

    pub fn magnitude(&self, axis: Axis) -> f32 {
        let x = if axis.has_x() { self.x } else { 0.0 };
        let y = if axis.has_y() { self.y } else { 0.0 };
        point_distance(0.0, 0.0, x, y)
    }

    /// Heading in degrees within `[0, 360)`, or `-1.0` for the zero vector.
    pub fn heading(&self) -> f32 {
        if self.x == 0.0 && self.y == 0.0 {
            return -1.0;
        }
        find_angle(0.0, 0.0, self.x, self.y)
    }

    pub fn equals(&self, other: &Vector2) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Component-wise floor.
    pub fn floor(self) -> Vector2 {
        Vector2::new(self.x.floor(), self.y.floor())
    }

    fn restore_unmasked(&mut self, before: Vector2, axis: Axis) {
        if !axis.has_x() {
            self.x = before.x;
        }
        if !axis.has_y() {
            self.y = before.y;
        }
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_masked_add_only_touches_requested_axis() {
        let mut v = Vector2::new(1.0, 1.0);
        v.add_vector(Vector2::new(5.0, 5.0), Axis::X);
        assert_eq!(v, Vector2::new(6.0, 1.0));
        v.add_vector(Vector2::new(5.0, 5.0), Axis::Y);
        assert_eq!(v, Vector2::new(6.0, 6.0));
    }

    #[test]
    fn test_chained_operations() {
        let mut v = Vector2::new(2.0, -4.0);
        v.multiply(3.0, Axis::Both)
            .divide(2.0, Axis::X)
            .inverse(Axis::Both)
            .zero(Axis::Y);
        assert_eq!(v, Vector2::new(-3.0, 0.0));
    }

    #[test]
    fn test_heading_of_zero_vector_is_sentinel() {
        assert_eq!(Vector2::zero_vec().heading(), -1.0);
        assert!(approx_eq(Vector2::new(0.0, 1.0).heading(), 90.0));
        assert!(approx_eq(Vector2::new(-1.0, 0.0).heading(), 180.0));
    }

    #[test]
    fn test_accelerate_keeps_heading() {
        let mut v = Vector2::new(3.0, 4.0);
        v.accelerate(5.0, Axis::Both);
        assert!(approx_eq(v.x, 6.0));
        assert!(approx_eq(v.y, 8.0));
    }

    #[test]
    fn test_accelerate_zero_vector_stays_zero() {
        let mut v = Vector2::zero_vec();
        v.accelerate(10.0, Axis::Both);
        assert_eq!(v, Vector2::zero_vec());
    }

    #[test]
    fn test_accelerate_masked_restores_other_axis() {
        let mut v = Vector2::new(3.0, 4.0);
        v.accelerate(5.0, Axis::X);
        assert!(approx_eq(v.x, 6.0));
        assert!(approx_eq(v.y, 4.0));
    }

    #[test]
    fn test_decelerate_floors_at_zero() {
        let mut v = Vector2::new(3.0, 4.0);
        v.decelerate(100.0, Axis::Both);
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, 0.0));
    }

    #[test]
    fn test_decelerate_uses_absolute_amount() {
        let mut v = Vector2::new(10.0, 0.0);
        v.decelerate(-4.0, Axis::Both);
        assert!(approx_eq(v.x, 6.0));
        assert!(approx_eq(v.y, 0.0));
    }

    #[test]
    fn test_decelerate_masked_is_not_a_one_dimensional_step() {
        // Magnitude 5 shrinks to 0 along the full heading; only x is applied.
        let mut v = Vector2::new(3.0, 4.0);
        v.decelerate(5.0, Axis::X);
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, 4.0));
    }

    #[test]
    fn test_normalize() {
        let mut v = Vector2::new(0.0, -7.0);
        v.normalize();
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, -1.0));

        let mut z = Vector2::zero_vec();
        z.normalize();
        assert_eq!(z, Vector2::zero_vec());
    }

    #[test]
    fn test_copies_do_not_alias() {
        let original = Vector2::new(1.0, 2.0);
        let mut copy = original;
        copy.add_vector(Vector2::new(1.0, 1.0), Axis::Both);
        assert_eq!(original, Vector2::new(1.0, 2.0));
        assert_eq!(copy, Vector2::new(2.0, 3.0));
    }

    #[test]
    fn test_masked_magnitude() {
        let v = Vector2::new(3.0, 4.0);
        assert!(approx_eq(v.magnitude(Axis::Both), 5.0));
        assert!(approx_eq(v.magnitude(Axis::X), 3.0));
        assert!(approx_eq(v.magnitude(Axis::Y), 4.0));
    }
}
