//! 2D vector helpers on top of `glam::Vec2`
//!
//! Addition, subtraction and scaling are plain glam operators. The helpers
//! here never produce NaN: dividing by zero or normalizing the zero vector
//! yields `Vec2::ZERO`.

use glam::Vec2;

pub trait VectorExt {
    /// Component-wise division, zero vector when `scalar` is zero
    fn div_or_zero(self, scalar: f32) -> Vec2;
    /// Unit vector in the same direction, zero vector for zero input
    fn normalized(self) -> Vec2;
    fn magnitude(self) -> f32;
    fn distance_to(self, other: Vec2) -> f32;
    /// Angle of the vector in radians, `atan2(y, x)`
    fn heading(self) -> f32;
}

impl VectorExt for Vec2 {
    #[inline]
    fn div_or_zero(self, scalar: f32) -> Vec2 {
        if scalar == 0.0 {
            Vec2::ZERO
        } else {
            self / scalar
        }
    }

    #[inline]
    fn normalized(self) -> Vec2 {
        self.div_or_zero(self.magnitude())
    }

    #[inline]
    fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    fn distance_to(self, other: Vec2) -> f32 {
        (self - other).magnitude()
    }

    #[inline]
    fn heading(self) -> f32 {
        self.y.atan2(self.x)
    }
}

/// Build a vector from an angle (radians) and a magnitude
#[inline]
pub fn from_angle(angle: f32, magnitude: f32) -> Vec2 {
    Vec2::new(magnitude * angle.cos(), magnitude * angle.sin())
}

/// Angular offset of shot `index` in a fan of `count` shots spaced `step` apart
#[inline]
pub fn fan_offset(index: u32, count: u32, step: f32) -> f32 {
    if count <= 1 {
        return 0.0;
    }
    (index as f32 - (count - 1) as f32 / 2.0) * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_zero_safe_ops() {
        assert_eq!(Vec2::new(3.0, 4.0).div_or_zero(0.0), Vec2::ZERO);
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        assert_eq!(Vec2::new(3.0, 4.0).magnitude(), 5.0);
        assert_eq!(Vec2::new(1.0, 1.0).distance_to(Vec2::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn test_heading_and_from_angle() {
        assert!((Vec2::new(0.0, 2.0).heading() - FRAC_PI_2).abs() < 1e-6);
        let v = from_angle(FRAC_PI_2, 10.0);
        assert!(v.x.abs() < 1e-4);
        assert!((v.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_fan_offsets_are_centered() {
        assert_eq!(fan_offset(0, 1, 0.1), 0.0);
        assert!((fan_offset(0, 3, 0.1) + 0.1).abs() < 1e-6);
        assert_eq!(fan_offset(1, 3, 0.1), 0.0);
        assert!((fan_offset(2, 3, 0.1) - 0.1).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn normalize_is_unit_or_zero(x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4) {
            let v = Vec2::new(x, y);
            let n = v.normalized();
            if v == Vec2::ZERO {
                prop_assert_eq!(n, Vec2::ZERO);
            } else {
                prop_assert!((n.magnitude() - 1.0).abs() < 1e-4);
            }
        }
    }
}
