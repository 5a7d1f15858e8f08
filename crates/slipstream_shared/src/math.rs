//! Mathematical types shared between owner, authority and observers.
//!
//! Motion is planar: entities translate in 3D but rotate around the
//! vertical axis only, so orientation is a single yaw angle in degrees and
//! the basis vectors are derived from it directly. There is deliberately no
//! quaternion or transform machinery here.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, velocity, displacement
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component (vertical)
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Distance squared (avoids sqrt)
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Unit vector in the same direction, or zero for a degenerate input
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Linear interpolation toward `other` by factor `t`
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Wraps a yaw angle into the canonical `[0, 360)` degree range.
#[must_use]
pub fn normalize_yaw(yaw: f32) -> f32 {
    yaw.rem_euclid(360.0)
}

/// Shortest signed angular difference from `from` to `to`, in `[-180, 180)`.
#[must_use]
pub fn yaw_delta(from: f32, to: f32) -> f32 {
    (to - from + 540.0).rem_euclid(360.0) - 180.0
}

/// Derives the planar `(forward, right)` basis from a yaw angle in degrees.
///
/// Yaw 0 faces +Z; yaw grows clockwise when viewed from above, so yaw 90
/// faces +X.
#[must_use]
pub fn yaw_basis(yaw: f32) -> (Vec3, Vec3) {
    let rad = yaw.to_radians();
    let (sin, cos) = rad.sin_cos();
    let forward = Vec3::new(sin, 0.0, cos);
    let right = Vec3::new(cos, 0.0, -sin);
    (forward, right)
}

/// Linear interpolation.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Angular interpolation along the shortest path, result in `[0, 360)`.
#[must_use]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    normalize_yaw(from + yaw_delta(from, to) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 7.0);
        assert_eq!(sum.z, 9.0);

        let dot = a.dot(b);
        assert_eq!(dot, 32.0); // 1*4 + 2*5 + 3*6
    }

    #[test]
    fn test_vec3_normalized() {
        let v = Vec3::new(3.0, 0.0, 4.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn test_vec3_bytemuck() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 12); // 3 * 4 bytes
    }

    #[test]
    fn test_yaw_wrapping() {
        assert!((normalize_yaw(370.0) - 10.0).abs() < 1e-4);
        assert!((normalize_yaw(-10.0) - 350.0).abs() < 1e-4);
        assert!((normalize_yaw(360.0) - 0.0).abs() < 1e-4);
    }

    #[test]
    fn test_yaw_delta_shortest_path() {
        // Crossing the 0/360 seam must go the short way
        assert!((yaw_delta(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((yaw_delta(10.0, 350.0) + 20.0).abs() < 1e-4);
        assert!((yaw_delta(0.0, 180.0).abs() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_yaw_basis_cardinals() {
        let (forward, right) = yaw_basis(0.0);
        assert!((forward.z - 1.0).abs() < 1e-6);
        assert!((right.x - 1.0).abs() < 1e-6);

        let (forward, right) = yaw_basis(90.0);
        assert!((forward.x - 1.0).abs() < 1e-6);
        assert!((right.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_angle_seam() {
        // Halfway from 350 to 10 is 0, not 180
        let mid = lerp_angle(350.0, 10.0, 0.5);
        assert!(mid < 1.0 || mid > 359.0, "mid was {mid}");
    }
}
