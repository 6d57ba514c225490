use crate::{Scalar, Vec3, Vector};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Four-component vector; the homogeneous form of a 3D point or direction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec4<S> {
    pub x: S,
    pub y: S,
    pub z: S,
    pub w: S,
}

impl<S: Scalar> Vec4<S> {
    #[inline]
    pub fn new(x: S, y: S, z: S, w: S) -> Self { Self { x, y, z, w } }

    #[inline]
    pub fn zero() -> Self { Self::new(S::ZERO, S::ZERO, S::ZERO, S::ZERO) }

    #[inline]
    pub fn splat(v: S) -> Self { Self::new(v, v, v, v) }

    #[inline]
    pub fn dot(self, rhs: Self) -> S {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    #[inline]
    pub fn length_sq(self) -> S { self.dot(self) }

    #[inline]
    pub fn length(self) -> S { self.length_sq().sqrt() }

    #[inline]
    pub fn normalize(&mut self) { *self = self.normalized(); }

    #[inline]
    pub fn normalized(self) -> Self { self / self.length() }

    #[inline]
    pub fn negate(&mut self) { *self = -*self; }

    #[inline]
    pub fn is_collinear(self, other: Self) -> bool {
        Vector::is_collinear(self, other)
    }

    #[inline]
    pub fn lerp(self, other: Self, t: S) -> Self {
        self * (S::ONE - t) + other * t
    }

    /// Truncate to Vec3 (drop w)
    #[inline]
    pub fn truncate(self) -> Vec3<S> {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Perspective divide: xyz / w
    #[inline]
    pub fn homogeneous_divide(self) -> Vec3<S> {
        let inv_w = self.w.recip();
        Vec3::new(self.x * inv_w, self.y * inv_w, self.z * inv_w)
    }

    #[inline]
    pub fn as_array(&self) -> [S; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl<S: Scalar> Vector for Vec4<S> {
    type Scalar = S;
    const DIM: usize = 4;

    #[inline]
    fn splat(v: S) -> Self { Self::new(v, v, v, v) }

    #[inline]
    fn component(&self, i: usize) -> S {
        match i {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => self.w,
        }
    }

    #[inline]
    fn from_fn<F: FnMut(usize) -> S>(mut f: F) -> Self {
        Self::new(f(0), f(1), f(2), f(3))
    }

    #[inline]
    fn dot(self, rhs: Self) -> S { Vec4::dot(self, rhs) }

    #[inline]
    fn scaled(self, k: S) -> Self { self * k }

    /// Sum of the squared 2x2 minors, the squared area of the parallelogram.
    fn cross_norm_sq(self, rhs: Self) -> S {
        let a = self.as_array();
        let b = rhs.as_array();
        let mut sum = S::ZERO;
        for i in 0..4 {
            for j in (i + 1)..4 {
                let m = a[i] * b[j] - a[j] * b[i];
                sum += m * m;
            }
        }
        sum
    }
}

impl<S: Scalar> Default for Vec4<S> {
    fn default() -> Self { Self::zero() }
}

impl<S: Scalar> From<[S; 4]> for Vec4<S> {
    fn from(a: [S; 4]) -> Self { Self::new(a[0], a[1], a[2], a[3]) }
}

impl<S: Scalar> From<Vec4<S>> for [S; 4] {
    fn from(v: Vec4<S>) -> Self { [v.x, v.y, v.z, v.w] }
}

impl<S: Scalar> Add for Vec4<S> {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl<S: Scalar> Sub for Vec4<S> {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl<S: Scalar> Neg for Vec4<S> {
    type Output = Self;
    #[inline] fn neg(self) -> Self { Self::new(-self.x, -self.y, -self.z, -self.w) }
}

impl<S: Scalar> Mul<S> for Vec4<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: S) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl<S: Scalar> Mul for Vec4<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z, self.w * rhs.w)
    }
}

impl<S: Scalar> Div<S> for Vec4<S> {
    type Output = Self;
    #[inline] fn div(self, rhs: S) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs, self.w / rhs)
    }
}

impl<S: Scalar> Div for Vec4<S> {
    type Output = Self;
    #[inline] fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z, self.w / rhs.w)
    }
}

impl<S: Scalar> AddAssign for Vec4<S> {
    #[inline] fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x; self.y += rhs.y; self.z += rhs.z; self.w += rhs.w;
    }
}

impl<S: Scalar> SubAssign for Vec4<S> {
    #[inline] fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x; self.y -= rhs.y; self.z -= rhs.z; self.w -= rhs.w;
    }
}

impl<S: Scalar> MulAssign<S> for Vec4<S> {
    #[inline] fn mul_assign(&mut self, rhs: S) {
        self.x *= rhs; self.y *= rhs; self.z *= rhs; self.w *= rhs;
    }
}

impl<S: Scalar> DivAssign<S> for Vec4<S> {
    #[inline] fn div_assign(&mut self, rhs: S) {
        self.x /= rhs; self.y /= rhs; self.z /= rhs; self.w /= rhs;
    }
}

impl Mul<Vec4<f64>> for f64 {
    type Output = Vec4<f64>;
    #[inline] fn mul(self, rhs: Vec4<f64>) -> Vec4<f64> { rhs * self }
}

impl Mul<Vec4<f32>> for f32 {
    type Output = Vec4<f32>;
    #[inline] fn mul(self, rhs: Vec4<f32>) -> Vec4<f32> { rhs * self }
}

impl<S: Scalar> core::fmt::Display for Vec4<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "vec4({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_by_w() {
        let v = Vec4::new(2.0, 4.0, 6.0, 2.0);
        assert_eq!(v.homogeneous_divide(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v.truncate(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn length_and_normalize() {
        let mut v = Vec4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(v.length(), 2.0);
        v.normalize();
        assert_eq!(v, Vec4::splat(0.5));
    }

    #[test]
    fn arithmetic() {
        let a = Vec4::new(1.0_f32, 2.0, 3.0, 4.0);
        assert_eq!(a + a, a * 2.0);
        assert_eq!(a - a, Vec4::zero());
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!((a * a).w, 16.0);
    }
}
