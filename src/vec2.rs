use crate::{Scalar, Vec3, Vector};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2<S> {
    pub x: S,
    pub y: S,
}

impl<S: Scalar> Vec2<S> {
    #[inline]
    pub fn new(x: S, y: S) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(S::ZERO, S::ZERO)
    }

    #[inline]
    pub fn splat(v: S) -> Self {
        Self::new(v, v)
    }

    #[inline]
    pub fn x() -> Self {
        Self::new(S::ONE, S::ZERO)
    }

    #[inline]
    pub fn y() -> Self {
        Self::new(S::ZERO, S::ONE)
    }

    /// Point at `radius` along direction `angle` (radians from +x).
    #[inline]
    pub fn from_polar(radius: S, angle: S) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(radius * c, radius * s)
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> S {
        self.x * rhs.x + self.y * rhs.y
    }

    /// 2D cross product (returns scalar = signed area of parallelogram).
    #[inline]
    pub fn cross(self, rhs: Self) -> S {
        self.x * rhs.y - self.y * rhs.x
    }

    #[inline]
    pub fn length_sq(self) -> S {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> S {
        self.length_sq().sqrt()
    }

    /// L1 norm.
    #[inline]
    pub fn length_manhattan(self) -> S {
        self.x.abs() + self.y.abs()
    }

    #[inline]
    pub fn distance(self, other: Self) -> S {
        (self - other).length()
    }

    #[inline]
    pub fn distance_sq(self, other: Self) -> S {
        (self - other).length_sq()
    }

    #[inline]
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    #[inline]
    pub fn normalized(self) -> Self {
        self / self.length()
    }

    #[inline]
    pub fn negate(&mut self) {
        *self = -*self;
    }

    /// Counter-clockwise quarter turn.
    #[inline]
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    #[inline]
    pub fn is_collinear(self, other: Self) -> bool {
        Vector::is_collinear(self, other)
    }

    /// `(radius, angle)` with the angle in `(-pi, pi]`.
    #[inline]
    pub fn to_polar(self) -> (S, S) {
        (self.length(), self.y.atan2(self.x))
    }

    #[inline]
    pub fn lerp(self, other: Self, t: S) -> Self {
        self * (S::ONE - t) + other * t
    }

    #[inline]
    pub fn component_min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    #[inline]
    pub fn component_max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    #[inline]
    pub fn extend(self, z: S) -> Vec3<S> {
        Vec3::new(self.x, self.y, z)
    }

    #[inline]
    pub fn as_array(&self) -> [S; 2] {
        [self.x, self.y]
    }
}

impl<S: Scalar> Vector for Vec2<S> {
    type Scalar = S;
    const DIM: usize = 2;

    #[inline]
    fn splat(v: S) -> Self {
        Self::new(v, v)
    }

    #[inline]
    fn component(&self, i: usize) -> S {
        if i == 0 { self.x } else { self.y }
    }

    #[inline]
    fn from_fn<F: FnMut(usize) -> S>(mut f: F) -> Self {
        Self::new(f(0), f(1))
    }

    #[inline]
    fn dot(self, rhs: Self) -> S {
        Vec2::dot(self, rhs)
    }

    #[inline]
    fn scaled(self, k: S) -> Self {
        self * k
    }

    #[inline]
    fn cross_norm_sq(self, rhs: Self) -> S {
        let c = self.cross(rhs);
        c * c
    }
}

impl<S: Scalar> Default for Vec2<S> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<S: Scalar> From<[S; 2]> for Vec2<S> {
    fn from(a: [S; 2]) -> Self {
        Self::new(a[0], a[1])
    }
}

impl<S: Scalar> From<Vec2<S>> for [S; 2] {
    fn from(v: Vec2<S>) -> Self {
        [v.x, v.y]
    }
}

impl<S: Scalar> Add for Vec2<S> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<S: Scalar> Sub for Vec2<S> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<S: Scalar> Neg for Vec2<S> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<S: Scalar> Mul<S> for Vec2<S> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: S) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl<S: Scalar> Mul for Vec2<S> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl<S: Scalar> Div<S> for Vec2<S> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: S) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl<S: Scalar> Div for Vec2<S> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl<S: Scalar> AddAssign for Vec2<S> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<S: Scalar> SubAssign for Vec2<S> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl<S: Scalar> MulAssign<S> for Vec2<S> {
    #[inline]
    fn mul_assign(&mut self, rhs: S) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl<S: Scalar> DivAssign<S> for Vec2<S> {
    #[inline]
    fn div_assign(&mut self, rhs: S) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

impl Mul<Vec2<f64>> for f64 {
    type Output = Vec2<f64>;
    #[inline]
    fn mul(self, rhs: Vec2<f64>) -> Vec2<f64> {
        rhs * self
    }
}

impl Mul<Vec2<f32>> for f32 {
    type Output = Vec2<f32>;
    #[inline]
    fn mul(self, rhs: Vec2<f32>) -> Vec2<f32> {
        rhs * self
    }
}

impl<S: Scalar> core::fmt::Display for Vec2<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "vec2({}, {})", self.x, self.y)
    }
}
