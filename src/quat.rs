use crate::{Mat3, Mat4, Scalar, Vec3};
use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Quaternion: w + xi + yj + zk
///
/// Represents rotations when unit-length. Identity is `(0, 0, 0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat<S> {
    pub x: S,
    pub y: S,
    pub z: S,
    pub w: S,
}

impl<S: Scalar> Quat<S> {
    #[inline]
    pub fn new(x: S, y: S, z: S, w: S) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(S::ZERO, S::ZERO, S::ZERO, S::ONE)
    }

    #[inline]
    pub fn from_parts(v: Vec3<S>, w: S) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Vector part `(x, y, z)`.
    #[inline]
    pub fn vector(&self) -> Vec3<S> {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Quaternion from axis-angle representation. The axis need not be unit.
    pub fn from_axis_angle(axis: Vec3<S>, angle: S) -> Self {
        let half = angle * S::HALF;
        let (s, c) = half.sin_cos();
        Self::from_parts(axis.normalized() * s, c)
    }

    #[inline]
    pub fn dot(&self, other: &Quat<S>) -> S {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn norm_sq(&self) -> S {
        self.dot(self)
    }

    #[inline]
    pub fn norm(&self) -> S { self.norm_sq().sqrt() }

    /// Scale to unit norm in place. A zero quaternion becomes the identity.
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    pub fn normalized(&self) -> Self {
        let n = self.norm();
        if n < S::EPSILON {
            #[cfg(feature = "tracing")]
            tracing::trace!("normalizing a zero quaternion, using identity");
            return Self::identity();
        }
        *self / n
    }

    /// Multiply every component by `k` in place.
    #[inline]
    pub fn scale(&mut self, k: S) {
        *self = *self * k;
    }

    /// Conjugate (inverse for unit quaternions)
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    #[inline]
    pub fn inverse(&self) -> Self {
        self.conjugate() / self.norm_sq()
    }

    /// Quaternion multiplication (Hamilton product)
    pub fn mul_quat(&self, other: &Quat<S>) -> Quat<S> {
        let (a, b) = (self.vector(), other.vector());
        Quat::from_parts(
            b * self.w + a * other.w + a.cross(b),
            self.w * other.w - a.dot(b),
        )
    }

    /// Rotate a vector by this quaternion: q * v * q^-1
    pub fn rotate_vector(&self, v: Vec3<S>) -> Vec3<S> {
        let qv = Quat::from_parts(v, S::ZERO);
        self.mul_quat(&qv).mul_quat(&self.conjugate()).vector()
    }

    /// Convert to 3x3 rotation matrix
    pub fn to_mat3(&self) -> Mat3<S> {
        let two = S::TWO;
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);

        Mat3::new(
            S::ONE - two * (y * y + z * z), two * (x * y - w * z),         two * (x * z + w * y),
            two * (x * y + w * z),         S::ONE - two * (x * x + z * z), two * (y * z - w * x),
            two * (x * z - w * y),         two * (y * z + w * x),         S::ONE - two * (x * x + y * y),
        )
    }

    #[inline]
    pub fn to_mat4(&self) -> Mat4<S> {
        Mat4::from_mat3(self.to_mat3())
    }

    /// Convert from rotation matrix (Shepperd's method for numerical stability)
    pub fn from_mat3(m: &Mat3<S>) -> Self {
        // m(row, col)
        let m = |r, c| m.at(c, r);
        let trace = m(0, 0) + m(1, 1) + m(2, 2);
        let quarter = S::HALF * S::HALF;

        if trace > S::ZERO {
            let s = (trace + S::ONE).sqrt() * S::TWO;
            let inv_s = s.recip();
            Quat::new(
                (m(2, 1) - m(1, 2)) * inv_s,
                (m(0, 2) - m(2, 0)) * inv_s,
                (m(1, 0) - m(0, 1)) * inv_s,
                s * quarter,
            )
        } else if m(0, 0) > m(1, 1) && m(0, 0) > m(2, 2) {
            let s = (S::ONE + m(0, 0) - m(1, 1) - m(2, 2)).sqrt() * S::TWO;
            let inv_s = s.recip();
            Quat::new(
                s * quarter,
                (m(0, 1) + m(1, 0)) * inv_s,
                (m(0, 2) + m(2, 0)) * inv_s,
                (m(2, 1) - m(1, 2)) * inv_s,
            )
        } else if m(1, 1) > m(2, 2) {
            let s = (S::ONE + m(1, 1) - m(0, 0) - m(2, 2)).sqrt() * S::TWO;
            let inv_s = s.recip();
            Quat::new(
                (m(0, 1) + m(1, 0)) * inv_s,
                s * quarter,
                (m(1, 2) + m(2, 1)) * inv_s,
                (m(0, 2) - m(2, 0)) * inv_s,
            )
        } else {
            let s = (S::ONE + m(2, 2) - m(0, 0) - m(1, 1)).sqrt() * S::TWO;
            let inv_s = s.recip();
            Quat::new(
                (m(0, 2) + m(2, 0)) * inv_s,
                (m(1, 2) + m(2, 1)) * inv_s,
                s * quarter,
                (m(1, 0) - m(0, 1)) * inv_s,
            )
        }
    }

    #[inline]
    pub fn as_array(&self) -> [S; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// Spherical linear interpolation along the shortest arc.
///
/// Equivalent to `Slerp::setup(q1, q2).interpolate(t)`.
pub fn slerp<S: Scalar>(q1: Quat<S>, q2: Quat<S>, t: S) -> Quat<S> {
    Slerp::setup(q1, q2).interpolate(t)
}

/// Cached slerp between two fixed endpoints.
///
/// `setup` normalizes both inputs, flips `q2` when the dot product is
/// negative (shortest arc) and precomputes the arc angle, so each
/// `interpolate` costs two sines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slerp<S> {
    from: Quat<S>,
    to: Quat<S>,
    omega: S,
    inv_sin_omega: S,
    linear: bool,
}

impl<S: Scalar> Slerp<S> {
    pub fn setup(q1: Quat<S>, q2: Quat<S>) -> Self {
        let from = q1.normalized();
        let mut to = q2.normalized();
        let mut cos_omega = from.dot(&to);
        if cos_omega < S::ZERO {
            to = -to;
            cos_omega = -cos_omega;
        }
        // Nearly parallel: sin(omega) underflows, blend linearly instead.
        let linear = cos_omega > S::ONE - S::TOLERANCE;
        if linear {
            #[cfg(feature = "tracing")]
            tracing::trace!("slerp endpoints nearly parallel, using linear blend");
            return Self { from, to, omega: S::ZERO, inv_sin_omega: S::ZERO, linear };
        }
        let omega = cos_omega.min(S::ONE).acos();
        Self { from, to, omega, inv_sin_omega: omega.sin().recip(), linear }
    }

    /// Re-target this interpolator at new endpoints.
    pub fn setup_from(&mut self, q1: Quat<S>, q2: Quat<S>) {
        *self = Self::setup(q1, q2);
    }

    pub fn interpolate(&self, t: S) -> Quat<S> {
        if self.linear {
            return (self.from * (S::ONE - t) + self.to * t).normalized();
        }
        let a = ((S::ONE - t) * self.omega).sin() * self.inv_sin_omega;
        let b = (t * self.omega).sin() * self.inv_sin_omega;
        self.from * a + self.to * b
    }
}

impl<S: Scalar> Default for Quat<S> {
    fn default() -> Self { Self::identity() }
}

impl<S: Scalar> Add for Quat<S> {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl<S: Scalar> Sub for Quat<S> {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl<S: Scalar> Neg for Quat<S> {
    type Output = Self;
    #[inline] fn neg(self) -> Self { Self::new(-self.x, -self.y, -self.z, -self.w) }
}

impl<S: Scalar> Mul<S> for Quat<S> {
    type Output = Self;
    #[inline] fn mul(self, k: S) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k, self.w * k)
    }
}

impl<S: Scalar> Div<S> for Quat<S> {
    type Output = Self;
    #[inline] fn div(self, k: S) -> Self {
        Self::new(self.x / k, self.y / k, self.z / k, self.w / k)
    }
}

// Hamilton product
impl<S: Scalar> Mul for Quat<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: Self) -> Self { self.mul_quat(&rhs) }
}

impl<S: Scalar> AddAssign for Quat<S> {
    #[inline] fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<S: Scalar> SubAssign for Quat<S> {
    #[inline] fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

impl<S: Scalar> MulAssign<S> for Quat<S> {
    #[inline] fn mul_assign(&mut self, k: S) { *self = *self * k; }
}

impl Mul<Quat<f64>> for f64 {
    type Output = Quat<f64>;
    #[inline] fn mul(self, rhs: Quat<f64>) -> Quat<f64> { rhs * self }
}

impl Mul<Quat<f32>> for f32 {
    type Output = Quat<f32>;
    #[inline] fn mul(self, rhs: Quat<f32>) -> Quat<f32> { rhs * self }
}

impl<S: Scalar> From<[S; 4]> for Quat<S> {
    fn from(a: [S; 4]) -> Self { Self::new(a[0], a[1], a[2], a[3]) }
}

impl<S: Scalar> From<Quat<S>> for [S; 4] {
    fn from(q: Quat<S>) -> Self { q.as_array() }
}

impl<S: Scalar> fmt::Display for Quat<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "quat({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn near(a: Quat<f64>, b: Quat<f64>, tol: f64) -> bool {
        (a - b).norm() < tol
    }

    #[test]
    fn identity_rotation() {
        let q = Quat::<f64>::identity();
        let v = Vec3::new(1.0, 2.0, 3.0);
        let rotated = q.rotate_vector(v);
        assert!((rotated - v).length() < 1e-12);
        assert_eq!(q.norm(), 1.0);
    }

    #[test]
    fn axis_angle_90_degrees() {
        let q = Quat::from_axis_angle(Vec3::z(), FRAC_PI_2);
        let rotated = q.rotate_vector(Vec3::new(1.0, 0.0, 0.0));
        assert!(rotated.x.abs() < 1e-10);
        assert!((rotated.y - 1.0).abs() < 1e-10);
    }

    #[test]
    fn matrix_matches_axis_angle() {
        let axis = Vec3::new(1.0, -2.0, 0.5);
        let q = Quat::from_axis_angle(axis, 1.2);
        let a = q.to_mat3();
        let b = Mat3::rotation_axis(axis, 1.2);
        for c in 0..3 {
            for r in 0..3 {
                assert!((a.at(c, r) - b.at(c, r)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn matrix_roundtrip() {
        for (axis, angle) in [
            (Vec3::new(1.0, 1.0, 1.0), 1.2),
            (Vec3::x(), 3.0),
            (Vec3::y(), -3.0),
            (Vec3::new(0.1, 0.2, 1.0), 3.1),
        ] {
            let q = Quat::from_axis_angle(axis, angle);
            let q2 = Quat::from_mat3(&q.to_mat3());
            // Quaternions are equivalent up to sign
            assert!((q.dot(&q2).abs() - 1.0).abs() < 1e-8);
        }
    }

    #[test]
    fn normalize_in_place_and_pure() {
        let q = Quat::new(0.0, 0.0, 3.0, 4.0);
        let n = q.normalized();
        assert_eq!(q, Quat::new(0.0, 0.0, 3.0, 4.0));
        assert!((n.norm() - 1.0).abs() < 1e-12);
        let mut m = q;
        m.normalize();
        assert_eq!(m, n);

        let mut z = Quat::new(0.0, 0.0, 0.0, 0.0);
        z.normalize();
        assert_eq!(z, Quat::identity());
    }

    #[test]
    fn algebra() {
        let a = Quat::new(1.0, 2.0, 3.0, 4.0);
        let b = Quat::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(a + b - b, a);
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(-a + a, Quat::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(a.dot(&b), 5.0);
        let mut c = a;
        c.scale(0.5);
        assert_eq!(c, a / 2.0);
        // q * q^-1 = 1
        assert!(near(a * a.inverse(), Quat::identity(), 1e-12));
    }

    #[test]
    fn slerp_endpoints_and_norm() {
        let q1 = Quat::<f64>::identity();
        let q2 = Quat::from_axis_angle(Vec3::z(), 1.0);
        assert!(near(slerp(q1, q2, 0.0), q1, 1e-12));
        assert!(near(slerp(q1, q2, 1.0), q2, 1e-12));
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!((slerp(q1, q2, t).norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn slerp_takes_shortest_arc() {
        let q1 = Quat::from_axis_angle(Vec3::z(), 0.2);
        let q2 = -Quat::from_axis_angle(Vec3::z(), 0.4);
        let mid = slerp(q1, q2, 0.5);
        let expected = Quat::from_axis_angle(Vec3::z(), 0.3);
        assert!((mid.dot(&expected).abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn two_half_steps_make_a_quarter_turn() {
        let q90 = Quat::from_axis_angle(Vec3::x(), FRAC_PI_2);
        let q45 = slerp(Quat::identity(), q90, 0.5);
        let expected = Quat::from_axis_angle(Vec3::x(), FRAC_PI_4);
        assert!(near(q45, expected, 1e-12));
        assert!(near(q45 * q45, q90, 1e-12));
    }

    #[test]
    fn interpolator_reuse() {
        let mut s = Slerp::setup(Quat::identity(), Quat::from_axis_angle(Vec3::y(), 1.0));
        let a = s.interpolate(0.3);
        assert!(near(a, Quat::from_axis_angle(Vec3::y(), 0.3), 1e-12));
        s.setup_from(Quat::identity(), Quat::identity());
        assert_eq!(s.interpolate(0.7), Quat::identity());
    }

    #[test]
    fn rotation_composers() {
        let q = Quat::from_axis_angle(Vec3::z(), FRAC_PI_2);
        let mut m = Mat4::translation(1.0, 0.0, 0.0);
        m.rotate_quat(q);
        let p = m * Vec3::zero();
        assert!((p - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-12);
    }
}
