use crate::error::{check_index, GeomError, Result};
use crate::{Quat, Scalar, Vec2, Vec3};
use core::fmt;
use core::ops::{Add, Div, DivAssign, Mul, MulAssign, Neg, Sub};

/// 3x3 matrix, column-major storage.
///
/// Used for 3D rotations and for 2D homogeneous transforms (translation in
/// column 2). Transforms act on column vectors, so `a * b` applies `b` first.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat3<S> {
    /// Column 0
    pub c0: Vec3<S>,
    /// Column 1
    pub c1: Vec3<S>,
    /// Column 2
    pub c2: Vec3<S>,
}

impl<S: Scalar> Mat3<S> {
    /// Construct from individual elements (row-major argument order for readability).
    /// ```text
    /// | m00 m01 m02 |
    /// | m10 m11 m12 |
    /// | m20 m21 m22 |
    /// ```
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn new(m00: S, m01: S, m02: S, m10: S, m11: S, m12: S, m20: S, m21: S, m22: S) -> Self {
        Self {
            c0: Vec3::new(m00, m10, m20),
            c1: Vec3::new(m01, m11, m21),
            c2: Vec3::new(m02, m12, m22),
        }
    }

    #[inline]
    pub fn from_cols(c0: Vec3<S>, c1: Vec3<S>, c2: Vec3<S>) -> Self {
        Self { c0, c1, c2 }
    }

    #[inline]
    pub fn from_rows(r0: Vec3<S>, r1: Vec3<S>, r2: Vec3<S>) -> Self {
        Self::new(r0.x, r0.y, r0.z, r1.x, r1.y, r1.z, r2.x, r2.y, r2.z)
    }

    #[inline]
    pub fn zero() -> Self {
        Self::from_cols(Vec3::zero(), Vec3::zero(), Vec3::zero())
    }

    #[inline]
    pub fn identity() -> Self {
        Self::diagonal(Vec3::splat(S::ONE))
    }

    #[inline]
    pub fn diagonal(d: Vec3<S>) -> Self {
        Self::new(
            d.x, S::ZERO, S::ZERO,
            S::ZERO, d.y, S::ZERO,
            S::ZERO, S::ZERO, d.z,
        )
    }

    /// 2D translation (homogeneous).
    pub fn translation(x: S, y: S) -> Self {
        Self::new(
            S::ONE, S::ZERO, x,
            S::ZERO, S::ONE, y,
            S::ZERO, S::ZERO, S::ONE,
        )
    }

    #[inline]
    pub fn from_translation(v: Vec2<S>) -> Self {
        Self::translation(v.x, v.y)
    }

    /// 2D scaling (homogeneous).
    #[inline]
    pub fn scaling(x: S, y: S) -> Self {
        Self::diagonal(Vec3::new(x, y, S::ONE))
    }

    #[inline]
    pub fn from_scaling(v: Vec2<S>) -> Self {
        Self::scaling(v.x, v.y)
    }

    /// 2D counter-clockwise rotation; same as [`rotation_z`](Self::rotation_z).
    #[inline]
    pub fn rotation_2d(angle: S) -> Self {
        Self::rotation_z(angle)
    }

    pub fn rotation_x(angle: S) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            S::ONE, S::ZERO, S::ZERO,
            S::ZERO, c, -s,
            S::ZERO, s, c,
        )
    }

    pub fn rotation_y(angle: S) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            c, S::ZERO, s,
            S::ZERO, S::ONE, S::ZERO,
            -s, S::ZERO, c,
        )
    }

    pub fn rotation_z(angle: S) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            c, -s, S::ZERO,
            s, c, S::ZERO,
            S::ZERO, S::ZERO, S::ONE,
        )
    }

    /// Rotation of `angle` radians about `axis` (Rodrigues). The axis need
    /// not be unit length.
    pub fn rotation_axis(axis: Vec3<S>, angle: S) -> Self {
        let a = axis.normalized();
        let (s, c) = angle.sin_cos();
        let t = S::ONE - c;
        let (x, y, z) = (a.x, a.y, a.z);
        Self::new(
            t * x * x + c,     t * x * y - s * z, t * x * z + s * y,
            t * x * y + s * z, t * y * y + c,     t * y * z - s * x,
            t * x * z - s * y, t * y * z + s * x, t * z * z + c,
        )
    }

    /// Rotation from a unit quaternion.
    #[inline]
    pub fn from_quat(q: Quat<S>) -> Self {
        q.to_mat3()
    }

    /// Rotation by `roll` about x, then `pitch` about y, then `yaw` about z.
    pub fn rotation_euler(roll: S, pitch: S, yaw: S) -> Self {
        Self::rotation_z(yaw) * Self::rotation_y(pitch) * Self::rotation_x(roll)
    }

    /// Element at column `col`, row `row`.
    pub fn get(&self, col: usize, row: usize) -> Result<S> {
        check_index(col, 3)?;
        check_index(row, 3)?;
        Ok(self.at(col, row))
    }

    pub fn set(&mut self, col: usize, row: usize, value: S) -> Result<()> {
        check_index(col, 3)?;
        check_index(row, 3)?;
        let c = match col { 0 => &mut self.c0, 1 => &mut self.c1, _ => &mut self.c2 };
        match row { 0 => c.x = value, 1 => c.y = value, _ => c.z = value }
        Ok(())
    }

    /// Unchecked element access; out-of-range indices clamp to the last slot.
    #[inline]
    pub(crate) fn at(&self, col: usize, row: usize) -> S {
        let c = match col { 0 => &self.c0, 1 => &self.c1, _ => &self.c2 };
        match row { 0 => c.x, 1 => c.y, _ => c.z }
    }

    pub fn column(&self, i: usize) -> Result<Vec3<S>> {
        check_index(i, 3)?;
        Ok(match i { 0 => self.c0, 1 => self.c1, _ => self.c2 })
    }

    pub fn row(&self, i: usize) -> Result<Vec3<S>> {
        check_index(i, 3)?;
        Ok(Vec3::new(self.at(0, i), self.at(1, i), self.at(2, i)))
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_rows(self.c0, self.c1, self.c2)
    }

    #[inline]
    pub fn transpose_in_place(&mut self) {
        *self = self.transpose();
    }

    pub fn determinant(&self) -> S {
        self.c0.dot(self.c1.cross(self.c2))
    }

    #[inline]
    pub fn trace(&self) -> S {
        self.c0.x + self.c1.y + self.c2.z
    }

    /// Hadamard bound on `|det|`.
    fn column_norm_product(&self) -> S {
        self.c0.length() * self.c1.length() * self.c2.length()
    }

    /// Inverse via the adjugate. Fails when the determinant is zero relative
    /// to the product of the column norms.
    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= S::EPSILON * self.column_norm_product() {
            return Err(GeomError::singular(det.to_f64()));
        }
        let inv_det = det.recip();
        Ok(Self::from_rows(
            self.c1.cross(self.c2) * inv_det,
            self.c2.cross(self.c0) * inv_det,
            self.c0.cross(self.c1) * inv_det,
        ))
    }

    pub fn invert(&mut self) -> Result<()> {
        *self = self.inverse()?;
        Ok(())
    }

    /// Matrix-Vec3 product, no division.
    #[inline]
    pub fn mul_vec(&self, v: Vec3<S>) -> Vec3<S> {
        self.c0 * v.x + self.c1 * v.y + self.c2 * v.z
    }

    /// Transform a 2D point (w = 1) and divide back by w.
    #[inline]
    pub fn transform_point2(&self, p: Vec2<S>) -> Vec2<S> {
        let h = self.mul_vec(p.extend(S::ONE));
        Vec2::new(h.x / h.z, h.y / h.z)
    }

    /// Transform a 2D direction (w = 0).
    #[inline]
    pub fn transform_vector2(&self, v: Vec2<S>) -> Vec2<S> {
        self.mul_vec(v.extend(S::ZERO)).truncate()
    }

    pub fn mul_mat(&self, rhs: &Mat3<S>) -> Mat3<S> {
        Mat3::from_cols(self.mul_vec(rhs.c0), self.mul_vec(rhs.c1), self.mul_vec(rhs.c2))
    }

    /// Apply a 2D translation after the current transform.
    pub fn translate(&mut self, x: S, y: S) {
        *self = Self::translation(x, y) * *self;
    }

    /// Apply a 2D scaling after the current transform.
    pub fn scale(&mut self, x: S, y: S) {
        *self = Self::scaling(x, y) * *self;
    }

    /// Apply a rotation about `axis` after the current transform.
    pub fn rotate(&mut self, axis: Vec3<S>, angle: S) {
        *self = Self::rotation_axis(axis, angle) * *self;
    }

    /// Apply the rotation of `q` after the current transform.
    pub fn rotate_quat(&mut self, q: Quat<S>) {
        *self = Self::from_quat(q) * *self;
    }
}

impl<S: Scalar> Default for Mat3<S> {
    fn default() -> Self { Self::identity() }
}

impl<S: Scalar> Add for Mat3<S> {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self {
        Self::from_cols(self.c0 + rhs.c0, self.c1 + rhs.c1, self.c2 + rhs.c2)
    }
}

impl<S: Scalar> Sub for Mat3<S> {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self {
        Self::from_cols(self.c0 - rhs.c0, self.c1 - rhs.c1, self.c2 - rhs.c2)
    }
}

impl<S: Scalar> Neg for Mat3<S> {
    type Output = Self;
    #[inline] fn neg(self) -> Self { Self::from_cols(-self.c0, -self.c1, -self.c2) }
}

impl<S: Scalar> Mul<S> for Mat3<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: S) -> Self {
        Self::from_cols(self.c0 * rhs, self.c1 * rhs, self.c2 * rhs)
    }
}

impl<S: Scalar> Div<S> for Mat3<S> {
    type Output = Self;
    #[inline] fn div(self, rhs: S) -> Self {
        Self::from_cols(self.c0 / rhs, self.c1 / rhs, self.c2 / rhs)
    }
}

impl<S: Scalar> MulAssign<S> for Mat3<S> {
    #[inline] fn mul_assign(&mut self, rhs: S) { *self = *self * rhs; }
}

impl<S: Scalar> DivAssign<S> for Mat3<S> {
    #[inline] fn div_assign(&mut self, rhs: S) { *self = *self / rhs; }
}

impl<S: Scalar> Mul<Vec3<S>> for Mat3<S> {
    type Output = Vec3<S>;
    #[inline] fn mul(self, rhs: Vec3<S>) -> Vec3<S> { self.mul_vec(rhs) }
}

impl<S: Scalar> Mul<Vec2<S>> for Mat3<S> {
    type Output = Vec2<S>;
    #[inline] fn mul(self, rhs: Vec2<S>) -> Vec2<S> { self.transform_point2(rhs) }
}

impl<S: Scalar> Mul for Mat3<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: Self) -> Self { self.mul_mat(&rhs) }
}

// `a *= b` is `a = a * b`
impl<S: Scalar> MulAssign for Mat3<S> {
    #[inline] fn mul_assign(&mut self, rhs: Self) { *self = self.mul_mat(&rhs); }
}

impl Mul<Mat3<f64>> for f64 {
    type Output = Mat3<f64>;
    #[inline] fn mul(self, rhs: Mat3<f64>) -> Mat3<f64> { rhs * self }
}

impl Mul<Mat3<f32>> for f32 {
    type Output = Mat3<f32>;
    #[inline] fn mul(self, rhs: Mat3<f32>) -> Mat3<f32> { rhs * self }
}

impl<S: Scalar> From<[[S; 3]; 3]> for Mat3<S> {
    /// Rows in, column-major storage out.
    fn from(rows: [[S; 3]; 3]) -> Self {
        Self::from_rows(rows[0].into(), rows[1].into(), rows[2].into())
    }
}

impl<S: Scalar> From<Mat3<S>> for [[S; 3]; 3] {
    fn from(m: Mat3<S>) -> Self {
        let t = m.transpose();
        [t.c0.into(), t.c1.into(), t.c2.into()]
    }
}

impl<S: Scalar> fmt::Display for Mat3<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let t = self.transpose();
        write!(
            f,
            "mat3([{}, {}, {}], [{}, {}, {}], [{}, {}, {}])",
            t.c0.x, t.c0.y, t.c0.z, t.c1.x, t.c1.y, t.c1.z, t.c2.x, t.c2.y, t.c2.z
        )
    }
}
