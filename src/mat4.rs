use crate::error::{check_index, GeomError, Result};
use crate::{Mat3, Quat, Scalar, Vec3, Vec4};
use core::fmt;
use core::ops::{Add, Div, DivAssign, Mul, MulAssign, Neg, Sub};

/// 4x4 matrix, column-major storage.
///
/// Used for homogeneous transforms (affine: rotation + translation + scale)
/// and projections. Translation lives in column 3. Transforms act on column
/// vectors: `a * b` applies `b` first, then `a`.
///
/// Projections follow the left-handed convention with clip-space depth in
/// `[0, 1]`: the camera looks down `+z`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat4<S> {
    pub c0: Vec4<S>,
    pub c1: Vec4<S>,
    pub c2: Vec4<S>,
    pub c3: Vec4<S>,
}

impl<S: Scalar> Mat4<S> {
    /// Construct from elements in row-major argument order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        m00: S, m01: S, m02: S, m03: S,
        m10: S, m11: S, m12: S, m13: S,
        m20: S, m21: S, m22: S, m23: S,
        m30: S, m31: S, m32: S, m33: S,
    ) -> Self {
        Self {
            c0: Vec4::new(m00, m10, m20, m30),
            c1: Vec4::new(m01, m11, m21, m31),
            c2: Vec4::new(m02, m12, m22, m32),
            c3: Vec4::new(m03, m13, m23, m33),
        }
    }

    #[inline]
    pub fn from_cols(c0: Vec4<S>, c1: Vec4<S>, c2: Vec4<S>, c3: Vec4<S>) -> Self {
        Self { c0, c1, c2, c3 }
    }

    #[inline]
    pub fn from_rows(r0: Vec4<S>, r1: Vec4<S>, r2: Vec4<S>, r3: Vec4<S>) -> Self {
        Self::from_cols(r0, r1, r2, r3).transpose()
    }

    #[inline]
    pub fn zero() -> Self {
        Self::from_cols(Vec4::zero(), Vec4::zero(), Vec4::zero(), Vec4::zero())
    }

    #[inline]
    pub fn identity() -> Self {
        Self::scaling(S::ONE, S::ONE, S::ONE)
    }

    /// Build from rotation (3x3) and translation
    pub fn from_rotation_translation(rot: Mat3<S>, trans: Vec3<S>) -> Self {
        Self::from_cols(
            rot.c0.extend(S::ZERO),
            rot.c1.extend(S::ZERO),
            rot.c2.extend(S::ZERO),
            trans.extend(S::ONE),
        )
    }

    /// Translation matrix
    pub fn translation(dx: S, dy: S, dz: S) -> Self {
        Self::new(
            S::ONE,  S::ZERO, S::ZERO, dx,
            S::ZERO, S::ONE,  S::ZERO, dy,
            S::ZERO, S::ZERO, S::ONE,  dz,
            S::ZERO, S::ZERO, S::ZERO, S::ONE,
        )
    }

    #[inline]
    pub fn from_translation(v: Vec3<S>) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    /// Non-uniform scale matrix
    pub fn scaling(sx: S, sy: S, sz: S) -> Self {
        Self::new(
            sx,      S::ZERO, S::ZERO, S::ZERO,
            S::ZERO, sy,      S::ZERO, S::ZERO,
            S::ZERO, S::ZERO, sz,      S::ZERO,
            S::ZERO, S::ZERO, S::ZERO, S::ONE,
        )
    }

    #[inline]
    pub fn from_scaling(v: Vec3<S>) -> Self {
        Self::scaling(v.x, v.y, v.z)
    }

    /// Rotation about X axis
    pub fn rotation_x(angle: S) -> Self {
        Self::from_mat3(Mat3::rotation_x(angle))
    }

    /// Rotation about Y axis
    pub fn rotation_y(angle: S) -> Self {
        Self::from_mat3(Mat3::rotation_y(angle))
    }

    /// Rotation about Z axis
    pub fn rotation_z(angle: S) -> Self {
        Self::from_mat3(Mat3::rotation_z(angle))
    }

    /// Rotation about arbitrary axis (Rodrigues' formula)
    pub fn rotation_axis(axis: Vec3<S>, angle: S) -> Self {
        Self::from_mat3(Mat3::rotation_axis(axis, angle))
    }

    pub fn rotation_euler(roll: S, pitch: S, yaw: S) -> Self {
        Self::from_mat3(Mat3::rotation_euler(roll, pitch, yaw))
    }

    #[inline]
    pub fn from_quat(q: Quat<S>) -> Self {
        Self::from_mat3(q.to_mat3())
    }

    #[inline]
    pub fn from_mat3(m: Mat3<S>) -> Self {
        Self::from_rotation_translation(m, Vec3::zero())
    }

    /// World-to-view transform for a camera at `eye` looking at `target`.
    pub fn lookat(eye: Vec3<S>, target: Vec3<S>, up: Vec3<S>) -> Self {
        let z = (target - eye).normalized();
        let x = up.cross(z).normalized();
        let y = z.cross(x);
        Self::new(
            x.x, x.y, x.z, -x.dot(eye),
            y.x, y.y, y.z, -y.dot(eye),
            z.x, z.y, z.z, -z.dot(eye),
            S::ZERO, S::ZERO, S::ZERO, S::ONE,
        )
    }

    /// Perspective projection. `fov_y` is the full vertical field of view in
    /// radians; `near` maps to depth 0 and `far` to depth 1.
    pub fn perspective(fov_y: S, aspect: S, near: S, far: S) -> Self {
        let ys = (fov_y * S::HALF).tan().recip();
        let xs = ys / aspect;
        let q = far / (far - near);
        Self::new(
            xs,      S::ZERO, S::ZERO, S::ZERO,
            S::ZERO, ys,      S::ZERO, S::ZERO,
            S::ZERO, S::ZERO, q,       -q * near,
            S::ZERO, S::ZERO, S::ONE,  S::ZERO,
        )
    }

    /// Orthographic projection of a `width` x `height` box centred on the
    /// view axis.
    pub fn ortho(width: S, height: S, near: S, far: S) -> Self {
        let d = (far - near).recip();
        Self::new(
            S::TWO / width, S::ZERO,         S::ZERO, S::ZERO,
            S::ZERO,        S::TWO / height, S::ZERO, S::ZERO,
            S::ZERO,        S::ZERO,         d,       -near * d,
            S::ZERO,        S::ZERO,         S::ZERO, S::ONE,
        )
    }

    /// Element at column `col`, row `row`.
    pub fn get(&self, col: usize, row: usize) -> Result<S> {
        check_index(col, 4)?;
        check_index(row, 4)?;
        Ok(self.at(col, row))
    }

    pub fn set(&mut self, col: usize, row: usize, value: S) -> Result<()> {
        check_index(col, 4)?;
        check_index(row, 4)?;
        let c = match col { 0 => &mut self.c0, 1 => &mut self.c1, 2 => &mut self.c2, _ => &mut self.c3 };
        match row { 0 => c.x = value, 1 => c.y = value, 2 => c.z = value, _ => c.w = value }
        Ok(())
    }

    #[inline]
    pub(crate) fn at(&self, col: usize, row: usize) -> S {
        let c = match col { 0 => &self.c0, 1 => &self.c1, 2 => &self.c2, _ => &self.c3 };
        match row { 0 => c.x, 1 => c.y, 2 => c.z, _ => c.w }
    }

    #[inline]
    pub(crate) fn row_unchecked(&self, i: usize) -> Vec4<S> {
        Vec4::new(self.at(0, i), self.at(1, i), self.at(2, i), self.at(3, i))
    }

    pub fn column(&self, i: usize) -> Result<Vec4<S>> {
        check_index(i, 4)?;
        Ok(match i { 0 => self.c0, 1 => self.c1, 2 => self.c2, _ => self.c3 })
    }

    pub fn row(&self, i: usize) -> Result<Vec4<S>> {
        check_index(i, 4)?;
        Ok(self.row_unchecked(i))
    }

    /// First three components of column `i`.
    pub fn projected_column(&self, i: usize) -> Result<Vec3<S>> {
        Ok(self.column(i)?.truncate())
    }

    /// First three components of row `i`.
    pub fn projected_row(&self, i: usize) -> Result<Vec3<S>> {
        Ok(self.row(i)?.truncate())
    }

    /// Extract the upper-left 3x3 submatrix
    #[inline]
    pub fn upper_left_3x3(&self) -> Mat3<S> {
        Mat3::from_cols(self.c0.truncate(), self.c1.truncate(), self.c2.truncate())
    }

    /// Extract the translation column
    #[inline]
    pub fn translation_vec(&self) -> Vec3<S> {
        self.c3.truncate()
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::new(
            self.c0.x, self.c0.y, self.c0.z, self.c0.w,
            self.c1.x, self.c1.y, self.c1.z, self.c1.w,
            self.c2.x, self.c2.y, self.c2.z, self.c2.w,
            self.c3.x, self.c3.y, self.c3.z, self.c3.w,
        )
    }

    #[inline]
    pub fn transpose_in_place(&mut self) {
        *self = self.transpose();
    }

    #[inline]
    pub fn trace(&self) -> S {
        self.c0.x + self.c1.y + self.c2.z + self.c3.w
    }

    /// 2x2 sub-determinants of the top two and bottom two rows.
    fn minors(&self) -> ([S; 6], [S; 6]) {
        let m = |r, c| self.at(c, r);
        let s = [
            m(0, 0) * m(1, 1) - m(1, 0) * m(0, 1),
            m(0, 0) * m(1, 2) - m(1, 0) * m(0, 2),
            m(0, 0) * m(1, 3) - m(1, 0) * m(0, 3),
            m(0, 1) * m(1, 2) - m(1, 1) * m(0, 2),
            m(0, 1) * m(1, 3) - m(1, 1) * m(0, 3),
            m(0, 2) * m(1, 3) - m(1, 2) * m(0, 3),
        ];
        let c = [
            m(2, 0) * m(3, 1) - m(3, 0) * m(2, 1),
            m(2, 0) * m(3, 2) - m(3, 0) * m(2, 2),
            m(2, 0) * m(3, 3) - m(3, 0) * m(2, 3),
            m(2, 1) * m(3, 2) - m(3, 1) * m(2, 2),
            m(2, 1) * m(3, 3) - m(3, 1) * m(2, 3),
            m(2, 2) * m(3, 3) - m(3, 2) * m(2, 3),
        ];
        (s, c)
    }

    pub fn determinant(&self) -> S {
        let (s, c) = self.minors();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Hadamard bound on `|det|`.
    fn column_norm_product(&self) -> S {
        self.c0.length() * self.c1.length() * self.c2.length() * self.c3.length()
    }

    /// 4x4 matrix inverse via cofactor expansion. Fails when the determinant
    /// is zero relative to the product of the column norms.
    pub fn inverse(&self) -> Result<Self> {
        let m = |r, c| self.at(c, r);
        let (s, c) = self.minors();

        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0];
        if !det.is_finite() || det.abs() <= S::EPSILON * self.column_norm_product() {
            return Err(GeomError::singular(det.to_f64()));
        }

        let inv_det = det.recip();
        Ok(Self::new(
            ( m(1, 1) * c[5] - m(1, 2) * c[4] + m(1, 3) * c[3]) * inv_det,
            (-m(0, 1) * c[5] + m(0, 2) * c[4] - m(0, 3) * c[3]) * inv_det,
            ( m(3, 1) * s[5] - m(3, 2) * s[4] + m(3, 3) * s[3]) * inv_det,
            (-m(2, 1) * s[5] + m(2, 2) * s[4] - m(2, 3) * s[3]) * inv_det,
            (-m(1, 0) * c[5] + m(1, 2) * c[2] - m(1, 3) * c[1]) * inv_det,
            ( m(0, 0) * c[5] - m(0, 2) * c[2] + m(0, 3) * c[1]) * inv_det,
            (-m(3, 0) * s[5] + m(3, 2) * s[2] - m(3, 3) * s[1]) * inv_det,
            ( m(2, 0) * s[5] - m(2, 2) * s[2] + m(2, 3) * s[1]) * inv_det,
            ( m(1, 0) * c[4] - m(1, 1) * c[2] + m(1, 3) * c[0]) * inv_det,
            (-m(0, 0) * c[4] + m(0, 1) * c[2] - m(0, 3) * c[0]) * inv_det,
            ( m(3, 0) * s[4] - m(3, 1) * s[2] + m(3, 3) * s[0]) * inv_det,
            (-m(2, 0) * s[4] + m(2, 1) * s[2] - m(2, 3) * s[0]) * inv_det,
            (-m(1, 0) * c[3] + m(1, 1) * c[1] - m(1, 2) * c[0]) * inv_det,
            ( m(0, 0) * c[3] - m(0, 1) * c[1] + m(0, 2) * c[0]) * inv_det,
            (-m(3, 0) * s[3] + m(3, 1) * s[1] - m(3, 2) * s[0]) * inv_det,
            ( m(2, 0) * s[3] - m(2, 1) * s[1] + m(2, 2) * s[0]) * inv_det,
        ))
    }

    pub fn invert(&mut self) -> Result<()> {
        *self = self.inverse()?;
        Ok(())
    }

    /// Matrix-Vec4 product, no division.
    #[inline]
    pub fn mul_vec4(&self, v: Vec4<S>) -> Vec4<S> {
        self.c0 * v.x + self.c1 * v.y + self.c2 * v.z + self.c3 * v.w
    }

    /// Promote `p` to w = 1 without dividing the result.
    #[inline]
    pub fn transform_homogeneous(&self, p: Vec3<S>) -> Vec4<S> {
        self.mul_vec4(p.extend(S::ONE))
    }

    /// Transform a point: promote to w = 1, then divide back by w.
    #[inline]
    pub fn transform_point(&self, p: Vec3<S>) -> Vec3<S> {
        self.transform_homogeneous(p).homogeneous_divide()
    }

    /// Transform a vector (w=0, ignores translation)
    #[inline]
    pub fn transform_vector(&self, v: Vec3<S>) -> Vec3<S> {
        self.mul_vec4(v.extend(S::ZERO)).truncate()
    }

    /// Matrix-matrix product
    pub fn mul_mat(&self, rhs: &Mat4<S>) -> Mat4<S> {
        Mat4::from_cols(
            self.mul_vec4(rhs.c0),
            self.mul_vec4(rhs.c1),
            self.mul_vec4(rhs.c2),
            self.mul_vec4(rhs.c3),
        )
    }

    /// Apply a translation after the current transform.
    pub fn translate(&mut self, x: S, y: S, z: S) {
        *self = Self::translation(x, y, z) * *self;
    }

    /// Apply a scaling after the current transform. The stored translation
    /// is scaled too.
    pub fn scale(&mut self, x: S, y: S, z: S) {
        *self = Self::scaling(x, y, z) * *self;
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

impl<S: Scalar> Default for Mat4<S> {
    fn default() -> Self { Self::identity() }
}

impl<S: Scalar> Add for Mat4<S> {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self {
        Self::from_cols(self.c0 + rhs.c0, self.c1 + rhs.c1, self.c2 + rhs.c2, self.c3 + rhs.c3)
    }
}

impl<S: Scalar> Sub for Mat4<S> {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self {
        Self::from_cols(self.c0 - rhs.c0, self.c1 - rhs.c1, self.c2 - rhs.c2, self.c3 - rhs.c3)
    }
}

impl<S: Scalar> Neg for Mat4<S> {
    type Output = Self;
    #[inline] fn neg(self) -> Self {
        Self::from_cols(-self.c0, -self.c1, -self.c2, -self.c3)
    }
}

impl<S: Scalar> Mul<S> for Mat4<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: S) -> Self {
        Self::from_cols(self.c0 * rhs, self.c1 * rhs, self.c2 * rhs, self.c3 * rhs)
    }
}

impl<S: Scalar> Div<S> for Mat4<S> {
    type Output = Self;
    #[inline] fn div(self, rhs: S) -> Self {
        Self::from_cols(self.c0 / rhs, self.c1 / rhs, self.c2 / rhs, self.c3 / rhs)
    }
}

impl<S: Scalar> MulAssign<S> for Mat4<S> {
    #[inline] fn mul_assign(&mut self, rhs: S) { *self = *self * rhs; }
}

impl<S: Scalar> DivAssign<S> for Mat4<S> {
    #[inline] fn div_assign(&mut self, rhs: S) { *self = *self / rhs; }
}

// Mat4 * Vec4
impl<S: Scalar> Mul<Vec4<S>> for Mat4<S> {
    type Output = Vec4<S>;
    #[inline] fn mul(self, rhs: Vec4<S>) -> Vec4<S> { self.mul_vec4(rhs) }
}

// Mat4 * Vec3, with perspective divide
impl<S: Scalar> Mul<Vec3<S>> for Mat4<S> {
    type Output = Vec3<S>;
    #[inline] fn mul(self, rhs: Vec3<S>) -> Vec3<S> { self.transform_point(rhs) }
}

// Mat4 * Mat4
impl<S: Scalar> Mul for Mat4<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: Self) -> Self { self.mul_mat(&rhs) }
}

impl<S: Scalar> MulAssign for Mat4<S> {
    #[inline] fn mul_assign(&mut self, rhs: Self) { *self = self.mul_mat(&rhs); }
}

impl Mul<Mat4<f64>> for f64 {
    type Output = Mat4<f64>;
    #[inline] fn mul(self, rhs: Mat4<f64>) -> Mat4<f64> { rhs * self }
}

impl Mul<Mat4<f32>> for f32 {
    type Output = Mat4<f32>;
    #[inline] fn mul(self, rhs: Mat4<f32>) -> Mat4<f32> { rhs * self }
}

impl<S: Scalar> From<[[S; 4]; 4]> for Mat4<S> {
    fn from(rows: [[S; 4]; 4]) -> Self {
        Self::from_rows(rows[0].into(), rows[1].into(), rows[2].into(), rows[3].into())
    }
}

impl<S: Scalar> From<Mat4<S>> for [[S; 4]; 4] {
    fn from(m: Mat4<S>) -> Self {
        [
            m.row_unchecked(0).into(),
            m.row_unchecked(1).into(),
            m.row_unchecked(2).into(),
            m.row_unchecked(3).into(),
        ]
    }
}

impl<S: Scalar> fmt::Display for Mat4<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "mat4(")?;
        for i in 0..4 {
            let r = self.row_unchecked(i);
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}, {}, {}, {}]", r.x, r.y, r.z, r.w)?;
        }
        write!(f, ")")
    }
}
