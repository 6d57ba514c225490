use crate::error::{check_index, Result};
use crate::{Aabb, Mat4, Obb, Plane, Scalar, Side, Vec3, Vec4};
use core::fmt;

/// View volume bounded by six planes whose positive sides face inwards.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frustum<S> {
    pub planes: [Plane<S>; 6],
}

impl<S: Scalar> Frustum<S> {
    pub const LEFT: usize = 0;
    pub const RIGHT: usize = 1;
    pub const TOP: usize = 2;
    pub const BOTTOM: usize = 3;
    pub const NEAR: usize = 4;
    pub const FAR: usize = 5;
    pub const PLANE_COUNT: usize = 6;

    /// Planes in `LEFT, RIGHT, TOP, BOTTOM, NEAR, FAR` order.
    #[inline]
    pub fn from_planes(planes: [Plane<S>; 6]) -> Self {
        Self { planes }
    }

    pub fn from_matrix(m: &Mat4<S>) -> Self {
        let mut f = Self::default();
        f.load(m);
        f
    }

    /// Extract the clip planes of a view-projection matrix. Clip space is
    /// `-w <= x, y <= w` and `0 <= z <= w`.
    pub fn load(&mut self, m: &Mat4<S>) {
        let r0 = m.row_unchecked(0);
        let r1 = m.row_unchecked(1);
        let r2 = m.row_unchecked(2);
        let r3 = m.row_unchecked(3);
        let plane = |v: Vec4<S>| Plane::new(v.x, v.y, v.z, v.w);
        self.planes[Self::LEFT] = plane(r3 + r0);
        self.planes[Self::RIGHT] = plane(r3 - r0);
        self.planes[Self::TOP] = plane(r3 - r1);
        self.planes[Self::BOTTOM] = plane(r3 + r1);
        self.planes[Self::NEAR] = plane(r2);
        self.planes[Self::FAR] = plane(r3 - r2);
    }

    pub fn plane(&self, index: usize) -> Result<&Plane<S>> {
        check_index(index, Self::PLANE_COUNT)?;
        Ok(&self.planes[index])
    }

    /// Inside or on every plane.
    pub fn contains(&self, p: Vec3<S>) -> bool {
        self.planes.iter().all(|pl| pl.classify(p) != Side::Negative)
    }

    /// Conservative culling test: `false` only when the box lies entirely
    /// outside one of the planes.
    pub fn test_intersection_aabb(&self, b: &Aabb<Vec3<S>>) -> bool {
        self.planes.iter().all(|pl| pl.classify_aabb(b) != Side::Negative)
    }

    pub fn test_intersection_obb(&self, b: &Obb<S>) -> bool {
        self.planes.iter().all(|pl| pl.classify_obb(b) != Side::Negative)
    }
}

impl<S: Scalar> Default for Frustum<S> {
    fn default() -> Self {
        Self::from_planes([Plane::default(); 6])
    }
}

impl<S: Scalar> From<Mat4<S>> for Frustum<S> {
    fn from(m: Mat4<S>) -> Self {
        Self::from_matrix(&m)
    }
}

impl<S: Scalar> fmt::Display for Frustum<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "frustum(")?;
        for (i, p) in self.planes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, ")")
    }
}
