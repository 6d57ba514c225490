use crate::error::{check_index, Result};
use crate::{Aabb, Line, Mat3, Scalar, Vec2};
use core::fmt;

/// Planar oriented box: the parallelogram spanned by `tangent` and `normal`
/// from the corner `origin`.
///
/// Corners run `origin`, `+tangent`, `+tangent+normal`, `+normal`, and side
/// `i` joins corner `i` to corner `i + 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obb2<S> {
    pub origin: Vec2<S>,
    pub tangent: Vec2<S>,
    pub normal: Vec2<S>,
}

impl<S: Scalar> Obb2<S> {
    pub const VERTEX_COUNT: usize = 4;
    pub const SIDE_COUNT: usize = 4;

    #[inline]
    pub fn new(origin: Vec2<S>, tangent: Vec2<S>, normal: Vec2<S>) -> Self {
        Self { origin, tangent, normal }
    }

    pub fn from_aabb(b: &Aabb<Vec2<S>>) -> Self {
        let d = b.diagonal();
        Self::new(b.min, Vec2::new(d.x, S::ZERO), Vec2::new(S::ZERO, d.y))
    }

    #[inline]
    pub fn centre(&self) -> Vec2<S> {
        self.origin + (self.tangent + self.normal) * S::HALF
    }

    #[inline]
    pub fn area(&self) -> S {
        self.tangent.cross(self.normal).abs()
    }

    /// Corner `i` taken modulo 4.
    pub fn vertex(&self, i: usize) -> Vec2<S> {
        match i % 4 {
            0 => self.origin,
            1 => self.origin + self.tangent,
            2 => self.origin + self.tangent + self.normal,
            _ => self.origin + self.normal,
        }
    }

    pub fn vertices(&self) -> [Vec2<S>; 4] {
        core::array::from_fn(|i| self.vertex(i))
    }

    pub fn side(&self, i: usize) -> Result<Line<Vec2<S>>> {
        check_index(i, Self::SIDE_COUNT)?;
        Ok(Line::new(self.vertex(i), self.vertex(i + 1)))
    }

    /// Unit normal of side `i`, facing away from the box.
    pub fn side_normal(&self, i: usize) -> Result<Vec2<S>> {
        Ok(self.outward_normal(&self.side(i)?))
    }

    pub(crate) fn outward_normal(&self, side: &Line<Vec2<S>>) -> Vec2<S> {
        let n = side.direction().perpendicular();
        let n = if n.dot(self.centre() - side.a) > S::ZERO { -n } else { n };
        n.normalized()
    }

    pub fn aabb(&self) -> Aabb<Vec2<S>> {
        Aabb::from_points(&self.vertices())
    }

    /// Map every corner through `m` (points, so translation applies).
    pub fn transform(&mut self, m: &Mat3<S>) {
        let origin = m.transform_point2(self.origin);
        self.tangent = m.transform_point2(self.origin + self.tangent) - origin;
        self.normal = m.transform_point2(self.origin + self.normal) - origin;
        self.origin = origin;
    }

    /// Coordinates of a direction in the `(tangent, normal)` basis.
    pub fn world_to_local_vector(&self, v: Vec2<S>) -> Vec2<S> {
        let inv_det = self.tangent.cross(self.normal).recip();
        Vec2::new(v.cross(self.normal) * inv_det, self.tangent.cross(v) * inv_det)
    }

    /// Local coordinates of a point; the box occupies `[0, 1]^2`.
    #[inline]
    pub fn world_to_local(&self, p: Vec2<S>) -> Vec2<S> {
        self.world_to_local_vector(p - self.origin)
    }

    #[inline]
    pub fn local_to_world(&self, l: Vec2<S>) -> Vec2<S> {
        self.origin + self.tangent * l.x + self.normal * l.y
    }

    pub fn contains(&self, p: Vec2<S>) -> bool {
        let l = self.world_to_local(p);
        let inside = |c: S| c >= S::ZERO && c <= S::ONE;
        inside(l.x) && inside(l.y)
    }
}

impl<S: Scalar> Default for Obb2<S> {
    fn default() -> Self {
        Self::new(Vec2::zero(), Vec2::zero(), Vec2::zero())
    }
}

impl<S: Scalar> From<Aabb<Vec2<S>>> for Obb2<S> {
    fn from(b: Aabb<Vec2<S>>) -> Self {
        Self::from_aabb(&b)
    }
}

impl<S: Scalar> fmt::Display for Obb2<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "obb2({}, {}, {})", self.origin, self.tangent, self.normal)
    }
}
