use crate::{Scalar, Vector};
use core::fmt;

/// Half-line `origin + t * direction` for `t >= 0`.
///
/// The direction is not required to be unit length; the hit parameter `t`
/// of every trace query is measured in multiples of it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray<V> {
    pub origin: V,
    pub direction: V,
}

impl<V: Vector> Ray<V> {
    #[inline]
    pub fn new(origin: V, direction: V) -> Self {
        Self { origin, direction }
    }

    /// Ray starting at `from` that passes through `to` at `t = 1`.
    #[inline]
    pub fn from_points(from: V, to: V) -> Self {
        Self::new(from, to - from)
    }

    #[inline]
    pub fn apply(&self, t: V::Scalar) -> V {
        self.origin + self.direction.scaled(t)
    }

    /// Parameter of the point on the ray closest to `p`, clamped to `t >= 0`.
    pub fn closest_parameter(&self, p: V) -> V::Scalar {
        let len_sq = self.direction.length_sq();
        if len_sq <= <V::Scalar as Scalar>::ZERO {
            return <V::Scalar as Scalar>::ZERO;
        }
        let t = (p - self.origin).dot(self.direction) / len_sq;
        t.max(<V::Scalar as Scalar>::ZERO)
    }

    #[inline]
    pub fn closest_point(&self, p: V) -> V {
        self.apply(self.closest_parameter(p))
    }

    #[inline]
    pub fn distance_sq(&self, p: V) -> V::Scalar {
        self.closest_point(p).distance_sq(p)
    }

    #[inline]
    pub fn distance(&self, p: V) -> V::Scalar {
        self.distance_sq(p).sqrt()
    }

    /// Whether `p` lies on the ray: collinear with the direction and not
    /// behind the origin.
    pub fn contains_eps(&self, p: V, eps: V::Scalar) -> bool {
        let w = p - self.origin;
        w.is_collinear_eps(self.direction, eps) && w.dot(self.direction) >= -eps
    }

    #[inline]
    pub fn contains(&self, p: V) -> bool {
        self.contains_eps(p, <V::Scalar as Scalar>::TOLERANCE)
    }
}

impl<V: Vector> Default for Ray<V> {
    fn default() -> Self {
        Self::new(V::default(), V::default())
    }
}

impl<V: Vector> fmt::Display for Ray<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ray{}({}, {})", V::DIM, self.origin, self.direction)
    }
}
