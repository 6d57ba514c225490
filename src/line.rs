use crate::{Aabb, Ray, Scalar, Vector};
use core::fmt;

/// Finite segment from `a` (parameter 0) to `b` (parameter 1).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line<V> {
    pub a: V,
    pub b: V,
}

impl<V: Vector> Line<V> {
    #[inline]
    pub fn new(a: V, b: V) -> Self {
        Self { a, b }
    }

    /// `b - a`
    #[inline]
    pub fn direction(&self) -> V {
        self.b - self.a
    }

    /// The unbounded ray through the segment, with `ray.apply(1) == b`.
    #[inline]
    pub fn ray(&self) -> Ray<V> {
        Ray::from_points(self.a, self.b)
    }

    #[inline]
    pub fn length_sq(&self) -> V::Scalar {
        self.direction().length_sq()
    }

    #[inline]
    pub fn length(&self) -> V::Scalar {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn apply(&self, t: V::Scalar) -> V {
        self.a + self.direction().scaled(t)
    }

    pub fn aabb(&self) -> Aabb<V> {
        Aabb::new(self.a.component_min(self.b), self.a.component_max(self.b))
    }

    /// Parameter in `[0, 1]` of the point on the segment closest to `p`.
    pub fn closest_parameter(&self, p: V) -> V::Scalar {
        let zero = <V::Scalar as Scalar>::ZERO;
        let len_sq = self.length_sq();
        if len_sq <= zero {
            return zero;
        }
        let t = (p - self.a).dot(self.direction()) / len_sq;
        t.clamp(zero, <V::Scalar as Scalar>::ONE)
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

    /// Whether `p` lies on the open segment. Points within `eps` of either
    /// endpoint are not contained, so a degenerate segment contains nothing.
    pub fn contains_eps(&self, p: V, eps: V::Scalar) -> bool {
        let d = self.direction();
        let w = p - self.a;
        let len_sq = d.length_sq();
        if len_sq <= <V::Scalar as Scalar>::ZERO || !w.is_collinear_eps(d, eps) {
            return false;
        }
        // `along` is the parameter scaled by `len_sq`
        let along = w.dot(d);
        let margin = eps * len_sq.sqrt();
        along > margin && along < len_sq - margin
    }

    #[inline]
    pub fn contains(&self, p: V) -> bool {
        self.contains_eps(p, <V::Scalar as Scalar>::TOLERANCE)
    }

    /// Closest pair of points between two segments, `(on self, on other)`.
    ///
    /// Degenerate segments are treated as points.
    pub fn closest_points(&self, other: &Line<V>) -> (V, V) {
        let zero = <V::Scalar as Scalar>::ZERO;
        let one = <V::Scalar as Scalar>::ONE;
        let eps = <V::Scalar as Scalar>::EPSILON;

        let d1 = self.direction();
        let d2 = other.direction();
        let r = self.a - other.a;
        let a = d1.length_sq();
        let e = d2.length_sq();
        let f = d2.dot(r);

        let (s, t) = if a <= eps && e <= eps {
            (zero, zero)
        } else if a <= eps {
            (zero, (f / e).clamp(zero, one))
        } else {
            let c = d1.dot(r);
            if e <= eps {
                ((-c / a).clamp(zero, one), zero)
            } else {
                let b = d1.dot(d2);
                let denom = a * e - b * b;
                // Parallel segments: any s works, start from the first endpoint.
                let s = if denom > zero {
                    ((b * f - c * e) / denom).clamp(zero, one)
                } else {
                    zero
                };
                let t = (b * s + f) / e;
                if t < zero {
                    ((-c / a).clamp(zero, one), zero)
                } else if t > one {
                    (((b - c) / a).clamp(zero, one), one)
                } else {
                    (s, t)
                }
            }
        };

        (self.apply(s), other.apply(t))
    }

    /// Shortest distance between two segments.
    pub fn distance_to_line(&self, other: &Line<V>) -> V::Scalar {
        let (p, q) = self.closest_points(other);
        p.distance(q)
    }
}

impl<V: Vector> Default for Line<V> {
    fn default() -> Self {
        Self::new(V::default(), V::default())
    }
}

impl<V: Vector> fmt::Display for Line<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line{}({}, {})", V::DIM, self.a, self.b)
    }
}
