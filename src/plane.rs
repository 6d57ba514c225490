use crate::{Aabb, Obb, Ray, Scalar, Vec3};
use core::fmt;

/// Which side of a plane something lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Negative,
    /// On the plane (points) or straddling it (volumes).
    On,
    Positive,
}

impl Side {
    pub fn is_positive(self) -> bool {
        self == Side::Positive
    }
    pub fn is_negative(self) -> bool {
        self == Side::Negative
    }
    pub fn is_on(self) -> bool {
        self == Side::On
    }
}

/// Plane `a*x + b*y + c*z + d = 0`.
///
/// The normal `(a, b, c)` is kept as given, not normalized, so `apply`
/// returns a distance scaled by its length. On-plane tests scale their
/// tolerance by the same length.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane<S> {
    pub a: S,
    pub b: S,
    pub c: S,
    pub d: S,
}

impl<S: Scalar> Plane<S> {
    #[inline]
    pub fn new(a: S, b: S, c: S, d: S) -> Self {
        Self { a, b, c, d }
    }

    /// Plane through `origin` with the given normal.
    #[inline]
    pub fn from_origin_normal(origin: Vec3<S>, normal: Vec3<S>) -> Self {
        Self::new(normal.x, normal.y, normal.z, -normal.dot(origin))
    }

    /// Plane `normal . p + d = 0`.
    #[inline]
    pub fn from_distance_normal(d: S, normal: Vec3<S>) -> Self {
        Self::new(normal.x, normal.y, normal.z, d)
    }

    /// Plane through three points, normal by the right-hand rule.
    pub fn from_points(p0: Vec3<S>, p1: Vec3<S>, p2: Vec3<S>) -> Self {
        Self::from_origin_normal(p0, (p1 - p0).cross(p2 - p0))
    }

    #[inline]
    pub fn normal(&self) -> Vec3<S> {
        Vec3::new(self.a, self.b, self.c)
    }

    /// Point of the plane closest to the coordinate origin.
    pub fn origin(&self) -> Vec3<S> {
        let n = self.normal();
        n * (-self.d / n.length_sq())
    }

    /// Same plane with a unit normal, so `apply` is a true signed distance.
    pub fn normalized(&self) -> Self {
        let inv = self.normal().length().recip();
        Self::new(self.a * inv, self.b * inv, self.c * inv, self.d * inv)
    }

    /// False for a degenerate plane whose normal is zero, whatever `d` is.
    pub fn is_correct(&self) -> bool {
        self.a != S::ZERO || self.b != S::ZERO || self.c != S::ZERO
    }

    /// Signed, normal-scaled distance of `p`.
    #[inline]
    pub fn apply(&self, p: Vec3<S>) -> S {
        self.a * p.x + self.b * p.y + self.c * p.z + self.d
    }

    pub fn contains_eps(&self, p: Vec3<S>, eps: S) -> bool {
        self.apply(p).abs() <= eps * self.normal().length()
    }

    #[inline]
    pub fn contains(&self, p: Vec3<S>) -> bool {
        self.contains_eps(p, S::TOLERANCE)
    }

    /// The whole ray lies in the plane.
    pub fn contains_ray(&self, ray: &Ray<Vec3<S>>) -> bool {
        self.contains(ray.origin) && self.parallel(ray)
    }

    fn side_of(&self, lo: S, hi: S, eps: S) -> Side {
        let tol = eps * self.normal().length();
        if lo > tol {
            Side::Positive
        } else if hi < -tol {
            Side::Negative
        } else {
            Side::On
        }
    }

    pub fn classify_eps(&self, p: Vec3<S>, eps: S) -> Side {
        let v = self.apply(p);
        self.side_of(v, v, eps)
    }

    #[inline]
    pub fn classify(&self, p: Vec3<S>) -> Side {
        self.classify_eps(p, S::TOLERANCE)
    }

    fn classify_points(&self, points: &[Vec3<S>]) -> Side {
        let (lo, hi) = points.iter().fold((S::INFINITY, S::NEG_INFINITY), |(lo, hi), p| {
            let v = self.apply(*p);
            (lo.min(v), hi.max(v))
        });
        self.side_of(lo, hi, S::TOLERANCE)
    }

    /// `On` when the box touches or straddles the plane.
    pub fn classify_aabb(&self, b: &Aabb<Vec3<S>>) -> Side {
        self.classify_points(&b.vertices())
    }

    pub fn classify_obb(&self, b: &Obb<S>) -> Side {
        self.classify_points(&b.vertices())
    }

    /// Direction within `eps` (as a sine) of the plane.
    pub fn parallel_eps(&self, ray: &Ray<Vec3<S>>, eps: S) -> bool {
        let n = self.normal();
        n.dot(ray.direction).abs() <= eps * n.length() * ray.direction.length()
    }

    #[inline]
    pub fn parallel(&self, ray: &Ray<Vec3<S>>) -> bool {
        self.parallel_eps(ray, S::TOLERANCE)
    }

    /// The ray's supporting line crosses the plane.
    #[inline]
    pub fn test_intersection(&self, ray: &Ray<Vec3<S>>) -> bool {
        !self.parallel(ray)
    }

    /// Parameter `t` with `apply(ray.apply(t)) == 0`. Infinite or NaN for a
    /// parallel ray.
    #[inline]
    pub fn trace(&self, ray: &Ray<Vec3<S>>) -> S {
        -self.apply(ray.origin) / self.normal().dot(ray.direction)
    }

    /// Hit parameter if the ray is not parallel and hits within
    /// `[t_min, t_max]`.
    pub fn trace_range(&self, ray: &Ray<Vec3<S>>, t_min: S, t_max: S) -> Option<S> {
        if self.parallel(ray) {
            return None;
        }
        let t = self.trace(ray);
        (t >= t_min && t <= t_max).then_some(t)
    }

    /// Line shared with `other`, as a ray along `n1 x n2`. `None` for
    /// parallel planes.
    pub fn intersect_plane(&self, other: &Plane<S>) -> Option<Ray<Vec3<S>>> {
        let n1 = self.normal();
        let n2 = other.normal();
        let dir = n1.cross(n2);
        let len_sq = dir.length_sq();
        if len_sq <= S::TOLERANCE * S::TOLERANCE * n1.length_sq() * n2.length_sq() {
            return None;
        }
        // n . p = h on each plane
        let (h1, h2) = (-self.d, -other.d);
        let point = (n2 * h1 - n1 * h2).cross(dir) / len_sq;
        Some(Ray::new(point, dir))
    }
}

impl<S: Scalar> Default for Plane<S> {
    fn default() -> Self {
        Self::new(S::ZERO, S::ZERO, S::ZERO, S::ZERO)
    }
}

impl<S: Scalar> From<[S; 4]> for Plane<S> {
    fn from(p: [S; 4]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }
}

impl<S: Scalar> fmt::Display for Plane<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "plane({}, {}, {}, {})", self.a, self.b, self.c, self.d)
    }
}
