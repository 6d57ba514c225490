use crate::{Aabb, Capsule, Line, Ray, Scalar, Vector};
use core::fmt;

/// Ball (a disc in 2D) given by centre and radius.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere<V: Vector> {
    pub centre: V,
    pub radius: V::Scalar,
}

impl<V: Vector> Sphere<V> {
    #[inline]
    pub fn new(centre: V, radius: V::Scalar) -> Self {
        Self { centre, radius }
    }

    /// Smallest sphere enclosing the box.
    pub fn from_aabb(b: &Aabb<V>) -> Self {
        let centre = b.centre();
        Self::new(centre, b.max.distance(centre))
    }

    pub fn aabb(&self) -> Aabb<V> {
        let r = V::splat(self.radius);
        Aabb::new(self.centre - r, self.centre + r)
    }

    /// Strict containment; points on the surface are outside.
    #[inline]
    pub fn contains(&self, p: V) -> bool {
        p.distance_sq(self.centre) < self.radius * self.radius
    }

    /// Overlap test; touching spheres intersect.
    #[inline]
    pub fn test_intersection(&self, other: &Sphere<V>) -> bool {
        let r = self.radius + other.radius;
        self.centre.distance_sq(other.centre) <= r * r
    }

    #[inline]
    pub fn test_intersection_ray(&self, ray: &Ray<V>) -> bool {
        ray.distance_sq(self.centre) <= self.radius * self.radius
    }

    #[inline]
    pub fn test_intersection_line(&self, line: &Line<V>) -> bool {
        line.distance_sq(self.centre) <= self.radius * self.radius
    }

    #[inline]
    pub fn test_intersection_capsule(&self, capsule: &Capsule<V>) -> bool {
        let r = self.radius + capsule.radius;
        capsule.axis.distance_sq(self.centre) <= r * r
    }

    /// Parameters `(t0, t1)`, `t0 <= t1`, where the ray's supporting line
    /// crosses the surface. `None` if it misses or the sphere lies entirely
    /// behind the origin. `t0` is negative when the origin is inside.
    pub fn query_ray(&self, ray: &Ray<V>) -> Option<(V::Scalar, V::Scalar)> {
        let zero = <V::Scalar as Scalar>::ZERO;
        let m = ray.origin - self.centre;
        let a = ray.direction.length_sq();
        if a <= zero {
            return None;
        }
        let b = m.dot(ray.direction);
        let c = m.length_sq() - self.radius * self.radius;
        let disc = b * b - a * c;
        if disc < zero {
            return None;
        }
        let root = disc.sqrt();
        let t0 = (-b - root) / a;
        let t1 = (-b + root) / a;
        if t1 < zero {
            return None;
        }
        Some((t0, t1))
    }
}

impl<V: Vector> Default for Sphere<V> {
    fn default() -> Self {
        Self::new(V::default(), <V::Scalar as Scalar>::ZERO)
    }
}

impl<V: Vector> fmt::Display for Sphere<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "sphere{}({}, {})", V::DIM, self.centre, self.radius)
    }
}
