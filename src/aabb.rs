use crate::{Ray, Scalar, Vec3, Vector};
use core::fmt;

/// Axis-aligned bounding box.
///
/// Invariant for a non-empty box: `min <= max` component-wise. [`Aabb::empty`]
/// deliberately breaks it so that the first [`Aabb::extend`] snaps the box
/// onto that point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb<V> {
    pub min: V,
    pub max: V,
}

impl<V: Vector> Aabb<V> {
    #[inline]
    pub fn new(min: V, max: V) -> Self {
        Self { min, max }
    }

    /// Inverted box that contains nothing; the identity for `extend`.
    #[inline]
    pub fn empty() -> Self {
        Self::new(
            V::splat(<V::Scalar as Scalar>::MAX),
            V::splat(-<V::Scalar as Scalar>::MAX),
        )
    }

    /// Zero-volume box around a single point.
    #[inline]
    pub fn from_point(p: V) -> Self {
        Self::new(p, p)
    }

    /// Smallest box containing every point; empty for an empty slice.
    pub fn from_points(points: &[V]) -> Self {
        points.iter().fold(Self::empty(), |mut acc, p| {
            acc.extend(*p);
            acc
        })
    }

    /// Cube of edge length `size` centred on `centre`.
    pub fn from_centre_size(centre: V, size: V::Scalar) -> Self {
        let half = V::splat(size * <V::Scalar as Scalar>::HALF);
        Self::new(centre - half, centre + half)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..V::DIM).any(|i| self.min.component(i) > self.max.component(i))
    }

    #[inline]
    pub fn centre(&self) -> V {
        (self.min + self.max).scaled(<V::Scalar as Scalar>::HALF)
    }

    /// `max - min`
    #[inline]
    pub fn diagonal(&self) -> V {
        self.max - self.min
    }

    /// Swap coordinates where `min > max`.
    pub fn normalize(&mut self) {
        let (lo, hi) = (self.min, self.max);
        self.min = lo.component_min(hi);
        self.max = lo.component_max(hi);
    }

    /// Grow to include `p`.
    #[inline]
    pub fn extend(&mut self, p: V) {
        self.min = self.min.component_min(p);
        self.max = self.max.component_max(p);
    }

    /// Grow to the union with `other`.
    #[inline]
    pub fn extend_aabb(&mut self, other: &Aabb<V>) {
        self.extend(other.min);
        self.extend(other.max);
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: V) -> bool {
        (0..V::DIM).all(|i| {
            let c = p.component(i);
            self.min.component(i) <= c && c <= self.max.component(i)
        })
    }

    #[inline]
    pub fn contains_aabb(&self, other: &Aabb<V>) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Overlap test; touching faces count as intersecting.
    pub fn test_intersection(&self, other: &Aabb<V>) -> bool {
        (0..V::DIM).all(|i| {
            other.max.component(i) >= self.min.component(i)
                && self.max.component(i) >= other.min.component(i)
        })
    }

    /// Corner `i` in `0..2^DIM`: bit `k` of `i` picks `max` on axis `k`.
    pub fn vertex(&self, i: usize) -> V {
        V::from_fn(|k| {
            if (i >> k) & 1 == 1 {
                self.max.component(k)
            } else {
                self.min.component(k)
            }
        })
    }

    /// Slab test restricted to `t_min <= t <= t_max`. Returns the entry and
    /// exit parameters.
    pub fn trace_range(
        &self,
        ray: &Ray<V>,
        t_min: V::Scalar,
        t_max: V::Scalar,
    ) -> Option<(V::Scalar, V::Scalar)> {
        let mut t0 = t_min;
        let mut t1 = t_max;
        for i in 0..V::DIM {
            let o = ray.origin.component(i);
            let d = ray.direction.component(i);
            let (lo, hi) = (self.min.component(i), self.max.component(i));
            if d.abs() <= <V::Scalar as Scalar>::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = d.recip();
            let mut near = (lo - o) * inv;
            let mut far = (hi - o) * inv;
            if near > far {
                core::mem::swap(&mut near, &mut far);
            }
            t0 = t0.max(near);
            t1 = t1.min(far);
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// Entry and exit parameters of the ray, `t >= 0`.
    #[inline]
    pub fn trace(&self, ray: &Ray<V>) -> Option<(V::Scalar, V::Scalar)> {
        self.trace_range(ray, <V::Scalar as Scalar>::ZERO, <V::Scalar as Scalar>::INFINITY)
    }
}

impl<S: Scalar> Aabb<Vec3<S>> {
    pub const VERTEX_COUNT: usize = 8;

    pub fn vertices(&self) -> [Vec3<S>; 8] {
        core::array::from_fn(|i| self.vertex(i))
    }
}

impl<V: Vector> Default for Aabb<V> {
    fn default() -> Self {
        Self::new(V::default(), V::default())
    }
}

impl<V: Vector> fmt::Display for Aabb<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "aabb{}({}, {})", V::DIM, self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    fn unit() -> Aabb<Vec3<f64>> {
        Aabb::new(Vec3::zero(), Vec3::splat(1.0))
    }

    #[test]
    fn extend_from_empty() {
        let mut b = Aabb::<Vec3<f64>>::empty();
        assert!(b.is_empty());
        b.extend(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b, Aabb::from_point(Vec3::new(1.0, 2.0, 3.0)));
        b.extend(Vec3::new(-1.0, 5.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 5.0, 3.0));
        assert!(!b.is_empty());
    }

    #[test]
    fn from_points_and_centre() {
        let b = Aabb::from_points(&[
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 3.0),
            Vec2::new(0.0, -1.0),
        ]);
        assert_eq!(b.centre(), Vec2::new(0.0, 1.0));
        assert_eq!(b.diagonal(), Vec2::new(2.0, 4.0));
        assert!(Aabb::<Vec2<f64>>::from_points(&[]).is_empty());
    }

    #[test]
    fn centre_size() {
        let b = Aabb::from_centre_size(Vec3::new(1.0, 1.0, 1.0), 2.0);
        assert_eq!(b.min, Vec3::zero());
        assert_eq!(b.max, Vec3::splat(2.0));
    }

    #[test]
    fn containment_and_overlap() {
        let b = unit();
        assert!(b.contains(Vec3::new(0.5, 0.5, 0.5)));
        assert!(b.contains(Vec3::splat(1.0)));
        assert!(!b.contains(Vec3::new(0.5, 1.5, 0.5)));

        let inner = Aabb::new(Vec3::splat(0.25), Vec3::splat(0.75));
        assert!(b.contains_aabb(&inner));
        assert!(!inner.contains_aabb(&b));

        let touching = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(b.test_intersection(&touching));
        let apart = Aabb::new(Vec3::new(1.5, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!b.test_intersection(&apart));
    }

    #[test]
    fn normalize_swaps() {
        let mut b = Aabb::new(Vec2::new(3.0, -1.0), Vec2::new(1.0, 2.0));
        b.normalize();
        assert_eq!(b.min, Vec2::new(1.0, -1.0));
        assert_eq!(b.max, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn vertices_cover_corners() {
        let b = unit();
        let v = b.vertices();
        assert_eq!(v[0], Vec3::zero());
        assert_eq!(v[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(v[6], Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(v[7], Vec3::splat(1.0));
    }

    #[test]
    fn slab_trace() {
        let b = unit();
        let r = Ray::new(Vec3::new(-1.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.trace(&r), Some((1.0, 2.0)));

        // starting inside: entry clamps to 0
        let r = Ray::new(Vec3::splat(0.5), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(b.trace(&r), Some((0.0, 0.25)));

        // parallel to a slab and outside it
        let r = Ray::new(Vec3::new(-1.0, 2.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.trace(&r), None);

        // pointing away
        let r = Ray::new(Vec3::new(-1.0, 0.5, 0.5), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.trace(&r), None);

        // limited range
        let r = Ray::new(Vec3::new(-1.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.trace_range(&r, 0.0, 0.5), None);
    }
}
