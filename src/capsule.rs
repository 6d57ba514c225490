use crate::{Aabb, Line, Scalar, Sphere, Triangle, Vec3, Vector};
use core::fmt;

/// Sphere swept along a segment: every point within `radius` of `axis`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capsule<V: Vector> {
    pub axis: Line<V>,
    pub radius: V::Scalar,
}

impl<V: Vector> Capsule<V> {
    #[inline]
    pub fn new(a: V, b: V, radius: V::Scalar) -> Self {
        Self::from_line(Line::new(a, b), radius)
    }

    #[inline]
    pub fn from_line(axis: Line<V>, radius: V::Scalar) -> Self {
        Self { axis, radius }
    }

    pub fn aabb(&self) -> Aabb<V> {
        let r = V::splat(self.radius);
        let mut b = self.axis.aabb();
        b.min = b.min - r;
        b.max = b.max + r;
        b
    }

    /// Inclusive: points on the surface are contained.
    #[inline]
    pub fn contains(&self, p: V) -> bool {
        self.axis.distance_sq(p) <= self.radius * self.radius
    }

    /// Distance from `p` to the surface, zero inside.
    #[inline]
    pub fn distance(&self, p: V) -> V::Scalar {
        (self.axis.distance(p) - self.radius).max(<V::Scalar as Scalar>::ZERO)
    }

    #[inline]
    pub fn test_intersection_sphere(&self, sphere: &Sphere<V>) -> bool {
        sphere.test_intersection_capsule(self)
    }

    /// Overlap with another capsule.
    pub fn test_intersection_capsule(&self, other: &Capsule<V>) -> bool {
        let r = self.radius + other.radius;
        let (p, q) = self.axis.closest_points(&other.axis);
        p.distance_sq(q) <= r * r
    }
}

impl<S: Scalar> Capsule<Vec3<S>> {
    /// Overlap with a triangle: the axis comes within `radius` of it.
    pub fn test_intersection(&self, tri: &Triangle<S>) -> bool {
        self.axis_distance_sq(tri) <= self.radius * self.radius
    }

    /// Squared distance between the axis segment and the triangle.
    fn axis_distance_sq(&self, tri: &Triangle<S>) -> S {
        let Line { a, b } = self.axis;
        if tri.test_intersection_segment(&self.axis) {
            return S::ZERO;
        }
        // No crossing: the minimum is reached at an axis endpoint or
        // between the axis and one of the triangle edges.
        let mut best = tri.closest_point(a).distance_sq(a);
        best = best.min(tri.closest_point(b).distance_sq(b));
        for edge in tri.edges() {
            let (p, q) = self.axis.closest_points(&edge);
            best = best.min(p.distance_sq(q));
        }
        best
    }
}

impl<V: Vector> Default for Capsule<V> {
    fn default() -> Self {
        Self::from_line(Line::default(), <V::Scalar as Scalar>::ZERO)
    }
}

impl<V: Vector> fmt::Display for Capsule<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "capsule{}({}, {}, {})", V::DIM, self.axis.a, self.axis.b, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    fn upright() -> Capsule<Vec3<f64>> {
        Capsule::new(Vec3::zero(), Vec3::new(0.0, 0.0, 4.0), 1.0)
    }

    #[test]
    fn distance_to_surface() {
        let c = upright();
        assert_eq!(c.distance(Vec3::new(3.0, 0.0, 2.0)), 2.0);
        assert_eq!(c.distance(Vec3::new(0.0, 0.0, 7.0)), 2.0);
        assert_eq!(c.distance(Vec3::new(0.5, 0.0, 2.0)), 0.0);
    }

    #[test]
    fn contains_caps_and_body() {
        let c = upright();
        assert!(c.contains(Vec3::new(1.0, 0.0, 2.0)));
        assert!(c.contains(Vec3::new(0.0, 0.0, -1.0)));
        assert!(!c.contains(Vec3::new(0.8, 0.8, -0.5)));
        assert!(!c.contains(Vec3::new(0.0, 0.0, 5.5)));
    }

    #[test]
    fn bounds_enclose_capsule() {
        let c = Capsule::new(Vec3::new(1.0, -2.0, 0.5), Vec3::new(-3.0, 4.0, 2.0), 0.75);
        let b = c.aabb();
        // sample a lattice, the box may only report false positives
        for i in 0..=20 {
            for j in 0..=20 {
                for k in 0..=20 {
                    let p = Vec3::new(
                        -5.0 + 0.4 * i as f64,
                        -4.0 + 0.5 * j as f64,
                        -1.0 + 0.2 * k as f64,
                    );
                    if c.contains(p) {
                        assert!(b.contains(p), "{p}");
                    }
                }
            }
        }
    }

    #[test]
    fn capsule_capsule() {
        let a = Capsule::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), 0.5);
        let b = Capsule::new(Vec2::new(2.0, 1.5), Vec2::new(2.0, 5.0), 0.5);
        assert!(!a.test_intersection_capsule(&b));
        let c = Capsule::new(Vec2::new(2.0, 0.9), Vec2::new(2.0, 5.0), 0.5);
        assert!(a.test_intersection_capsule(&c));
    }

    #[test]
    fn triangle_overlap() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(3.0, -1.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.0),
        );
        // axis pierces the triangle
        assert!(Capsule::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0), 0.1)
            .test_intersection(&tri));
        // axis hovers above, radius reaches down
        assert!(Capsule::new(Vec3::new(0.0, 0.0, 0.5), Vec3::new(0.0, 0.0, 2.0), 0.6)
            .test_intersection(&tri));
        assert!(!Capsule::new(Vec3::new(0.0, 0.0, 0.5), Vec3::new(0.0, 0.0, 2.0), 0.4)
            .test_intersection(&tri));
        // axis runs beside an edge
        assert!(Capsule::new(Vec3::new(-1.5, -2.0, 0.0), Vec3::new(-1.5, 4.0, 0.0), 0.6)
            .test_intersection(&tri));
        assert!(!Capsule::new(Vec3::new(-1.5, -2.0, 0.0), Vec3::new(-1.5, 4.0, 0.0), 0.4)
            .test_intersection(&tri));
    }
}
