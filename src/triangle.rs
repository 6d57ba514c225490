use crate::{Aabb, Line, Plane, Ray, Scalar, Sphere, Vec2, Vec3};
use core::fmt;

/// Triangle in 3D space.
///
/// The winding `a -> b -> c` fixes the normal direction (right-hand rule).
/// Degenerate (zero-area) triangles are not guarded: derived centres and
/// radii come out as NaN or infinity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle<S> {
    pub a: Vec3<S>,
    pub b: Vec3<S>,
    pub c: Vec3<S>,
}

impl<S: Scalar> Triangle<S> {
    #[inline]
    pub fn new(a: Vec3<S>, b: Vec3<S>, c: Vec3<S>) -> Self {
        Self { a, b, c }
    }

    /// `(b - a) x (c - a)`, twice the area in length.
    #[inline]
    fn scaled_normal(&self) -> Vec3<S> {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// Edges so close to parallel, relative to their lengths, that the
    /// normal carries no direction.
    fn is_sliver(&self) -> bool {
        let (ab, ac) = (self.b - self.a, self.c - self.a);
        ab.cross(ac).length_sq() <= S::EPSILON * ab.length_sq() * ac.length_sq()
    }

    /// Unit normal.
    #[inline]
    pub fn normal(&self) -> Vec3<S> {
        self.scaled_normal().normalized()
    }

    #[inline]
    pub fn plane(&self) -> Plane<S> {
        Plane::from_origin_normal(self.a, self.normal())
    }

    /// Edges `ab`, `bc`, `ca` as segments.
    pub fn edges(&self) -> [Line<Vec3<S>>; 3] {
        [
            Line::new(self.a, self.b),
            Line::new(self.b, self.c),
            Line::new(self.c, self.a),
        ]
    }

    /// Side lengths opposite `a`, `b` and `c`: `(|bc|, |ca|, |ab|)`.
    #[inline]
    pub fn edge_lengths(&self) -> (S, S, S) {
        (
            self.b.distance(self.c),
            self.c.distance(self.a),
            self.a.distance(self.b),
        )
    }

    #[inline]
    pub fn perimeter(&self) -> S {
        let (la, lb, lc) = self.edge_lengths();
        la + lb + lc
    }

    #[inline]
    pub fn area(&self) -> S {
        self.scaled_normal().length() * S::HALF
    }

    pub fn aabb(&self) -> Aabb<Vec3<S>> {
        let mut b = Aabb::from_point(self.a);
        b.extend(self.b);
        b.extend(self.c);
        b
    }

    /// Centre of gravity.
    #[inline]
    pub fn centroid(&self) -> Vec3<S> {
        (self.a + self.b + self.c) / S::from_i32(3)
    }

    pub fn circumcenter(&self) -> Vec3<S> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        let n = ab.cross(ac);
        let offset = n.cross(ab) * ac.length_sq() + ac.cross(n) * ab.length_sq();
        self.a + offset / (S::TWO * n.length_sq())
    }

    pub fn circumcircle_radius(&self) -> S {
        let (la, lb, lc) = self.edge_lengths();
        la * lb * lc / (S::from_i32(4) * self.area())
    }

    /// Circle through all three vertices, as a sphere in the triangle's plane.
    pub fn circumcircle(&self) -> Sphere<Vec3<S>> {
        Sphere::new(self.circumcenter(), self.circumcircle_radius())
    }

    /// Intersection of the altitudes, `3 * centroid - 2 * circumcenter`.
    pub fn orthocenter(&self) -> Vec3<S> {
        self.a + self.b + self.c - self.circumcenter() * S::TWO
    }

    pub fn incenter(&self) -> Vec3<S> {
        let (la, lb, lc) = self.edge_lengths();
        (self.a * la + self.b * lb + self.c * lc) / (la + lb + lc)
    }

    /// Area over semi-perimeter.
    pub fn incircle_radius(&self) -> S {
        self.area() / (self.perimeter() * S::HALF)
    }

    pub fn incircle(&self) -> Sphere<Vec3<S>> {
        Sphere::new(self.incenter(), self.incircle_radius())
    }

    /// Centre of the excircle opposite `a`.
    pub fn excenter_a(&self) -> Vec3<S> {
        let (la, lb, lc) = self.edge_lengths();
        (self.b * lb + self.c * lc - self.a * la) / (lb + lc - la)
    }

    pub fn excenter_b(&self) -> Vec3<S> {
        let (la, lb, lc) = self.edge_lengths();
        (self.a * la + self.c * lc - self.b * lb) / (la + lc - lb)
    }

    pub fn excenter_c(&self) -> Vec3<S> {
        let (la, lb, lc) = self.edge_lengths();
        (self.a * la + self.b * lb - self.c * lc) / (la + lb - lc)
    }

    fn exradius(&self, opposite: S) -> S {
        self.area() / (self.perimeter() * S::HALF - opposite)
    }

    pub fn excircle_a_radius(&self) -> S {
        self.exradius(self.edge_lengths().0)
    }

    pub fn excircle_b_radius(&self) -> S {
        self.exradius(self.edge_lengths().1)
    }

    pub fn excircle_c_radius(&self) -> S {
        self.exradius(self.edge_lengths().2)
    }

    pub fn excircle_a(&self) -> Sphere<Vec3<S>> {
        Sphere::new(self.excenter_a(), self.excircle_a_radius())
    }

    pub fn excircle_b(&self) -> Sphere<Vec3<S>> {
        Sphere::new(self.excenter_b(), self.excircle_b_radius())
    }

    pub fn excircle_c(&self) -> Sphere<Vec3<S>> {
        Sphere::new(self.excenter_c(), self.excircle_c_radius())
    }

    /// Centre of the nine-point circle, midway between the circumcenter and
    /// the orthocenter.
    pub fn feuerbach_center(&self) -> Vec3<S> {
        (self.circumcenter() + self.orthocenter()) * S::HALF
    }

    #[inline]
    pub fn feuerbach_radius(&self) -> S {
        self.circumcircle_radius() * S::HALF
    }

    pub fn feuerbach_circle(&self) -> Sphere<Vec3<S>> {
        Sphere::new(self.feuerbach_center(), self.feuerbach_radius())
    }

    /// Barycentric sign test for a point assumed to lie in the triangle's
    /// plane. Edges and vertices count as inside.
    pub fn contains_on_plane_eps(&self, p: Vec3<S>, eps: S) -> bool {
        let n = self.scaled_normal();
        let tol = -eps * n.length_sq();
        (self.b - self.a).cross(p - self.a).dot(n) >= tol
            && (self.c - self.b).cross(p - self.b).dot(n) >= tol
            && (self.a - self.c).cross(p - self.c).dot(n) >= tol
    }

    #[inline]
    pub fn contains_on_plane(&self, p: Vec3<S>) -> bool {
        self.contains_on_plane_eps(p, S::TOLERANCE)
    }

    /// On the plane and inside the edges.
    pub fn contains_eps(&self, p: Vec3<S>, eps: S) -> bool {
        self.plane().contains_eps(p, eps) && self.contains_on_plane_eps(p, eps)
    }

    #[inline]
    pub fn contains(&self, p: Vec3<S>) -> bool {
        self.contains_eps(p, S::TOLERANCE)
    }

    /// Hit parameter of the ray within `[t_min, t_max]`: plane intersection
    /// followed by the in-triangle test.
    pub fn trace_hit(&self, ray: &Ray<Vec3<S>>, t_min: S, t_max: S) -> Option<S> {
        let t = self.plane().trace_range(ray, t_min, t_max)?;
        self.contains_on_plane(ray.apply(t)).then_some(t)
    }

    #[inline]
    pub fn trace(&self, ray: &Ray<Vec3<S>>, t_min: S, t_max: S) -> bool {
        self.trace_hit(ray, t_min, t_max).is_some()
    }

    /// Point of the triangle (interior included) closest to `p`.
    pub fn closest_point(&self, p: Vec3<S>) -> Vec3<S> {
        let zero = S::ZERO;
        let (a, b, c) = (self.a, self.b, self.c);
        let ab = b - a;
        let ac = c - a;

        // vertex regions
        let ap = p - a;
        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= zero && d2 <= zero {
            return a;
        }
        let bp = p - b;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= zero && d4 <= d3 {
            return b;
        }
        let vc = d1 * d4 - d3 * d2;
        if vc <= zero && d1 >= zero && d3 <= zero {
            return a + ab * (d1 / (d1 - d3));
        }
        let cp = p - c;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= zero && d5 <= d6 {
            return c;
        }
        let vb = d5 * d2 - d1 * d6;
        if vb <= zero && d2 >= zero && d6 <= zero {
            return a + ac * (d2 / (d2 - d6));
        }
        let va = d3 * d6 - d5 * d4;
        if va <= zero && d4 - d3 >= zero && d5 - d6 >= zero {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        // face region
        let denom = (va + vb + vc).recip();
        a + ab * (vb * denom) + ac * (vc * denom)
    }

    /// Whether the segment crosses the triangle. Segments lying in the
    /// triangle's plane only count when degenerate to a contained point.
    pub fn test_intersection_segment(&self, segment: &Line<Vec3<S>>) -> bool {
        let d = segment.direction();
        if d.length_sq() <= S::EPSILON {
            return self.contains(segment.a);
        }
        self.trace(&Ray::new(segment.a, d), S::ZERO, S::ONE)
    }

    /// Triangle/triangle overlap, touching included.
    pub fn test_intersection(&self, other: &Triangle<S>) -> bool {
        let bounds = self.aabb();
        let other_bounds = other.aabb();
        if !bounds.test_intersection(&other_bounds) {
            return false;
        }

        if self.is_sliver() || other.is_sliver() {
            // no usable plane, fall back to the bounds
            return true;
        }

        let plane = self.plane();
        if plane.contains(other.a) && plane.contains(other.b) && plane.contains(other.c) {
            return coplanar_overlap(self, other, self.scaled_normal());
        }

        self.edges()
            .iter()
            .any(|e| other.test_intersection_segment(e))
            || other.edges().iter().any(|e| self.test_intersection_segment(e))
            || [other.a, other.b, other.c].iter().any(|p| self.contains(*p))
            || [self.a, self.b, self.c].iter().any(|p| other.contains(*p))
    }
}

/// Drops the axis along which `normal` is largest.
fn project<S: Scalar>(v: Vec3<S>, drop_axis: usize) -> Vec2<S> {
    match drop_axis {
        0 => Vec2::new(v.y, v.z),
        1 => Vec2::new(v.x, v.z),
        _ => Vec2::new(v.x, v.y),
    }
}

#[inline]
fn orient<S: Scalar>(a: Vec2<S>, b: Vec2<S>, c: Vec2<S>) -> S {
    (b - a).cross(c - a)
}

fn on_segment<S: Scalar>(a: Vec2<S>, b: Vec2<S>, p: Vec2<S>) -> bool {
    let eps = S::TOLERANCE;
    let lo = a.component_min(b);
    let hi = a.component_max(b);
    orient(a, b, p).abs() <= eps
        && p.x >= lo.x - eps
        && p.x <= hi.x + eps
        && p.y >= lo.y - eps
        && p.y <= hi.y + eps
}

fn segments_cross<S: Scalar>(a: Vec2<S>, b: Vec2<S>, c: Vec2<S>, d: Vec2<S>) -> bool {
    let eps = S::TOLERANCE;
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);

    let straddles = |p: S, q: S| (p > eps && q < -eps) || (p < -eps && q > eps);
    if straddles(o1, o2) && straddles(o3, o4) {
        return true;
    }
    on_segment(a, b, c) || on_segment(a, b, d) || on_segment(c, d, a) || on_segment(c, d, b)
}

fn inside_2d<S: Scalar>(p: Vec2<S>, t: &[Vec2<S>; 3]) -> bool {
    let eps = S::TOLERANCE;
    let o = [orient(t[0], t[1], p), orient(t[1], t[2], p), orient(t[2], t[0], p)];
    let negative = o.iter().any(|&v| v < -eps);
    let positive = o.iter().any(|&v| v > eps);
    !(negative && positive)
}

fn coplanar_overlap<S: Scalar>(left: &Triangle<S>, right: &Triangle<S>, normal: Vec3<S>) -> bool {
    let n = normal.abs();
    let drop_axis = if n.y >= n.x && n.y >= n.z {
        1
    } else if n.z >= n.x && n.z >= n.y {
        2
    } else {
        0
    };

    let l = [left.a, left.b, left.c].map(|v| project(v, drop_axis));
    let r = [right.a, right.b, right.c].map(|v| project(v, drop_axis));

    if l.iter().any(|&p| inside_2d(p, &r)) || r.iter().any(|&p| inside_2d(p, &l)) {
        return true;
    }

    (0..3).any(|i| {
        (0..3).any(|j| segments_cross(l[i], l[(i + 1) % 3], r[j], r[(j + 1) % 3]))
    })
}

impl<S: Scalar> Default for Triangle<S> {
    fn default() -> Self {
        Self::new(Vec3::zero(), Vec3::zero(), Vec3::zero())
    }
}

impl<S: Scalar> fmt::Display for Triangle<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "triangle({}, {}, {})", self.a, self.b, self.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_345() -> Triangle<f64> {
        Triangle::new(Vec3::zero(), Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0))
    }

    fn close(a: Vec3<f64>, b: Vec3<f64>) -> bool {
        (a - b).length() < 1e-12
    }

    #[test]
    fn measures() {
        let t = right_345();
        assert_eq!(t.area(), 6.0);
        assert_eq!(t.perimeter(), 12.0);
        assert_eq!(t.edge_lengths(), (5.0, 4.0, 3.0));
        assert_eq!(t.normal(), Vec3::z());
        assert!(close(t.centroid(), Vec3::new(1.0, 4.0 / 3.0, 0.0)));
    }

    #[test]
    fn named_centres() {
        let t = right_345();
        // right angle at a: circumcenter is the hypotenuse midpoint
        assert!(close(t.circumcenter(), Vec3::new(1.5, 2.0, 0.0)));
        assert!((t.circumcircle_radius() - 2.5).abs() < 1e-12);
        assert!(close(t.orthocenter(), Vec3::zero()));
        assert!(close(t.incenter(), Vec3::new(1.0, 1.0, 0.0)));
        assert!((t.incircle_radius() - 1.0).abs() < 1e-12);
        assert!(close(t.feuerbach_center(), Vec3::new(0.75, 1.0, 0.0)));
        assert!((t.feuerbach_radius() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn excircles_touch_their_side() {
        let t = right_345();
        for (centre, radius, side) in [
            (t.excenter_a(), t.excircle_a_radius(), Line::new(t.b, t.c)),
            (t.excenter_b(), t.excircle_b_radius(), Line::new(t.c, t.a)),
            (t.excenter_c(), t.excircle_c_radius(), Line::new(t.a, t.b)),
        ] {
            assert!((side.distance(centre) - radius).abs() < 1e-9);
        }
        // r_a = K / (s - a) = 6 / (6 - 5)
        assert!((t.excircle_a_radius() - 6.0).abs() < 1e-12);
        assert!(close(t.excenter_a(), Vec3::new(6.0, 6.0, 0.0)));
    }

    #[test]
    fn point_containment() {
        let t = right_345();
        assert!(t.contains(Vec3::new(1.0, 1.0, 0.0)));
        assert!(t.contains(t.b));
        assert!(t.contains(Vec3::new(1.5, 2.0, 0.0)));
        assert!(!t.contains(Vec3::new(3.0, 4.0, 0.0)));
        assert!(!t.contains(Vec3::new(1.0, 1.0, 0.5)));
        assert!(t.contains_on_plane(Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn ray_trace_with_bounds() {
        let t = right_345();
        let r = Ray::new(Vec3::new(1.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(t.trace_hit(&r, 0.0, 10.0), Some(5.0));
        assert!(!t.trace(&r, 0.0, 4.0));
        let miss = Ray::new(Vec3::new(4.0, 4.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!t.trace(&miss, 0.0, 10.0));
        let parallel = Ray::new(Vec3::new(1.0, 1.0, 1.0), Vec3::x());
        assert!(!t.trace(&parallel, 0.0, 10.0));
    }

    #[test]
    fn closest_point_regions() {
        let t = right_345();
        assert_eq!(t.closest_point(Vec3::new(-1.0, -1.0, 2.0)), t.a);
        assert_eq!(t.closest_point(Vec3::new(5.0, -1.0, 0.0)), t.b);
        assert!(close(t.closest_point(Vec3::new(1.0, -2.0, 0.0)), Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(t.closest_point(Vec3::new(1.0, 1.0, 3.0)), Vec3::new(1.0, 1.0, 0.0)));
        // beyond the hypotenuse
        let p = t.closest_point(Vec3::new(3.0, 4.0, 0.0));
        assert!(Line::new(t.b, t.c).contains(p));
    }

    #[test]
    fn crossing_triangles() {
        let t = right_345();
        let vertical = Triangle::new(
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 0.0),
        );
        assert!(t.test_intersection(&vertical));
        assert!(vertical.test_intersection(&t));

        let lifted = Triangle::new(
            Vec3::new(1.0, 1.0, 0.5),
            Vec3::new(1.0, 1.0, 1.5),
            Vec3::new(1.0, -1.0, 1.0),
        );
        assert!(!t.test_intersection(&lifted));
    }

    #[test]
    fn coplanar_triangles() {
        let t = right_345();
        let overlapping = Triangle::new(
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(5.0, 1.0, 0.0),
            Vec3::new(1.0, 5.0, 0.0),
        );
        assert!(t.test_intersection(&overlapping));
        let apart = Triangle::new(
            Vec3::new(3.0, 3.0, 0.0),
            Vec3::new(6.0, 3.0, 0.0),
            Vec3::new(3.0, 6.0, 0.0),
        );
        assert!(!t.test_intersection(&apart));
    }

    #[test]
    fn small_triangles_f32() {
        let flat = Triangle::new(
            Vec3::new(0.0f32, 0.0, 0.0),
            Vec3::new(0.05, 0.0, 0.0),
            Vec3::new(0.0, 0.05, 0.0),
        );
        // upright in the plane x + y = 0.07, inside the bounds of `flat`
        let upright = Triangle::new(
            Vec3::new(0.035, 0.035, -0.02),
            Vec3::new(0.035, 0.035, 0.02),
            Vec3::new(0.045, 0.025, 0.0),
        );
        assert!(flat.aabb().test_intersection(&upright.aabb()));
        assert!(!flat.test_intersection(&upright));
        assert!(!upright.test_intersection(&flat));

        let crossing = Triangle::new(
            Vec3::new(0.01, 0.01, -0.02),
            Vec3::new(0.01, 0.01, 0.02),
            Vec3::new(0.02, 0.0, 0.0),
        );
        assert!(flat.test_intersection(&crossing));

        let needle = Triangle::new(Vec3::zero(), Vec3::new(0.05, 0.0, 0.0), Vec3::new(0.1, 0.0, 0.0));
        assert!(needle.test_intersection(&flat));
    }
}
