use crate::{Aabb, Mat4, Ray, Scalar, Triangle, Vec3};
use core::fmt;

/// Oriented box: the parallelepiped spanned by three edge vectors from a
/// corner.
///
/// A point is inside when its local coordinates along `tangent`, `normal`
/// and `binormal` all lie in `[0, 1]`. The edges need not be orthogonal;
/// linearly dependent edges make local coordinates infinite or NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obb<S> {
    pub origin: Vec3<S>,
    pub tangent: Vec3<S>,
    pub normal: Vec3<S>,
    pub binormal: Vec3<S>,
}

impl<S: Scalar> Obb<S> {
    pub const VERTEX_COUNT: usize = 8;

    #[inline]
    pub fn new(origin: Vec3<S>, tangent: Vec3<S>, normal: Vec3<S>, binormal: Vec3<S>) -> Self {
        Self { origin, tangent, normal, binormal }
    }

    pub fn from_aabb(b: &Aabb<Vec3<S>>) -> Self {
        let d = b.diagonal();
        Self::new(
            b.min,
            Vec3::new(d.x, S::ZERO, S::ZERO),
            Vec3::new(S::ZERO, d.y, S::ZERO),
            Vec3::new(S::ZERO, S::ZERO, d.z),
        )
    }

    /// Box `[-half_extents, half_extents]` in the local frame of `m`.
    pub fn from_transform(m: &Mat4<S>, half_extents: Vec3<S>) -> Self {
        let e = half_extents;
        Self::new(
            m.transform_point(-e),
            m.transform_vector(Vec3::new(e.x * S::TWO, S::ZERO, S::ZERO)),
            m.transform_vector(Vec3::new(S::ZERO, e.y * S::TWO, S::ZERO)),
            m.transform_vector(Vec3::new(S::ZERO, S::ZERO, e.z * S::TWO)),
        )
    }

    #[inline]
    fn edges(&self) -> [Vec3<S>; 3] {
        [self.tangent, self.normal, self.binormal]
    }

    #[inline]
    pub fn centre(&self) -> Vec3<S> {
        self.origin + (self.tangent + self.normal + self.binormal) * S::HALF
    }

    /// Volume of the parallelepiped, `|t . (n x b)|`.
    #[inline]
    pub fn volume(&self) -> S {
        self.tangent.dot(self.normal.cross(self.binormal)).abs()
    }

    /// Corner `i` in `0..8`: bits 0, 1 and 2 add tangent, normal and binormal.
    pub fn vertex(&self, i: usize) -> Vec3<S> {
        let mut p = self.origin;
        if i & 1 != 0 {
            p += self.tangent;
        }
        if i & 2 != 0 {
            p += self.normal;
        }
        if i & 4 != 0 {
            p += self.binormal;
        }
        p
    }

    pub fn vertices(&self) -> [Vec3<S>; 8] {
        core::array::from_fn(|i| self.vertex(i))
    }

    pub fn aabb(&self) -> Aabb<Vec3<S>> {
        Aabb::from_points(&self.vertices())
    }

    /// Map every corner through `m` (points, so translation applies).
    pub fn transform(&mut self, m: &Mat4<S>) {
        let origin = m.transform_point(self.origin);
        self.tangent = m.transform_point(self.origin + self.tangent) - origin;
        self.normal = m.transform_point(self.origin + self.normal) - origin;
        self.binormal = m.transform_point(self.origin + self.binormal) - origin;
        self.origin = origin;
    }

    /// Coordinates of a direction in the `(tangent, normal, binormal)` basis.
    pub fn world_to_local_vector(&self, v: Vec3<S>) -> Vec3<S> {
        // Cramer's rule on the edge basis
        let (t, n, b) = (self.tangent, self.normal, self.binormal);
        let inv_det = t.dot(n.cross(b)).recip();
        Vec3::new(
            v.dot(n.cross(b)) * inv_det,
            t.dot(v.cross(b)) * inv_det,
            t.dot(n.cross(v)) * inv_det,
        )
    }

    /// Local coordinates of a point; the box occupies `[0, 1]^3`.
    #[inline]
    pub fn world_to_local(&self, p: Vec3<S>) -> Vec3<S> {
        self.world_to_local_vector(p - self.origin)
    }

    #[inline]
    pub fn local_to_world(&self, l: Vec3<S>) -> Vec3<S> {
        self.origin + self.tangent * l.x + self.normal * l.y + self.binormal * l.z
    }

    pub fn contains(&self, p: Vec3<S>) -> bool {
        let l = self.world_to_local(p);
        let inside = |c: S| c >= S::ZERO && c <= S::ONE;
        inside(l.x) && inside(l.y) && inside(l.z)
    }

    pub fn contains_triangle(&self, tri: &Triangle<S>) -> bool {
        self.contains(tri.a) && self.contains(tri.b) && self.contains(tri.c)
    }

    /// Interval covered by the box along `axis`.
    fn project(&self, axis: Vec3<S>) -> (S, S) {
        let base = self.origin.dot(axis);
        self.edges().iter().fold((base, base), |(lo, hi), e| {
            let d = e.dot(axis);
            (lo + d.min(S::ZERO), hi + d.max(S::ZERO))
        })
    }

    /// Face normals, each paired with the squared lengths of the two edges
    /// that span it.
    fn face_normals(&self) -> [(Vec3<S>, S); 3] {
        let [t, n, b] = self.edges();
        [span(n, b), span(b, t), span(t, n)]
    }

    /// Entry and exit parameters of `ray` restricted to `[t_min, t_max]`.
    pub fn trace_range(&self, ray: &Ray<Vec3<S>>, t_min: S, t_max: S) -> Option<(S, S)> {
        let local = Ray::new(
            self.world_to_local(ray.origin),
            self.world_to_local_vector(ray.direction),
        );
        Aabb::new(Vec3::zero(), Vec3::splat(S::ONE)).trace_range(&local, t_min, t_max)
    }

    #[inline]
    pub fn trace(&self, ray: &Ray<Vec3<S>>, t_min: S, t_max: S) -> bool {
        self.trace_range(ray, t_min, t_max).is_some()
    }

    /// Whether every corner of `other` lies inside.
    pub fn contains_obb(&self, other: &Obb<S>) -> bool {
        other.vertices().iter().all(|&p| self.contains(p))
    }

    /// Distance from the centre to the farthest corner.
    pub fn radius(&self) -> S {
        let [t, n, b] = self.edges();
        let far = [t + n + b, t + n - b, t - n + b, t - n - b]
            .iter()
            .fold(S::ZERO, |m, d| m.max(d.length_sq()));
        far.sqrt() * S::HALF
    }

    /// Octant `i` in `0..8`, with the same bit layout as [`Obb::vertex`].
    pub fn segment(&self, i: usize) -> Obb<S> {
        let half = Obb::new(
            self.origin,
            self.tangent * S::HALF,
            self.normal * S::HALF,
            self.binormal * S::HALF,
        );
        Obb { origin: half.vertex(i), ..half }
    }

    /// Separating-axis test against another box: face normals of both plus
    /// the nine edge cross products.
    #[inline]
    pub fn test_intersection(&self, other: &Obb<S>) -> bool {
        self.test_collision(other, Vec3::zero(), S::ZERO, S::ZERO)
    }

    #[inline]
    pub fn test_intersection_triangle(&self, tri: &Triangle<S>) -> bool {
        self.test_collision_triangle(tri, Vec3::zero(), S::ZERO, S::ZERO)
    }

    /// Whether `other`, moving by `velocity` relative to this box, touches it
    /// at some `t` in `[t_min, t_max]`.
    ///
    /// Besides the static axes, the cross products of the velocity with
    /// every edge are tested, which makes the answer exact for the swept
    /// volume.
    pub fn test_collision(&self, other: &Obb<S>, velocity: Vec3<S>, t_min: S, t_max: S) -> bool {
        let mut axes = [(Vec3::zero(), S::ZERO); 21];
        axes[..3].copy_from_slice(&self.face_normals());
        axes[3..6].copy_from_slice(&other.face_normals());
        for (i, &e) in self.edges().iter().enumerate() {
            for (j, &f) in other.edges().iter().enumerate() {
                axes[6 + 3 * i + j] = span(e, f);
            }
        }
        for (i, &e) in self.edges().iter().chain(other.edges().iter()).enumerate() {
            axes[15 + i] = span(velocity, e);
        }
        !axes.iter().any(|&(axis, scale_sq)| {
            let moving = sweep(other.project(axis), velocity.dot(axis), t_min, t_max);
            separates(axis, scale_sq, self.project(axis), moving)
        })
    }

    /// Swept test against a triangle moving by `velocity` relative to this
    /// box: the box face normals, the triangle normal, the nine edge cross
    /// products and the velocity against every edge.
    pub fn test_collision_triangle(
        &self,
        tri: &Triangle<S>,
        velocity: Vec3<S>,
        t_min: S,
        t_max: S,
    ) -> bool {
        let tri_edges = [tri.b - tri.a, tri.c - tri.b, tri.a - tri.c];
        let mut axes = [(Vec3::zero(), S::ZERO); 19];
        axes[..3].copy_from_slice(&self.face_normals());
        axes[3] = span(tri_edges[0], tri_edges[1]);
        for (i, &e) in self.edges().iter().enumerate() {
            for (j, &f) in tri_edges.iter().enumerate() {
                axes[4 + 3 * i + j] = span(e, f);
            }
        }
        for (i, &e) in self.edges().iter().chain(tri_edges.iter()).enumerate() {
            axes[13 + i] = span(velocity, e);
        }
        let project_tri = |axis: Vec3<S>| {
            let (a, b, c) = (tri.a.dot(axis), tri.b.dot(axis), tri.c.dot(axis));
            (a.min(b).min(c), a.max(b).max(c))
        };
        !axes.iter().any(|&(axis, scale_sq)| {
            let moving = sweep(project_tri(axis), velocity.dot(axis), t_min, t_max);
            separates(axis, scale_sq, self.project(axis), moving)
        })
    }
}

/// `e x f` together with `|e|^2 |f|^2`, the bound on its squared length.
#[inline]
fn span<S: Scalar>(e: Vec3<S>, f: Vec3<S>) -> (Vec3<S>, S) {
    (e.cross(f), e.length_sq() * f.length_sq())
}

/// Interval covered while it moves at `speed` for `t` in `[t_min, t_max]`.
#[inline]
fn sweep<S: Scalar>((lo, hi): (S, S), speed: S, t_min: S, t_max: S) -> (S, S) {
    let (d0, d1) = (speed * t_min, speed * t_max);
    (lo + d0.min(d1), hi + d0.max(d1))
}

/// Disjoint projections on a usable axis. Axes that are short relative to
/// the vectors they were crossed from come from parallel edges and are
/// skipped. The gap tolerance scales with the projected widths.
fn separates<S: Scalar>(axis: Vec3<S>, scale_sq: S, a: (S, S), b: (S, S)) -> bool {
    if axis.length_sq() <= S::EPSILON * scale_sq {
        return false;
    }
    let tol = S::TOLERANCE * ((a.1 - a.0) + (b.1 - b.0));
    a.1 < b.0 - tol || b.1 < a.0 - tol
}

impl<S: Scalar> Default for Obb<S> {
    fn default() -> Self {
        Self::new(Vec3::zero(), Vec3::zero(), Vec3::zero(), Vec3::zero())
    }
}

impl<S: Scalar> From<Aabb<Vec3<S>>> for Obb<S> {
    fn from(b: Aabb<Vec3<S>>) -> Self {
        Self::from_aabb(&b)
    }
}

impl<S: Scalar> fmt::Display for Obb<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "obb({}, {}, {}, {})",
            self.origin, self.tangent, self.normal, self.binormal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_4;

    fn unit_at(x: f64, y: f64, z: f64) -> Obb<f64> {
        Obb::new(Vec3::new(x, y, z), Vec3::x(), Vec3::y(), Vec3::z())
    }

    #[test]
    fn from_aabb_matches_box() {
        let b = Aabb::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        let o = Obb::from_aabb(&b);
        assert_eq!(o.volume(), 6.0);
        assert_eq!(o.centre(), b.centre());
        assert_eq!(o.aabb(), b);
        assert_eq!(o.vertex(7), b.max);
    }

    #[test]
    fn from_transform_is_centred() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        let o = Obb::from_transform(&m, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(o.centre(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(o.volume(), 48.0);
        assert!(o.contains(Vec3::new(1.9, 3.9, 5.9)));
        assert!(!o.contains(Vec3::new(2.1, 2.0, 3.0)));
    }

    #[test]
    fn local_coordinates() {
        let o = Obb::new(
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
        );
        let l = Vec3::new(0.25, 0.5, 0.75);
        let p = o.local_to_world(l);
        assert!((o.world_to_local(p) - l).length() < 1e-12);
        assert!(o.contains(p));
        assert!(!o.contains(o.local_to_world(Vec3::new(0.5, 1.5, 0.5))));
    }

    #[test]
    fn transform_moves_corners() {
        let mut o = unit_at(0.0, 0.0, 0.0);
        let m = Mat4::translation(5.0, 0.0, 0.0) * Mat4::rotation_z(core::f64::consts::FRAC_PI_2);
        o.transform(&m);
        assert!((o.origin - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-12);
        assert!((o.tangent - Vec3::y()).length() < 1e-12);
        assert!((o.normal + Vec3::x()).length() < 1e-12);
        assert!((o.volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn box_box_separation() {
        let a = unit_at(0.0, 0.0, 0.0);
        assert!(a.test_intersection(&unit_at(0.5, 0.5, 0.5)));
        assert!(a.test_intersection(&unit_at(1.0, 0.0, 0.0)));
        assert!(!a.test_intersection(&unit_at(1.5, 0.0, 0.0)));

        // a diamond whose bounds overlap the cube but whose faces do not
        let m = Mat4::translation(1.6, 1.6, 0.5) * Mat4::rotation_z(FRAC_PI_4);
        let diamond = Obb::from_transform(&m, Vec3::splat(0.5));
        assert!(a.aabb().test_intersection(&diamond.aabb()));
        assert!(!a.test_intersection(&diamond));
        let m = Mat4::translation(1.2, 1.2, 0.5) * Mat4::rotation_z(FRAC_PI_4);
        assert!(a.test_intersection(&Obb::from_transform(&m, Vec3::splat(0.5))));
    }

    #[test]
    fn box_triangle_separation() {
        let a = unit_at(0.0, 0.0, 0.0);
        let through = Triangle::new(
            Vec3::new(-1.0, 0.5, -1.0),
            Vec3::new(2.0, 0.5, -1.0),
            Vec3::new(0.5, 0.5, 3.0),
        );
        assert!(a.test_intersection_triangle(&through));

        let above = Triangle::new(
            Vec3::new(-1.0, -1.0, 2.0),
            Vec3::new(3.0, -1.0, 2.0),
            Vec3::new(-1.0, 3.0, 2.0),
        );
        assert!(!a.test_intersection_triangle(&above));

        // bounds overlap the box but the hypotenuse keeps clear of it
        let corner = Triangle::new(
            Vec3::new(0.5, 2.0, 0.5),
            Vec3::new(2.0, 0.5, 0.5),
            Vec3::new(2.0, 2.0, 0.5),
        );
        assert!(!a.test_intersection_triangle(&corner));
        assert!(a.contains_triangle(&Triangle::new(
            Vec3::splat(0.1),
            Vec3::splat(0.5),
            Vec3::new(0.9, 0.1, 0.1),
        )));
    }

    fn small_f32(x: f32, y: f32, z: f32, size: f32) -> Obb<f32> {
        Obb::new(Vec3::new(x, y, z), Vec3::x() * size, Vec3::y() * size, Vec3::z() * size)
    }

    #[test]
    fn small_boxes_separate_f32() {
        let a = small_f32(0.0, 0.0, 0.0, 0.01);
        assert!(!a.test_intersection(&small_f32(100.0, 0.0, 0.0, 0.01)));
        assert!(!a.test_intersection(&small_f32(0.02, 0.0, 0.0, 0.01)));
        assert!(a.test_intersection(&small_f32(0.005, 0.005, 0.0, 0.01)));

        let far = Triangle::new(
            Vec3::new(50.0, 0.0, 0.0),
            Vec3::new(50.01, 0.0, 0.0),
            Vec3::new(50.0, 0.01, 0.0),
        );
        assert!(!a.test_intersection_triangle(&far));
        let through = Triangle::new(
            Vec3::new(-0.01, 0.005, -0.01),
            Vec3::new(0.02, 0.005, -0.01),
            Vec3::new(0.005, 0.005, 0.03),
        );
        assert!(a.test_intersection_triangle(&through));
    }

    #[test]
    fn tiny_boxes_separate_f64() {
        let edge = 1e-9;
        let tiny = |x: f64| Obb::new(Vec3::new(x, 0.0, 0.0), Vec3::x() * edge, Vec3::y() * edge, Vec3::z() * edge);
        assert!(!tiny(0.0).test_intersection(&tiny(1.0)));
        assert!(tiny(0.0).test_intersection(&tiny(0.5e-9)));
    }

    #[test]
    fn ray_trace() {
        let m = Mat4::rotation_z(FRAC_PI_4);
        let diamond = Obb::from_transform(&m, Vec3::splat(0.5));
        let r = core::f64::consts::FRAC_1_SQRT_2;

        let along_x = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::x());
        let (t0, t1) = diamond.trace_range(&along_x, 0.0, 100.0).unwrap();
        assert!((t0 - (5.0 - r)).abs() < 1e-9);
        assert!((t1 - (5.0 + r)).abs() < 1e-9);
        assert!(!diamond.trace(&along_x, 0.0, 4.0));
        assert!(diamond.trace(&Ray::new(Vec3::new(-5.0, 0.6, 0.0), Vec3::x()), 0.0, 10.0));

        // crosses the corner of the bounds but not the box
        let corner = Ray::new(Vec3::new(-5.0, -3.8, 0.0), Vec3::new(1.0, 1.0, 0.0));
        assert!(diamond.aabb().trace(&corner).is_some());
        assert!(!diamond.trace(&corner, 0.0, 100.0));
    }

    #[test]
    fn octants_and_radius() {
        let b = Obb::new(Vec3::zero(), Vec3::x() * 10.0, Vec3::y() * 10.0, Vec3::z() * 10.0);
        let s0 = b.segment(0);
        assert_eq!(s0.origin, Vec3::zero());
        assert_eq!(s0.tangent, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(s0.binormal, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(b.segment(7).origin, b.centre());
        for i in 0..Obb::<f64>::VERTEX_COUNT {
            assert!(b.contains_obb(&b.segment(i)));
            assert!((b.segment(i).volume() - 125.0).abs() < 1e-9);
        }
        assert!(!b.contains_obb(&unit_at(9.5, 0.0, 0.0)));

        assert!((unit_at(3.0, 0.0, 0.0).radius() - 3f64.sqrt() / 2.0).abs() < 1e-12);
        let slab = Obb::new(Vec3::zero(), Vec3::x() * 2.0, Vec3::y() * 3.0, Vec3::z() * 6.0);
        assert!((slab.radius() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn swept_boxes() {
        let a = unit_at(0.0, 0.0, 0.0);
        let b = unit_at(5.0, 0.0, 0.0);
        let left = Vec3::new(-10.0, 0.0, 0.0);
        assert!(a.test_collision(&b, left, 0.0, 1.0));
        assert!(!a.test_collision(&b, left, 0.0, 0.3));
        assert!(a.test_collision(&b, left, 0.4, 0.5));
        assert!(!a.test_collision(&b, Vec3::new(0.0, 10.0, 0.0), 0.0, 1.0));

        // the swept bounds cover the box on every face axis; only the
        // velocity axes separate the diagonal pass
        let c = unit_at(3.0, 0.0, 0.0);
        assert!(!a.test_collision(&c, Vec3::new(-3.0, 3.0, 0.0), 0.0, 1.0));
        assert!(a.test_collision(&c, Vec3::new(-3.0, 0.5, 0.0), 0.0, 1.0));
    }

    #[test]
    fn swept_triangle() {
        let a = unit_at(0.0, 0.0, 0.0);
        let above = Triangle::new(
            Vec3::new(0.2, 0.2, 2.0),
            Vec3::new(0.8, 0.2, 2.0),
            Vec3::new(0.5, 0.8, 2.0),
        );
        assert!(a.test_collision_triangle(&above, Vec3::new(0.0, 0.0, -2.0), 0.0, 1.0));
        assert!(!a.test_collision_triangle(&above, Vec3::new(0.0, 0.0, -0.5), 0.0, 1.0));
        assert!(!a.test_collision_triangle(&above, Vec3::new(3.0, 0.0, -2.0), 0.0, 1.0));
    }
}
