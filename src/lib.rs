//! tang-geom: small-vector geometry kernel
//!
//! Fixed-size vectors, matrices and quaternions plus the geometric
//! primitives built from them (rays, segments, planes, triangles, capsules,
//! spheres, boxes, frusta) and the intersection, containment and distance
//! queries between them, plus a static octree for broad-phase lookups.
//! Generic over the scalar type so the same code serves `f32` and `f64`.
//!
//! # Conventions
//! - Matrices are stored column-major and act on column vectors, so
//!   `a * b` applies `b` first.
//! - The in-place composers (`translate`, `scale`, `rotate`) apply the new
//!   transform after the existing one.
//! - Projections are left-handed with clip depth in `[0, 1]`.
//! - Flat array interop is row-major; see [`ArrayInterop`].
//! - Degenerate inputs (zero vectors, collapsed triangles) are not guarded
//!   and yield IEEE special values. Only indexing, inversion and array
//!   shapes return errors.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod scalar;
pub mod error;
mod vector;
mod vec2;
mod vec3;
mod vec4;
mod mat3;
mod mat4;
mod quat;
mod ray;
mod line;
mod plane;
mod triangle;
mod capsule;
mod sphere;
mod aabb;
mod obb;
mod obb2;
mod frustum;
mod collision;
mod interop;
pub mod octree;

pub use scalar::Scalar;
pub use error::{GeomError, Result};
pub use vector::{cross, dot, normalize, Vector};
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use quat::{slerp, Quat, Slerp};
pub use ray::Ray;
pub use line::Line;
pub use plane::{Plane, Side};
pub use triangle::Triangle;
pub use capsule::Capsule;
pub use sphere::Sphere;
pub use aabb::Aabb;
pub use obb::Obb;
pub use obb2::Obb2;
pub use frustum::Frustum;
pub use collision::{collide_line_sphere, collide_obb_sphere, collide_sphere_sphere, ContactInfo};
pub use interop::ArrayInterop;
pub use octree::{Bounded, Octree, Overlaps};

pub type Vec2f = Vec2<f32>;
pub type Vec2d = Vec2<f64>;
pub type Vec3f = Vec3<f32>;
pub type Vec3d = Vec3<f64>;
pub type Vec4f = Vec4<f32>;
pub type Vec4d = Vec4<f64>;
pub type Mat3f = Mat3<f32>;
pub type Mat3d = Mat3<f64>;
pub type Mat4f = Mat4<f32>;
pub type Mat4d = Mat4<f64>;
pub type Quatf = Quat<f32>;
pub type Quatd = Quat<f64>;

pub type Ray2<S> = Ray<Vec2<S>>;
pub type Ray3<S> = Ray<Vec3<S>>;
pub type Line2<S> = Line<Vec2<S>>;
pub type Line3<S> = Line<Vec3<S>>;
pub type Sphere2<S> = Sphere<Vec2<S>>;
pub type Sphere3<S> = Sphere<Vec3<S>>;
pub type Aabb2<S> = Aabb<Vec2<S>>;
pub type Aabb3<S> = Aabb<Vec3<S>>;
pub type Capsule2<S> = Capsule<Vec2<S>>;
pub type Capsule3<S> = Capsule<Vec3<S>>;

// Bytemuck impls for concrete f32/f64 types (generic structs can't derive Pod)
#[cfg(feature = "bytemuck")]
mod bytemuck_impls {
    use super::*;

    macro_rules! impl_pod {
        ($($t:ident),*) => {
            $(
                // SAFETY: all fields are the same float type, #[repr(C)], no padding
                unsafe impl bytemuck::Zeroable for $t<f32> {}
                unsafe impl bytemuck::Pod for $t<f32> {}
                unsafe impl bytemuck::Zeroable for $t<f64> {}
                unsafe impl bytemuck::Pod for $t<f64> {}
            )*
        };
    }

    impl_pod!(Vec2, Vec3, Vec4, Mat3, Mat4, Quat, Plane, Triangle, Obb, Obb2, Frustum);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn aliases_and_reexports() {
        let v: Vec3d = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(dot(v, Vec3::new(4.0, 5.0, 6.0)), 32.0);
        let r: Ray3<f32> = Ray::new(Vec3f::zero(), Vec3f::z());
        assert!(r.contains(Vec3f::new(0.0, 0.0, 2.0)));
        let s: Sphere2<f64> = Sphere::new(Vec2d::zero(), 1.0);
        assert!(s.contains(Vec2d::new(0.5, 0.0)));
    }

    #[test]
    fn display_names() {
        let q = Quatd::identity();
        assert_eq!(q.to_string(), "quat(0, 0, 0, 1)");
        let l: Line2<f64> = Line::new(Vec2::zero(), Vec2::x());
        assert!(l.to_string().starts_with("line2("));
        let b: Aabb3<f64> = Aabb::from_point(Vec3::zero());
        assert!(b.to_string().starts_with("aabb3("));
        let c: Capsule3<f32> = Capsule::default();
        assert!(c.to_string().starts_with("capsule3("));
        assert!(Frustum::<f64>::default().to_string().starts_with("frustum(plane("));
        assert!(Obb2::<f32>::default().to_string().starts_with("obb2("));
    }

    #[cfg(feature = "bytemuck")]
    #[test]
    fn pod_casts() {
        let m = Mat4f::identity();
        let floats: &[f32] = bytemuck::cast_slice(core::slice::from_ref(&m));
        assert_eq!(floats.len(), 16);
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[1], 0.0);
    }
}
