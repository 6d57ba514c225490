use crate::{Scalar, Vec3};
use core::fmt;
use core::ops::{Add, Neg, Sub};

/// Dimension-generic vector algebra.
///
/// Implemented for [`Vec2`](crate::Vec2), [`Vec3`] and [`Vec4`](crate::Vec4).
/// Primitives that exist in both 2D and 3D (rays, segments, capsules,
/// spheres, boxes) are written once against this trait.
pub trait Vector:
    Copy
    + PartialEq
    + fmt::Debug
    + fmt::Display
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
{
    type Scalar: Scalar;

    /// Number of components.
    const DIM: usize;

    fn splat(v: Self::Scalar) -> Self;

    /// Component `i`. Indices past the last component read the last one.
    fn component(&self, i: usize) -> Self::Scalar;

    fn from_fn<F: FnMut(usize) -> Self::Scalar>(f: F) -> Self;

    fn dot(self, rhs: Self) -> Self::Scalar;

    /// Multiply every component by `k`.
    fn scaled(self, k: Self::Scalar) -> Self;

    /// Squared norm of the cross product (2D determinant squared in 2D).
    fn cross_norm_sq(self, rhs: Self) -> Self::Scalar;

    #[inline]
    fn length_sq(self) -> Self::Scalar {
        self.dot(self)
    }

    #[inline]
    fn length(self) -> Self::Scalar {
        self.length_sq().sqrt()
    }

    #[inline]
    fn distance_sq(self, other: Self) -> Self::Scalar {
        (self - other).length_sq()
    }

    #[inline]
    fn distance(self, other: Self) -> Self::Scalar {
        (self - other).length()
    }

    #[inline]
    fn normalized(self) -> Self {
        self.scaled(self.length().recip())
    }

    #[inline]
    fn lerp(self, other: Self, t: Self::Scalar) -> Self {
        self + (other - self).scaled(t)
    }

    #[inline]
    fn component_min(self, other: Self) -> Self {
        Self::from_fn(|i| self.component(i).min(other.component(i)))
    }

    #[inline]
    fn component_max(self, other: Self) -> Self {
        Self::from_fn(|i| self.component(i).max(other.component(i)))
    }

    /// Collinearity with a relative tolerance: `|a x b| <= eps * |a| * |b|`.
    ///
    /// Invariant under scaling either argument. A zero vector is collinear
    /// with everything.
    #[inline]
    fn is_collinear_eps(self, other: Self, eps: Self::Scalar) -> bool {
        self.cross_norm_sq(other) <= eps * eps * self.length_sq() * other.length_sq()
    }

    #[inline]
    fn is_collinear(self, other: Self) -> bool {
        self.is_collinear_eps(other, <Self::Scalar as Scalar>::TOLERANCE)
    }
}

/// Dot product.
#[inline]
pub fn dot<V: Vector>(a: V, b: V) -> V::Scalar {
    a.dot(b)
}

/// Cross product of two 3D vectors.
#[inline]
pub fn cross<S: Scalar>(a: Vec3<S>, b: Vec3<S>) -> Vec3<S> {
    a.cross(b)
}

/// Unit vector in the direction of `v`. The input is left untouched.
#[inline]
pub fn normalize<V: Vector>(v: V) -> V {
    v.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Vec2, Vec4};

    #[test]
    fn free_functions_match_methods() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(dot(a, b), 32.0);
        assert_eq!(cross(a, b), a.cross(b));
        let n = normalize(a);
        assert!((Vector::length(n) - 1.0).abs() < 1e-12);
        // input untouched
        assert_eq!(a, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn collinearity_is_scale_invariant() {
        let a = Vec3::new(0.3, -1.7, 2.9);
        for k in [1e-6, -3.0, 2.5, 1e6] {
            assert!(a.is_collinear(a * k), "k = {k}");
        }
        assert!(!a.is_collinear(Vec3::new(1.0, 0.0, 0.0)));

        let p = Vec2::new(2.0_f32, 5.0);
        assert!(p.is_collinear(p * -4.0));
        assert!(!p.is_collinear(p.perpendicular()));
    }

    #[test]
    fn generic_min_max() {
        let a = Vec2::new(1.0, 5.0);
        let b = Vec2::new(3.0, -2.0);
        assert_eq!(Vector::component_min(a, b), Vec2::new(1.0, -2.0));
        assert_eq!(Vector::component_max(a, b), Vec2::new(3.0, 5.0));
    }

    #[test]
    fn vec4_collinear() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert!(a.is_collinear(a * 7.0));
        assert!(!a.is_collinear(Vec4::new(0.0, 0.0, 0.0, 1.0)));
    }
}
