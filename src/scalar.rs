use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Floating-point element type of every vector, matrix and primitive.
///
/// Implemented for `f32` and `f64`. Both precisions share one generic
/// definition of each type and never convert into each other implicitly.
pub trait Scalar:
    Copy
    + Clone
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;
    const HALF: Self;
    const PI: Self;
    const TAU: Self;
    const FRAC_PI_2: Self;
    /// Machine epsilon.
    const EPSILON: Self;
    /// Geometric tolerance for on-plane, collinear and parallel tests.
    const TOLERANCE: Self;
    const MAX: Self;
    const INFINITY: Self;
    const NEG_INFINITY: Self;

    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn acos(self) -> Self;
    fn atan2(self, other: Self) -> Self;
    fn sin_cos(self) -> (Self, Self);
    fn copysign(self, sign: Self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    fn clamp(self, lo: Self, hi: Self) -> Self;
    fn recip(self) -> Self;
    fn is_finite(self) -> bool;

    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn from_i32(v: i32) -> Self;
}

// std builds call the inherent float methods, no_std builds go through libm.
#[cfg(feature = "std")]
mod float_ops {
    #[inline(always)]
    pub fn sqrt_f32(x: f32) -> f32 { x.sqrt() }
    #[inline(always)]
    pub fn sqrt_f64(x: f64) -> f64 { x.sqrt() }
    #[inline(always)]
    pub fn abs_f32(x: f32) -> f32 { x.abs() }
    #[inline(always)]
    pub fn abs_f64(x: f64) -> f64 { x.abs() }
    #[inline(always)]
    pub fn sin_f32(x: f32) -> f32 { x.sin() }
    #[inline(always)]
    pub fn sin_f64(x: f64) -> f64 { x.sin() }
    #[inline(always)]
    pub fn cos_f32(x: f32) -> f32 { x.cos() }
    #[inline(always)]
    pub fn cos_f64(x: f64) -> f64 { x.cos() }
    #[inline(always)]
    pub fn tan_f32(x: f32) -> f32 { x.tan() }
    #[inline(always)]
    pub fn tan_f64(x: f64) -> f64 { x.tan() }
    #[inline(always)]
    pub fn acos_f32(x: f32) -> f32 { x.acos() }
    #[inline(always)]
    pub fn acos_f64(x: f64) -> f64 { x.acos() }
    #[inline(always)]
    pub fn atan2_f32(y: f32, x: f32) -> f32 { y.atan2(x) }
    #[inline(always)]
    pub fn atan2_f64(y: f64, x: f64) -> f64 { y.atan2(x) }
    #[inline(always)]
    pub fn sin_cos_f32(x: f32) -> (f32, f32) { x.sin_cos() }
    #[inline(always)]
    pub fn sin_cos_f64(x: f64) -> (f64, f64) { x.sin_cos() }
    #[inline(always)]
    pub fn copysign_f32(x: f32, s: f32) -> f32 { x.copysign(s) }
    #[inline(always)]
    pub fn copysign_f64(x: f64, s: f64) -> f64 { x.copysign(s) }
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
mod float_ops {
    #[inline(always)]
    pub fn sqrt_f32(x: f32) -> f32 { libm::sqrtf(x) }
    #[inline(always)]
    pub fn sqrt_f64(x: f64) -> f64 { libm::sqrt(x) }
    #[inline(always)]
    pub fn abs_f32(x: f32) -> f32 { libm::fabsf(x) }
    #[inline(always)]
    pub fn abs_f64(x: f64) -> f64 { libm::fabs(x) }
    #[inline(always)]
    pub fn sin_f32(x: f32) -> f32 { libm::sinf(x) }
    #[inline(always)]
    pub fn sin_f64(x: f64) -> f64 { libm::sin(x) }
    #[inline(always)]
    pub fn cos_f32(x: f32) -> f32 { libm::cosf(x) }
    #[inline(always)]
    pub fn cos_f64(x: f64) -> f64 { libm::cos(x) }
    #[inline(always)]
    pub fn tan_f32(x: f32) -> f32 { libm::tanf(x) }
    #[inline(always)]
    pub fn tan_f64(x: f64) -> f64 { libm::tan(x) }
    #[inline(always)]
    pub fn acos_f32(x: f32) -> f32 { libm::acosf(x) }
    #[inline(always)]
    pub fn acos_f64(x: f64) -> f64 { libm::acos(x) }
    #[inline(always)]
    pub fn atan2_f32(y: f32, x: f32) -> f32 { libm::atan2f(y, x) }
    #[inline(always)]
    pub fn atan2_f64(y: f64, x: f64) -> f64 { libm::atan2(y, x) }
    #[inline(always)]
    pub fn sin_cos_f32(x: f32) -> (f32, f32) { libm::sincosf(x) }
    #[inline(always)]
    pub fn sin_cos_f64(x: f64) -> (f64, f64) { libm::sincos(x) }
    #[inline(always)]
    pub fn copysign_f32(x: f32, s: f32) -> f32 { libm::copysignf(x, s) }
    #[inline(always)]
    pub fn copysign_f64(x: f64, s: f64) -> f64 { libm::copysign(x, s) }
}

macro_rules! impl_scalar_float {
    ($t:ident, $pi:expr, $tau:expr, $frac_pi_2:expr, $tol:expr) => {
        ::paste::paste! {
        impl Scalar for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const TWO: Self = 2.0;
            const HALF: Self = 0.5;
            const PI: Self = $pi;
            const TAU: Self = $tau;
            const FRAC_PI_2: Self = $frac_pi_2;
            const EPSILON: Self = $t::EPSILON;
            const TOLERANCE: Self = $tol;
            const MAX: Self = $t::MAX;
            const INFINITY: Self = $t::INFINITY;
            const NEG_INFINITY: Self = $t::NEG_INFINITY;

            #[inline] fn sqrt(self) -> Self { float_ops::[<sqrt_ $t>](self) }
            #[inline] fn abs(self) -> Self { float_ops::[<abs_ $t>](self) }
            #[inline] fn sin(self) -> Self { float_ops::[<sin_ $t>](self) }
            #[inline] fn cos(self) -> Self { float_ops::[<cos_ $t>](self) }
            #[inline] fn tan(self) -> Self { float_ops::[<tan_ $t>](self) }
            #[inline] fn acos(self) -> Self { float_ops::[<acos_ $t>](self) }
            #[inline] fn atan2(self, other: Self) -> Self { float_ops::[<atan2_ $t>](self, other) }
            #[inline] fn sin_cos(self) -> (Self, Self) { float_ops::[<sin_cos_ $t>](self) }
            #[inline] fn copysign(self, sign: Self) -> Self { float_ops::[<copysign_ $t>](self, sign) }

            #[inline] fn min(self, other: Self) -> Self { if self < other { self } else { other } }
            #[inline] fn max(self, other: Self) -> Self { if self > other { self } else { other } }
            #[inline] fn clamp(self, lo: Self, hi: Self) -> Self {
                if self < lo { lo } else if self > hi { hi } else { self }
            }
            #[inline] fn recip(self) -> Self { 1.0 / self }
            #[inline] fn is_finite(self) -> bool { $t::is_finite(self) }

            #[inline] fn from_f64(v: f64) -> Self { v as $t }
            #[inline] fn to_f64(self) -> f64 { self as f64 }
            #[inline] fn from_i32(v: i32) -> Self { v as $t }
        }
        }
    };
}

impl_scalar_float!(
    f32,
    core::f32::consts::PI,
    core::f32::consts::TAU,
    core::f32::consts::FRAC_PI_2,
    1e-5
);
impl_scalar_float!(
    f64,
    core::f64::consts::PI,
    core::f64::consts::TAU,
    core::f64::consts::FRAC_PI_2,
    1e-9
);
