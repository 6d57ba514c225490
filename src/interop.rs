//! Conversion to and from flat numeric arrays.
//!
//! Arrays are row-major. Matrices are stored column-major internally, so
//! this is the only place where a matrix is transposed on the way in or out.

use crate::error::{GeomError, Result};
use crate::{Mat3, Mat4, Quat, Scalar, Vec2, Vec3, Vec4};
use alloc::vec::Vec;

pub trait ArrayInterop: Sized {
    type Scalar: Scalar;

    /// Array shape, e.g. `[3]` for a vector or `[4, 4]` for a matrix.
    const SHAPE: &'static [usize];

    /// Flat row-major copy of the elements.
    fn to_array(&self) -> Vec<Self::Scalar>;

    /// Build from a flat row-major buffer of the given shape.
    fn from_array(shape: &[usize], data: &[Self::Scalar]) -> Result<Self>;
}

fn check_shape<S>(expected: &[usize], shape: &[usize], data: &[S]) -> Result<()> {
    let want: usize = expected.iter().product();
    if shape != expected {
        return Err(GeomError::shape_mismatch(want, shape.iter().product()));
    }
    if data.len() != want {
        return Err(GeomError::shape_mismatch(want, data.len()));
    }
    Ok(())
}

impl<S: Scalar> ArrayInterop for Vec2<S> {
    type Scalar = S;
    const SHAPE: &'static [usize] = &[2];

    fn to_array(&self) -> Vec<S> {
        alloc::vec![self.x, self.y]
    }

    fn from_array(shape: &[usize], data: &[S]) -> Result<Self> {
        check_shape(Self::SHAPE, shape, data)?;
        Ok(Self::new(data[0], data[1]))
    }
}

impl<S: Scalar> ArrayInterop for Vec3<S> {
    type Scalar = S;
    const SHAPE: &'static [usize] = &[3];

    fn to_array(&self) -> Vec<S> {
        self.as_array().to_vec()
    }

    fn from_array(shape: &[usize], data: &[S]) -> Result<Self> {
        check_shape(Self::SHAPE, shape, data)?;
        Ok(Self::new(data[0], data[1], data[2]))
    }
}

impl<S: Scalar> ArrayInterop for Vec4<S> {
    type Scalar = S;
    const SHAPE: &'static [usize] = &[4];

    fn to_array(&self) -> Vec<S> {
        self.as_array().to_vec()
    }

    fn from_array(shape: &[usize], data: &[S]) -> Result<Self> {
        check_shape(Self::SHAPE, shape, data)?;
        Ok(Self::new(data[0], data[1], data[2], data[3]))
    }
}

/// Laid out as `[x, y, z, w]`.
impl<S: Scalar> ArrayInterop for Quat<S> {
    type Scalar = S;
    const SHAPE: &'static [usize] = &[4];

    fn to_array(&self) -> Vec<S> {
        self.as_array().to_vec()
    }

    fn from_array(shape: &[usize], data: &[S]) -> Result<Self> {
        check_shape(Self::SHAPE, shape, data)?;
        Ok(Self::new(data[0], data[1], data[2], data[3]))
    }
}

impl<S: Scalar> ArrayInterop for Mat3<S> {
    type Scalar = S;
    const SHAPE: &'static [usize] = &[3, 3];

    fn to_array(&self) -> Vec<S> {
        (0..3).flat_map(|row| (0..3).map(move |col| self.at(col, row))).collect()
    }

    fn from_array(shape: &[usize], data: &[S]) -> Result<Self> {
        check_shape(Self::SHAPE, shape, data)?;
        let row = |i: usize| Vec3::new(data[3 * i], data[3 * i + 1], data[3 * i + 2]);
        Ok(Self::from_rows(row(0), row(1), row(2)))
    }
}

impl<S: Scalar> ArrayInterop for Mat4<S> {
    type Scalar = S;
    const SHAPE: &'static [usize] = &[4, 4];

    fn to_array(&self) -> Vec<S> {
        (0..4).flat_map(|row| (0..4).map(move |col| self.at(col, row))).collect()
    }

    fn from_array(shape: &[usize], data: &[S]) -> Result<Self> {
        check_shape(Self::SHAPE, shape, data)?;
        let row = |i: usize| {
            Vec4::new(data[4 * i], data[4 * i + 1], data[4 * i + 2], data[4 * i + 3])
        };
        Ok(Self::from_rows(row(0), row(1), row(2), row(3)))
    }
}
