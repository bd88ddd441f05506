//! Dense 3-D volume buffer.
//!
//! [`Volume`] is the container shared by every stage of the pipeline: raw
//! scalar channels, missing-data masks, per-channel RGBA colors, the
//! composited output, and the derived surface mask.
//!
//! # Memory Layout
//!
//! Voxels are stored contiguously in row-major order with the last axis
//! varying fastest:
//!
//! ```text
//! offset(i, j, k) = (i * nj + j) * nk + k
//! ```
//!
//! # Usage
//!
//! ```rust
//! use xipy_core::Volume;
//!
//! let mut vol = Volume::filled([4, 5, 6], 0.0f32).unwrap();
//! vol[[1, 2, 3]] = 7.5;
//! assert_eq!(vol.get([1, 2, 3]), Some(&7.5));
//! assert_eq!(vol.get([4, 0, 0]), None);
//!
//! let doubled = vol.map(|v| v * 2.0);
//! assert_eq!(doubled[[1, 2, 3]], 15.0);
//! ```

use crate::{Error, Result};
use std::ops::{Index, IndexMut};

/// Shape of a volume as `[ni, nj, nk]`.
pub type Shape = [usize; 3];

/// Returns the voxel count of `shape`, or an error for empty or
/// overflowing shapes.
pub fn voxel_count(shape: Shape) -> Result<usize> {
    if shape.iter().any(|&n| n == 0) {
        return Err(Error::invalid_dimensions(shape, "axis length must be > 0"));
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| Error::invalid_dimensions(shape, "voxel count overflows usize"))
}

/// Owned 3-D buffer of voxels.
///
/// # Example
///
/// ```rust
/// use xipy_core::Volume;
///
/// let data: Vec<u8> = (0..8).collect();
/// let vol = Volume::from_vec([2, 2, 2], data).unwrap();
/// assert_eq!(vol[[1, 0, 1]], 5);
/// assert_eq!(vol.index_of(5), [1, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Clone> Volume<T> {
    /// Creates a volume with every voxel set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if an axis is zero or the voxel
    /// count overflows.
    pub fn filled(shape: Shape, value: T) -> Result<Self> {
        let n = voxel_count(shape)?;
        Ok(Self {
            shape,
            data: vec![value; n],
        })
    }

    /// Sets every voxel to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Volume<T> {
    /// Wraps an existing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len()` differs from the
    /// voxel count of `shape`.
    pub fn from_vec(shape: Shape, data: Vec<T>) -> Result<Self> {
        let n = voxel_count(shape)?;
        if data.len() != n {
            return Err(Error::invalid_dimensions(
                shape,
                format!("expected {} elements, got {}", n, data.len()),
            ));
        }
        Ok(Self { shape, data })
    }

    /// Builds a volume by evaluating `f` at every voxel index.
    pub fn from_fn(shape: Shape, mut f: impl FnMut([usize; 3]) -> T) -> Result<Self> {
        let n = voxel_count(shape)?;
        let mut data = Vec::with_capacity(n);
        for i in 0..shape[0] {
            for j in 0..shape[1] {
                for k in 0..shape[2] {
                    data.push(f([i, j, k]));
                }
            }
        }
        Ok(Self { shape, data })
    }

    /// Volume shape `[ni, nj, nk]`.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of voxels.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: zero-sized volumes cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat voxel storage.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable flat voxel storage.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the volume and returns the flat buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns `true` if `ijk` lies inside the volume.
    #[inline]
    pub fn contains(&self, ijk: [usize; 3]) -> bool {
        ijk[0] < self.shape[0] && ijk[1] < self.shape[1] && ijk[2] < self.shape[2]
    }

    /// Flat offset of `ijk`, or `None` when out of bounds.
    #[inline]
    pub fn offset(&self, ijk: [usize; 3]) -> Option<usize> {
        if self.contains(ijk) {
            Some((ijk[0] * self.shape[1] + ijk[1]) * self.shape[2] + ijk[2])
        } else {
            None
        }
    }

    /// Voxel index of a flat offset.
    #[inline]
    pub fn index_of(&self, offset: usize) -> [usize; 3] {
        let k = offset % self.shape[2];
        let rest = offset / self.shape[2];
        [rest / self.shape[1], rest % self.shape[1], k]
    }

    /// Voxel at `ijk`.
    #[inline]
    pub fn get(&self, ijk: [usize; 3]) -> Option<&T> {
        self.offset(ijk).map(|o| &self.data[o])
    }

    /// Mutable voxel at `ijk`.
    #[inline]
    pub fn get_mut(&mut self, ijk: [usize; 3]) -> Option<&mut T> {
        self.offset(ijk).map(move |o| &mut self.data[o])
    }

    /// Writes `value` at `ijk`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `ijk` is outside the volume.
    pub fn set(&mut self, ijk: [usize; 3], value: T) -> Result<()> {
        let shape = self.shape;
        let slot = self
            .get_mut(ijk)
            .ok_or_else(|| Error::out_of_bounds(ijk, shape))?;
        *slot = value;
        Ok(())
    }

    /// Iterates voxels in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Applies `f` to every voxel, producing a volume of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Volume<U> {
        Volume {
            shape: self.shape,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Checks that `other` shares this volume's grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when the shapes differ.
    pub fn ensure_same_shape<U>(&self, other: &Volume<U>) -> Result<()> {
        if self.shape != other.shape {
            return Err(Error::shape_mismatch(self.shape, other.shape));
        }
        Ok(())
    }
}

impl<T> Index<[usize; 3]> for Volume<T> {
    type Output = T;

    fn index(&self, ijk: [usize; 3]) -> &T {
        match self.offset(ijk) {
            Some(o) => &self.data[o],
            None => panic!("voxel {:?} out of bounds for volume {:?}", ijk, self.shape),
        }
    }
}

impl<T> IndexMut<[usize; 3]> for Volume<T> {
    fn index_mut(&mut self, ijk: [usize; 3]) -> &mut T {
        match self.offset(ijk) {
            Some(o) => &mut self.data[o],
            None => panic!("voxel {:?} out of bounds for volume {:?}", ijk, self.shape),
        }
    }
}
