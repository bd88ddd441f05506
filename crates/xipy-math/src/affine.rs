//! Voxel-to-world coordinate mapping.
//!
//! An [`Affine`] maps a (fractional) voxel index `ijk` into world space:
//!
//! ```text
//! world = linear * ijk + offset
//! ```
//!
//! The inverse mapping is used to look a world position up in a volume,
//! e.g. when probing values under the crosshair.
//!
//! # Usage
//!
//! ```rust
//! use xipy_math::{Affine, Vec3};
//!
//! // 2 mm isotropic voxels, origin at (-90, -126, -72)
//! let affine = Affine::scaled(Vec3::splat(2.0), Vec3::new(-90.0, -126.0, -72.0));
//! let world = affine.voxel_to_world(Vec3::new(45.0, 63.0, 36.0));
//! assert_eq!(world, Vec3::ZERO);
//!
//! let ijk = affine.world_to_voxel(world).unwrap();
//! assert_eq!(ijk, Vec3::new(45.0, 63.0, 36.0));
//! ```

use crate::{Mat3, Vec3};
use xipy_core::Shape;

/// Affine voxel-to-world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    /// Linear part (rows map voxel axes into world axes)
    pub linear: Mat3,
    /// World coordinate of voxel (0, 0, 0)
    pub offset: Vec3,
}

impl Affine {
    /// Identity mapping: world coordinates equal voxel indices.
    pub const IDENTITY: Self = Self {
        linear: Mat3::IDENTITY,
        offset: Vec3::ZERO,
    };

    /// Creates an affine from its linear part and offset.
    #[inline]
    pub const fn new(linear: Mat3, offset: Vec3) -> Self {
        Self { linear, offset }
    }

    /// Axis-aligned affine with per-axis voxel size.
    #[inline]
    pub const fn scaled(voxel_size: Vec3, offset: Vec3) -> Self {
        Self::new(
            Mat3::diagonal(voxel_size.x, voxel_size.y, voxel_size.z),
            offset,
        )
    }

    /// Creates from a row-major 4x4 homogeneous matrix (bottom row ignored).
    pub fn from_homogeneous(m: [[f64; 4]; 4]) -> Self {
        Self::new(
            Mat3::from_rows([
                [m[0][0], m[0][1], m[0][2]],
                [m[1][0], m[1][1], m[1][2]],
                [m[2][0], m[2][1], m[2][2]],
            ]),
            Vec3::new(m[0][3], m[1][3], m[2][3]),
        )
    }

    /// Maps a voxel index into world space.
    #[inline]
    pub fn voxel_to_world(&self, ijk: Vec3) -> Vec3 {
        self.linear * ijk + self.offset
    }

    /// Maps a world point to a fractional voxel index.
    ///
    /// Returns `None` if the linear part is singular.
    pub fn world_to_voxel(&self, world: Vec3) -> Option<Vec3> {
        self.linear
            .inverse()
            .map(|inv| inv * (world - self.offset))
    }

    /// Nearest voxel index of a world point inside `shape`.
    ///
    /// Returns `None` when the point falls outside the grid.
    pub fn world_to_index(&self, world: Vec3, shape: Shape) -> Option<[usize; 3]> {
        let ijk = self.world_to_voxel(world)?.round();
        let mut out = [0usize; 3];
        for axis in 0..3 {
            let v = ijk[axis];
            if !v.is_finite() || v < 0.0 || v >= shape[axis] as f64 {
                return None;
            }
            out[axis] = v as usize;
        }
        Some(out)
    }

    /// World-space bounding corners of a grid: (min, max).
    pub fn bounds(&self, shape: Shape) -> (Vec3, Vec3) {
        let hi = Vec3::new(
            shape[0].saturating_sub(1) as f64,
            shape[1].saturating_sub(1) as f64,
            shape[2].saturating_sub(1) as f64,
        );
        let mut lo_w = Vec3::splat(f64::INFINITY);
        let mut hi_w = Vec3::splat(f64::NEG_INFINITY);
        for corner in 0..8 {
            let c = Vec3::new(
                if corner & 1 == 0 { 0.0 } else { hi.x },
                if corner & 2 == 0 { 0.0 } else { hi.y },
                if corner & 4 == 0 { 0.0 } else { hi.z },
            );
            let w = self.voxel_to_world(c);
            for axis in 0..3 {
                lo_w[axis] = lo_w[axis].min(w[axis]);
                hi_w[axis] = hi_w[axis].max(w[axis]);
            }
        }
        (lo_w, hi_w)
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homogeneous() {
        let a = Affine::from_homogeneous([
            [0.0, 0.0, 2.0, -10.0],
            [0.0, 2.0, 0.0, -20.0],
            [2.0, 0.0, 0.0, -30.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let w = a.voxel_to_world(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(w, Vec3::new(-4.0, -16.0, -28.0));
        let back = a.world_to_voxel(w).unwrap();
        assert!(back.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-12));
    }

    #[test]
    fn test_world_to_index_bounds() {
        let a = Affine::scaled(Vec3::splat(2.0), Vec3::ZERO);
        assert_eq!(a.world_to_index(Vec3::new(2.9, 4.0, 0.0), [4, 4, 4]), Some([1, 2, 0]));
        assert_eq!(a.world_to_index(Vec3::new(-1.1, 0.0, 0.0), [4, 4, 4]), None);
        assert_eq!(a.world_to_index(Vec3::new(7.0, 0.0, 0.0), [4, 4, 4]), None);
    }

    #[test]
    fn test_singular_inverse() {
        let a = Affine::scaled(Vec3::new(1.0, 0.0, 1.0), Vec3::ZERO);
        assert!(a.world_to_voxel(Vec3::ONE).is_none());
    }

    #[test]
    fn test_bounds_flipped_axis() {
        let a = Affine::scaled(Vec3::new(-1.0, 1.0, 1.0), Vec3::new(9.0, 0.0, 0.0));
        let (lo, hi) = a.bounds([10, 5, 3]);
        assert_eq!(lo, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(hi, Vec3::new(9.0, 4.0, 2.0));
    }
}
