//! # xipy-math
//!
//! Math utilities for cut-plane geometry and color tables.
//!
//! - [`Vec3`] - World-space points and normals (f64)
//! - [`Mat3`] - 3x3 matrices (plane systems, affine linear parts)
//! - [`Affine`] - Voxel-to-world coordinate mapping
//! - Interpolation utilities ([`lerp`], [`linspace`], [`saturate`])
//!
//! # Design
//!
//! Determinants and inverses are delegated to [`glam`]'s double precision
//! types. Matrices are **row-major** with **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Usage
//!
//! ```rust
//! use xipy_math::{Mat3, Vec3};
//!
//! let normals = Mat3::from_row_vecs(Vec3::X, Vec3::Y, Vec3::Z);
//! assert_eq!(normals.determinant(), 1.0);
//! ```
//!
//! # Used By
//!
//! - `xipy-lut` - LUT sampling positions
//! - `xipy-scene` - Plane intersection, crop geometry, probing

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod affine;
mod interp;
mod mat3;
mod vec3;

pub use affine::*;
pub use interp::*;
pub use mat3::*;
pub use vec3::*;

/// Re-export glam types for direct use
pub mod glam {
    pub use ::glam::{DMat3, DVec3};
}
