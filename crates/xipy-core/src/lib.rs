//! # xipy-core
//!
//! Core types for orthogonal-plane volume visualization.
//!
//! This crate provides the foundational types used throughout xipy-rs:
//!
//! - [`Volume`] - Dense 3-D voxel buffer shared by every pipeline stage
//! - [`Shape`] - Volume shape `[ni, nj, nk]`
//! - [`Error`], [`Result`] - Core error handling
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. All other xipy-rs crates
//! depend on `xipy-core`:
//!
//! ```text
//! xipy-core (this crate)
//!    ^
//!    |
//!    +-- xipy-math (vectors, matrices, voxel-to-world affine)
//!    +-- xipy-lut (indexed alpha colormaps)
//!    +-- xipy-ops (channel blending, surface mask)
//!    +-- xipy-scene (cut planes, interaction, configuration)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod volume;

pub use error::*;
pub use volume::*;

/// Four-component color, straight (non-premultiplied) alpha, values in [0, 1].
pub type Rgba = [f32; 4];

/// Four-component byte color in [0, 255].
pub type Rgba8 = [u8; 4];

/// Prelude module for convenient imports.
///
/// ```
/// use xipy_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::volume::{Shape, Volume};
    pub use crate::{Rgba, Rgba8};
}
