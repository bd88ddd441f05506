//! # xipy-ops
//!
//! Volume operations for orthogonal-plane neuroimaging display.
//!
//! # Modules
//!
//! - [`blender`] - Multi-channel colormapping and compositing
//! - [`composite`] - Porter-Duff over on straight-alpha RGBA
//! - [`filter`] - Separable 3-D Gaussian smoothing
//! - [`morphology`] - Hole filling and erosion
//! - [`threshold`] - Fixed and empirical-null thresholds
//! - [`surface`] - Cortical surface mask derivation
//!
//! # Example
//!
//! ```rust
//! use xipy_core::Volume;
//! use xipy_lut::{Alpha, ColormapRegistry};
//! use xipy_ops::{Blender, ChannelRole, MaskOptions, ThresholdStrategy};
//!
//! let cmaps = ColormapRegistry::builtin(256).unwrap();
//! let anat = Volume::from_fn([16, 16, 16], |ijk| {
//!     if ijk.iter().all(|&v| (4..12).contains(&v)) { 200.0 } else { 0.0 }
//! })
//! .unwrap();
//!
//! let mut blender = Blender::new();
//! blender
//!     .set_channel(ChannelRole::Main, anat, cmaps.get("gray").unwrap().clone(), Alpha::OPAQUE)
//!     .unwrap();
//!
//! let opts = MaskOptions { presmooth_sigma: 1.0, postsmooth_sigma: 1.0, erosion_iterations: 0 };
//! let mask = blender
//!     .derive_surface_mask(&ThresholdStrategy::Fixed { value: 100.0 }, &opts)
//!     .unwrap();
//! assert_eq!(mask[[0, 0, 0]], 0);
//! ```
//!
//! # Features
//!
//! - `parallel` - split voxel loops across the rayon pool (off by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod norm;
mod parallel;
pub mod blender;
pub mod composite;
pub mod filter;
pub mod morphology;
pub mod surface;
pub mod threshold;

pub use blender::{Blender, Channel, ChannelRole};
pub use composite::over_pixel;
pub use error::{OpsError, OpsResult};
pub use norm::Norm;
pub use surface::{MaskOptions, surface_mask};
pub use threshold::{NullEstimate, ThresholdStrategy, estimate_null};
