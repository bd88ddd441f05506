//! # xipy-lut
//!
//! Indexed alpha colormaps for volume channels.
//!
//! A [`Colormap`] is a table of `N` RGBA rows sampled from piecewise-linear
//! channel segments, followed by three reserved rows for under-range,
//! over-range and bad (masked or NaN) data.
//!
//! # Pipeline
//!
//! ```text
//! normalized value --lut_index--> row --lookup(alpha)--> RGBA
//! ```
//!
//! - [`lut_index`] / [`lut_indices`] - values to rows
//! - [`Colormap::lookup`] and friends - rows to colors, alpha resolved per call
//! - [`Colormap::map_values`] - both steps at once
//!
//! # Usage
//!
//! ```rust
//! use xipy_lut::{Alpha, ColormapRegistry, build_colormap};
//!
//! let registry = ColormapRegistry::builtin(256).unwrap();
//! let hot = registry.get("hot").unwrap();
//! let rgba = hot.map_value(0.75f32, &Alpha::Uniform(0.5)).unwrap();
//! assert_eq!(rgba[3], 0.5);
//!
//! let custom = build_colormap("fire", vec![[0.0f32, 0.0, 0.0], [1.0, 0.5, 0.0]], 64, 1.0).unwrap();
//! assert_eq!(custom.reversed().name(), "fire_r");
//! ```
//!
//! # Dependencies
//!
//! - [`xipy-core`] - RGBA types and volumes
//! - [`xipy-math`] - Sample spacing
//! - [`thiserror`] - Error handling
//! - [`tracing`] - Diagnostics
//!
//! # Used By
//!
//! - `xipy-ops` - Per-channel coloring
//! - `xipy-scene` - Configured colormaps
//! - `xipy-cli` - Colormap inspection

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod alpha;
mod colormap;
mod error;
mod index;
mod segment;
pub mod color;
pub mod registry;

pub use alpha::{Alpha, AlphaTable, anatomical_alpha};
pub use color::{Rgb, parse_color, rgb_from_hex};
pub use colormap::{
    ColorStop, Colormap, ControlPoints, DEFAULT_TABLE_SIZE, build_colormap, reverse, to_bytes,
};
pub use error::{LutError, LutResult};
pub use index::{LutInput, bad_index, lut_index, lut_indices, over_index, under_index};
pub use registry::ColormapRegistry;
pub use segment::{Segment, SegmentData, make_mapping_array};
