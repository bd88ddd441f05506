//! Error types for xipy-core operations.
//!
//! The [`Error`] enum covers the failure modes of the volume container:
//! - Buffer construction (shape/length agreement)
//! - Index bounds checking
//! - Shape agreement between volumes that share one voxel grid
//!
//! # Usage
//!
//! ```rust
//! use xipy_core::{Error, Result};
//!
//! fn check(ijk: [usize; 3], shape: [usize; 3]) -> Result<()> {
//!     if ijk.iter().zip(shape.iter()).any(|(i, n)| i >= n) {
//!         return Err(Error::out_of_bounds(ijk, shape));
//!     }
//!     Ok(())
//! }
//! assert!(check([4, 0, 0], [4, 4, 4]).is_err());
//! ```
//!
//! # Used By
//!
//! - [`crate::volume::Volume`] - Construction and indexed access
//! - `xipy-ops` - Wrapped into `OpsError`
//! - `xipy-scene` - Wrapped into `SceneError`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in volume operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Voxel index is outside the volume.
    #[error("voxel {ijk:?} out of bounds for volume {shape:?}")]
    OutOfBounds {
        /// Requested voxel index
        ijk: [usize; 3],
        /// Volume shape
        shape: [usize; 3],
    },

    /// Shape or buffer length is unusable.
    ///
    /// Returned when an axis is zero, when the voxel count overflows, or
    /// when a data buffer does not hold exactly `ni * nj * nk` elements.
    #[error("invalid dimensions {shape:?}: {reason}")]
    InvalidDimensions {
        /// Requested shape
        shape: [usize; 3],
        /// Reason why the shape is invalid
        reason: String,
    },

    /// Two volumes that must share a voxel grid do not.
    #[error("shape mismatch: {expected:?} vs {got:?}")]
    ShapeMismatch {
        /// Shape already in use
        expected: [usize; 3],
        /// Offending shape
        got: [usize; 3],
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(ijk: [usize; 3], shape: [usize; 3]) -> Self {
        Self::OutOfBounds { ijk, shape }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(shape: [usize; 3], reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            shape,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::ShapeMismatch`] error.
    #[inline]
    pub fn shape_mismatch(expected: [usize; 3], got: [usize; 3]) -> Self {
        Self::ShapeMismatch { expected, got }
    }

    /// Returns `true` if this is a bounds error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds([9, 1, 2], [4, 4, 4]);
        let msg = err.to_string();
        assert!(msg.contains("[9, 1, 2]"));
        assert!(msg.contains("[4, 4, 4]"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_shape_mismatch() {
        let err = Error::shape_mismatch([2, 2, 2], [3, 3, 3]);
        assert!(err.to_string().contains("[3, 3, 3]"));
        assert!(!err.is_bounds_error());
    }
}
