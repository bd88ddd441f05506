//! Error types for blending operations.

use crate::ChannelRole;
use thiserror::Error;
use xipy_core::Shape;
use xipy_lut::LutError;

/// Error type for blending operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// A volume does not share the grid of the registered channels.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Grid of the registered channels
        expected: Shape,
        /// Offending shape
        got: Shape,
    },

    /// Compositing was requested with no channel registered.
    #[error("nothing to composite: no channels registered")]
    EmptyComposition,

    /// The operation needs a channel that is not registered.
    #[error("missing channel: {0}")]
    MissingChannel(ChannelRole),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Colormap or alpha failure.
    #[error(transparent)]
    Lut(#[from] LutError),

    /// Volume container failure.
    #[error(transparent)]
    Core(#[from] xipy_core::Error),
}

/// Result type for blending operations.
pub type OpsResult<T> = Result<T, OpsError>;

impl OpsError {
    /// Converts a core shape mismatch into [`OpsError::ShapeMismatch`].
    pub(crate) fn from_core(err: xipy_core::Error) -> Self {
        match err {
            xipy_core::Error::ShapeMismatch { expected, got } => Self::ShapeMismatch { expected, got },
            other => Self::Core(other),
        }
    }
}
