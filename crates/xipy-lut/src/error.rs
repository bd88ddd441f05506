//! Colormap error types.

use thiserror::Error;

/// Result type for colormap operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while building or applying colormaps.
#[derive(Debug, Error)]
pub enum LutError {
    /// Malformed colormap input: empty or unordered control
    /// points, bad color strings, wrong-length alpha curves.
    #[error("invalid colormap input: {0}")]
    InvalidInput(String),
}

impl LutError {
    /// Creates an [`LutError::InvalidInput`] error.
    #[inline]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
