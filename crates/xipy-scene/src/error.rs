//! Error types for scene state.

use thiserror::Error;
use xipy_lut::LutError;
use xipy_ops::OpsError;

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised by the scene and its configuration.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The three plane normals do not span space.
    #[error("degenerate cut planes: normal determinant {det:e}")]
    DegeneratePlanes {
        /// Determinant of the stacked normals
        det: f64,
    },

    /// The operation needs a loaded main volume.
    #[error("no volume loaded")]
    NoVolume,

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Colormap construction failure.
    #[error(transparent)]
    Lut(#[from] LutError),

    /// Blending or mask failure.
    #[error(transparent)]
    Ops(#[from] OpsError),
}
