//! CLI command implementations

pub mod cmaps;
pub mod intersect;
pub mod lut;
pub mod phantom;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;
use xipy_scene::SceneConfig;

/// Loads the scene config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => {
            debug!("using default scene config");
            Ok(SceneConfig::default())
        }
    }
}
