//! Scene configuration.
//!
//! Loaded from YAML; every key is optional:
//!
//! ```yaml
//! table_size: 256
//! gamma: 1.0
//! threshold_strategy: !empirical_null
//!   sigma_multiple: 2.0
//!   fallback: 128.0
//! erosion_iterations: 0
//! cutout_mode: false
//! main_colormap: gray
//! overlay_colormap: hot
//! ```

use crate::{SceneError, SceneResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use xipy_lut::{Colormap, ColormapRegistry, DEFAULT_TABLE_SIZE};
use xipy_ops::{MaskOptions, ThresholdStrategy};

/// Display and mask settings for an [`OrthoScene`](crate::OrthoScene).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Ordinary rows per colormap
    pub table_size: usize,
    /// Colormap sampling exponent
    pub gamma: f32,
    /// Surface mask threshold
    pub threshold_strategy: ThresholdStrategy,
    /// Erosion passes applied to the surface mask
    pub erosion_iterations: usize,
    /// Start with the cut planes visible and cropping
    pub cutout_mode: bool,
    /// Colormap for the anatomical channel
    pub main_colormap: String,
    /// Colormap for the functional overlay
    pub overlay_colormap: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            gamma: 1.0,
            threshold_strategy: ThresholdStrategy::default(),
            erosion_iterations: 0,
            cutout_mode: false,
            main_colormap: "gray".into(),
            overlay_colormap: "hot".into(),
        }
    }
}

impl SceneConfig {
    /// Parses and validates a YAML document.
    ///
    /// # Errors
    ///
    /// [`SceneError::Yaml`] for malformed YAML, [`SceneError::Config`] for
    /// out-of-range values.
    pub fn from_yaml_str(yaml: &str) -> SceneResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a YAML file.
    ///
    /// # Errors
    ///
    /// As [`SceneConfig::from_yaml_str`], plus [`SceneError::Io`].
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading scene config");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serializes to YAML.
    ///
    /// # Errors
    ///
    /// [`SceneError::Yaml`] if serialization fails.
    pub fn to_yaml(&self) -> SceneResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`SceneError::Config`] naming the first offending key.
    pub fn validate(&self) -> SceneResult<()> {
        if self.table_size == 0 {
            return Err(SceneError::Config("table_size must be >= 1".into()));
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(SceneError::Config(format!(
                "gamma must be > 0 and finite, got {}",
                self.gamma
            )));
        }
        match self.threshold_strategy {
            ThresholdStrategy::Fixed { value } if !value.is_finite() => {
                return Err(SceneError::Config(format!("fixed threshold must be finite, got {value}")));
            }
            ThresholdStrategy::EmpiricalNull {
                sigma_multiple,
                fallback,
            } if !(sigma_multiple.is_finite() && fallback.is_finite()) => {
                return Err(SceneError::Config("empirical_null parameters must be finite".into()));
            }
            _ => {}
        }
        Ok(())
    }

    /// Mask options with the configured erosion.
    pub fn mask_options(&self) -> MaskOptions {
        MaskOptions {
            erosion_iterations: self.erosion_iterations,
            ..MaskOptions::default()
        }
    }

    /// Builtin colormaps sampled at the configured size and gamma.
    ///
    /// # Errors
    ///
    /// Colormap construction errors.
    pub fn registry(&self) -> SceneResult<ColormapRegistry> {
        let builtin = ColormapRegistry::builtin(self.table_size)?;
        if self.gamma == 1.0 {
            return Ok(builtin);
        }
        let mut reg = ColormapRegistry::new();
        for name in builtin.names().filter(|n| !n.ends_with("_r")) {
            if let Some(cmap) = builtin.get(name) {
                reg.insert(Colormap::from_segments(
                    name,
                    cmap.segments().clone(),
                    self.table_size,
                    self.gamma,
                )?);
            }
        }
        Ok(reg)
    }

    /// Configured colormap by name.
    ///
    /// # Errors
    ///
    /// [`SceneError::Config`] for an unknown name.
    pub fn colormap(&self, registry: &ColormapRegistry, name: &str) -> SceneResult<Colormap> {
        registry
            .get(name)
            .cloned()
            .ok_or_else(|| SceneError::Config(format!("unknown colormap: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_defaults() {
        let cfg = SceneConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, SceneConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let cfg = SceneConfig::from_yaml_str(
            "table_size: 64\ncutout_mode: true\nthreshold_strategy: !fixed\n  value: 90.0\n",
        )
        .unwrap();
        assert_eq!(cfg.table_size, 64);
        assert!(cfg.cutout_mode);
        assert_eq!(cfg.threshold_strategy, ThresholdStrategy::Fixed { value: 90.0 });
        assert_eq!(cfg.gamma, 1.0);
    }

    #[test]
    fn test_empirical_null_defaults() {
        let cfg = SceneConfig::from_yaml_str("threshold_strategy: !empirical_null {}\n").unwrap();
        assert_eq!(cfg.threshold_strategy, ThresholdStrategy::default());
    }

    #[test]
    fn test_rejects_zero_table_size() {
        let err = SceneConfig::from_yaml_str("table_size: 0").unwrap_err();
        assert!(matches!(err, SceneError::Config(msg) if msg.contains("table_size")));
    }

    #[test]
    fn test_rejects_bad_gamma() {
        assert!(SceneConfig::from_yaml_str("gamma: -1.0").is_err());
        assert!(SceneConfig::from_yaml_str("gamma: .nan").is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = SceneConfig::from_yaml_str("table_size: [1, 2").unwrap_err();
        assert!(matches!(err, SceneError::Yaml(_)));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let cfg = SceneConfig {
            erosion_iterations: 2,
            ..SceneConfig::default()
        };
        let back = SceneConfig::from_yaml_str(&cfg.to_yaml().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        std::fs::write(&path, "erosion_iterations: 3\n").unwrap();
        let cfg = SceneConfig::load(&path).unwrap();
        assert_eq!(cfg.erosion_iterations, 3);
        assert_eq!(cfg.mask_options().erosion_iterations, 3);

        let missing = SceneConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, SceneError::Io(_)));
    }

    #[test]
    fn test_registry_gamma() {
        let cfg = SceneConfig {
            table_size: 8,
            gamma: 2.0,
            ..SceneConfig::default()
        };
        let reg = cfg.registry().unwrap();
        let gray = cfg.colormap(&reg, "gray").unwrap();
        assert_eq!(gray.gamma(), 2.0);
        assert_eq!(gray.table_size(), 8);
        assert!(reg.contains("gray_r"));
        assert!(cfg.colormap(&reg, "nope").is_err());
    }
}
