//! Cortical surface mask derivation.
//!
//! ```text
//! raw > threshold -> blur(presmooth) > 0.5 -> fill holes -> erode(n)
//!     -> blur(postsmooth) -> * 255 -> u8
//! ```
//!
//! The byte volume is meant for iso-contouring at mid level.

use crate::filter::gaussian_filter_3d;
use crate::morphology::{erode, fill_holes};
use crate::{OpsError, OpsResult};
use serde::{Deserialize, Serialize};
use tracing::trace;
use xipy_core::Volume;

/// Smoothing and erosion parameters for [`surface_mask`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskOptions {
    /// Blur applied to the thresholded volume before hole filling
    pub presmooth_sigma: f32,
    /// Blur applied to the final binary mask
    pub postsmooth_sigma: f32,
    /// Erosion passes after hole filling
    pub erosion_iterations: usize,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            presmooth_sigma: 6.0,
            postsmooth_sigma: 2.0,
            erosion_iterations: 0,
        }
    }
}

impl MaskOptions {
    /// Checks the smoothing parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] for negative or non-finite
    /// sigmas.
    pub fn validate(&self) -> OpsResult<()> {
        for (name, s) in [
            ("presmooth_sigma", self.presmooth_sigma),
            ("postsmooth_sigma", self.postsmooth_sigma),
        ] {
            if !s.is_finite() || s < 0.0 {
                return Err(OpsError::InvalidParameter(format!(
                    "{name} must be finite and >= 0, got {s}"
                )));
            }
        }
        Ok(())
    }
}

/// Derives a smoothed, filled byte mask from raw intensities.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] for invalid options.
pub fn surface_mask(data: &Volume<f32>, threshold: f32, options: &MaskOptions) -> OpsResult<Volume<u8>> {
    trace!(shape = ?data.shape(), threshold, ?options, "surface::surface_mask");
    options.validate()?;

    let binary = data.map(|&v| if v > threshold { 1.0f32 } else { 0.0 });
    let solid = gaussian_filter_3d(&binary, options.presmooth_sigma)?.map(|&v| v > 0.5);
    let filled = erode(&fill_holes(&solid), options.erosion_iterations);
    let blurred = gaussian_filter_3d(&filled.map(|&b| if b { 1.0f32 } else { 0.0 }), options.postsmooth_sigma)?;
    Ok(blurred.map(|&v| (v * 255.0).clamp(0.0, 255.0) as u8))
}
