//! Linear normalization of raw intensities into [0, 1].

use serde::{Deserialize, Serialize};
use xipy_core::Volume;

/// Maps `vmin..vmax` onto `0..1`.
///
/// Values outside the range map below 0 or above 1 and land in the
/// colormap's under/over slots. NaN stays NaN (the bad slot).
///
/// # Example
///
/// ```rust
/// use xipy_ops::Norm;
///
/// let norm = Norm::new(10.0, 20.0);
/// assert_eq!(norm.normalize(15.0), 0.5);
/// assert_eq!(norm.normalize(25.0), 1.5);
/// assert_eq!(Norm::new(3.0, 3.0).normalize(3.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Norm {
    /// Raw value mapped to 0
    pub vmin: f32,
    /// Raw value mapped to 1
    pub vmax: f32,
}

impl Norm {
    /// Creates a normalization range.
    pub const fn new(vmin: f32, vmax: f32) -> Self {
        Self { vmin, vmax }
    }

    /// Spans the finite, unmasked values of `data`.
    ///
    /// Falls back to `0..1` when no such value exists.
    pub fn from_data(data: &Volume<f32>, mask: Option<&Volume<bool>>) -> Self {
        let masked = |o: usize| mask.is_some_and(|m| m.data().get(o).copied().unwrap_or(false));
        let (lo, hi) = data
            .iter()
            .enumerate()
            .filter(|&(o, v)| v.is_finite() && !masked(o))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (_, &v)| {
                (lo.min(v), hi.max(v))
            });
        if lo.is_finite() && hi.is_finite() {
            Self::new(lo, hi)
        } else {
            Self::default()
        }
    }

    /// `(v - vmin) / (vmax - vmin)`, or 0 for an empty range.
    #[inline]
    pub fn normalize(&self, v: f32) -> f32 {
        if v.is_nan() {
            return v;
        }
        let span = self.vmax - self.vmin;
        if span > 0.0 { (v - self.vmin) / span } else { 0.0 }
    }
}

impl Default for Norm {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_skips_masked_and_nan() {
        let data = Volume::from_vec([1, 1, 4], vec![f32::NAN, 2.0, 8.0, 100.0]).unwrap();
        let mask = Volume::from_vec([1, 1, 4], vec![false, false, false, true]).unwrap();
        assert_eq!(Norm::from_data(&data, Some(&mask)), Norm::new(2.0, 8.0));
        assert_eq!(Norm::from_data(&data, None), Norm::new(2.0, 100.0));
    }

    #[test]
    fn test_all_nan_defaults() {
        let data = Volume::filled([2, 2, 2], f32::NAN).unwrap();
        assert_eq!(Norm::from_data(&data, None), Norm::default());
    }

    #[test]
    fn test_nan_passes_through() {
        assert!(Norm::default().normalize(f32::NAN).is_nan());
    }
}
