//! Intensity thresholds for the surface mask.
//!
//! [`ThresholdStrategy::EmpiricalNull`] estimates the dominant intensity
//! mode of the positive voxels by central matching: the samples between the
//! 20th and 80th percentiles are histogrammed, and a parabola fitted to the
//! log counts gives
//!
//! ```text
//! log h(x) ~ p0 + p1 x + p2 x^2
//! mu    = -p1 / (2 p2)
//! sigma = sqrt(-1 / (2 p2))
//! ```
//!
//! The threshold is `mu - sigma_multiple * sigma`. A degenerate estimate
//! (too few samples, flat histogram, convex fit, non-finite result) falls
//! back to the configured fixed value.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use xipy_math::{Mat3, Vec3};

/// Fewest samples the empirical null is estimated from.
pub const MIN_NULL_SAMPLES: usize = 32;

/// How the surface mask threshold is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdStrategy {
    /// Constant threshold.
    Fixed {
        /// Intensity threshold
        value: f32,
    },
    /// `mu - sigma_multiple * sigma` of the estimated null distribution.
    EmpiricalNull {
        /// Standard deviations below the mode
        #[serde(default = "default_sigma_multiple")]
        sigma_multiple: f32,
        /// Threshold used when the estimate is degenerate
        #[serde(default = "default_fallback")]
        fallback: f32,
    },
}

fn default_sigma_multiple() -> f32 {
    2.0
}

fn default_fallback() -> f32 {
    128.0
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::EmpiricalNull {
            sigma_multiple: default_sigma_multiple(),
            fallback: default_fallback(),
        }
    }
}

impl ThresholdStrategy {
    /// Threshold for the given raw intensities.
    ///
    /// Only positive finite samples inform the empirical null.
    pub fn threshold(&self, samples: &[f32]) -> f32 {
        match *self {
            Self::Fixed { value } => value,
            Self::EmpiricalNull {
                sigma_multiple,
                fallback,
            } => {
                let positive: Vec<f32> = samples
                    .iter()
                    .copied()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .collect();
                let estimate = estimate_null(&positive);
                let thresh = estimate
                    .map(|e| e.mu - f64::from(sigma_multiple) * e.sigma)
                    .filter(|t| t.is_finite());
                match thresh {
                    Some(t) => {
                        debug!(threshold = t, samples = positive.len(), "empirical null threshold");
                        t as f32
                    }
                    None => {
                        warn!(
                            samples = positive.len(),
                            fallback, "degenerate empirical null, using fallback threshold"
                        );
                        fallback
                    }
                }
            }
        }
    }
}

/// Mode and spread of the null distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NullEstimate {
    /// Location of the mode
    pub mu: f64,
    /// Standard deviation around the mode
    pub sigma: f64,
}

/// Estimates the null distribution by central matching.
///
/// Returns `None` when the estimate is undefined. Non-finite samples are
/// ignored.
///
/// # Example
///
/// ```rust
/// use xipy_ops::threshold::estimate_null;
///
/// assert!(estimate_null(&[5.0; 100]).is_none());
/// ```
pub fn estimate_null(samples: &[f32]) -> Option<NullEstimate> {
    let mut x: Vec<f64> = samples
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| f64::from(v))
        .collect();
    if x.len() < MIN_NULL_SAMPLES {
        return None;
    }
    x.sort_by(f64::total_cmp);

    let n = x.len();
    let lo = (n as f64 * 0.2) as usize;
    let hi = ((n as f64 * 0.8) as usize).max(lo + 1);
    let central = &x[lo..hi];
    let (a, b) = (central[0], central[central.len() - 1]);
    let range = b - a;
    if !(range > 0.0) {
        return None;
    }

    let bins = ((central.len() as f64).sqrt() / 4.0).round().clamp(8.0, 64.0) as usize;
    let width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in central {
        let i = (((v - a) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }

    // least squares on t in [-0.5, 0.5] for conditioning
    let mid = 0.5 * (a + b);
    let mut s = [0.0f64; 5];
    let mut r = [0.0f64; 3];
    let mut used = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c == 0 {
            continue;
        }
        used += 1;
        let t = (a + (i as f64 + 0.5) * width - mid) / range;
        let y = (c as f64).ln();
        let mut tk = 1.0;
        for (k, sk) in s.iter_mut().enumerate() {
            *sk += tk;
            if k < 3 {
                r[k] += y * tk;
            }
            tk *= t;
        }
    }
    if used < 3 {
        return None;
    }

    let normal = Mat3::from_rows([[s[0], s[1], s[2]], [s[1], s[2], s[3]], [s[2], s[3], s[4]]]);
    let p = normal.inverse()? * Vec3::new(r[0], r[1], r[2]);
    if !(p.z < 0.0) {
        return None;
    }

    let mu = mid + range * (-p.y / (2.0 * p.z));
    let sigma = range * (-1.0 / (2.0 * p.z)).sqrt();
    (mu.is_finite() && sigma.is_finite() && sigma > 0.0).then_some(NullEstimate { mu, sigma })
}
