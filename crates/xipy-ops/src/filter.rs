//! Separable 3-D Gaussian smoothing.
//!
//! The kernel truncates at `floor(4 * sigma + 0.5)` voxels and boundaries
//! use half-sample symmetric reflection:
//!
//! ```text
//! ... c b a | a b c d | d c b ...
//! ```
//!
//! # Example
//!
//! ```rust
//! use xipy_core::Volume;
//! use xipy_ops::filter::gaussian_filter_3d;
//!
//! let flat = Volume::filled([8, 8, 8], 3.0f32).unwrap();
//! let out = gaussian_filter_3d(&flat, 2.0).unwrap();
//! assert!((out[[0, 0, 0]] - 3.0).abs() < 1e-4);
//! ```

use crate::parallel;
use crate::{OpsError, OpsResult};
use tracing::trace;
use xipy_core::{Shape, Volume};

/// Normalized 1-D Gaussian weights of radius `floor(4 * sigma + 0.5)`.
///
/// A non-positive sigma gives the identity kernel `[1.0]`.
///
/// # Example
///
/// ```rust
/// use xipy_ops::filter::gaussian_kernel_1d;
///
/// let k = gaussian_kernel_1d(1.0);
/// assert_eq!(k.len(), 9);
/// assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-6);
/// ```
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma.is_nan() || sigma <= 0.0 {
        return vec![1.0];
    }
    let sigma = f64::from(sigma);
    let radius = (4.0 * sigma + 0.5).floor() as i64;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Smooths a volume with an isotropic Gaussian of standard deviation
/// `sigma` voxels. `sigma <= 0` returns a copy.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] for a non-finite sigma.
pub fn gaussian_filter_3d(vol: &Volume<f32>, sigma: f32) -> OpsResult<Volume<f32>> {
    if !sigma.is_finite() {
        return Err(OpsError::InvalidParameter(format!("sigma must be finite, got {sigma}")));
    }
    trace!(shape = ?vol.shape(), sigma, "filter::gaussian_filter_3d");
    if sigma <= 0.0 {
        return Ok(vol.clone());
    }

    let kernel = gaussian_kernel_1d(sigma);
    let shape = vol.shape();
    let mut data = vol.data().to_vec();
    for axis in 0..3 {
        data = convolve_axis(&data, shape, axis, &kernel);
    }
    Ok(Volume::from_vec(shape, data)?)
}

/// Convolves along one axis with an odd-length kernel.
fn convolve_axis(src: &[f32], shape: Shape, axis: usize, kernel: &[f32]) -> Vec<f32> {
    let n = shape[axis];
    let strides = [shape[1] * shape[2], shape[2], 1];
    let stride = strides[axis];
    let radius = (kernel.len() / 2) as isize;

    let mut out = vec![0.0f32; src.len()];
    parallel::fill_indexed(&mut out, |o| {
        let pos = (o / stride) % n;
        let base = o - pos * stride;
        kernel
            .iter()
            .enumerate()
            .map(|(t, &w)| {
                let j = reflect(pos as isize + t as isize - radius, n);
                w * src[base + j * stride]
            })
            .sum()
    });
    out
}

/// Maps an index into `0..n` by half-sample symmetric reflection.
#[inline]
fn reflect(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let j = i.rem_euclid(period);
    (if j >= n { period - 1 - j } else { j }) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kernel_radius() {
        assert_eq!(gaussian_kernel_1d(6.0).len(), 2 * 24 + 1);
        assert_eq!(gaussian_kernel_1d(2.0).len(), 2 * 8 + 1);
        assert_eq!(gaussian_kernel_1d(0.0), vec![1.0]);
        let k = gaussian_kernel_1d(1.5);
        assert_eq!(k.first(), k.last());
        assert!(k[k.len() / 2] > k[0]);
    }

    #[test]
    fn test_reflect() {
        let idx: Vec<usize> = (-3..7).map(|i| reflect(i, 4)).collect();
        assert_eq!(idx, vec![2, 1, 0, 0, 1, 2, 3, 3, 2, 1]);
        assert_eq!(reflect(-5, 1), 0);
        assert_eq!(reflect(13, 3), 1);
    }

    #[test]
    fn test_preserves_constant() {
        // radius larger than the axis exercises repeated reflection
        let vol = Volume::filled([3, 4, 5], 2.5f32).unwrap();
        let out = gaussian_filter_3d(&vol, 3.0).unwrap();
        for v in out.iter() {
            assert_abs_diff_eq!(*v, 2.5, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_impulse_spreads_symmetrically() {
        let mut vol = Volume::filled([9, 9, 9], 0.0f32).unwrap();
        vol[[4, 4, 4]] = 1.0;
        let out = gaussian_filter_3d(&vol, 1.0).unwrap();
        let total: f32 = out.iter().sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(out[[3, 4, 4]], out[[4, 5, 4]], epsilon = 1e-7);
        assert_abs_diff_eq!(out[[4, 4, 3]], out[[5, 4, 4]], epsilon = 1e-7);
        assert!(out[[4, 4, 4]] > out[[3, 4, 4]]);
    }

    #[test]
    fn test_sigma_zero_is_identity() {
        let vol = Volume::from_fn([2, 3, 4], |[i, j, k]| (i + j + k) as f32).unwrap();
        assert_eq!(gaussian_filter_3d(&vol, 0.0).unwrap(), vol);
        assert!(gaussian_filter_3d(&vol, f32::NAN).is_err());
    }
}
