//! Synthetic volumes for demos and tests.
//!
//! [`head`] is a crude anatomical stand-in: a bright textured brain inside
//! a darker skull shell, on a zero background. [`activation`] is a smooth
//! blob for use as a functional overlay.

use std::f64::consts::PI;
use xipy_core::{Shape, Volume};

/// Brain intensity before texture.
pub const BRAIN_LEVEL: f32 = 200.0;
/// Skull shell intensity.
pub const SKULL_LEVEL: f32 = 80.0;

/// Normalized radius of voxel `ijk`: 0 at the center, 1 at the faces.
fn radius(ijk: [usize; 3], shape: Shape) -> f64 {
    let mut r2 = 0.0;
    for axis in 0..3 {
        let half = shape[axis] as f64 / 2.0;
        let d = (ijk[axis] as f64 + 0.5 - half) / half;
        r2 += d * d;
    }
    r2.sqrt()
}

/// Deterministic texture in [-1, 1).
fn texture(ijk: [usize; 3]) -> f32 {
    let h = (ijk[0] as u64).wrapping_mul(73_856_093)
        ^ (ijk[1] as u64).wrapping_mul(19_349_663)
        ^ (ijk[2] as u64).wrapping_mul(83_492_791);
    (h % 2000) as f32 / 1000.0 - 1.0
}

/// Head phantom: brain within radius 0.6, skull shell in [0.7, 0.85).
///
/// # Errors
///
/// Fails for a zero-sized shape.
pub fn head(shape: Shape) -> xipy_core::Result<Volume<f32>> {
    Volume::from_fn(shape, |ijk| {
        let r = radius(ijk, shape);
        if r < 0.6 {
            BRAIN_LEVEL + 15.0 * texture(ijk)
        } else if (0.7..0.85).contains(&r) {
            SKULL_LEVEL + 5.0 * texture(ijk)
        } else {
            0.0
        }
    })
}

/// Gaussian blob of peak `peak` centered at `center` (voxels) with
/// standard deviation `sigma` (voxels).
///
/// # Errors
///
/// Fails for a zero-sized shape.
pub fn activation(shape: Shape, center: [f64; 3], sigma: f64, peak: f32) -> xipy_core::Result<Volume<f32>> {
    let denom = 2.0 * sigma * sigma;
    Volume::from_fn(shape, |ijk| {
        if denom <= 0.0 {
            return 0.0;
        }
        let d2: f64 = (0..3).map(|a| (ijk[a] as f64 - center[a]).powi(2)).sum();
        (f64::from(peak) * (-d2 / denom).exp()) as f32
    })
}

/// Expected voxel count of a ball of normalized radius `r`.
pub fn ball_voxels(shape: Shape, r: f64) -> f64 {
    4.0 / 3.0 * PI * r.powi(3) * shape.iter().map(|&n| n as f64 / 2.0).product::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_layers() {
        let vol = head([32, 32, 32]).unwrap();
        assert_eq!(vol[[0, 0, 0]], 0.0);
        let center = vol[[16, 16, 16]];
        assert!((BRAIN_LEVEL - 15.0..BRAIN_LEVEL + 15.0).contains(&center));
        // r ~ 0.78 along the x axis
        let skull = vol[[3, 16, 16]];
        assert!((SKULL_LEVEL - 5.0..SKULL_LEVEL + 5.0).contains(&skull), "{skull}");
    }

    #[test]
    fn test_head_is_deterministic() {
        assert_eq!(head([8, 8, 8]).unwrap(), head([8, 8, 8]).unwrap());
    }

    #[test]
    fn test_brain_volume() {
        let shape = [32, 32, 32];
        let vol = head(shape).unwrap();
        let brain = vol.iter().filter(|&&v| v > 150.0).count() as f64;
        let expected = ball_voxels(shape, 0.6);
        assert!((brain - expected).abs() / expected < 0.1, "{brain} vs {expected}");
    }

    #[test]
    fn test_activation_peak() {
        let vol = activation([9, 9, 9], [4.0, 4.0, 4.0], 1.5, 5.0).unwrap();
        assert_eq!(vol[[4, 4, 4]], 5.0);
        assert!(vol[[0, 0, 0]] < 0.01);
        let flat = activation([4, 4, 4], [0.0; 3], 0.0, 5.0).unwrap();
        assert!(flat.iter().all(|&v| v == 0.0));
    }
}
