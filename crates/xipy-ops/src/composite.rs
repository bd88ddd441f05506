//! Porter-Duff compositing of straight-alpha RGBA.
//!
//! Channel colors come out of the colormaps with straight (non-premultiplied)
//! alpha and are stacked with [`over_pixel`]:
//!
//! ```text
//! out.a   = fg.a + bg.a * (1 - fg.a)
//! out.rgb = (fg.rgb * fg.a + bg.rgb * bg.a * (1 - fg.a)) / out.a
//! ```
//!
//! # Example
//!
//! ```rust
//! use xipy_ops::composite::over_pixel;
//!
//! let fg = [1.0, 0.0, 0.0, 0.5]; // half-transparent red overlay
//! let bg = [0.0, 0.0, 1.0, 1.0]; // opaque blue anatomy
//! let out = over_pixel(fg, bg);
//! assert_eq!(out, [0.5, 0.0, 0.5, 1.0]);
//! ```

use crate::parallel;
use crate::{OpsError, OpsResult};
use tracing::trace;
use xipy_core::{Rgba, Rgba8, Volume};

/// Fully transparent black.
pub const TRANSPARENT: Rgba = [0.0; 4];

/// Composites foreground over background (Porter-Duff Over).
///
/// A fully transparent result is returned as [`TRANSPARENT`].
#[inline]
pub fn over_pixel(fg: Rgba, bg: Rgba) -> Rgba {
    let fg_a = fg[3];
    let bg_a = bg[3];
    let out_a = fg_a + bg_a * (1.0 - fg_a);

    if out_a < 1e-8 {
        return TRANSPARENT;
    }

    let inv_out_a = 1.0 / out_a;
    let mix = |f: f32, b: f32| (f * fg_a + b * bg_a * (1.0 - fg_a)) * inv_out_a;
    [mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2]), out_a]
}

/// Converts straight alpha to premultiplied: `RGB *= A`.
#[inline]
pub fn premultiply(rgba: Rgba) -> Rgba {
    let a = rgba[3];
    [rgba[0] * a, rgba[1] * a, rgba[2] * a, a]
}

/// Converts premultiplied alpha to straight: `RGB /= A`.
#[inline]
pub fn unpremultiply(rgba: Rgba) -> Rgba {
    let a = rgba[3];
    if a < 1e-8 {
        TRANSPARENT
    } else {
        let inv_a = 1.0 / a;
        [rgba[0] * inv_a, rgba[1] * inv_a, rgba[2] * inv_a, a]
    }
}

/// Float color to bytes, truncating: `(v * 255) as u8`.
#[inline]
pub fn to_bytes(rgba: Rgba) -> Rgba8 {
    xipy_lut::to_bytes(rgba)
}

/// Composites `fg` over `dst` in place.
///
/// # Errors
///
/// Returns [`OpsError::ShapeMismatch`] if the volumes differ in shape.
pub fn over_inplace(dst: &mut Volume<Rgba>, fg: &Volume<Rgba>) -> OpsResult<()> {
    trace!(shape = ?dst.shape(), "composite::over_inplace");
    dst.ensure_same_shape(fg).map_err(OpsError::from_core)?;
    parallel::zip_update(dst.data_mut(), fg.data(), |d, f| *d = over_pixel(*f, *d));
    Ok(())
}

/// Composites `fg` over `bg` into a new volume.
///
/// # Errors
///
/// Returns [`OpsError::ShapeMismatch`] if the volumes differ in shape.
pub fn over(fg: &Volume<Rgba>, bg: &Volume<Rgba>) -> OpsResult<Volume<Rgba>> {
    let mut out = bg.clone();
    over_inplace(&mut out, fg)?;
    Ok(out)
}

/// Byte form of a float RGBA volume.
pub fn volume_to_bytes(vol: &Volume<Rgba>) -> Volume<Rgba8> {
    vol.map(|&c| to_bytes(c))
}
