//! Value-to-row index resolution.
//!
//! A colormap with `N` ordinary rows reserves three more:
//!
//! | row     | meaning                         |
//! |---------|---------------------------------|
//! | `0..N`  | ordinary colors                 |
//! | `N`     | under range (`v < 0`)           |
//! | `N + 1` | over range (`v > 1`)            |
//! | `N + 2` | bad / masked / NaN              |
//!
//! Normalized values are scaled by `N`, clipped to `[-1, N]` and floored.
//! An exact `1.0` resolves to the last ordinary row. Over-range is checked
//! before under-range and the mask is applied last, so a masked entry is
//! always bad whatever its numeric value.
//!
//! # Example
//!
//! ```rust
//! use xipy_lut::{lut_index, lut_indices};
//!
//! assert_eq!(lut_index(0.5f32, 256), 128);
//! assert_eq!(lut_index(1.0f32, 256), 255);
//! assert_eq!(lut_index(1.5f32, 256), 257);
//! assert_eq!(lut_index(-0.1f32, 256), 256);
//!
//! let idx = lut_indices(&[0.0f32, 2.0], Some(&[false, true]), 4).unwrap();
//! assert_eq!(idx, vec![0, 6]);
//! ```

use crate::{LutError, LutResult};

/// Row of the under-range slot.
#[inline]
pub const fn under_index(table_size: usize) -> usize {
    table_size
}

/// Row of the over-range slot.
#[inline]
pub const fn over_index(table_size: usize) -> usize {
    table_size + 1
}

/// Row of the bad-data slot.
#[inline]
pub const fn bad_index(table_size: usize) -> usize {
    table_size + 2
}

/// Inputs a colormap can resolve to a row.
///
/// Floating point values are normalized data and go through
/// [`lut_index`]. Integers are already row indices and pass through
/// unchanged; lookups clip them into the table.
pub trait LutInput: Copy {
    /// Row for this input in a table with `table_size` ordinary rows.
    fn to_index(self, table_size: usize) -> usize;
}

impl LutInput for f32 {
    #[inline]
    fn to_index(self, table_size: usize) -> usize {
        lut_index_f64(f64::from(self), table_size)
    }
}

impl LutInput for f64 {
    #[inline]
    fn to_index(self, table_size: usize) -> usize {
        lut_index_f64(self, table_size)
    }
}

macro_rules! impl_index_passthrough {
    ($($t:ty),*) => {
        $(
            impl LutInput for $t {
                #[inline]
                fn to_index(self, _table_size: usize) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_index_passthrough!(u8, u16, u32, usize);

impl LutInput for i32 {
    /// Negative rows clip to row 0.
    #[inline]
    fn to_index(self, _table_size: usize) -> usize {
        self.max(0) as usize
    }
}

/// Row index of a normalized value.
#[inline]
pub fn lut_index<T: LutInput>(value: T, table_size: usize) -> usize {
    value.to_index(table_size)
}

fn lut_index_f64(v: f64, n: usize) -> usize {
    if v.is_nan() {
        return bad_index(n);
    }
    // 1.0 is the top of the last ordinary bin, not over range
    if v == 1.0 {
        return n.saturating_sub(1);
    }
    let scaled = (v * n as f64).clamp(-1.0, n as f64).floor();
    if scaled >= n as f64 {
        over_index(n)
    } else if scaled < 0.0 {
        under_index(n)
    } else {
        scaled as usize
    }
}

/// Row indices for a slice of inputs with an optional missing-data mask.
///
/// # Errors
///
/// Returns [`LutError::InvalidInput`] when the mask length differs from
/// the number of values.
pub fn lut_indices<T: LutInput>(
    values: &[T],
    mask: Option<&[bool]>,
    table_size: usize,
) -> LutResult<Vec<usize>> {
    let mut out: Vec<usize> = values.iter().map(|&v| v.to_index(table_size)).collect();
    if let Some(mask) = mask {
        if mask.len() != values.len() {
            return Err(LutError::invalid_input(format!(
                "mask has {} entries for {} values",
                mask.len(),
                values.len()
            )));
        }
        let bad = bad_index(table_size);
        for (idx, _) in out.iter_mut().zip(mask).filter(|(_, m)| **m) {
            *idx = bad;
        }
    }
    Ok(out)
}
