//! Per-row opacity for colormap lookups.
//!
//! Alpha is kept apart from the color table and resolved for each lookup,
//! so one colormap can serve channels with different transparency.
//!
//! - [`Alpha::Uniform`] - one value for every ordinary, under and over row
//! - [`Alpha::Curve`] - one value per ordinary row; under and over repeat
//!   the last entry
//!
//! The bad row is never touched: it keeps the alpha it was built with.

use crate::{LutError, LutResult};

/// Alpha applied at lookup time.
#[derive(Debug, Clone, PartialEq)]
pub enum Alpha {
    /// Same alpha for every row, clamped to [0, 1].
    Uniform(f32),
    /// Per-row alpha; length must equal the table size.
    Curve(Vec<f32>),
}

impl Alpha {
    /// Fully opaque.
    pub const OPAQUE: Self = Self::Uniform(1.0);

    /// Resolves this alpha against a table of `table_size` rows.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidInput`] for NaN alpha or a curve of the
    /// wrong length.
    pub fn resolve(&self, table_size: usize) -> LutResult<AlphaTable> {
        match self {
            Self::Uniform(a) => {
                if a.is_nan() {
                    return Err(LutError::invalid_input("alpha must not be NaN"));
                }
                Ok(AlphaTable {
                    table_size,
                    rows: AlphaRows::Uniform(a.clamp(0.0, 1.0)),
                })
            }
            Self::Curve(curve) => {
                if curve.len() != table_size {
                    return Err(LutError::invalid_input(format!(
                        "alpha curve has {} entries, table has {}",
                        curve.len(),
                        table_size
                    )));
                }
                if curve.iter().any(|a| a.is_nan()) {
                    return Err(LutError::invalid_input("alpha curve contains NaN"));
                }
                let mut rows: Vec<f32> = curve.iter().map(|a| a.clamp(0.0, 1.0)).collect();
                let tail = rows.last().copied().unwrap_or(1.0);
                rows.extend([tail, tail]);
                Ok(AlphaTable {
                    table_size,
                    rows: AlphaRows::Curve(rows),
                })
            }
        }
    }
}

impl Default for Alpha {
    fn default() -> Self {
        Self::OPAQUE
    }
}

impl From<f32> for Alpha {
    fn from(a: f32) -> Self {
        Self::Uniform(a)
    }
}

impl From<Vec<f32>> for Alpha {
    fn from(curve: Vec<f32>) -> Self {
        Self::Curve(curve)
    }
}

impl From<&[f32]> for Alpha {
    fn from(curve: &[f32]) -> Self {
        Self::Curve(curve.to_vec())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum AlphaRows {
    Uniform(f32),
    Curve(Vec<f32>),
}

/// Alpha resolved for the ordinary, under and over rows of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaTable {
    table_size: usize,
    rows: AlphaRows,
}

impl AlphaTable {
    /// Alpha override for `row`, or `None` for the bad row (and anything
    /// past it), which keeps its build-time alpha.
    #[inline]
    pub fn get(&self, row: usize) -> Option<f32> {
        if row >= self.table_size + 2 {
            return None;
        }
        match &self.rows {
            AlphaRows::Uniform(a) => Some(*a),
            AlphaRows::Curve(rows) => rows.get(row).copied(),
        }
    }

    /// Number of ordinary rows this table was resolved for.
    pub fn table_size(&self) -> usize {
        self.table_size
    }
}

/// Opaque curve whose five darkest rows are transparent.
///
/// Used for anatomical backgrounds so air around the head disappears.
pub fn anatomical_alpha(table_size: usize) -> Vec<f32> {
    (0..table_size).map(|i| if i < 5 { 0.0 } else { 1.0 }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_clamped() {
        let t = Alpha::from(1.7f32).resolve(4).unwrap();
        assert_eq!(t.get(0), Some(1.0));
        assert_eq!(t.get(5), Some(1.0));
        assert_eq!(t.get(6), None);
        let t = Alpha::Uniform(-2.0).resolve(4).unwrap();
        assert_eq!(t.get(4), Some(0.0));
        assert!(Alpha::Uniform(f32::NAN).resolve(4).is_err());
    }

    #[test]
    fn test_curve_extended() {
        let t = Alpha::from(vec![0.0f32, 0.5, 2.0, 0.25]).resolve(4).unwrap();
        assert_eq!(t.get(2), Some(1.0));
        assert_eq!(t.get(4), Some(0.25));
        assert_eq!(t.get(5), Some(0.25));
        assert_eq!(t.get(6), None);
    }

    #[test]
    fn test_curve_length() {
        let err = Alpha::from(vec![1.0f32; 3]).resolve(4).unwrap_err();
        assert!(err.to_string().contains("3 entries"));
    }

    #[test]
    fn test_anatomical() {
        let a = anatomical_alpha(8);
        assert_eq!(a, vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(anatomical_alpha(3), vec![0.0; 3]);
    }
}
