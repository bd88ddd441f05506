//! Indexed RGBA colormaps with reserved slots.
//!
//! A [`Colormap`] samples its [`SegmentData`] into `N` ordinary rows and
//! appends three reserved rows (under, over, bad). At build time the under
//! row copies row 0, the over row copies row `N - 1`, the bad row is fully
//! transparent black, and every other row is opaque.
//!
//! Lookups never modify the table: alpha is resolved per call (see
//! [`Alpha`]).
//!
//! # Example
//!
//! ```rust
//! use xipy_lut::{Alpha, Colormap};
//!
//! let cmap = Colormap::from_colors("bw", &[[0.0; 3], [1.0; 3]], 4, 1.0).unwrap();
//! let rgba = cmap.map_value(0.5f32, &Alpha::OPAQUE).unwrap();
//! assert!((rgba[0] - 2.0 / 3.0).abs() < 1e-6);
//!
//! // masked data stays transparent under any uniform alpha
//! let bad = cmap.lookup(cmap.bad_index(), &Alpha::Uniform(1.0)).unwrap();
//! assert_eq!(bad, [0.0, 0.0, 0.0, 0.0]);
//! ```

use crate::alpha::{Alpha, AlphaTable};
use crate::color::{Rgb, parse_color};
use crate::index::{LutInput, bad_index, lut_indices, over_index, under_index};
use crate::segment::{SegmentData, sample_channel};
use crate::{LutError, LutResult};
use tracing::trace;
use xipy_core::{Rgba, Rgba8, Volume};
use xipy_math::linspace;

/// Default number of ordinary rows.
pub const DEFAULT_TABLE_SIZE: usize = 256;

/// A `(position, color)` control point.
pub type ColorStop = (f32, Rgb);

/// Control points for [`build_colormap`].
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPoints {
    /// Colors spaced evenly over [0, 1].
    Colors(Vec<Rgb>),
    /// Colors at explicit positions.
    Stops(Vec<ColorStop>),
}

impl ControlPoints {
    /// Evenly spaced colors parsed from color strings.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidInput`] if any string fails to parse.
    pub fn from_names(names: &[&str]) -> LutResult<Self> {
        names
            .iter()
            .map(|n| parse_color(n))
            .collect::<LutResult<Vec<_>>>()
            .map(Self::Colors)
    }

    /// Explicit stops, validated and expanded to `(position, rgb)` pairs.
    fn into_stops(self) -> LutResult<Vec<ColorStop>> {
        match self {
            Self::Colors(colors) => match colors.as_slice() {
                [] => Err(LutError::invalid_input("no colors given")),
                [c] => Ok(vec![(0.0, *c), (1.0, *c)]),
                _ => {
                    let positions = linspace(0.0, 1.0, colors.len());
                    Ok(positions.into_iter().zip(colors).collect())
                }
            },
            Self::Stops(stops) => {
                match stops.as_slice() {
                    [] => return Err(LutError::invalid_input("no color stops given")),
                    [(_, c)] => return Ok(vec![(0.0, *c), (1.0, *c)]),
                    _ => {}
                }
                if let Some((x, _)) = stops.iter().find(|(x, _)| !(0.0..=1.0).contains(x)) {
                    return Err(LutError::invalid_input(format!(
                        "stop position {x} outside [0, 1]"
                    )));
                }
                if stops.windows(2).any(|w| w[1].0 < w[0].0) {
                    return Err(LutError::invalid_input("stop positions must be non-decreasing"));
                }
                Ok(stops)
            }
        }
    }
}

impl From<Vec<Rgb>> for ControlPoints {
    fn from(colors: Vec<Rgb>) -> Self {
        Self::Colors(colors)
    }
}

impl From<Vec<ColorStop>> for ControlPoints {
    fn from(stops: Vec<ColorStop>) -> Self {
        Self::Stops(stops)
    }
}

/// Builds a colormap from an ordered list of colors or stops.
///
/// # Errors
///
/// Returns [`LutError::InvalidInput`] for empty or unordered control
/// points, stops that do not span [0, 1], a zero table size, or a
/// non-positive gamma.
pub fn build_colormap(
    name: &str,
    points: impl Into<ControlPoints>,
    table_size: usize,
    gamma: f32,
) -> LutResult<Colormap> {
    let stops = points.into().into_stops()?;
    Colormap::from_segments(name, SegmentData::from_stops(&stops), table_size, gamma)
}

/// Returns the reverse of `cmap`.
pub fn reverse(cmap: &Colormap) -> Colormap {
    cmap.reversed()
}

/// Colormap with `N` ordinary rows and three reserved rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    segments: SegmentData,
    gamma: f32,
    table_size: usize,
    /// `table_size + 3` rows
    table: Vec<Rgba>,
}

impl Colormap {
    /// Builds from per-channel segment tables.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidInput`] for malformed segments, a zero
    /// table size, or a non-positive gamma.
    pub fn from_segments(
        name: &str,
        segments: SegmentData,
        table_size: usize,
        gamma: f32,
    ) -> LutResult<Self> {
        if table_size == 0 {
            return Err(LutError::invalid_input("table size must be > 0"));
        }
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(LutError::invalid_input(format!("gamma must be > 0, got {gamma}")));
        }
        segments.validate()?;
        Ok(Self::sample(name.to_string(), segments, table_size, gamma))
    }

    /// Builds from explicit `(position, color)` stops.
    ///
    /// # Errors
    ///
    /// See [`build_colormap`].
    pub fn from_list(
        name: &str,
        stops: &[ColorStop],
        table_size: usize,
        gamma: f32,
    ) -> LutResult<Self> {
        build_colormap(name, ControlPoints::Stops(stops.to_vec()), table_size, gamma)
    }

    /// Builds from evenly spaced colors.
    ///
    /// # Errors
    ///
    /// See [`build_colormap`].
    pub fn from_colors(
        name: &str,
        colors: &[Rgb],
        table_size: usize,
        gamma: f32,
    ) -> LutResult<Self> {
        build_colormap(name, ControlPoints::Colors(colors.to_vec()), table_size, gamma)
    }

    fn sample(name: String, segments: SegmentData, table_size: usize, gamma: f32) -> Self {
        trace!(name = %name, table_size, gamma, "Colormap::sample");

        let [r, g, b] = segments
            .channels()
            .map(|points| sample_channel(table_size, points, gamma));
        let mut table: Vec<Rgba> = (0..table_size).map(|i| [r[i], g[i], b[i], 1.0]).collect();
        let (first, last) = (table[0], table[table_size - 1]);
        table.extend([first, last, [0.0; 4]]);

        Self {
            name,
            segments,
            gamma,
            table_size,
            table,
        }
    }

    /// Reversed copy; the name gains (or loses) an `_r` suffix.
    ///
    /// Reserved rows are rebuilt from the reversed segments.
    pub fn reversed(&self) -> Self {
        let name = match self.name.strip_suffix("_r") {
            Some(base) => base.to_string(),
            None => format!("{}_r", self.name),
        };
        Self::sample(name, self.segments.reversed(), self.table_size, self.gamma)
    }

    /// Replaces the under-range color.
    pub fn with_under(mut self, rgba: Rgba) -> Self {
        self.table[under_index(self.table_size)] = rgba;
        self
    }

    /// Replaces the over-range color.
    pub fn with_over(mut self, rgba: Rgba) -> Self {
        self.table[over_index(self.table_size)] = rgba;
        self
    }

    /// Replaces the bad-data color (including its alpha).
    pub fn with_bad(mut self, rgba: Rgba) -> Self {
        self.table[bad_index(self.table_size)] = rgba;
        self
    }

    /// Colormap name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of ordinary rows.
    #[inline]
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Sampling exponent.
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Segment tables the colors were sampled from.
    pub fn segments(&self) -> &SegmentData {
        &self.segments
    }

    /// All `table_size + 3` rows with build-time alpha.
    pub fn table(&self) -> &[Rgba] {
        &self.table
    }

    /// Row of the under-range slot.
    #[inline]
    pub fn under_index(&self) -> usize {
        under_index(self.table_size)
    }

    /// Row of the over-range slot.
    #[inline]
    pub fn over_index(&self) -> usize {
        over_index(self.table_size)
    }

    /// Row of the bad-data slot.
    #[inline]
    pub fn bad_index(&self) -> usize {
        bad_index(self.table_size)
    }

    /// Row indices for normalized values, see [`lut_indices`].
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidInput`] on a mask length mismatch.
    pub fn indices<T: LutInput>(&self, values: &[T], mask: Option<&[bool]>) -> LutResult<Vec<usize>> {
        lut_indices(values, mask, self.table_size)
    }

    /// Resolves `alpha` against this table.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidInput`] for NaN alpha or a curve whose
    /// length differs from the table size.
    pub fn resolve_alpha(&self, alpha: &Alpha) -> LutResult<AlphaTable> {
        alpha.resolve(self.table_size)
    }

    /// Color of `row` under a resolved alpha table. Rows past the table
    /// clip to the bad row.
    #[inline]
    pub fn color(&self, row: usize, alpha: &AlphaTable) -> Rgba {
        let row = row.min(self.table.len() - 1);
        let mut rgba = self.table[row];
        if let Some(a) = alpha.get(row) {
            rgba[3] = a;
        }
        rgba
    }

    /// Color of one row.
    ///
    /// # Errors
    ///
    /// Fails when `alpha` does not fit this table.
    pub fn lookup(&self, row: usize, alpha: &Alpha) -> LutResult<Rgba> {
        Ok(self.color(row, &self.resolve_alpha(alpha)?))
    }

    /// Byte color of one row.
    ///
    /// # Errors
    ///
    /// Fails when `alpha` does not fit this table.
    pub fn lookup_bytes(&self, row: usize, alpha: &Alpha) -> LutResult<Rgba8> {
        self.lookup(row, alpha).map(to_bytes)
    }

    /// Colors of many rows.
    ///
    /// # Errors
    ///
    /// Fails when `alpha` does not fit this table.
    pub fn lookup_all(&self, rows: &[usize], alpha: &Alpha) -> LutResult<Vec<Rgba>> {
        trace!(name = %self.name, count = rows.len(), "Colormap::lookup_all");
        let table = self.resolve_alpha(alpha)?;
        Ok(rows.iter().map(|&r| self.color(r, &table)).collect())
    }

    /// Byte colors of many rows.
    ///
    /// # Errors
    ///
    /// Fails when `alpha` does not fit this table.
    pub fn lookup_all_bytes(&self, rows: &[usize], alpha: &Alpha) -> LutResult<Vec<Rgba8>> {
        let table = self.resolve_alpha(alpha)?;
        Ok(rows.iter().map(|&r| to_bytes(self.color(r, &table))).collect())
    }

    /// Colors of a volume of row indices; the shape is preserved.
    ///
    /// # Errors
    ///
    /// Fails when `alpha` does not fit this table.
    pub fn lookup_volume(&self, rows: &Volume<usize>, alpha: &Alpha) -> LutResult<Volume<Rgba>> {
        let table = self.resolve_alpha(alpha)?;
        Ok(rows.map(|&r| self.color(r, &table)))
    }

    /// Byte colors of a volume of row indices.
    ///
    /// # Errors
    ///
    /// Fails when `alpha` does not fit this table.
    pub fn lookup_volume_bytes(
        &self,
        rows: &Volume<usize>,
        alpha: &Alpha,
    ) -> LutResult<Volume<Rgba8>> {
        let table = self.resolve_alpha(alpha)?;
        Ok(rows.map(|&r| to_bytes(self.color(r, &table))))
    }

    /// Resolves and colors a single value.
    ///
    /// # Errors
    ///
    /// Fails when `alpha` does not fit this table.
    pub fn map_value<T: LutInput>(&self, value: T, alpha: &Alpha) -> LutResult<Rgba> {
        self.lookup(value.to_index(self.table_size), alpha)
    }

    /// Resolves and colors a slice of values.
    ///
    /// # Errors
    ///
    /// Fails on a mask length mismatch or when `alpha` does not fit.
    pub fn map_values<T: LutInput>(
        &self,
        values: &[T],
        mask: Option<&[bool]>,
        alpha: &Alpha,
    ) -> LutResult<Vec<Rgba>> {
        let rows = self.indices(values, mask)?;
        self.lookup_all(&rows, alpha)
    }

    /// Resolves and colors a volume of normalized values.
    ///
    /// # Errors
    ///
    /// Fails when the mask shape differs from the values or when `alpha`
    /// does not fit.
    pub fn map_volume<T: LutInput>(
        &self,
        values: &Volume<T>,
        mask: Option<&Volume<bool>>,
        alpha: &Alpha,
    ) -> LutResult<Volume<Rgba>> {
        if let Some(m) = mask {
            if m.shape() != values.shape() {
                return Err(LutError::invalid_input(format!(
                    "mask shape {:?} differs from values {:?}",
                    m.shape(),
                    values.shape()
                )));
            }
        }
        let table = self.resolve_alpha(alpha)?;
        let n = self.table_size;
        let bad = self.bad_index();
        Ok(match mask {
            Some(m) => {
                let mut masked = m.iter();
                values.map(|&v| {
                    let row = match masked.next() {
                        Some(true) => bad,
                        _ => v.to_index(n),
                    };
                    self.color(row, &table)
                })
            }
            None => values.map(|&v| self.color(v.to_index(n), &table)),
        })
    }
}

/// Float color to bytes, truncating: `(v * 255) as u8`.
#[inline]
pub fn to_bytes(rgba: Rgba) -> Rgba8 {
    rgba.map(|v| (v * 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn black_white(n: usize) -> Colormap {
        build_colormap("bw", vec![[0.0f32; 3], [1.0; 3]], n, 1.0).unwrap()
    }

    #[test]
    fn test_four_row_ramp() {
        let cmap = black_white(4);
        assert_eq!(cmap.table().len(), 7);
        let expected = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
        for (row, e) in cmap.table()[..4].iter().zip(expected) {
            for c in 0..3 {
                assert_abs_diff_eq!(row[c], e, epsilon = 1e-6);
            }
            assert_eq!(row[3], 1.0);
        }
        assert_eq!(cmap.table()[4], cmap.table()[0]);
        assert_eq!(cmap.table()[5], cmap.table()[3]);
        assert_eq!(cmap.table()[6], [0.0; 4]);
    }

    #[test]
    fn test_uniform_alpha_spares_bad_row() {
        let cmap = black_white(4).with_bad([0.5, 0.5, 0.5, 0.3]);
        let all: Vec<usize> = (0..7).collect();
        for a in [-1.0f32, 0.0, 0.4, 1.0, 9.0] {
            let colors = cmap.lookup_all(&all, &Alpha::Uniform(a)).unwrap();
            for c in &colors[..6] {
                assert_eq!(c[3], a.clamp(0.0, 1.0));
            }
            assert_eq!(colors[6][3], 0.3);
        }
        // lookups leave the table alone
        assert_eq!(cmap.table()[2][3], 1.0);
    }

    #[test]
    fn test_curve_alpha() {
        let cmap = black_white(4);
        let alpha = Alpha::from(vec![0.0f32, 0.25, 0.5, 0.75]);
        let rows = cmap.lookup_all(&[0, 3, 4, 5, 6], &alpha).unwrap();
        let alphas: Vec<f32> = rows.iter().map(|c| c[3]).collect();
        assert_eq!(alphas, vec![0.0, 0.75, 0.75, 0.75, 0.0]);
        assert!(cmap.lookup(0, &Alpha::from(vec![1.0f32; 5])).is_err());
    }

    #[test]
    fn test_indices_clip() {
        let cmap = black_white(4);
        assert_eq!(cmap.lookup(100, &Alpha::OPAQUE).unwrap(), [0.0; 4]);
    }

    #[test]
    fn test_bytes() {
        let cmap = black_white(4);
        assert_eq!(cmap.lookup_bytes(3, &Alpha::OPAQUE).unwrap(), [255; 4]);
        assert_eq!(cmap.lookup_bytes(1, &Alpha::Uniform(0.5)).unwrap(), [85, 85, 85, 127]);
    }

    #[test]
    fn test_map_values_masked() {
        let cmap = black_white(4);
        let colors = cmap
            .map_values(&[0.0f32, 1.0, 7.0], Some(&[false, false, true]), &Alpha::OPAQUE)
            .unwrap();
        assert_eq!(colors[0], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(colors[1], [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(colors[2], [0.0; 4]);
    }

    #[test]
    fn test_reserved_rows_in_volume_bytes() {
        let cmap = black_white(4)
            .with_under([0.0, 0.0, 1.0, 1.0])
            .with_over([1.0, 0.0, 0.0, 1.0]);
        let values = [-0.5f32, 1.5];
        let colors = cmap.map_values(&values, None, &Alpha::OPAQUE).unwrap();
        assert_eq!(colors, vec![[0.0, 0.0, 1.0, 1.0], [1.0, 0.0, 0.0, 1.0]]);

        let rows = Volume::from_vec(
            [1, 1, 4],
            vec![0, cmap.under_index(), cmap.over_index(), cmap.bad_index()],
        )
        .unwrap();
        let bytes = cmap.lookup_volume_bytes(&rows, &Alpha::Uniform(0.5)).unwrap();
        assert_eq!(bytes.shape(), [1, 1, 4]);
        assert_eq!(bytes[[0, 0, 0]], [0, 0, 0, 127]);
        assert_eq!(bytes[[0, 0, 1]], [0, 0, 255, 127]);
        assert_eq!(bytes[[0, 0, 2]], [255, 0, 0, 127]);
        assert_eq!(bytes[[0, 0, 3]], [0; 4]);
    }

    #[test]
    fn test_map_volume_shape() {
        let cmap = black_white(4);
        let values = Volume::from_fn([2, 3, 4], |[i, _, _]| i as f32).unwrap();
        let out = cmap.map_volume(&values, None, &Alpha::OPAQUE).unwrap();
        assert_eq!(out.shape(), [2, 3, 4]);
        assert_eq!(out[[1, 0, 0]], [1.0, 1.0, 1.0, 1.0]);

        let mask = Volume::filled([2, 3, 3], false).unwrap();
        assert!(cmap.map_volume(&values, Some(&mask), &Alpha::OPAQUE).is_err());
    }

    #[test]
    fn test_reverse_roundtrip() {
        let cmap = build_colormap(
            "three",
            vec![(0.0f32, [1.0f32, 0.0, 0.0]), (0.3, [0.0, 1.0, 0.0]), (1.0, [0.0, 0.0, 1.0])],
            64,
            1.0,
        )
        .unwrap();
        let rev = reverse(&cmap);
        assert_eq!(rev.name(), "three_r");
        let back = rev.reversed();
        assert_eq!(back.name(), "three");
        for (a, b) in cmap.table().iter().zip(back.table()) {
            for c in 0..4 {
                assert_abs_diff_eq!(a[c], b[c], epsilon = 1e-5);
            }
        }
        for i in 0..64 {
            for c in 0..3 {
                assert_abs_diff_eq!(cmap.table()[i][c], rev.table()[63 - i][c], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_invalid_control_points() {
        assert!(build_colormap("e", Vec::<Rgb>::new(), 4, 1.0).is_err());
        let unordered = vec![(0.0f32, [0.0f32; 3]), (0.8, [1.0; 3]), (0.5, [1.0; 3]), (1.0, [0.0; 3])];
        assert!(build_colormap("u", unordered, 4, 1.0).is_err());
        let short = vec![(0.0f32, [0.0f32; 3]), (0.5, [1.0; 3])];
        assert!(build_colormap("s", short, 4, 1.0).is_err());
        assert!(build_colormap("z", vec![[0.0f32; 3]], 0, 1.0).is_err());
        assert!(build_colormap("g", vec![[0.0f32; 3]], 4, -1.0).is_err());
    }

    #[test]
    fn test_single_color_is_constant() {
        let cmap = build_colormap("red", vec![[1.0f32, 0.0, 0.0]], 8, 1.0).unwrap();
        assert!(cmap.table()[..8].iter().all(|c| *c == [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_from_names() {
        let points = ControlPoints::from_names(&["k", "#ffffff"]).unwrap();
        let cmap = build_colormap("bw", points, 4, 1.0).unwrap();
        assert_eq!(cmap, black_white(4));
        assert!(ControlPoints::from_names(&["k", "nope"]).is_err());
    }
}
