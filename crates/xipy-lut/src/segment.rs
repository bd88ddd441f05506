//! Piecewise-linear segment tables.
//!
//! Each color channel is described by a list of `(x, y0, y1)` points.
//! Between two consecutive points the channel ramps linearly from the right
//! value `y1` of the first point to the left value `y0` of the second, so a
//! point with `y0 != y1` is a discontinuity.
//!
//! ```text
//! x:   0.0 ---------- 0.5 ---------- 1.0
//! y:   y1[0]  ramp   y0[1] | y1[1]  ramp  y0[2]
//! ```
//!
//! # Usage
//!
//! ```rust
//! use xipy_lut::{make_mapping_array, Segment};
//!
//! let ramp = [Segment::new(0.0, 0.0, 0.0), Segment::new(1.0, 1.0, 1.0)];
//! let lut = make_mapping_array(5, &ramp, 1.0).unwrap();
//! assert_eq!(lut, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
//! ```

use crate::{LutError, LutResult};
use xipy_math::{inverse_lerp, lerp, saturate};

/// One control point of a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Position in [0, 1]
    pub x: f32,
    /// Value approached from the left
    pub y0: f32,
    /// Value leaving to the right
    pub y1: f32,
}

impl Segment {
    /// Creates a control point.
    #[inline]
    pub const fn new(x: f32, y0: f32, y1: f32) -> Self {
        Self { x, y0, y1 }
    }

    /// Continuous control point (`y0 == y1`).
    #[inline]
    pub const fn at(x: f32, y: f32) -> Self {
        Self::new(x, y, y)
    }
}

/// Segment tables for the three color channels.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentData {
    /// Red channel points
    pub red: Vec<Segment>,
    /// Green channel points
    pub green: Vec<Segment>,
    /// Blue channel points
    pub blue: Vec<Segment>,
}

impl SegmentData {
    /// Creates segment data from per-channel tables.
    pub fn new(red: Vec<Segment>, green: Vec<Segment>, blue: Vec<Segment>) -> Self {
        Self { red, green, blue }
    }

    /// Builds continuous tables from `(position, rgb)` stops.
    pub fn from_stops(stops: &[(f32, [f32; 3])]) -> Self {
        let channel = |c: usize| -> Vec<Segment> {
            stops.iter().map(|&(x, rgb)| Segment::at(x, rgb[c])).collect()
        };
        Self::new(channel(0), channel(1), channel(2))
    }

    /// Channels in RGB order.
    pub fn channels(&self) -> [&[Segment]; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// Checks every channel.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidInput`] if any channel is empty, does not
    /// start at 0 and end at 1, or has decreasing positions.
    pub fn validate(&self) -> LutResult<()> {
        for (name, points) in ["red", "green", "blue"].iter().zip(self.channels()) {
            validate_channel(points).map_err(|e| match e {
                LutError::InvalidInput(msg) => {
                    LutError::invalid_input(format!("{name} channel: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Mirror image about 0.5.
    ///
    /// Positions become `1 - x`, points are traversed in reverse order and
    /// the left/right values swap, so sampling the result at `x` gives the
    /// original value at `1 - x`.
    pub fn reversed(&self) -> Self {
        let flip = |points: &[Segment]| -> Vec<Segment> {
            points
                .iter()
                .rev()
                .map(|s| Segment::new(1.0 - s.x, s.y1, s.y0))
                .collect()
        };
        Self::new(flip(&self.red), flip(&self.green), flip(&self.blue))
    }
}

fn validate_channel(points: &[Segment]) -> LutResult<()> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(LutError::invalid_input("no control points"));
    };
    if points.iter().any(|s| !(s.x.is_finite() && s.y0.is_finite() && s.y1.is_finite())) {
        return Err(LutError::invalid_input("control points must be finite"));
    }
    if first.x != 0.0 || last.x != 1.0 {
        return Err(LutError::invalid_input(format!(
            "positions must start at 0 and end at 1, got {} .. {}",
            first.x, last.x
        )));
    }
    if points.windows(2).any(|w| w[1].x < w[0].x) {
        return Err(LutError::invalid_input("positions must be non-decreasing"));
    }
    Ok(())
}

/// Samples one channel into an `n`-entry table.
///
/// Sample positions are `(i / (n - 1))^gamma`. The first entry is the right
/// value of the first point, the last entry the left value of the last
/// point; interior entries interpolate inside the segment found by a
/// left-biased search. Results are clipped to [0, 1].
///
/// # Errors
///
/// Returns [`LutError::InvalidInput`] for `n == 0`, for a non-positive
/// gamma, or for a malformed channel.
pub fn make_mapping_array(n: usize, points: &[Segment], gamma: f32) -> LutResult<Vec<f32>> {
    if n == 0 {
        return Err(LutError::invalid_input("table size must be > 0"));
    }
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(LutError::invalid_input(format!("gamma must be > 0, got {gamma}")));
    }
    validate_channel(points)?;
    Ok(sample_channel(n, points, gamma))
}

/// Sampling core of [`make_mapping_array`] for an already validated,
/// non-empty channel.
pub(crate) fn sample_channel(n: usize, points: &[Segment], gamma: f32) -> Vec<f32> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return vec![0.0; n];
    };
    match n {
        0 => return Vec::new(),
        1 => return vec![saturate(last.y0)],
        _ if points.len() == 1 => return vec![saturate(first.y0); n],
        _ => {}
    }

    let gamma = f64::from(gamma);
    let denom = (n - 1) as f64;
    let mut lut = Vec::with_capacity(n);
    lut.push(first.y1);
    for i in 1..n - 1 {
        let xi = ((i as f64 / denom).powf(gamma)) as f32;
        // first point with x >= xi, never the leading point
        let ind = points.partition_point(|s| s.x < xi).clamp(1, points.len() - 1);
        let (lo, hi) = (points[ind - 1], points[ind]);
        let dist = inverse_lerp(lo.x, hi.x, xi);
        lut.push(lerp(lo.y1, hi.y0, dist));
    }
    lut.push(last.y0);

    lut.into_iter().map(saturate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ramp() -> Vec<Segment> {
        vec![Segment::at(0.0, 0.0), Segment::at(1.0, 1.0)]
    }

    #[test]
    fn test_linear_ramp() {
        let lut = make_mapping_array(4, &ramp(), 1.0).unwrap();
        assert_abs_diff_eq!(lut[0], 0.0);
        assert_abs_diff_eq!(lut[1], 1.0 / 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lut[2], 2.0 / 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lut[3], 1.0);
    }

    #[test]
    fn test_gamma_bends_samples() {
        let lut = make_mapping_array(3, &ramp(), 2.0).unwrap();
        assert_abs_diff_eq!(lut[1], 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_single_entry_takes_last_left_value() {
        let pts = [Segment::new(0.0, 0.2, 0.3), Segment::new(1.0, 0.9, 0.1)];
        assert_eq!(make_mapping_array(1, &pts, 1.0).unwrap(), vec![0.9]);
    }

    #[test]
    fn test_discontinuity() {
        // jumps from 0 to 1 at x = 0.5
        let pts = [
            Segment::at(0.0, 0.0),
            Segment::new(0.5, 0.0, 1.0),
            Segment::at(1.0, 1.0),
        ];
        let lut = make_mapping_array(5, &pts, 1.0).unwrap();
        assert_abs_diff_eq!(lut[1], 0.0);
        // x = 0.5 lands on the left side of the jump
        assert_abs_diff_eq!(lut[2], 0.0);
        assert_abs_diff_eq!(lut[3], 1.0);
    }

    #[test]
    fn test_clipped() {
        let pts = [Segment::at(0.0, -1.0), Segment::at(1.0, 2.0)];
        let lut = make_mapping_array(3, &pts, 1.0).unwrap();
        assert_eq!(lut, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_invalid_channels() {
        assert!(make_mapping_array(0, &ramp(), 1.0).is_err());
        assert!(make_mapping_array(4, &ramp(), 0.0).is_err());
        assert!(make_mapping_array(4, &[], 1.0).is_err());
        let open = [Segment::at(0.1, 0.0), Segment::at(1.0, 1.0)];
        assert!(make_mapping_array(4, &open, 1.0).is_err());
        let unordered = [
            Segment::at(0.0, 0.0),
            Segment::at(0.7, 0.5),
            Segment::at(0.3, 0.5),
            Segment::at(1.0, 1.0),
        ];
        assert!(make_mapping_array(4, &unordered, 1.0).is_err());
    }

    #[test]
    fn test_reversed_mirrors_samples() {
        let data = SegmentData::new(
            vec![Segment::at(0.0, 0.0), Segment::new(0.25, 0.2, 0.8), Segment::at(1.0, 1.0)],
            ramp(),
            vec![Segment::at(0.0, 1.0), Segment::at(1.0, 0.0)],
        );
        let rev = data.reversed();
        assert!(rev.validate().is_ok());
        assert_eq!(rev.blue, ramp());
        assert_eq!(rev.reversed(), data);

        let fwd = make_mapping_array(11, &data.green, 1.0).unwrap();
        let bwd = make_mapping_array(11, &rev.green, 1.0).unwrap();
        for i in 0..11 {
            assert_abs_diff_eq!(fwd[i], bwd[10 - i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_validate_names_channel() {
        let data = SegmentData::new(ramp(), vec![], ramp());
        let msg = data.validate().unwrap_err().to_string();
        assert!(msg.contains("green"));
    }
}
