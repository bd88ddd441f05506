//! Color names, hex strings and gray levels.
//!
//! Control points may be given as RGB triples or as strings:
//!
//! - `#rrggbb` / `#rgb` hex
//! - a grayscale level such as `"0.75"`
//! - a basic color name (`"red"`, `"grey"`, ...) or single-letter code
//!   (`"k"`, `"w"`, `"r"`, ...)
//!
//! # Example
//!
//! ```rust
//! use xipy_lut::parse_color;
//!
//! assert_eq!(parse_color("#ff0000").unwrap(), [1.0, 0.0, 0.0]);
//! assert_eq!(parse_color("0.5").unwrap(), [0.5, 0.5, 0.5]);
//! assert_eq!(parse_color("white").unwrap(), [1.0, 1.0, 1.0]);
//! assert!(parse_color("chartreuse-ish").is_err());
//! ```

use crate::{LutError, LutResult};

/// RGB color with components in [0, 1].
pub type Rgb = [f32; 3];

const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("k", 0x000000),
    ("white", 0xffffff),
    ("w", 0xffffff),
    ("red", 0xff0000),
    ("r", 0xff0000),
    ("green", 0x008000),
    ("g", 0x008000),
    ("blue", 0x0000ff),
    ("b", 0x0000ff),
    ("cyan", 0x00ffff),
    ("c", 0x00bfbf),
    ("magenta", 0xff00ff),
    ("m", 0xbf00bf),
    ("yellow", 0xffff00),
    ("y", 0xbfbf00),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("orange", 0xffa500),
    ("purple", 0x800080),
    ("brown", 0xa52a2a),
    ("pink", 0xffc0cb),
];

/// Converts a packed `0xRRGGBB` value to an [`Rgb`] triple.
#[inline]
pub fn rgb_from_hex(hex: u32) -> Rgb {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Parses a color string into an [`Rgb`] triple.
///
/// # Errors
///
/// Returns [`LutError::InvalidInput`] for unknown names, malformed hex, or
/// grayscale levels outside [0, 1].
pub fn parse_color(spec: &str) -> LutResult<Rgb> {
    let s = spec.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| LutError::invalid_input(format!("bad hex color '{spec}'")));
    }

    if let Ok(level) = s.parse::<f32>() {
        if !(0.0..=1.0).contains(&level) {
            return Err(LutError::invalid_input(format!(
                "grayscale level '{spec}' must be within [0, 1]"
            )));
        }
        return Ok([level; 3]);
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == s)
        .map(|&(_, hex)| rgb_from_hex(hex))
        .ok_or_else(|| LutError::invalid_input(format!("unknown color '{spec}'")))
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok().map(rgb_from_hex),
        3 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            let (r, g, b) = ((v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf);
            Some(rgb_from_hex((r * 17) << 16 | (g * 17) << 8 | b * 17))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hex() {
        let c = parse_color("#FF8000").unwrap();
        assert_abs_diff_eq!(c[0], 1.0);
        assert_abs_diff_eq!(c[1], 128.0 / 255.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c[2], 0.0);
        assert_eq!(parse_color("#fff").unwrap(), [1.0, 1.0, 1.0]);
        assert!(parse_color("#ff00").is_err());
        assert!(parse_color("#gg0000").is_err());
    }

    #[test]
    fn test_gray_level() {
        assert_eq!(parse_color(" 0.25 ").unwrap(), [0.25; 3]);
        assert!(parse_color("1.5").is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(parse_color("k").unwrap(), [0.0; 3]);
        assert_eq!(parse_color("Grey").unwrap(), parse_color("gray").unwrap());
        assert!(parse_color("").is_err());
    }
}
