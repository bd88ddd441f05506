//! Named colormap library.
//!
//! [`ColormapRegistry::builtin`] registers the standard segment maps and the
//! sequential/diverging color-list maps, each paired with its `_r` reverse.

use crate::color::rgb_from_hex;
use crate::segment::{Segment, SegmentData};
use crate::{Colormap, LutResult};
use std::collections::BTreeMap;
use tracing::debug;

type Points = &'static [(f32, f32, f32)];

/// (name, red, green, blue) segment tables.
const SEGMENT_MAPS: &[(&str, Points, Points, Points)] = &[
    (
        "gray",
        &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)],
        &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)],
        &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)],
    ),
    (
        "binary",
        &[(0.0, 1.0, 1.0), (1.0, 0.0, 0.0)],
        &[(0.0, 1.0, 1.0), (1.0, 0.0, 0.0)],
        &[(0.0, 1.0, 1.0), (1.0, 0.0, 0.0)],
    ),
    (
        "bone",
        &[(0.0, 0.0, 0.0), (0.746032, 0.652778, 0.652778), (1.0, 1.0, 1.0)],
        &[
            (0.0, 0.0, 0.0),
            (0.365079, 0.319444, 0.319444),
            (0.746032, 0.777778, 0.777778),
            (1.0, 1.0, 1.0),
        ],
        &[(0.0, 0.0, 0.0), (0.365079, 0.444444, 0.444444), (1.0, 1.0, 1.0)],
    ),
    (
        "cool",
        &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)],
        &[(0.0, 1.0, 1.0), (1.0, 0.0, 0.0)],
        &[(0.0, 1.0, 1.0), (1.0, 1.0, 1.0)],
    ),
    (
        "copper",
        &[(0.0, 0.0, 0.0), (0.809524, 1.0, 1.0), (1.0, 1.0, 1.0)],
        &[(0.0, 0.0, 0.0), (1.0, 0.7812, 0.7812)],
        &[(0.0, 0.0, 0.0), (1.0, 0.4975, 0.4975)],
    ),
    (
        "hot",
        &[(0.0, 0.0416, 0.0416), (0.365079, 1.0, 1.0), (1.0, 1.0, 1.0)],
        &[(0.0, 0.0, 0.0), (0.365079, 0.0, 0.0), (0.746032, 1.0, 1.0), (1.0, 1.0, 1.0)],
        &[(0.0, 0.0, 0.0), (0.746032, 0.0, 0.0), (1.0, 1.0, 1.0)],
    ),
    (
        "jet",
        &[(0.0, 0.0, 0.0), (0.35, 0.0, 0.0), (0.66, 1.0, 1.0), (0.89, 1.0, 1.0), (1.0, 0.5, 0.5)],
        &[
            (0.0, 0.0, 0.0),
            (0.125, 0.0, 0.0),
            (0.375, 1.0, 1.0),
            (0.64, 1.0, 1.0),
            (0.91, 0.0, 0.0),
            (1.0, 0.0, 0.0),
        ],
        &[(0.0, 0.5, 0.5), (0.11, 1.0, 1.0), (0.34, 1.0, 1.0), (0.65, 0.0, 0.0), (1.0, 0.0, 0.0)],
    ),
    (
        "spring",
        &[(0.0, 1.0, 1.0), (1.0, 1.0, 1.0)],
        &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)],
        &[(0.0, 1.0, 1.0), (1.0, 0.0, 0.0)],
    ),
    (
        "summer",
        &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)],
        &[(0.0, 0.5, 0.5), (1.0, 1.0, 1.0)],
        &[(0.0, 0.4, 0.4), (1.0, 0.4, 0.4)],
    ),
    (
        "autumn",
        &[(0.0, 1.0, 1.0), (1.0, 1.0, 1.0)],
        &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)],
        &[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)],
    ),
    (
        "winter",
        &[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)],
        &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)],
        &[(0.0, 1.0, 1.0), (1.0, 0.5, 0.5)],
    ),
];

/// (name, evenly spaced `0xRRGGBB` colors).
const LIST_MAPS: &[(&str, &[u32])] = &[
    (
        "Blues",
        &[0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b],
    ),
    (
        "Greens",
        &[0xf7fcf5, 0xe5f5e0, 0xc7e9c0, 0xa1d99b, 0x74c476, 0x41ab5d, 0x238b45, 0x006d2c, 0x00441b],
    ),
    (
        "Reds",
        &[0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d],
    ),
    (
        "Oranges",
        &[0xfff5eb, 0xfee6ce, 0xfdd0a2, 0xfdae6b, 0xfd8d3c, 0xf16913, 0xd94801, 0xa63603, 0x7f2704],
    ),
    (
        "Purples",
        &[0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f, 0x3f007d],
    ),
    (
        "RdBu",
        &[
            0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xf7f7f7, 0xd1e5f0, 0x92c5de, 0x4393c3,
            0x2166ac, 0x053061,
        ],
    ),
    (
        "PuOr",
        &[
            0x7f3b08, 0xb35806, 0xe08214, 0xfdb863, 0xfee0b6, 0xf7f7f7, 0xd8daeb, 0xb2abd2, 0x8073ac,
            0x542788, 0x2d004b,
        ],
    ),
    (
        "Spectral",
        &[
            0x9e0142, 0xd53e4f, 0xf46d43, 0xfdae61, 0xfee08b, 0xffffbf, 0xe6f598, 0xabdda4, 0x66c2a5,
            0x3288bd, 0x5e4fa2,
        ],
    ),
];

fn segments(points: Points) -> Vec<Segment> {
    points.iter().map(|&(x, y0, y1)| Segment::new(x, y0, y1)).collect()
}

/// Colormaps by name.
#[derive(Debug, Clone, Default)]
pub struct ColormapRegistry {
    maps: BTreeMap<String, Colormap>,
}

impl ColormapRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every builtin colormap and its reverse, sampled at `table_size`.
    ///
    /// # Errors
    ///
    /// Fails for a zero table size.
    pub fn builtin(table_size: usize) -> LutResult<Self> {
        let mut reg = Self::new();
        for &(name, r, g, b) in SEGMENT_MAPS {
            let data = SegmentData::new(segments(r), segments(g), segments(b));
            reg.insert(Colormap::from_segments(name, data, table_size, 1.0)?);
        }
        for &(name, hex) in LIST_MAPS {
            let colors: Vec<_> = hex.iter().map(|&h| rgb_from_hex(h)).collect();
            reg.insert(Colormap::from_colors(name, &colors, table_size, 1.0)?);
        }
        debug!(count = reg.len(), table_size, "registered builtin colormaps");
        Ok(reg)
    }

    /// Registers `cmap` and its reverse, replacing maps of the same names.
    pub fn insert(&mut self, cmap: Colormap) {
        let rev = cmap.reversed();
        self.maps.insert(rev.name().to_string(), rev);
        self.maps.insert(cmap.name().to_string(), cmap);
    }

    /// Colormap by exact name.
    pub fn get(&self, name: &str) -> Option<&Colormap> {
        self.maps.get(name)
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// Number of registered colormaps.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Alpha;

    #[test]
    fn test_builtin_pairs() {
        let reg = ColormapRegistry::builtin(256).unwrap();
        assert_eq!(reg.len(), 2 * (SEGMENT_MAPS.len() + LIST_MAPS.len()));
        for name in ["gray", "bone", "hot", "jet", "Blues", "RdBu", "Spectral"] {
            assert!(reg.contains(name), "{name}");
            assert!(reg.contains(&format!("{name}_r")), "{name}_r");
        }
    }

    #[test]
    fn test_gray_reverse_starts_white() {
        let reg = ColormapRegistry::builtin(256).unwrap();
        let gray_r = reg.get("gray_r").unwrap();
        assert_eq!(gray_r.lookup(0, &Alpha::OPAQUE).unwrap(), [1.0; 4]);
        assert_eq!(gray_r.table()[255][..3], [0.0; 3]);
    }

    #[test]
    fn test_binary_is_reversed_gray() {
        let reg = ColormapRegistry::builtin(16).unwrap();
        let binary = reg.get("binary").unwrap();
        let gray_r = reg.get("gray_r").unwrap();
        for (a, b) in binary.table()[..16].iter().zip(&gray_r.table()[..16]) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_hot_starts_dark_red() {
        let reg = ColormapRegistry::builtin(256).unwrap();
        let hot = reg.get("hot").unwrap();
        assert_eq!(hot.table()[0], [0.0416, 0.0, 0.0, 1.0]);
        assert_eq!(hot.table()[255], [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_insert_custom() {
        let mut reg = ColormapRegistry::new();
        assert!(reg.is_empty());
        reg.insert(Colormap::from_colors("bw_r", &[[0.0; 3], [1.0; 3]], 8, 1.0).unwrap());
        let names: Vec<&str> = reg.names().collect();
        assert_eq!(names, vec!["bw", "bw_r"]);
    }

    #[test]
    fn test_zero_size_fails() {
        assert!(ColormapRegistry::builtin(0).is_err());
    }
}
