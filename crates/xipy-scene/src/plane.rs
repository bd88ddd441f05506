//! Cut planes and their common intersection.
//!
//! Three planes, one per [`Axis`], each stored as a point on the plane and
//! a normal. Their intersection is solved by the cross-product form of
//! Cramer's rule:
//!
//! ```text
//! d_i = p_i . n_i
//! x   = (d1 (n2 x n3) + d2 (n3 x n1) + d3 (n1 x n2)) / det[n1; n2; n3]
//! ```
//!
//! # Usage
//!
//! ```rust
//! use xipy_math::Vec3;
//! use xipy_scene::PlaneSet;
//!
//! let planes = PlaneSet::axis_aligned(Vec3::new(2.0, 3.0, 5.0));
//! assert_eq!(planes.intersection().unwrap(), Vec3::new(2.0, 3.0, 5.0));
//! ```

use crate::{SceneError, SceneResult};
use glam::DMat3;
use serde::{Deserialize, Serialize};
use std::fmt;
use xipy_math::Vec3;

/// Relative determinant below which the planes count as degenerate.
pub const DEGENERATE_EPS: f64 = 1e-12;

/// Axis a cut plane is labeled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Sagittal plane
    X,
    /// Coronal plane
    Y,
    /// Axial plane
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (0, 1, 2).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Unit vector along this axis.
    #[inline]
    pub const fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// Lowercase axis name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A plane through `origin` with normal `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutPlane {
    /// Any point on the plane (the widget center)
    pub origin: Vec3,
    /// Plane normal, not necessarily unit length
    pub normal: Vec3,
}

impl CutPlane {
    /// Creates a plane from a point and a normal.
    #[inline]
    pub const fn new(origin: Vec3, normal: Vec3) -> Self {
        Self { origin, normal }
    }

    /// Plane perpendicular to `axis` through `position`.
    #[inline]
    pub const fn axis_aligned(axis: Axis, position: Vec3) -> Self {
        Self::new(position, axis.unit())
    }

    /// Plane offset `origin . normal`.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.origin.dot(self.normal)
    }

    /// `normal . (point - origin)`: positive on the side the normal faces.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f64 {
        self.normal.dot(point - self.origin)
    }

    /// Same plane with the normal reversed.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self::new(self.origin, -self.normal)
    }
}

/// Common point of three planes given as normals and points on them.
///
/// # Errors
///
/// Returns [`SceneError::DegeneratePlanes`] when a normal is zero or the
/// normals are (numerically) linearly dependent.
pub fn three_plane_point(
    n1: Vec3,
    n2: Vec3,
    n3: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
) -> SceneResult<Vec3> {
    // Columns are the normals; the determinant equals that of the rows.
    let det = DMat3::from_cols(n1.to_glam(), n2.to_glam(), n3.to_glam()).determinant();
    let scale = n1.length() * n2.length() * n3.length();
    if !det.is_finite() || scale == 0.0 || det.abs() <= DEGENERATE_EPS * scale {
        return Err(SceneError::DegeneratePlanes { det });
    }

    let x = n2.cross(n3) * p1.dot(n1) + n3.cross(n1) * p2.dot(n2) + n1.cross(n2) * p3.dot(n3);
    Ok(x / det)
}

/// The three cut planes, indexed by [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSet {
    planes: [CutPlane; 3],
}

impl PlaneSet {
    /// Axis-aligned planes meeting at `position`.
    pub fn axis_aligned(position: Vec3) -> Self {
        Self {
            planes: Axis::ALL.map(|axis| CutPlane::axis_aligned(axis, position)),
        }
    }

    /// Plane for `axis`.
    #[inline]
    pub fn plane(&self, axis: Axis) -> &CutPlane {
        &self.planes[axis.index()]
    }

    /// Replaces the plane for `axis`.
    #[inline]
    pub fn set_plane(&mut self, axis: Axis, plane: CutPlane) {
        self.planes[axis.index()] = plane;
    }

    /// All planes in axis order.
    #[inline]
    pub fn planes(&self) -> &[CutPlane; 3] {
        &self.planes
    }

    /// Common point of the three planes.
    ///
    /// # Errors
    ///
    /// See [`three_plane_point`].
    pub fn intersection(&self) -> SceneResult<Vec3> {
        let [x, y, z] = self.planes;
        three_plane_point(x.normal, y.normal, z.normal, x.origin, y.origin, z.origin)
    }

    /// Restores axis-aligned orientation and moves every plane through
    /// `position`.
    pub fn snap_to(&mut self, position: Vec3) {
        *self = Self::axis_aligned(position);
    }

    /// Returns `true` if every plane is perpendicular to its own axis.
    pub fn is_axis_aligned(&self) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let n = self.plane(axis).normal;
            let len = n.length();
            len > 0.0 && (n / len).abs_diff_eq(axis.unit(), 1e-9)
        })
    }
}

impl Default for PlaneSet {
    fn default() -> Self {
        Self::axis_aligned(Vec3::ZERO)
    }
}
