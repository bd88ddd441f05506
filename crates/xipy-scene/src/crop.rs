//! Crop geometry for surface extraction.
//!
//! An [`ImplicitFunction`] is negative inside its region. A
//! [`CropGeometry`] pairs it with the side that survives extraction:
//!
//! | Mode | Function | Kept side |
//! |------|----------|-----------|
//! | [`CropMode::Cutout`] | the three cut planes, normals reversed | outside |
//! | [`CropMode::Frustum`] | the six camera frustum planes | inside |
//!
//! In cutout mode the octant in front of all three planes is removed,
//! exposing the cross-section. Frustum mode keeps whatever the camera sees.

use crate::plane::{CutPlane, PlaneSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use xipy_math::Vec3;

/// Camera frustum planes as `[a, b, c, d]` with `a x + b y + c z + d >= 0`
/// inside.
pub type FrustumPlanes = [[f64; 4]; 6];

/// Which primitive bounds surface extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropMode {
    /// Cut away the octant bounded by the three planes
    Cutout,
    /// Keep the camera's view volume
    #[default]
    Frustum,
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cutout => f.write_str("cutout"),
            Self::Frustum => f.write_str("frustum"),
        }
    }
}

/// Signed region predicate: `evaluate(x) < 0` inside.
#[derive(Debug, Clone, PartialEq)]
pub enum ImplicitFunction {
    /// Intersection of half-spaces, `max_i n_i . (x - p_i)`.
    Planes(Vec<CutPlane>),
    /// Camera frustum; each plane's normal is flipped so the inside is
    /// negative.
    Frustum(FrustumPlanes),
    /// Everything is inside.
    Everything,
}

impl ImplicitFunction {
    /// Evaluates the function at `point`.
    pub fn evaluate(&self, point: Vec3) -> f64 {
        match self {
            Self::Planes(planes) => planes
                .iter()
                .map(|p| p.signed_distance(point))
                .fold(f64::NEG_INFINITY, f64::max),
            Self::Frustum(coeffs) => coeffs
                .iter()
                .map(|[a, b, c, d]| -(a * point.x + b * point.y + c * point.z + d))
                .fold(f64::NEG_INFINITY, f64::max),
            Self::Everything => f64::NEG_INFINITY,
        }
    }

    /// Returns `true` if `point` lies inside.
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        self.evaluate(point) < 0.0
    }
}

/// Implicit function plus the side that extraction keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct CropGeometry {
    /// Region predicate
    pub function: ImplicitFunction,
    /// Keep the inside (`true`) or the outside (`false`)
    pub extract_inside: bool,
}

impl CropGeometry {
    /// Cutout bounded by `planes`: reversed normals, keep the outside.
    pub fn cutout(planes: &PlaneSet) -> Self {
        Self {
            function: ImplicitFunction::Planes(planes.planes().iter().map(CutPlane::flipped).collect()),
            extract_inside: false,
        }
    }

    /// Camera view volume, or everything before a camera exists.
    pub fn frustum(planes: Option<&FrustumPlanes>) -> Self {
        Self {
            function: planes.map_or(ImplicitFunction::Everything, |p| ImplicitFunction::Frustum(*p)),
            extract_inside: true,
        }
    }

    /// Returns `true` if extraction keeps `point`.
    #[inline]
    pub fn keeps(&self, point: Vec3) -> bool {
        self.function.contains(point) == self.extract_inside
    }
}
