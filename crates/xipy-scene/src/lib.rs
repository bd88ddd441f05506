//! # xipy-scene
//!
//! Scene state for an orthogonal cut-plane neuroimaging view.
//!
//! - [`plane`] - Cut planes and three-plane intersection
//! - [`crop`] - Implicit crop functions for surface extraction
//! - [`interaction`] - Plane widget interaction state machine
//! - [`OrthoScene`] - Channels, planes, crop mode and world position
//! - [`SceneConfig`] - YAML configuration
//! - [`phantom`] - Synthetic head volumes
//!
//! # Usage
//!
//! ```rust
//! use xipy_core::Volume;
//! use xipy_math::{Affine, Vec3};
//! use xipy_scene::{OrthoScene, PositionOrigin, SceneConfig, SceneEvent};
//!
//! let mut scene = OrthoScene::new(SceneConfig::default()).unwrap();
//! let anat = Volume::filled([8, 8, 8], 1.0f32).unwrap();
//! scene.load_volume(anat, Affine::IDENTITY).unwrap();
//! assert_eq!(scene.position(), Vec3::splat(2.0));
//!
//! let events = scene.set_world_position(Vec3::new(1.0, 2.0, 3.0));
//! assert!(events.contains(&SceneEvent::PositionChanged {
//!     position: Vec3::new(1.0, 2.0, 3.0),
//!     origin: PositionOrigin::External,
//! }));
//! ```
//!
//! # Dependencies
//!
//! - [`xipy-ops`] - Blending and surface masks
//! - [`xipy-math`] - Vectors and affines
//! - [`glam`] - Determinants
//! - [`serde_yaml`] - Configuration files
//!
//! # Used By
//!
//! - `xipy-cli` - `intersect` and `phantom` commands

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod scene;
pub mod crop;
pub mod interaction;
pub mod phantom;
pub mod plane;

pub use config::SceneConfig;
pub use crop::{CropGeometry, CropMode, FrustumPlanes, ImplicitFunction};
pub use error::{SceneError, SceneResult};
pub use interaction::{InteractionState, Phase, PlaneEvent, PlaneInteraction, Resolution, Transition};
pub use plane::{Axis, CutPlane, PlaneSet, three_plane_point};
pub use scene::{OrthoScene, OverlayModel, PositionOrigin, ProbeSample, SceneEvent};
