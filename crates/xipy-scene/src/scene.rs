//! Orthogonal-plane scene state.
//!
//! [`OrthoScene`] owns everything the 3-D view needs between frames: the
//! [`Blender`], the three cut planes, the voxel-to-world affine, the crop
//! mode and the shared world position. Every mutator returns the
//! [`SceneEvent`]s it caused; the caller redraws and forwards positions.
//!
//! # Position ownership
//!
//! The world position has two writers, and each update has exactly one:
//!
//! - plane interactions and picks publish [`PositionOrigin::Interaction`]
//!   positions, which [`OrthoScene::dispatch`] forwards to the
//!   [`OverlayModel`]
//! - [`OrthoScene::set_world_position`] is the overlay model talking back;
//!   it snaps the planes and reports [`PositionOrigin::External`], which
//!   is never forwarded
//!
//! So a position pushed in from outside is not echoed back out.

use crate::crop::{CropGeometry, CropMode, FrustumPlanes};
use crate::interaction::{InteractionState, PlaneEvent, PlaneInteraction, Resolution, Transition};
use crate::plane::PlaneSet;
use crate::{SceneConfig, SceneError, SceneResult};
use tracing::{debug, trace};
use xipy_core::{Rgba, Volume};
use xipy_lut::{Alpha, Colormap, ColormapRegistry, anatomical_alpha};
use xipy_math::{Affine, Vec3};
use xipy_ops::{Blender, ChannelRole};

/// Which writer produced a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionOrigin {
    /// Plane interaction, pick, or volume load inside the scene
    Interaction,
    /// [`OrthoScene::set_world_position`]
    External,
}

/// Change notification returned by scene mutators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    /// The shared world position moved.
    PositionChanged {
        /// New world position
        position: Vec3,
        /// Writer of this update
        origin: PositionOrigin,
    },
    /// At least one cut plane moved or turned.
    PlanesMoved,
    /// The crop primitive or kept side changed.
    CropChanged {
        /// Mode now in effect
        mode: CropMode,
    },
    /// The composite needs redrawing.
    ColorsInvalidated,
}

/// Receiver of interaction-originated positions.
pub trait OverlayModel {
    /// Called with each position the scene publishes.
    fn world_position_changed(&mut self, position: Vec3);
}

/// Values under a world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSample {
    /// Nearest voxel
    pub index: [usize; 3],
    /// Raw main value, `None` if masked
    pub main: Option<f32>,
    /// Raw overlay value, `None` if absent or masked
    pub overlay: Option<f32>,
    /// Composited color
    pub color: Rgba,
}

/// Scene state behind the orthogonal-plane view.
#[derive(Debug, Clone)]
pub struct OrthoScene {
    config: SceneConfig,
    registry: ColormapRegistry,
    blender: Blender,
    affine: Affine,
    planes: PlaneSet,
    interaction: PlaneInteraction,
    frustum: Option<FrustumPlanes>,
    planes_visible: bool,
    position: Vec3,
}

impl OrthoScene {
    /// Empty scene.
    ///
    /// # Errors
    ///
    /// Invalid configuration, an unknown main or overlay colormap, or
    /// colormap construction failure.
    pub fn new(config: SceneConfig) -> SceneResult<Self> {
        config.validate()?;
        let registry = config.registry()?;
        for name in [&config.main_colormap, &config.overlay_colormap] {
            config.colormap(&registry, name)?;
        }
        Ok(Self {
            planes_visible: config.cutout_mode,
            config,
            registry,
            blender: Blender::new(),
            affine: Affine::IDENTITY,
            planes: PlaneSet::default(),
            interaction: PlaneInteraction::new(),
            frustum: None,
            position: Vec3::ZERO,
        })
    }

    /// Loads the anatomical volume and resets the planes.
    ///
    /// Channels on a different grid are dropped. The planes start axis
    /// aligned at a quarter of each axis extent.
    ///
    /// # Errors
    ///
    /// Unknown main colormap, or a blending failure.
    pub fn load_volume(&mut self, data: Volume<f32>, affine: Affine) -> SceneResult<Vec<SceneEvent>> {
        let shape = data.shape();
        trace!(?shape, "OrthoScene::load_volume");
        let mode_before = self.crop_mode();

        if self.blender.shape().is_some_and(|s| s != shape) {
            for role in [ChannelRole::Overlay, ChannelRole::Blended] {
                if self.blender.remove_channel(role).is_some() {
                    debug!(%role, "dropped channel on old grid");
                }
            }
        }
        let cmap = self.config.colormap(&self.registry, &self.config.main_colormap)?;
        let alpha = Alpha::Curve(anatomical_alpha(cmap.table_size()));
        self.blender.set_channel(ChannelRole::Main, data, cmap, alpha)?;
        self.affine = affine;
        self.interaction.cancel();

        let quarter = Vec3::new(
            (shape[0] / 4) as f64,
            (shape[1] / 4) as f64,
            (shape[2] / 4) as f64,
        );
        let position = affine.voxel_to_world(quarter);
        self.planes.snap_to(position);
        self.position = position;

        let mut events = vec![
            SceneEvent::ColorsInvalidated,
            SceneEvent::PlanesMoved,
            SceneEvent::PositionChanged {
                position,
                origin: PositionOrigin::Interaction,
            },
        ];
        self.push_crop_change(mode_before, &mut events);
        Ok(events)
    }

    /// Registers or replaces a channel on the loaded grid.
    ///
    /// # Errors
    ///
    /// [`SceneError::NoVolume`] for a non-main channel before
    /// [`OrthoScene::load_volume`]; blending errors otherwise.
    pub fn set_channel(
        &mut self,
        role: ChannelRole,
        data: Volume<f32>,
        colormap: Colormap,
        alpha: impl Into<Alpha>,
    ) -> SceneResult<Vec<SceneEvent>> {
        if role != ChannelRole::Main && !self.has_volume() {
            return Err(SceneError::NoVolume);
        }
        self.blender.set_channel(role, data, colormap, alpha)?;
        Ok(vec![SceneEvent::ColorsInvalidated])
    }

    /// Registers or replaces a channel with a missing-data mask
    /// (`true` = missing). Masked voxels take the colormap's bad row.
    ///
    /// # Errors
    ///
    /// As [`OrthoScene::set_channel`]; the mask must share the data's shape.
    pub fn set_channel_masked(
        &mut self,
        role: ChannelRole,
        data: Volume<f32>,
        mask: Volume<bool>,
        colormap: Colormap,
        alpha: impl Into<Alpha>,
    ) -> SceneResult<Vec<SceneEvent>> {
        if role != ChannelRole::Main && !self.has_volume() {
            return Err(SceneError::NoVolume);
        }
        self.blender
            .set_channel_masked(role, data, mask, colormap, alpha)?;
        Ok(vec![SceneEvent::ColorsInvalidated])
    }

    /// Masked overlay with the configured overlay colormap.
    ///
    /// # Errors
    ///
    /// As [`OrthoScene::set_channel_masked`].
    pub fn set_overlay_masked(
        &mut self,
        data: Volume<f32>,
        mask: Volume<bool>,
        alpha: impl Into<Alpha>,
    ) -> SceneResult<Vec<SceneEvent>> {
        let cmap = self.config.colormap(&self.registry, &self.config.overlay_colormap)?;
        self.set_channel_masked(ChannelRole::Overlay, data, mask, cmap, alpha)
    }

    /// Overlay channel with the configured overlay colormap.
    ///
    /// # Errors
    ///
    /// As [`OrthoScene::set_channel`].
    pub fn set_overlay(
        &mut self,
        data: Volume<f32>,
        alpha: impl Into<Alpha>,
    ) -> SceneResult<Vec<SceneEvent>> {
        let cmap = self.config.colormap(&self.registry, &self.config.overlay_colormap)?;
        self.set_channel(ChannelRole::Overlay, data, cmap, alpha)
    }

    /// Changes a channel's alpha.
    ///
    /// # Errors
    ///
    /// Blending errors for an unknown role or ill-fitting alpha.
    pub fn set_alpha(&mut self, role: ChannelRole, alpha: impl Into<Alpha>) -> SceneResult<Vec<SceneEvent>> {
        self.blender.set_alpha(role, alpha)?;
        Ok(vec![SceneEvent::ColorsInvalidated])
    }

    /// Shows or hides a channel.
    ///
    /// # Errors
    ///
    /// Blending errors for an unknown role.
    pub fn set_enabled(&mut self, role: ChannelRole, enabled: bool) -> SceneResult<Vec<SceneEvent>> {
        let before = self.blender.generation();
        self.blender.set_enabled(role, enabled)?;
        Ok(if self.blender.generation() == before {
            Vec::new()
        } else {
            vec![SceneEvent::ColorsInvalidated]
        })
    }

    /// Feeds one plane widget callback through the interaction machine.
    ///
    /// # Errors
    ///
    /// [`SceneError::NoVolume`] before a volume is loaded;
    /// [`SceneError::DegeneratePlanes`] when an interaction ends with
    /// planes that have no single intersection. The machine is idle again
    /// either way.
    pub fn handle_plane_event(&mut self, event: &PlaneEvent) -> SceneResult<Vec<SceneEvent>> {
        if !self.has_volume() {
            return Err(SceneError::NoVolume);
        }
        trace!(axis = %event.axis, phase = ?event.phase, cursor = event.cursor_active, "OrthoScene::handle_plane_event");
        match self.interaction.handle(event, &self.affine) {
            Transition::Deferred => Ok(Vec::new()),
            Transition::Apply { axis, plane } => {
                self.planes.set_plane(axis, plane);
                Ok(vec![SceneEvent::PlanesMoved])
            }
            Transition::Finish { apply, resolution } => {
                // Resolve on a copy; a degenerate end leaves the planes as they were.
                let mut next = self.planes;
                if let Some((axis, plane)) = apply {
                    next.set_plane(axis, plane);
                }
                let position = match resolution {
                    Resolution::Snap(world) => {
                        next.snap_to(world);
                        world
                    }
                    Resolution::Intersect => next.intersection()?,
                };
                self.planes = next;
                debug!(?position, ?resolution, "interaction resolved");
                Ok(self.publish(position, PositionOrigin::Interaction))
            }
        }
    }

    /// Position pushed in by the overlay model.
    ///
    /// Takes precedence over any interaction in progress, which is
    /// cancelled. The planes snap to `world`.
    pub fn set_world_position(&mut self, world: Vec3) -> Vec<SceneEvent> {
        trace!(?world, "OrthoScene::set_world_position");
        self.interaction.cancel();
        self.planes.snap_to(world);
        self.publish(world, PositionOrigin::External)
    }

    /// Point picked in the 3-D view: snap there and publish it.
    pub fn pick(&mut self, world: Vec3) -> Vec<SceneEvent> {
        trace!(?world, "OrthoScene::pick");
        self.interaction.cancel();
        self.planes.snap_to(world);
        self.publish(world, PositionOrigin::Interaction)
    }

    /// Shows or hides the cut planes; visible planes crop in cutout mode.
    pub fn set_planes_visible(&mut self, visible: bool) -> Vec<SceneEvent> {
        let before = self.crop_mode();
        self.planes_visible = visible;
        let mut events = Vec::new();
        self.push_crop_change(before, &mut events);
        events
    }

    /// Updates the camera frustum used in frustum mode.
    pub fn set_camera_frustum(&mut self, planes: FrustumPlanes) -> Vec<SceneEvent> {
        self.frustum = Some(planes);
        match self.crop_mode() {
            CropMode::Frustum => vec![SceneEvent::CropChanged {
                mode: CropMode::Frustum,
            }],
            CropMode::Cutout => Vec::new(),
        }
    }

    /// Mode in effect: cutout needs visible planes over a loaded volume.
    pub fn crop_mode(&self) -> CropMode {
        if self.planes_visible && self.has_volume() {
            CropMode::Cutout
        } else {
            CropMode::Frustum
        }
    }

    /// Crop geometry for the current mode, linked to the current planes.
    pub fn crop_geometry(&self) -> CropGeometry {
        match self.crop_mode() {
            CropMode::Cutout => CropGeometry::cutout(&self.planes),
            CropMode::Frustum => CropGeometry::frustum(self.frustum.as_ref()),
        }
    }

    /// Values and color under `world`, `None` outside the grid.
    ///
    /// # Errors
    ///
    /// [`SceneError::NoVolume`] before a volume is loaded.
    pub fn probe(&mut self, world: Vec3) -> SceneResult<Option<ProbeSample>> {
        let shape = self.blender.shape().ok_or(SceneError::NoVolume)?;
        let Some(index) = self.affine.world_to_index(world, shape) else {
            return Ok(None);
        };
        let main = self.blender.channel(ChannelRole::Main).and_then(|c| c.value(index));
        let overlay = self
            .blender
            .channel(ChannelRole::Overlay)
            .and_then(|c| c.value(index));
        let Some(color) = self.blender.color_at(index)? else {
            return Ok(None);
        };
        Ok(Some(ProbeSample {
            index,
            main,
            overlay,
            color,
        }))
    }

    /// Composited RGBA volume.
    ///
    /// # Errors
    ///
    /// Blending errors, including an empty blender.
    pub fn composite(&mut self) -> SceneResult<&Volume<Rgba>> {
        Ok(self.blender.composite()?)
    }

    /// Surface mask of the main channel with the configured threshold.
    ///
    /// # Errors
    ///
    /// Blending errors, including a missing main channel.
    pub fn surface_mask(&mut self) -> SceneResult<&Volume<u8>> {
        let options = self.config.mask_options();
        Ok(self
            .blender
            .derive_surface_mask(&self.config.threshold_strategy, &options)?)
    }

    /// Forwards interaction-originated positions to `model`.
    ///
    /// Returns the number of positions forwarded.
    pub fn dispatch(events: &[SceneEvent], model: &mut impl OverlayModel) -> usize {
        let mut sent = 0;
        for event in events {
            if let SceneEvent::PositionChanged {
                position,
                origin: PositionOrigin::Interaction,
            } = event
            {
                model.world_position_changed(*position);
                sent += 1;
            }
        }
        sent
    }

    /// Current world position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current cut planes.
    #[inline]
    pub fn planes(&self) -> &PlaneSet {
        &self.planes
    }

    /// Voxel-to-world mapping of the loaded volume.
    #[inline]
    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    /// Channel state.
    #[inline]
    pub fn blender(&self) -> &Blender {
        &self.blender
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Colormaps built from the configuration.
    #[inline]
    pub fn registry(&self) -> &ColormapRegistry {
        &self.registry
    }

    /// Interaction in progress.
    #[inline]
    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    /// Whether the planes are shown.
    #[inline]
    pub fn planes_visible(&self) -> bool {
        self.planes_visible
    }

    /// Returns `true` once a main volume is loaded.
    pub fn has_volume(&self) -> bool {
        self.blender.channel(ChannelRole::Main).is_some()
    }

    fn publish(&mut self, position: Vec3, origin: PositionOrigin) -> Vec<SceneEvent> {
        self.position = position;
        vec![
            SceneEvent::PlanesMoved,
            SceneEvent::PositionChanged { position, origin },
        ]
    }

    fn push_crop_change(&self, before: CropMode, events: &mut Vec<SceneEvent>) {
        let mode = self.crop_mode();
        if mode != before {
            debug!(%before, %mode, "crop mode");
            events.push(SceneEvent::CropChanged { mode });
        }
    }
}
