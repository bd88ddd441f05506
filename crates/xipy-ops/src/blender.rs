//! Multi-channel RGBA blending.
//!
//! A [`Blender`] holds up to three same-shaped scalar channels, each with
//! its own colormap, alpha, normalization and visibility. Compositing runs
//! the enabled channels in [`ChannelRole`] order and stacks them with the
//! Porter-Duff over operator, starting from a transparent volume.
//!
//! Derived artifacts are cached behind generation counters:
//!
//! - the composite is rebuilt only after a mutation
//! - the surface mask is rebuilt only when the main channel's data or the
//!   mask parameters change
//!
//! # Example
//!
//! ```rust
//! use xipy_core::Volume;
//! use xipy_lut::{Alpha, ColormapRegistry};
//! use xipy_ops::{Blender, ChannelRole};
//!
//! let cmaps = ColormapRegistry::builtin(256).unwrap();
//! let anat = Volume::from_fn([4, 4, 4], |[i, _, _]| i as f32).unwrap();
//!
//! let mut blender = Blender::new();
//! blender
//!     .set_channel(ChannelRole::Main, anat, cmaps.get("gray").unwrap().clone(), Alpha::OPAQUE)
//!     .unwrap();
//! let rgba = blender.composite().unwrap();
//! assert_eq!(rgba[[3, 0, 0]], [1.0, 1.0, 1.0, 1.0]);
//! ```

use crate::composite::{TRANSPARENT, over_inplace, volume_to_bytes};
use crate::surface::{MaskOptions, surface_mask};
use crate::threshold::ThresholdStrategy;
use crate::{Norm, OpsError, OpsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};
use xipy_core::{Rgba, Rgba8, Shape, Volume};
use xipy_lut::{Alpha, Colormap};

/// Channel slot; the derived order is the compositing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelRole {
    /// Anatomical background.
    Main,
    /// Functional overlay.
    Overlay,
    /// Derived channel drawn on top.
    Blended,
}

impl ChannelRole {
    /// All roles in compositing order.
    pub const fn all() -> &'static [Self] {
        &[Self::Main, Self::Overlay, Self::Blended]
    }

    /// Lowercase label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Overlay => "overlay",
            Self::Blended => "blended",
        }
    }
}

impl fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One colormapped scalar source.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Raw intensities
    pub data: Volume<f32>,
    /// Missing-data mask, `true` = missing
    pub mask: Option<Volume<bool>>,
    /// Coloring rule
    pub colormap: Colormap,
    /// Alpha applied at lookup
    pub alpha: Alpha,
    /// Raw-to-unit mapping
    pub norm: Norm,
    /// Included in the composite
    pub enabled: bool,
}

impl Channel {
    /// RGBA colors of this channel alone.
    ///
    /// # Errors
    ///
    /// Fails when the alpha does not fit the colormap.
    pub fn colors(&self) -> OpsResult<Volume<Rgba>> {
        let unit = self.data.map(|&v| self.norm.normalize(v));
        Ok(self
            .colormap
            .map_volume(&unit, self.mask.as_ref(), &self.alpha)?)
    }

    /// Raw value at `ijk`, `None` when masked or out of bounds.
    pub fn value(&self, ijk: [usize; 3]) -> Option<f32> {
        let masked = self
            .mask
            .as_ref()
            .and_then(|m| m.get(ijk).copied())
            .unwrap_or(false);
        if masked { None } else { self.data.get(ijk).copied() }
    }
}

#[derive(Debug, Clone)]
struct MaskCache {
    main_generation: u64,
    strategy: ThresholdStrategy,
    options: MaskOptions,
    threshold: f32,
    mask: Volume<u8>,
}

/// Composites colormapped channels into one RGBA volume.
#[derive(Debug, Clone, Default)]
pub struct Blender {
    channels: BTreeMap<ChannelRole, Channel>,
    /// Bumped by every mutation
    generation: u64,
    /// Bumped when the main channel's data changes
    main_generation: u64,
    composite: Option<(u64, Volume<Rgba>)>,
    mask: Option<MaskCache>,
}

impl Blender {
    /// Empty blender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a channel, normalized over its data range.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::ShapeMismatch`] if `data` disagrees with the
    /// other registered channels, or a colormap error if `alpha` does not
    /// fit `colormap`.
    pub fn set_channel(
        &mut self,
        role: ChannelRole,
        data: Volume<f32>,
        colormap: Colormap,
        alpha: impl Into<Alpha>,
    ) -> OpsResult<()> {
        self.insert(role, data, None, colormap, alpha.into())
    }

    /// Registers or replaces a channel with a missing-data mask.
    ///
    /// # Errors
    ///
    /// As [`Blender::set_channel`]; the mask must share the data's shape.
    pub fn set_channel_masked(
        &mut self,
        role: ChannelRole,
        data: Volume<f32>,
        mask: Volume<bool>,
        colormap: Colormap,
        alpha: impl Into<Alpha>,
    ) -> OpsResult<()> {
        data.ensure_same_shape(&mask).map_err(OpsError::from_core)?;
        self.insert(role, data, Some(mask), colormap, alpha.into())
    }

    fn insert(
        &mut self,
        role: ChannelRole,
        data: Volume<f32>,
        mask: Option<Volume<bool>>,
        colormap: Colormap,
        alpha: Alpha,
    ) -> OpsResult<()> {
        trace!(%role, shape = ?data.shape(), colormap = colormap.name(), "Blender::set_channel");
        if let Some(expected) = self.shape_excluding(role) {
            if expected != data.shape() {
                return Err(OpsError::ShapeMismatch {
                    expected,
                    got: data.shape(),
                });
            }
        }
        colormap.resolve_alpha(&alpha)?;

        let norm = Norm::from_data(&data, mask.as_ref());
        self.channels.insert(
            role,
            Channel {
                data,
                mask,
                colormap,
                alpha,
                norm,
                enabled: true,
            },
        );
        if role == ChannelRole::Main {
            self.main_generation += 1;
        }
        self.touch();
        Ok(())
    }

    /// Removes a channel, returning it.
    pub fn remove_channel(&mut self, role: ChannelRole) -> Option<Channel> {
        let removed = self.channels.remove(&role);
        if removed.is_some() {
            if role == ChannelRole::Main {
                self.main_generation += 1;
            }
            self.touch();
        }
        removed
    }

    /// Replaces a channel's alpha.
    ///
    /// # Errors
    ///
    /// [`OpsError::MissingChannel`] for an unregistered role, or a colormap
    /// error if the alpha does not fit.
    pub fn set_alpha(&mut self, role: ChannelRole, alpha: impl Into<Alpha>) -> OpsResult<()> {
        let alpha = alpha.into();
        let ch = self.channel_mut(role)?;
        ch.colormap.resolve_alpha(&alpha)?;
        ch.alpha = alpha;
        self.touch();
        Ok(())
    }

    /// Replaces a channel's colormap.
    ///
    /// # Errors
    ///
    /// [`OpsError::MissingChannel`] for an unregistered role, or a colormap
    /// error if the current alpha curve does not fit the new table.
    pub fn set_colormap(&mut self, role: ChannelRole, colormap: Colormap) -> OpsResult<()> {
        let ch = self.channel_mut(role)?;
        colormap.resolve_alpha(&ch.alpha)?;
        ch.colormap = colormap;
        self.touch();
        Ok(())
    }

    /// Replaces a channel's normalization range.
    ///
    /// # Errors
    ///
    /// [`OpsError::MissingChannel`] for an unregistered role.
    pub fn set_norm(&mut self, role: ChannelRole, norm: Norm) -> OpsResult<()> {
        self.channel_mut(role)?.norm = norm;
        self.touch();
        Ok(())
    }

    /// Shows or hides a channel in the composite.
    ///
    /// # Errors
    ///
    /// [`OpsError::MissingChannel`] for an unregistered role.
    pub fn set_enabled(&mut self, role: ChannelRole, enabled: bool) -> OpsResult<()> {
        let ch = self.channel_mut(role)?;
        if ch.enabled != enabled {
            ch.enabled = enabled;
            self.touch();
        }
        Ok(())
    }

    /// Registered channel for `role`.
    pub fn channel(&self, role: ChannelRole) -> Option<&Channel> {
        self.channels.get(&role)
    }

    /// Registered roles in compositing order.
    pub fn roles(&self) -> impl Iterator<Item = ChannelRole> + '_ {
        self.channels.keys().copied()
    }

    /// Shared grid of the registered channels.
    pub fn shape(&self) -> Option<Shape> {
        self.channels.values().next().map(|c| c.data.shape())
    }

    /// Mutation counter; changes whenever the composite would.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Colors of one channel alone.
    ///
    /// # Errors
    ///
    /// [`OpsError::MissingChannel`] for an unregistered role.
    pub fn channel_colors(&self, role: ChannelRole) -> OpsResult<Volume<Rgba>> {
        self.channel(role)
            .ok_or(OpsError::MissingChannel(role))?
            .colors()
    }

    /// Composited RGBA volume.
    ///
    /// Cached until the next mutation, so repeated calls return the same
    /// buffer.
    ///
    /// # Errors
    ///
    /// [`OpsError::EmptyComposition`] when no channel is registered.
    pub fn composite(&mut self) -> OpsResult<&Volume<Rgba>> {
        let shape = self.shape().ok_or(OpsError::EmptyComposition)?;
        let fresh = matches!(&self.composite, Some((g, _)) if *g == self.generation);
        if !fresh {
            debug!(generation = self.generation, ?shape, "rebuilding composite");
            let mut out = Volume::filled(shape, TRANSPARENT)?;
            for ch in self.channels.values().filter(|c| c.enabled) {
                over_inplace(&mut out, &ch.colors()?)?;
            }
            self.composite = Some((self.generation, out));
        }
        match &self.composite {
            Some((_, vol)) => Ok(vol),
            None => Err(OpsError::EmptyComposition),
        }
    }

    /// Byte form of [`Blender::composite`].
    ///
    /// # Errors
    ///
    /// As [`Blender::composite`].
    pub fn composite_bytes(&mut self) -> OpsResult<Volume<Rgba8>> {
        self.composite().map(volume_to_bytes)
    }

    /// Composited color at one voxel, `None` outside the grid.
    ///
    /// # Errors
    ///
    /// As [`Blender::composite`].
    pub fn color_at(&mut self, ijk: [usize; 3]) -> OpsResult<Option<Rgba>> {
        Ok(self.composite()?.get(ijk).copied())
    }

    /// Surface mask of the main channel.
    ///
    /// Cached per main-channel data and parameters.
    ///
    /// # Errors
    ///
    /// [`OpsError::MissingChannel`] without a main channel, or
    /// [`OpsError::InvalidParameter`] for invalid options.
    pub fn derive_surface_mask(
        &mut self,
        strategy: &ThresholdStrategy,
        options: &MaskOptions,
    ) -> OpsResult<&Volume<u8>> {
        let main = self
            .channels
            .get(&ChannelRole::Main)
            .ok_or(OpsError::MissingChannel(ChannelRole::Main))?;
        let fresh = matches!(&self.mask, Some(c)
            if c.main_generation == self.main_generation
                && c.strategy == *strategy
                && c.options == *options);
        if !fresh {
            debug!(main_generation = self.main_generation, "rebuilding surface mask");
            let samples: Vec<f32> = match &main.mask {
                Some(m) => main
                    .data
                    .iter()
                    .zip(m.iter())
                    .filter(|(_, masked)| !**masked)
                    .map(|(v, _)| *v)
                    .collect(),
                None => main.data.data().to_vec(),
            };
            let threshold = strategy.threshold(&samples);
            let mask = surface_mask(&main.data, threshold, options)?;
            self.mask = Some(MaskCache {
                main_generation: self.main_generation,
                strategy: *strategy,
                options: *options,
                threshold,
                mask,
            });
        }
        match &self.mask {
            Some(c) => Ok(&c.mask),
            None => Err(OpsError::MissingChannel(ChannelRole::Main)),
        }
    }

    /// Threshold used by the cached surface mask.
    pub fn surface_threshold(&self) -> Option<f32> {
        self.mask.as_ref().map(|c| c.threshold)
    }

    fn channel_mut(&mut self, role: ChannelRole) -> OpsResult<&mut Channel> {
        self.channels
            .get_mut(&role)
            .ok_or(OpsError::MissingChannel(role))
    }

    fn shape_excluding(&self, role: ChannelRole) -> Option<Shape> {
        self.channels
            .iter()
            .find(|(r, _)| **r != role)
            .map(|(_, c)| c.data.shape())
    }

    fn touch(&mut self) {
        self.generation += 1;
    }
}
