//! Phantom pipeline command
//!
//! Loads a synthetic head with a functional blob, composites it, derives
//! the surface mask, and runs one cursor interaction plus one external
//! position update through the scene.

use crate::PhantomArgs;
use anyhow::{Context, Result, bail};
use tracing::{debug, info};
use xipy_math::{Affine, Vec3};
use xipy_scene::{
    Axis, OrthoScene, OverlayModel, Phase, PlaneEvent, SceneConfig, SceneEvent, phantom,
};

/// Overlay model that only records what it hears.
#[derive(Default)]
struct PositionLog {
    positions: Vec<Vec3>,
}

impl OverlayModel for PositionLog {
    fn world_position_changed(&mut self, position: Vec3) {
        debug!(?position, "overlay model notified");
        self.positions.push(position);
    }
}

pub fn run(args: PhantomArgs, config: SceneConfig, verbose: u8) -> Result<()> {
    if args.size < 4 {
        bail!("phantom size must be at least 4, got {}", args.size);
    }
    let shape = [args.size; 3];
    let half = args.size as f64 / 2.0;
    let affine = Affine::scaled(
        Vec3::splat(args.voxel_size),
        Vec3::splat(-half * args.voxel_size),
    );

    let anat = phantom::head(shape)?;
    let blob_center = [half * 1.2, half, half * 0.8];
    let func = phantom::activation(shape, blob_center, args.size as f64 / 10.0, 4.0)?;

    let mut scene = OrthoScene::new(config).context("Invalid scene config")?;
    let mut model = PositionLog::default();

    let events = scene.load_volume(anat, affine)?;
    OrthoScene::dispatch(&events, &mut model);
    scene.set_overlay(func, args.overlay_alpha)?;

    let opaque = scene
        .composite()?
        .iter()
        .filter(|rgba| rgba[3] > 0.0)
        .count();
    let inside = scene.surface_mask()?.iter().filter(|&&v| v > 127).count();
    let threshold = scene.blender().surface_threshold().unwrap_or(f32::NAN);
    info!(opaque, inside, threshold, "composited and masked");

    // Cursor drag on the axial plane, released over the blob.
    let plane = *scene.planes().plane(Axis::Z);
    let cursor = Vec3::from(blob_center);
    scene.handle_plane_event(&PlaneEvent::cursor(Axis::Z, Phase::Start, plane, cursor))?;
    let events = scene.handle_plane_event(&PlaneEvent::cursor(Axis::Z, Phase::End, plane, cursor))?;
    let forwarded = OrthoScene::dispatch(&events, &mut model);

    // The model answers with its own position; it must not come back.
    let external = scene.position() + Vec3::new(0.0, args.voxel_size, 0.0);
    let echoed = OrthoScene::dispatch(&scene.set_world_position(external), &mut model);
    if echoed != 0 {
        bail!("external position was echoed back to the overlay model");
    }

    let crop_events = scene.set_planes_visible(true);
    let mode = crop_events
        .iter()
        .find_map(|e| match e {
            SceneEvent::CropChanged { mode } => Some(*mode),
            _ => None,
        })
        .unwrap_or_else(|| scene.crop_mode());

    let probe = scene.probe(scene.position())?;

    println!("shape:          {:?}", shape);
    println!("opaque voxels:  {opaque}");
    println!("surface voxels: {inside} (threshold {threshold:.2})");
    println!("position:       {:.2} {:.2} {:.2}", external.x, external.y, external.z);
    println!("model updates:  {} ({} from interaction)", model.positions.len(), forwarded);
    println!("crop mode:      {mode}");
    if let Some(sample) = probe {
        println!(
            "probe:          ijk {:?} main {:?} overlay {:?}",
            sample.index, sample.main, sample.overlay
        );
        if verbose > 0 {
            println!("probe color:    {:?}", sample.color);
        }
    }
    Ok(())
}
