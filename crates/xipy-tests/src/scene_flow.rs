//! Scene workflows: config file to scene, interaction round trips, and
//! overlay model synchronisation.

use approx::assert_abs_diff_eq;
use std::fs;
use tempfile::tempdir;
use xipy_core::Volume;
use xipy_math::{Affine, Vec3};
use xipy_ops::ChannelRole;
use xipy_scene::{
    Axis, CropMode, CutPlane, InteractionState, OrthoScene, OverlayModel, Phase, PlaneEvent,
    PositionOrigin, SceneConfig, SceneError, SceneEvent, phantom, three_plane_point,
};

/// Overlay model that records what it hears; tests play its replies.
#[derive(Default)]
struct RecordingModel {
    heard: Vec<Vec3>,
}

impl OverlayModel for RecordingModel {
    fn world_position_changed(&mut self, position: Vec3) {
        self.heard.push(position);
    }
}

fn scene_from_yaml(yaml: &str) -> OrthoScene {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.yaml");
    fs::write(&path, yaml).unwrap();
    OrthoScene::new(SceneConfig::load(&path).unwrap()).unwrap()
}

fn mni_like_affine() -> Affine {
    Affine::scaled(Vec3::splat(2.0), Vec3::new(-16.0, -16.0, -16.0))
}

#[test]
fn test_config_file_drives_scene() {
    let mut scene = scene_from_yaml(
        "table_size: 32\ncutout_mode: true\nerosion_iterations: 1\nthreshold_strategy: !fixed\n  value: 70.0\n",
    );
    assert_eq!(scene.registry().get("gray").unwrap().table_size(), 32);

    let events = scene
        .load_volume(phantom::head([32, 32, 32]).unwrap(), mni_like_affine())
        .unwrap();
    assert!(events.contains(&SceneEvent::CropChanged { mode: CropMode::Cutout }));

    let mask = scene.surface_mask().unwrap();
    assert_eq!(mask.shape(), [32, 32, 32]);
    assert_eq!(mask[[0, 0, 0]], 0);
    assert!(mask[[16, 16, 16]] > 127);
    assert_eq!(scene.blender().surface_threshold(), Some(70.0));
}

#[test]
fn test_bad_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.yaml");
    fs::write(&path, "table_size: 0\n").unwrap();
    assert!(matches!(SceneConfig::load(&path), Err(SceneError::Config(_))));
}

#[test]
fn test_position_sync_without_echo() {
    let mut scene = OrthoScene::new(SceneConfig::default()).unwrap();
    let mut model = RecordingModel::default();
    let events = scene
        .load_volume(phantom::head([16, 16, 16]).unwrap(), mni_like_affine())
        .unwrap();
    assert_eq!(OrthoScene::dispatch(&events, &mut model), 1);
    // Quarter extent: voxel (4, 4, 4) -> world (-8, -8, -8)
    assert_eq!(model.heard, vec![Vec3::splat(-8.0)]);

    // Cursor drag on the sagittal plane.
    let plane = *scene.planes().plane(Axis::X);
    let cursor = Vec3::new(4.0, 10.0, 12.0);
    for phase in [Phase::Start, Phase::Move] {
        let ev = PlaneEvent::cursor(Axis::X, phase, plane, cursor);
        assert!(scene.handle_plane_event(&ev).unwrap().is_empty());
    }
    let events = scene
        .handle_plane_event(&PlaneEvent::cursor(Axis::X, Phase::End, plane, cursor))
        .unwrap();
    assert_eq!(OrthoScene::dispatch(&events, &mut model), 1);
    let snapped = Vec3::new(-8.0, 4.0, 8.0);
    assert_eq!(model.heard.last(), Some(&snapped));
    assert!(scene.planes().is_axis_aligned());

    // The model answers; the scene follows but does not answer back.
    let reply = model.heard.last().copied().unwrap_or_default();
    let events = scene.set_world_position(reply);
    assert_eq!(OrthoScene::dispatch(&events, &mut model), 0);
    assert_eq!(model.heard.len(), 2);
    assert!(events.iter().any(|e| matches!(
        e,
        SceneEvent::PositionChanged { origin: PositionOrigin::External, .. }
    )));
}

#[test]
fn test_reorientation_round_trip() {
    let mut scene = OrthoScene::new(SceneConfig::default()).unwrap();
    scene
        .load_volume(phantom::head([16, 16, 16]).unwrap(), Affine::IDENTITY)
        .unwrap();
    let start = scene.position();

    // Tilt the axial plane 45 degrees about x, keeping it through `start`.
    let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
    let tilted = CutPlane::new(start + Vec3::new(0.0, 0.0, 2.0), normal);
    scene
        .handle_plane_event(&PlaneEvent::plane(Axis::Z, Phase::Start, tilted))
        .unwrap();
    assert_eq!(scene.interaction_state(), InteractionState::Reorienting(Axis::Z));
    let events = scene
        .handle_plane_event(&PlaneEvent::plane(Axis::Z, Phase::End, tilted))
        .unwrap();
    assert_eq!(scene.interaction_state(), InteractionState::Idle);

    let [x, y, z] = *scene.planes().planes();
    let expected =
        three_plane_point(x.normal, y.normal, z.normal, x.origin, y.origin, z.origin).unwrap();
    let published = events
        .iter()
        .find_map(|e| match e {
            SceneEvent::PositionChanged { position, .. } => Some(*position),
            _ => None,
        })
        .unwrap();
    assert!(published.abs_diff_eq(expected, 1e-12));
    // x and y planes are untouched, z moved along the tilted plane.
    assert_abs_diff_eq!(published.x, start.x, epsilon = 1e-12);
    assert_abs_diff_eq!(published.y, start.y, epsilon = 1e-12);
    assert_abs_diff_eq!(published.z, start.z + 2.0, epsilon = 1e-9);
}

#[test]
fn test_cutout_tracks_planes() {
    let mut scene = OrthoScene::new(SceneConfig::default()).unwrap();
    scene
        .load_volume(phantom::head([16, 16, 16]).unwrap(), Affine::IDENTITY)
        .unwrap();
    let events = scene.set_planes_visible(true);
    assert_eq!(events, vec![SceneEvent::CropChanged { mode: CropMode::Cutout }]);

    let probe_point = Vec3::splat(6.0);
    assert!(!scene.crop_geometry().keeps(probe_point));

    // Push the x plane past the probe point; the octant no longer holds it.
    let plane = CutPlane::axis_aligned(Axis::X, Vec3::splat(8.0));
    scene
        .handle_plane_event(&PlaneEvent::plane(Axis::X, Phase::Move, plane))
        .unwrap();
    assert!(scene.crop_geometry().keeps(probe_point));
}

#[test]
fn test_probe_after_overlay() {
    let mut scene = OrthoScene::new(SceneConfig::default()).unwrap();
    let shape = [16, 16, 16];
    scene
        .load_volume(phantom::head(shape).unwrap(), mni_like_affine())
        .unwrap();
    scene
        .set_overlay(phantom::activation(shape, [8.0, 8.0, 8.0], 2.0, 5.0).unwrap(), 0.7f32)
        .unwrap();

    // Voxel (8, 8, 8) sits at world (0, 0, 0).
    let sample = scene.probe(Vec3::ZERO).unwrap().unwrap();
    assert_eq!(sample.index, [8, 8, 8]);
    assert_eq!(sample.overlay, Some(5.0));
    assert!(sample.main.is_some_and(|v| v > 150.0));

    scene.set_enabled(ChannelRole::Overlay, false).unwrap();
    let hidden = scene.probe(Vec3::ZERO).unwrap().unwrap();
    assert_ne!(hidden.color, sample.color);
    assert!(scene.set_enabled(ChannelRole::Overlay, false).unwrap().is_empty());

    assert!(scene.probe(Vec3::splat(100.0)).unwrap().is_none());
}

#[test]
fn test_masked_overlay_shows_main() {
    let mut scene = OrthoScene::new(SceneConfig::default()).unwrap();
    let shape = [16, 16, 16];
    scene
        .load_volume(phantom::head(shape).unwrap(), mni_like_affine())
        .unwrap();
    let func = phantom::activation(shape, [8.0, 8.0, 8.0], 2.0, 5.0).unwrap();
    // Missing data in the x = 8 slab.
    let mask = Volume::from_fn(shape, |[i, _, _]| i == 8).unwrap();
    let events = scene.set_overlay_masked(func, mask, 0.8f32).unwrap();
    assert_eq!(events, vec![SceneEvent::ColorsInvalidated]);

    // Voxel (8, 8, 8) sits at world (0, 0, 0); (9, 8, 8) at (2, 0, 0).
    let missing = scene.probe(Vec3::ZERO).unwrap().unwrap();
    assert_eq!(missing.index, [8, 8, 8]);
    assert_eq!(missing.overlay, None);
    assert!(missing.main.is_some());
    let present = scene.probe(Vec3::new(2.0, 0.0, 0.0)).unwrap().unwrap();
    assert!(present.overlay.is_some());

    scene.set_enabled(ChannelRole::Overlay, false).unwrap();
    let main_only = scene.composite().unwrap()[[8, 8, 8]];
    for c in 0..4 {
        assert_abs_diff_eq!(missing.color[c], main_only[c], epsilon = 1e-5);
    }
    assert_ne!(scene.composite().unwrap()[[9, 8, 8]], present.color);
}
