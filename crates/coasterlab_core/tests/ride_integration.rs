//! Integration tests for the ride pipeline
//!
//! These tests go through the same steps as the demos:
//! 1. Curve file loading and subdivision feed the coaster
//! 2. Editing the curve rebuilds the ride
//! 3. Rig files load, instantiate and simulate on a fixed timestep

use coasterlab_core::{
    CoasterRide, CurveEditor, FixedTimestep, OrbitCamera, RigTemplate, SpeedMode, ViewMode,
};
use coasterlab_input::OrbitControl;
use coasterlab_math::curve_io::{load_curve, parse_curve, save_curve};
use coasterlab_math::{Curve, Vec3};

const HILL: &str = "\
# 4 points
0 8 0
20 0 0
20 0 20
0 0 20
# closed
";

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("coasterlab_{}_{}", std::process::id(), name))
}

// ==================== Curve -> Ride ====================

/// A curve written to disk, read back and smoothed can be ridden for several laps
#[test]
fn test_ride_on_loaded_subdivided_curve() {
    let path = temp_path("hill.curve");
    save_curve(&path, &parse_curve(HILL).unwrap()).unwrap();
    let curve = load_curve(&path).unwrap().subdivided(3);
    let _ = std::fs::remove_file(&path);

    assert!(curve.closed);
    assert_eq!(curve.len(), 4 * 8);

    let mut ride = CoasterRide::new(&curve, SpeedMode::default()).unwrap();
    let length = ride.track_length();
    assert!(length > 0.0 && length < Curve::closed(parse_curve(HILL).unwrap().points).length());

    let mut timestep = FixedTimestep::new(1.0 / 120.0);
    let mut fastest = 0.0f32;
    for _ in 0..2000 {
        for _ in 0..timestep.advance(1.0 / 60.0) {
            ride.update(timestep.step());
            fastest = fastest.max(ride.speed());
        }
        assert!(ride.distance() >= 0.0 && ride.distance() < length);
    }

    assert!(ride.laps() >= 1, "expected at least one lap, got {}", ride.laps());
    // Gravity mode: the train is faster in the dip than the minimum
    assert!(fastest > 5.0, "fastest speed {}", fastest);
}

/// Cars stay on the track and keep an orthonormal frame everywhere
#[test]
fn test_car_frames_are_orthonormal() {
    let curve = parse_curve(HILL).unwrap().subdivided(2);
    let mut ride = CoasterRide::new(&curve, SpeedMode::Constant { speed: 3.0 }).unwrap();

    for _ in 0..50 {
        ride.update(0.37);
        for frame in ride.car_frames(4, 1.5, Vec3::Y) {
            assert!((frame.tangent.length() - 1.0).abs() < 1e-3);
            assert!((frame.normal.length() - 1.0).abs() < 1e-3);
            assert!(frame.tangent.dot(frame.normal).abs() < 1e-3);
            assert!(frame.binormal.dot(frame.tangent).abs() < 1e-3);
        }
    }
}

// ==================== Editor -> Ride ====================

/// Edits bump the revision, and the ride picks up the new track length
#[test]
fn test_editor_changes_rebuild_ride() {
    let mut editor = CurveEditor::new(parse_curve(HILL).unwrap());
    let mut ride = CoasterRide::new(editor.curve(), SpeedMode::Constant { speed: 1.0 }).unwrap();
    let before = ride.track_length();
    let mut seen = editor.revision();

    editor.select_nearest(Vec3::new(20.0, 0.0, 20.0), 1.0);
    assert_eq!(editor.selected(), Some(2));
    editor.move_selected(Vec3::new(10.0, 0.0, 10.0));

    if editor.revision() != seen {
        seen = editor.revision();
        ride.rebuild(editor.curve()).unwrap();
    }
    assert!(ride.track_length() > before);

    editor.undo();
    assert_ne!(editor.revision(), seen);
    ride.rebuild(editor.curve()).unwrap();
    assert!((ride.track_length() - before).abs() < 1e-3);

    // Deleting down to nothing leaves a track the ride refuses
    editor.select(Some(0));
    while editor.delete_selected() {}
    assert!(ride.rebuild(editor.curve()).is_err());
}

// ==================== Cameras ====================

/// Framing the track puts the orbit camera outside it, looking at its center
#[test]
fn test_orbit_camera_frames_track() {
    let curve = parse_curve(HILL).unwrap();
    let bounds = curve.bounds().unwrap();
    let mut camera = OrbitCamera::default();
    camera.frame_bounds(bounds.center(), bounds.extent().length() * 0.5);

    assert_eq!(camera.target(), bounds.center());
    assert!(!bounds.contains(camera.eye()));
    assert_eq!(ViewMode::Orbit.next(), ViewMode::Ride);
}

// ==================== Rigs ====================

/// A rig saved to disk loads back identically and hangs from its anchor
#[test]
fn test_rig_file_round_trip_and_simulation() {
    let mut rig = RigTemplate::new("hanging chain");
    rig.config.drag = 0.5;
    rig.config.floor = Some(-4.0);
    let mut previous = rig.add_particle(Vec3::ZERO, 0.2, true);
    for i in 1..6 {
        let next = rig.add_particle(Vec3::new(i as f32 * 0.5, 0.0, 0.0), 0.2, false);
        rig.add_spring(previous, next, 80.0, 0.5);
        previous = next;
    }

    let path = temp_path("chain.ron");
    rig.save(&path).unwrap();
    let loaded = RigTemplate::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, rig);

    let (mut system, keys) = loaded.instantiate().unwrap();
    let mut timestep = FixedTimestep::new(0.001);
    for _ in 0..600 {
        for _ in 0..timestep.advance(1.0 / 60.0) {
            system.step(timestep.step());
        }
    }

    assert_eq!(system.particle(keys[0]).unwrap().position, Vec3::ZERO);
    let tip = system.particle(keys[5]).unwrap().position;
    assert!(tip.is_finite());
    // Settled under the anchor, stretched a little past its 2.5 rest length
    assert!(tip.y < -2.0, "chain tip should hang down, got {:?}", tip);
    assert!(tip.y >= -4.0);
    assert!(tip.x.abs() < 0.5);
}
