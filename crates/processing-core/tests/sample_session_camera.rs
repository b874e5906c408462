use std::path::PathBuf;

use reelcast_common::clock::FrameRate;
use reelcast_processing_core::{CameraPath, CursorTrack, ZoomTimeline, TRANSITION_FRAMES};
use reelcast_project_model::cursor::CursorKind;
use reelcast_project_model::session::Session;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-session")
}

fn load_fixture() -> (CursorTrack, ZoomTimeline) {
    let dir = fixture_dir();
    let session = Session::load(dir.join("cursor.json"), dir.join("effects.json"))
        .expect("fixture session should load");
    assert!(session.validate().is_empty(), "{:?}", session.validate());

    let mut track = CursorTrack::new(FrameRate::new(30.0).unwrap());
    track.load(session.track);
    let timeline = ZoomTimeline::new(&session.effects.zoom);
    (track, timeline)
}

#[test]
fn sample_session_track_spans_four_seconds() {
    let (track, _) = load_fixture();
    assert_eq!(track.len(), 81);
    assert_eq!(track.duration_ms(), 4_000);
    assert_eq!(track.frame_count(), 120);

    assert_eq!(track.position_at_frame(0).kind, CursorKind::Arrow);
    assert_eq!(track.position_at_frame(60).kind, CursorKind::Pointer);
    assert_eq!(track.position_at_frame(119).kind, CursorKind::Text);
}

#[test]
fn sample_session_camera_follows_layers() {
    let (track, timeline) = load_fixture();
    assert!(timeline.warnings().is_empty());

    let path = CameraPath::compute(&timeline, &track, track.frame_count());
    assert_eq!(path.len(), 120);

    // Manual layer 0..=45.
    assert!((path.at(0).scale - 1.0).abs() < 1e-9);
    assert!((path.at(TRANSITION_FRAMES).scale - 1.8).abs() < 1e-9);
    assert_eq!(path.at(20).target_x, 0.3);
    assert!((path.at(45).scale - 1.0).abs() < 1e-9);

    // Gap between layers.
    for frame in 46..50 {
        assert!(path.at(frame).is_identity(), "frame {frame}");
    }

    // Auto layer 50..=119 leans toward the cursor, which sits up and to the right.
    let mid = path.at(85);
    assert!(mid.scale > 1.0 && mid.scale <= 2.5);
    assert!(mid.target_x > 0.5);
    assert!(mid.target_y < 0.5);
    assert!((path.at(119).scale - 1.0).abs() < 0.05);

    assert!(path.peak_scale() <= 2.5);
}

#[test]
fn sample_session_camera_path_is_deterministic() {
    let (track, timeline) = load_fixture();
    let first = CameraPath::compute(&timeline, &track, 120);
    let second = CameraPath::compute(&timeline, &track, 120);

    let first = serde_json::to_string(&first).expect("path should serialize");
    let second = serde_json::to_string(&second).expect("path should serialize");
    assert_eq!(first, second);
}
