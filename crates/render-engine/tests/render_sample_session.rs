use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use reelcast_project_model::cursor::CursorKind;
use reelcast_render_engine::sprite::sprite_file_name;
use reelcast_render_engine::{
    render_session, ProgressCallback, RenderJob, RenderProgress, RenderStage, SUMMARY_FILE,
};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-session")
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("reelcast-it-{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}

fn write_frames(dir: &PathBuf, count: u32) {
    for i in 0..count {
        RgbImage::from_fn(64, 36, |x, y| Rgb([(x * 4) as u8, (y * 7) as u8, (i * 2) as u8]))
            .save(dir.join(format!("{i:04}.png")))
            .expect("frame should save");
    }
}

fn job(name: &str, sprites_dir: PathBuf, frames: u32) -> RenderJob {
    let root = scratch(name);
    let frames_dir = root.join("frames");
    std::fs::create_dir_all(&frames_dir).unwrap();
    write_frames(&frames_dir, frames);

    RenderJob {
        frames_dir,
        cursor_path: fixture_dir().join("cursor.json"),
        config_path: fixture_dir().join("effects.json"),
        output_dir: root.join("out"),
        sprites_dir,
        fps: 30.0,
        max_frames: None,
        progress_every_frames: 10,
    }
}

#[test]
fn renders_sample_session_with_fallback_only_sprites() {
    let sprites = scratch("sprites-arrow-only");
    RgbaImage::from_pixel(20, 32, Rgba([250, 250, 250, 255]))
        .save(sprites.join(sprite_file_name(CursorKind::Arrow)))
        .unwrap();

    let job = job("fallback", sprites, 12);
    let stages = Arc::new(Mutex::new(vec![]));
    let seen = Arc::clone(&stages);
    let callback: ProgressCallback =
        Box::new(move |p: RenderProgress| seen.lock().unwrap().push(p.stage));
    let summary = render_session(&job, Some(callback)).expect("render should succeed");

    assert_eq!(summary.frames_rendered, 12);
    assert_eq!(summary.sprites_missing.len(), CursorKind::ALL.len() - 1);
    assert!(summary.layer_warnings.is_empty());

    for i in 0..12 {
        let out = image::open(job.output_dir.join(format!("frame_{i:06}.png")))
            .expect("output frame should exist")
            .to_rgb8();
        assert_eq!(out.dimensions(), (64, 36));
    }
    assert!(job.output_dir.join(SUMMARY_FILE).exists());

    let stages = stages.lock().unwrap();
    assert_eq!(stages.first(), Some(&RenderStage::Preparing));
    assert_eq!(stages.last(), Some(&RenderStage::Complete));
}

#[test]
fn malformed_cursor_track_fails_before_rendering() {
    let mut job = job("malformed", scratch("sprites-none"), 2);
    let bad = job.output_dir.with_file_name("bad_cursor.json");
    std::fs::write(&bad, r#"{"positions":[{"x":"left","y":0.5,"timestamp":0,"cursorType":65539}]}"#)
        .unwrap();
    job.cursor_path = bad;

    let err = render_session(&job, None).expect_err("render should fail");
    assert!(err.is_fatal());
    assert!(!job.output_dir.join("frame_000000.png").exists());
}

#[test]
fn missing_sprites_still_render() {
    let job = job("no-sprites", scratch("sprites-empty"), 3);
    let summary = render_session(&job, None).expect("render should succeed");
    assert_eq!(summary.frames_rendered, 3);
    assert_eq!(summary.sprites_missing.len(), CursorKind::ALL.len());
}
