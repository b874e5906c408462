//! Show session information.

use std::collections::BTreeMap;

use serde::Serialize;

use reelcast_common::clock::FrameRate;
use reelcast_processing_core::{CameraPath, CursorTrack, ZoomTimeline};
use reelcast_project_model::cursor::CursorKind;

use crate::SessionArgs;

/// Most frames whose camera state `info` evaluates; about 9 hours at 30fps.
const MAX_ANALYZED_FRAMES: u64 = 1_000_000;

#[derive(Debug, Serialize)]
struct SessionInfo {
    samples: usize,
    duration_ms: u64,
    fps: f64,
    frames: u64,
    cursor_kinds: BTreeMap<String, usize>,
    layers: Vec<LayerInfo>,
    zoomed_frames: usize,
    peak_scale: f64,
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LayerInfo {
    kind: &'static str,
    start_frame: u64,
    end_frame: u64,
}

pub fn run(args: SessionArgs, fps: f64, json: bool) -> anyhow::Result<()> {
    let session = super::load_session(&args)?;
    let fps = FrameRate::new_or_fallback(fps);

    let mut cursor_kinds = BTreeMap::new();
    for sample in &session.track.positions {
        *cursor_kinds.entry(kind_label(sample.kind)).or_insert(0) += 1;
    }

    let layers = session
        .effects
        .zoom
        .layers()
        .map(|layer| LayerInfo {
            kind: layer.kind_name(),
            start_frame: *layer.frames().start(),
            end_frame: *layer.frames().end(),
        })
        .collect::<Vec<_>>();

    let mut track = CursorTrack::new(fps);
    track.load(session.track.clone());
    let timeline = ZoomTimeline::new(&session.effects.zoom);

    let frames = session_frames(track.frame_count(), session.effects.zoom.last_layer_frame());
    let analyzed = frames.min(MAX_ANALYZED_FRAMES);
    let path = CameraPath::compute(&timeline, &track, analyzed);

    let mut warnings: Vec<String> = timeline.warnings().iter().map(ToString::to_string).collect();
    if analyzed < frames {
        warnings.push(format!(
            "Camera stats cover only the first {analyzed} of {frames} frames"
        ));
    }

    let info = SessionInfo {
        samples: track.len(),
        duration_ms: track.duration_ms(),
        fps: fps.fps(),
        frames,
        cursor_kinds,
        layers,
        zoomed_frames: path.iter().filter(|e| !e.is_identity()).count(),
        peak_scale: path.peak_scale(),
        warnings,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Cursor track: {}", args.cursor_data.display());
    println!("  Samples: {}", info.samples);
    println!(
        "  Duration: {:.2}s ({} frames @ {}fps)",
        info.duration_ms as f64 / 1000.0,
        info.frames,
        info.fps
    );
    for (kind, count) in &info.cursor_kinds {
        println!("  {kind}: {count}");
    }
    println!();

    println!("Zoom: {}", args.zoom_config.display());
    println!("  Mode: {:?}", session.effects.zoom.mode);
    for layer in &info.layers {
        println!(
            "  {} layer: frames {}..={}",
            layer.kind, layer.start_frame, layer.end_frame
        );
    }
    println!(
        "  Zoomed frames: {} (peak scale {:.2})",
        info.zoomed_frames, info.peak_scale
    );
    for warning in &info.warnings {
        println!("  Warning: {warning}");
    }
    println!();

    let bg = &session.effects.background;
    println!("Background:");
    println!("  Color: #{:06X}", bg.color_argb & 0x00FF_FFFF);
    println!("  Corner radius: {}px", bg.corner_radius_px);
    println!("  Content scale: {}", bg.content_scale);

    Ok(())
}

fn kind_label(kind: CursorKind) -> String {
    format!("{kind:?}")
}

/// Frames spanned by the track or any zoom layer, whichever ends later.
fn session_frames(track_frames: u64, last_layer_frame: Option<u64>) -> u64 {
    let layer_frames = last_layer_frame.map_or(0, |f| f.saturating_add(1));
    track_frames.max(layer_frames)
}
