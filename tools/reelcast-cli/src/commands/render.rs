//! Render a session to an image sequence.

use std::io::Write;
use std::path::PathBuf;

use reelcast_common::config::AppConfig;
use reelcast_render_engine::{render_session, ProgressCallback, RenderJob, RenderStage};

use crate::SessionArgs;

pub fn run(
    config: &AppConfig,
    session: SessionArgs,
    frames: PathBuf,
    output: PathBuf,
    fps: Option<f64>,
    sprites: Option<PathBuf>,
    max_frames: Option<u64>,
) -> anyhow::Result<()> {
    let job = RenderJob {
        frames_dir: frames,
        cursor_path: session.cursor_data,
        config_path: session.zoom_config,
        output_dir: output,
        sprites_dir: sprites.unwrap_or_else(|| config.sprites_dir.clone()),
        fps: fps.unwrap_or(config.render.fallback_fps),
        max_frames,
        progress_every_frames: config.render.progress_every_frames,
    };

    println!("Rendering frames from: {}", job.frames_dir.display());
    println!("  Output: {}", job.output_dir.display());
    println!("  Sprites: {}", job.sprites_dir.display());
    println!("  FPS: {}", job.fps);

    let progress_cb: ProgressCallback = Box::new(|p| {
        if p.stage == RenderStage::Rendering {
            match p.total_frames {
                Some(total) => print!(
                    "\r  Progress: {:.1}% ({}/{} frames, ETA: {:.0}s)  ",
                    p.progress * 100.0,
                    p.frames_rendered,
                    total,
                    p.eta_secs,
                ),
                None => print!("\r  Frames: {}  ", p.frames_rendered),
            }
            std::io::stdout().flush().ok();
        }
    });

    let summary = render_session(&job, Some(progress_cb))?;

    println!(
        "\nRender complete: {} frames in {:.1}s",
        summary.frames_rendered, summary.elapsed_secs
    );
    if !summary.sprites_missing.is_empty() {
        println!(
            "  Missing cursor sprites (drawn as arrow): {}",
            summary.sprites_missing.join(", ")
        );
    }
    for warning in &summary.layer_warnings {
        println!("  Warning: {warning}");
    }

    Ok(())
}
