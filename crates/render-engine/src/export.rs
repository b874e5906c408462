//! Render jobs and the image-sequence host loop.
//!
//! Video containers are not handled here: frames come from numbered image
//! files in a directory and are written back the same way, ready for an
//! external encoder.

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::RgbImage;
use serde::Serialize;

use reelcast_common::clock::FrameRate;
use reelcast_common::error::{ReelcastError, ReelcastResult};
use reelcast_processing_core::CursorTrack;
use reelcast_project_model::session::Session;

use crate::compositor::FrameCompositor;
use crate::cursor::{CursorRenderer, SpriteLoadReport};

/// A render job ready to run.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Directory of decoded source frames.
    pub frames_dir: PathBuf,

    /// Cursor track document.
    pub cursor_path: PathBuf,

    /// Effect configuration document.
    pub config_path: PathBuf,

    /// Directory the composed frames are written to.
    pub output_dir: PathBuf,

    /// Directory holding the cursor artwork.
    pub sprites_dir: PathBuf,

    /// Video frame rate.
    pub fps: f64,

    /// Stop after this many frames.
    pub max_frames: Option<u64>,

    /// Log progress every N frames (0 disables).
    pub progress_every_frames: u64,
}

/// Progress callback for rendering.
pub type ProgressCallback = Box<dyn Fn(RenderProgress) + Send>;

/// Render progress report.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    /// Current progress [0.0, 1.0]. Zero while the total is unknown.
    pub progress: f64,

    /// Frames rendered so far.
    pub frames_rendered: u64,

    /// Total frames to render, if known.
    pub total_frames: Option<u64>,

    /// Estimated time remaining in seconds.
    pub eta_secs: f64,

    /// Current stage.
    pub stage: RenderStage,
}

/// Stages of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Preparing,
    Rendering,
    Complete,
}

/// What a finished render produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSummary {
    pub frames_rendered: u64,
    pub output_dir: PathBuf,
    pub elapsed_secs: f64,
    pub fps: f64,
    pub sprites_missing: Vec<String>,
    pub layer_warnings: Vec<String>,
}

/// File name of the summary written next to the output frames.
pub const SUMMARY_FILE: &str = "render.json";

/// A stream of decoded frames of fixed dimensions.
pub trait FrameSource {
    /// Number of frames, when known up front.
    fn frame_count(&self) -> Option<u64>;

    /// Next frame, or `None` at the end of the stream.
    fn next_frame(&mut self) -> ReelcastResult<Option<RgbImage>>;
}

/// A consumer of composed frames.
pub trait FrameSink {
    fn write_frame(&mut self, frame_index: u64, frame: &RgbImage) -> ReelcastResult<()>;

    /// Called once after the last frame.
    fn finish(&mut self) -> ReelcastResult<()> {
        Ok(())
    }
}

/// Numbered PNG/JPEG files read in file-name order.
#[derive(Debug, Clone)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
    dimensions: Option<(u32, u32)>,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path) -> ReelcastResult<Self> {
        if !dir.is_dir() {
            return Err(ReelcastError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut paths = vec![];
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_frame_file(&path) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if paths.is_empty() {
            return Err(ReelcastError::data(format!(
                "No PNG or JPEG frames in {}",
                dir.display()
            )));
        }

        tracing::debug!(dir = %dir.display(), frames = paths.len(), "Opened image sequence");
        Ok(Self {
            paths,
            next: 0,
            dimensions: None,
        })
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn frame_count(&self) -> Option<u64> {
        Some(self.paths.len() as u64)
    }

    fn next_frame(&mut self) -> ReelcastResult<Option<RgbImage>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;

        let frame = image::open(path)?.to_rgb8();
        match self.dimensions {
            None => self.dimensions = Some(frame.dimensions()),
            Some(dims) if dims != frame.dimensions() => {
                return Err(ReelcastError::render(format!(
                    "{} is {:?}, expected {:?}",
                    path.display(),
                    frame.dimensions(),
                    dims
                )));
            }
            Some(_) => {}
        }
        Ok(Some(frame))
    }
}

/// Writes `frame_000000.png`, `frame_000001.png`, ...
#[derive(Debug, Clone)]
pub struct ImageSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl ImageSequenceSink {
    pub fn create(dir: &Path) -> ReelcastResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            written: 0,
        })
    }

    pub fn frame_path(&self, frame_index: u64) -> PathBuf {
        self.dir.join(format!("frame_{frame_index:06}.png"))
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for ImageSequenceSink {
    fn write_frame(&mut self, frame_index: u64, frame: &RgbImage) -> ReelcastResult<()> {
        frame.save(self.frame_path(frame_index))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> ReelcastResult<()> {
        tracing::debug!(dir = %self.dir.display(), frames = self.written, "Image sequence written");
        Ok(())
    }
}

/// Build a compositor from a job's inputs.
///
/// Malformed cursor or effect documents fail here. Missing sprites only
/// warn; the fallback cursor is drawn instead.
pub fn prepare_compositor(job: &RenderJob) -> ReelcastResult<(FrameCompositor, SpriteLoadReport)> {
    let session = Session::load(&job.cursor_path, &job.config_path)
        .map_err(|e| ReelcastError::data(e.to_string()))?;
    for issue in session.validate() {
        tracing::warn!(%issue, "Session check");
    }

    let mut track = CursorTrack::new(FrameRate::new(job.fps)?);
    track.load(session.track);

    let mut renderer = CursorRenderer::new(session.effects.cursor);
    let report = renderer.load_sprites(&job.sprites_dir);
    if let Some(err) = report.to_error() {
        tracing::warn!(error = %err, "Rendering with fallback cursor");
    }

    let compositor = FrameCompositor::new(track, renderer, &session.effects);
    Ok((compositor, report))
}

/// Run a render job.
///
/// This is the main entry point for rendering.
pub fn render_session(
    job: &RenderJob,
    progress: Option<ProgressCallback>,
) -> ReelcastResult<RenderSummary> {
    tracing::info!(
        frames = %job.frames_dir.display(),
        output = %job.output_dir.display(),
        fps = job.fps,
        "Starting render"
    );

    if let Some(cb) = &progress {
        cb(RenderProgress {
            progress: 0.0,
            frames_rendered: 0,
            total_frames: None,
            eta_secs: 0.0,
            stage: RenderStage::Preparing,
        });
    }

    let (mut compositor, sprites) = prepare_compositor(job)?;
    let mut source = ImageSequenceSource::open(&job.frames_dir)?;
    let mut sink = ImageSequenceSink::create(&job.output_dir)?;

    let stats = render_frames(
        &mut compositor,
        &mut source,
        &mut sink,
        job.max_frames,
        job.progress_every_frames,
        progress.as_ref(),
    )?;

    let summary = RenderSummary {
        frames_rendered: stats.frames,
        output_dir: job.output_dir.clone(),
        elapsed_secs: stats.elapsed_secs,
        fps: job.fps,
        sprites_missing: sprites
            .failed
            .iter()
            .map(|(kind, _)| format!("{kind:?}"))
            .collect(),
        layer_warnings: compositor
            .timeline()
            .warnings()
            .iter()
            .map(ToString::to_string)
            .collect(),
    };
    std::fs::write(
        job.output_dir.join(SUMMARY_FILE),
        serde_json::to_string_pretty(&summary)?,
    )?;
    Ok(summary)
}

/// Frames processed by [`render_frames`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopStats {
    pub frames: u64,
    pub elapsed_secs: f64,
}

/// Pull every frame from `source`, compose it, and push it to `sink`.
///
/// Frames are processed strictly in order.
pub fn render_frames(
    compositor: &mut FrameCompositor,
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    max_frames: Option<u64>,
    progress_every_frames: u64,
    progress: Option<&ProgressCallback>,
) -> ReelcastResult<LoopStats> {
    let started = Instant::now();
    let total_frames = match (source.frame_count(), max_frames) {
        (Some(n), Some(max)) => Some(n.min(max)),
        (Some(n), None) => Some(n),
        (None, max) => max,
    };

    let mut frame_index = 0u64;
    while max_frames.map_or(true, |max| frame_index < max) {
        let Some(frame) = source.next_frame()? else {
            break;
        };

        let composed = compositor.compose(frame_index, &frame);
        sink.write_frame(frame_index, &composed)?;
        frame_index += 1;

        let report = progress_report(
            frame_index,
            total_frames,
            started.elapsed().as_secs_f64(),
            RenderStage::Rendering,
        );
        if progress_every_frames > 0 && frame_index % progress_every_frames == 0 {
            tracing::info!(
                frames = frame_index,
                total = ?total_frames,
                percent = (report.progress * 1000.0).round() / 10.0,
                eta_secs = report.eta_secs.round(),
                "Render progress"
            );
        }
        if let Some(cb) = progress {
            cb(report);
        }
    }

    sink.finish()?;
    let elapsed_secs = started.elapsed().as_secs_f64();

    if let Some(cb) = progress {
        cb(progress_report(
            frame_index,
            Some(frame_index),
            elapsed_secs,
            RenderStage::Complete,
        ));
    }
    tracing::info!(frames = frame_index, elapsed_secs, "Render complete");

    Ok(LoopStats {
        frames: frame_index,
        elapsed_secs,
    })
}

fn progress_report(
    frames_rendered: u64,
    total_frames: Option<u64>,
    elapsed_secs: f64,
    stage: RenderStage,
) -> RenderProgress {
    let progress = match total_frames {
        Some(total) if total > 0 => (frames_rendered as f64 / total as f64).clamp(0.0, 1.0),
        _ => 0.0,
    };
    let eta_secs = if progress > 0.0 {
        (elapsed_secs / progress) - elapsed_secs
    } else {
        0.0
    }
    .max(0.0);

    RenderProgress {
        progress,
        frames_rendered,
        total_frames,
        eta_secs,
        stage,
    }
}
