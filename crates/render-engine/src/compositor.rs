//! Frame compositor: background, cursor and camera for one frame.
//!
//! Frames must be composed in strictly increasing index order when the
//! compositor evaluates the zoom timeline itself ([`FrameCompositor::compose`]).
//! Hosts that render frames out of order or in parallel precompute a
//! [`CameraPath`] and call [`FrameCompositor::compose_with`].

use image::RgbImage;

use reelcast_processing_core::{CameraPath, CursorTrack, SmoothingState, ZoomTimeline};
use reelcast_project_model::cursor::CursorSample;
use reelcast_project_model::effects::{BackgroundStyle, EffectConfig};
use reelcast_project_model::viewport::ZoomEvaluation;

use crate::background;
use crate::camera;
use crate::cursor::CursorRenderer;

/// A single frame's composition instructions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameComposition {
    pub frame_index: u64,
    /// Frame start time in milliseconds.
    pub time_ms: f64,
    /// Cursor state, normalized to the source frame.
    pub cursor: CursorSample,
    /// Camera applied after the cursor is drawn.
    pub camera: ZoomEvaluation,
}

/// Orchestrates the per-frame pipeline.
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    timeline: ZoomTimeline,
    track: CursorTrack,
    renderer: CursorRenderer,
    background: BackgroundStyle,
    state: SmoothingState,
    last_frame: Option<u64>,
}

impl FrameCompositor {
    pub fn new(track: CursorTrack, renderer: CursorRenderer, effects: &EffectConfig) -> Self {
        let mut compositor = Self {
            timeline: ZoomTimeline::default(),
            track,
            renderer,
            background: BackgroundStyle::default(),
            state: SmoothingState::SEED,
            last_frame: None,
        };
        compositor.configure(effects);
        compositor
    }

    /// Apply a new effect configuration. Restarts the zoom smoothing.
    pub fn configure(&mut self, effects: &EffectConfig) {
        self.state = self.timeline.configure(&effects.zoom);
        self.renderer.set_style(effects.cursor);
        self.background = effects.background;
        self.last_frame = None;
    }

    pub fn timeline(&self) -> &ZoomTimeline {
        &self.timeline
    }

    pub fn smoothing_state(&self) -> SmoothingState {
        self.state
    }

    /// Evaluate the whole timeline once for frames `0..frame_count`.
    pub fn camera_path(&self, frame_count: u64) -> CameraPath {
        CameraPath::compute(&self.timeline, &self.track, frame_count)
    }

    /// Plan the next frame, advancing the zoom smoothing state.
    pub fn plan(&mut self, frame_index: u64) -> FrameComposition {
        if let Some(last) = self.last_frame {
            if frame_index <= last {
                tracing::warn!(
                    frame_index,
                    last_frame = last,
                    "Frame composed out of order; auto zoom smoothing assumes increasing frames"
                );
            }
        }
        self.last_frame = Some(frame_index);

        let cursor = self.track.position_at_frame(frame_index);
        let (camera, next) = self.timeline.evaluate(frame_index, &cursor, self.state);
        self.state = next;

        FrameComposition {
            frame_index,
            time_ms: self.track.frame_rate().frame_to_ms(frame_index),
            cursor,
            camera,
        }
    }

    /// Plan a frame from a precomputed camera path. Leaves the smoothing
    /// state untouched.
    pub fn plan_with(&self, frame_index: u64, path: &CameraPath) -> FrameComposition {
        FrameComposition {
            frame_index,
            time_ms: self.track.frame_rate().frame_to_ms(frame_index),
            cursor: self.track.position_at_frame(frame_index),
            camera: path.at(frame_index),
        }
    }

    /// Compose the next frame in sequence.
    pub fn compose(&mut self, frame_index: u64, frame: &RgbImage) -> RgbImage {
        let plan = self.plan(frame_index);
        self.render(&plan, frame)
    }

    /// Compose any frame using a precomputed camera path.
    pub fn compose_with(&self, frame_index: u64, frame: &RgbImage, path: &CameraPath) -> RgbImage {
        let plan = self.plan_with(frame_index, path);
        self.render(&plan, frame)
    }

    /// Execute a composition plan against a source frame.
    ///
    /// The output has the same dimensions as `frame`.
    pub fn render(&self, plan: &FrameComposition, frame: &RgbImage) -> RgbImage {
        let (mut canvas, content) = background::compose(frame, &self.background);

        let (x, y) = content.to_canvas(plan.cursor.x, plan.cursor.y);
        self.renderer.draw(&mut canvas, x, y, plan.cursor.kind, 1.0);

        camera::apply(&canvas, &plan.camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};
    use reelcast_common::clock::FrameRate;
    use reelcast_project_model::cursor::CursorKind;
    use reelcast_project_model::effects::{ManualZoomLayer, ZoomConfig};

    use crate::sprite::CursorSprite;

    fn effects(layers: Vec<ManualZoomLayer>) -> EffectConfig {
        EffectConfig {
            background: BackgroundStyle {
                color_argb: 0xFF00_0000,
                corner_radius_px: 0.0,
                padding_px: 0.0,
                content_scale: 1.0,
            },
            zoom: ZoomConfig {
                manual_layers: layers,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn renderer() -> CursorRenderer {
        let mut renderer = CursorRenderer::default();
        renderer.insert_sprite(
            CursorKind::Arrow,
            CursorSprite::new(
                RgbImage::from_pixel(16, 16, Rgb([255, 0, 0])),
                GrayImage::from_pixel(16, 16, Luma([255])),
            )
            .unwrap(),
        );
        renderer
    }

    fn track() -> CursorTrack {
        CursorTrack::from_samples(
            vec![CursorSample::new(0.5, 0.5, 0, CursorKind::Arrow)],
            FrameRate::default(),
        )
    }

    fn source() -> RgbImage {
        RgbImage::from_pixel(80, 60, Rgb([20, 40, 60]))
    }

    #[test]
    fn test_output_matches_input_dimensions() {
        let mut compositor = FrameCompositor::new(track(), renderer(), &effects(vec![]));
        let out = compositor.compose(0, &source());
        assert_eq!(out.dimensions(), (80, 60));
    }

    #[test]
    fn test_cursor_drawn_at_track_position() {
        let mut compositor = FrameCompositor::new(track(), renderer(), &effects(vec![]));
        let out = compositor.compose(0, &source());
        // Hotspot at (40, 30); sprite spans 36..52 x 26..42.
        assert_eq!(out.get_pixel(40, 30).0, [255, 0, 0]);
        assert_eq!(out.get_pixel(36, 26).0, [255, 0, 0]);
        assert_eq!(out.get_pixel(35, 30).0, [20, 40, 60]);
        assert_eq!(out.get_pixel(5, 5).0, [20, 40, 60]);
    }

    #[test]
    fn test_camera_applied_last() {
        let layer = ManualZoomLayer {
            start_frame: 0,
            end_frame: 100,
            start_scale: 2.0,
            end_scale: 2.0,
            target_x: 0.5,
            target_y: 0.5,
        };
        let mut compositor = FrameCompositor::new(track(), renderer(), &effects(vec![layer]));
        let plan = compositor.plan(50);
        assert_eq!(plan.camera.scale, 2.0);

        let out = compositor.render(&plan, &source());
        assert_eq!(out.dimensions(), (80, 60));
        // The zoomed cursor covers more of the frame.
        let red = out.pixels().filter(|p| p.0 == [255, 0, 0]).count();
        assert!(red > 16 * 16);
    }

    #[test]
    fn test_precomputed_path_matches_sequential() {
        let layer = ManualZoomLayer {
            start_frame: 5,
            end_frame: 60,
            start_scale: 1.5,
            end_scale: 1.2,
            target_x: 0.2,
            target_y: 0.8,
        };
        let mut sequential = FrameCompositor::new(track(), renderer(), &effects(vec![layer]));
        let path = sequential.camera_path(70);

        for frame in 0..70 {
            let planned = sequential.plan(frame);
            assert_eq!(planned.camera, path.at(frame));
        }
        let a = sequential.compose_with(40, &source(), &path);
        let b = sequential.render(&sequential.plan_with(40, &path), &source());
        assert_eq!(a, b);
    }

    #[test]
    fn test_configure_resets_state() {
        let mut compositor = FrameCompositor::new(track(), renderer(), &effects(vec![]));
        compositor.compose(0, &source());
        compositor.compose(1, &source());
        compositor.configure(&effects(vec![]));
        assert_eq!(compositor.smoothing_state(), SmoothingState::SEED);
        // Starting over at frame 0 is not out of order after a reconfigure.
        compositor.compose(0, &source());
    }
}
