//! Precomputed camera path.
//!
//! Auto layers make each frame's camera depend on every frame before it, so
//! the timeline is evaluated once, in order, and the results cached. Random
//! access renders (previews, seeking) then read from the cache.

use serde::Serialize;

use reelcast_project_model::viewport::ZoomEvaluation;

use crate::cursor_track::CursorTrack;
use crate::zoom_timeline::{SmoothingState, ZoomTimeline};

/// Per-frame camera states for frames `0..len()`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CameraPath {
    frames: Vec<ZoomEvaluation>,
}

impl CameraPath {
    /// Evaluate `timeline` for frames `0..frame_count`, sampling the cursor
    /// from `track` at each frame.
    pub fn compute(timeline: &ZoomTimeline, track: &CursorTrack, frame_count: u64) -> Self {
        let mut state = SmoothingState::SEED;
        let mut frames = Vec::with_capacity(frame_count as usize);

        for frame_index in 0..frame_count {
            let cursor = track.position_at_frame(frame_index);
            let (eval, next) = timeline.evaluate(frame_index, &cursor, state);
            state = next;
            frames.push(eval);
        }

        let zoomed = frames.iter().filter(|e| !e.is_identity()).count();
        tracing::debug!(frames = frame_count, zoomed, "Computed camera path");

        Self { frames }
    }

    /// Camera state at `frame_index`; identity past the end of the path.
    pub fn at(&self, frame_index: u64) -> ZoomEvaluation {
        usize::try_from(frame_index)
            .ok()
            .and_then(|i| self.frames.get(i))
            .copied()
            .unwrap_or(ZoomEvaluation::IDENTITY)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoomEvaluation> {
        self.frames.iter()
    }

    /// Largest zoom scale anywhere on the path.
    pub fn peak_scale(&self) -> f64 {
        self.frames.iter().map(|e| e.scale).fold(1.0, f64::max)
    }
}
