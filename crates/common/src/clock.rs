//! Frame clock utilities.
//!
//! Cursor tracks are recorded in milliseconds since recording start while
//! the compositor works in video frame indices. `FrameRate` is the single
//! conversion point between the two.

use serde::{Deserialize, Serialize};

use crate::error::{ReelcastError, ReelcastResult};

/// A validated, strictly positive video frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrameRate(f64);

impl FrameRate {
    /// Frame rate used when the source does not report one.
    pub const FALLBACK: FrameRate = FrameRate(30.0);

    /// Create a frame rate, rejecting zero, negative, and non-finite values.
    pub fn new(fps: f64) -> ReelcastResult<Self> {
        if fps.is_finite() && fps > 0.0 {
            Ok(Self(fps))
        } else {
            Err(ReelcastError::data(format!(
                "frame rate must be a positive number, got {fps}"
            )))
        }
    }

    /// Like [`FrameRate::new`] but substitutes [`FrameRate::FALLBACK`].
    pub fn new_or_fallback(fps: f64) -> Self {
        Self::new(fps).unwrap_or_else(|_| {
            tracing::warn!(fps, fallback = Self::FALLBACK.0, "Invalid frame rate, using fallback");
            Self::FALLBACK
        })
    }

    /// Frames per second.
    pub fn fps(self) -> f64 {
        self.0
    }

    /// Timestamp in milliseconds of the start of `frame_index`.
    pub fn frame_to_ms(self, frame_index: u64) -> f64 {
        frame_index as f64 * 1000.0 / self.0
    }

    /// Index of the frame that contains `timestamp_ms`.
    pub fn ms_to_frame(self, timestamp_ms: f64) -> u64 {
        (timestamp_ms.max(0.0) * self.0 / 1000.0).floor() as u64
    }

    /// Number of frames needed to cover `duration_ms`.
    pub fn frames_in(self, duration_ms: f64) -> u64 {
        (duration_ms.max(0.0) * self.0 / 1000.0).ceil() as u64
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = ReelcastError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FrameRate> for f64 {
    fn from(rate: FrameRate) -> Self {
        rate.0
    }
}
