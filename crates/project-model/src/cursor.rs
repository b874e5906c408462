//! Cursor track types.
//!
//! A cursor track is recorded alongside the screen capture as a JSON
//! document of the form `{"positions": [{"x", "y", "timestamp", "cursorType"}]}`.
//! Coordinates are normalized to `[0.0, 1.0]`; timestamps are milliseconds
//! since recording start.

use serde::{Deserialize, Serialize};

use crate::recorder;

/// Milliseconds since recording start.
pub type TimestampMs = u64;

/// The closed set of cursor shapes the renderer knows how to draw.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CursorKind {
    /// Standard arrow. Also the render fallback for missing artwork.
    #[default]
    Arrow,
    /// Text I-beam.
    Text,
    /// Pointing hand.
    Pointer,
    /// North-south resize.
    ResizeVertical,
    /// East-west resize.
    ResizeHorizontal,
}

impl CursorKind {
    /// Every cursor kind, in sprite-loading order.
    pub const ALL: [CursorKind; 5] = [
        CursorKind::Arrow,
        CursorKind::Text,
        CursorKind::Pointer,
        CursorKind::ResizeVertical,
        CursorKind::ResizeHorizontal,
    ];

    /// The kind substituted when a sprite is missing.
    pub const FALLBACK: CursorKind = CursorKind::Arrow;
}

/// A single cursor position sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCursorSample", into = "RawCursorSample")]
pub struct CursorSample {
    /// Normalized X coordinate [0.0, 1.0].
    pub x: f64,
    /// Normalized Y coordinate [0.0, 1.0].
    pub y: f64,
    /// Milliseconds since recording start.
    pub timestamp_ms: TimestampMs,
    /// Cursor shape at this sample.
    pub kind: CursorKind,
}

impl CursorSample {
    pub fn new(x: f64, y: f64, timestamp_ms: TimestampMs, kind: CursorKind) -> Self {
        Self {
            x,
            y,
            timestamp_ms,
            kind,
        }
    }

    /// Centered standard cursor at time zero, returned for empty tracks.
    pub fn center() -> Self {
        Self::new(0.5, 0.5, 0, CursorKind::Arrow)
    }
}

/// On-disk sample layout written by the recorder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCursorSample {
    x: f64,
    y: f64,
    timestamp: u64,
    cursor_type: u32,
}

impl TryFrom<RawCursorSample> for CursorSample {
    type Error = String;

    fn try_from(raw: RawCursorSample) -> Result<Self, Self::Error> {
        if !raw.x.is_finite() || !raw.y.is_finite() {
            return Err(format!(
                "cursor sample at {}ms has non-finite coordinates",
                raw.timestamp
            ));
        }
        Ok(Self {
            x: raw.x,
            y: raw.y,
            timestamp_ms: raw.timestamp,
            kind: recorder::cursor_kind_from_code(raw.cursor_type),
        })
    }
}

impl From<CursorSample> for RawCursorSample {
    fn from(sample: CursorSample) -> Self {
        Self {
            x: sample.x,
            y: sample.y,
            timestamp: sample.timestamp_ms,
            cursor_type: recorder::code_for_cursor_kind(sample.kind),
        }
    }
}

/// Cursor track file (`cursor.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorTrackFile {
    /// Samples in recording order.
    pub positions: Vec<CursorSample>,
}

impl CursorTrackFile {
    /// Parse a cursor track from JSON.
    ///
    /// Samples are stably sorted by timestamp; a warning is logged when the
    /// file was not already in order.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut file: CursorTrackFile = serde_json::from_str(json)?;
        let sorted = file
            .positions
            .windows(2)
            .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms);
        if !sorted {
            tracing::warn!(
                samples = file.positions.len(),
                "Cursor samples were out of order, sorting by timestamp"
            );
            file.positions.sort_by_key(|s| s.timestamp_ms);
        }
        Ok(file)
    }

    /// Timestamp of the last sample, or zero for an empty track.
    pub fn duration_ms(&self) -> TimestampMs {
        self.positions.last().map(|s| s.timestamp_ms).unwrap_or(0)
    }
}
