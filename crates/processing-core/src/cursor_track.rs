//! Time-indexed cursor lookup.
//!
//! Cursor samples arrive at the recorder's sampling rate, which rarely
//! matches the video frame rate. Queries convert a frame index to a
//! timestamp and linearly interpolate between the bracketing samples.

use reelcast_common::clock::FrameRate;
use reelcast_common::error::{ReelcastError, ReelcastResult};
use reelcast_project_model::cursor::{CursorSample, CursorTrackFile, TimestampMs};

/// Ordered cursor samples plus the frame rate used to index them.
#[derive(Debug, Clone, Default)]
pub struct CursorTrack {
    samples: Vec<CursorSample>,
    frame_rate: FrameRate,
}

impl CursorTrack {
    /// Create an empty track.
    pub fn new(frame_rate: FrameRate) -> Self {
        Self {
            samples: vec![],
            frame_rate,
        }
    }

    /// Create a track from samples, sorting them by timestamp.
    pub fn from_samples(mut samples: Vec<CursorSample>, frame_rate: FrameRate) -> Self {
        samples.sort_by_key(|s| s.timestamp_ms);
        Self {
            samples,
            frame_rate,
        }
    }

    /// Replace the stored samples with those of a parsed track file.
    pub fn load(&mut self, file: CursorTrackFile) {
        let mut samples = file.positions;
        samples.sort_by_key(|s| s.timestamp_ms);
        tracing::debug!(samples = samples.len(), "Loaded cursor track");
        self.samples = samples;
    }

    /// Parse and load a cursor track document.
    ///
    /// Malformed documents are a data error; the stored samples are left
    /// untouched in that case.
    pub fn load_json(&mut self, json: &str) -> ReelcastResult<()> {
        let file = CursorTrackFile::from_json(json)
            .map_err(|e| ReelcastError::data(format!("Invalid cursor track: {e}")))?;
        self.load(file);
        Ok(())
    }

    /// Set the frame rate used for frame-to-timestamp conversion.
    pub fn set_frame_rate(&mut self, frame_rate: FrameRate) {
        self.frame_rate = frame_rate;
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Timestamp of the last sample.
    pub fn duration_ms(&self) -> TimestampMs {
        self.samples.last().map(|s| s.timestamp_ms).unwrap_or(0)
    }

    /// Number of video frames spanned by the track.
    pub fn frame_count(&self) -> u64 {
        self.frame_rate.frames_in(self.duration_ms() as f64)
    }

    pub fn samples(&self) -> &[CursorSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Cursor state at the start of a video frame.
    pub fn position_at_frame(&self, frame_index: u64) -> CursorSample {
        self.position_at_ms(self.frame_rate.frame_to_ms(frame_index))
    }

    /// Cursor state at an arbitrary timestamp.
    ///
    /// - Empty track: centered standard cursor.
    /// - At or before the first sample: the first sample, verbatim.
    /// - At or after the last sample: the last sample, verbatim.
    /// - Otherwise `x`/`y` are interpolated, the cursor kind comes from the
    ///   later sample, and the timestamp is the queried one.
    pub fn position_at_ms(&self, timestamp_ms: f64) -> CursorSample {
        let (first, last) = match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return CursorSample::center(),
        };

        if timestamp_ms <= first.timestamp_ms as f64 {
            return first;
        }
        if timestamp_ms >= last.timestamp_ms as f64 {
            return last;
        }

        // First sample at or after the target; 1 <= idx < len here.
        let idx = self
            .samples
            .partition_point(|s| (s.timestamp_ms as f64) < timestamp_ms);
        let prev = self.samples[idx - 1];
        let next = self.samples[idx];

        let span = (next.timestamp_ms - prev.timestamp_ms) as f64;
        let t = (timestamp_ms - prev.timestamp_ms as f64) / span;

        CursorSample {
            x: prev.x + (next.x - prev.x) * t,
            y: prev.y + (next.y - prev.y) * t,
            timestamp_ms: timestamp_ms as TimestampMs,
            kind: next.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use reelcast_project_model::cursor::CursorKind;

    fn fps(value: f64) -> FrameRate {
        FrameRate::new(value).unwrap()
    }

    fn diagonal_track() -> CursorTrack {
        CursorTrack::from_samples(
            vec![
                CursorSample::new(0.0, 0.0, 0, CursorKind::Arrow),
                CursorSample::new(1.0, 1.0, 1000, CursorKind::Text),
            ],
            fps(30.0),
        )
    }

    #[test]
    fn test_empty_track_returns_center() {
        let track = CursorTrack::new(fps(30.0));
        for frame in [0, 1, 100, 10_000] {
            assert_eq!(
                track.position_at_frame(frame),
                CursorSample::new(0.5, 0.5, 0, CursorKind::Arrow)
            );
        }
    }

    #[test]
    fn test_midpoint_interpolation() {
        let track = diagonal_track();
        // Frame 15 at 30fps is 500ms.
        let mid = track.position_at_frame(15);
        assert!((mid.x - 0.5).abs() < 1e-9);
        assert!((mid.y - 0.5).abs() < 1e-9);
        assert_eq!(mid.timestamp_ms, 500);
    }

    #[test]
    fn test_kind_comes_from_later_sample() {
        let track = diagonal_track();
        assert_eq!(track.position_at_frame(1).kind, CursorKind::Text);
        assert_eq!(track.position_at_frame(0).kind, CursorKind::Arrow);
    }

    #[test]
    fn test_clamps_outside_sample_range() {
        let track = CursorTrack::from_samples(
            vec![
                CursorSample::new(0.2, 0.3, 500, CursorKind::Pointer),
                CursorSample::new(0.8, 0.9, 1000, CursorKind::ResizeVertical),
            ],
            fps(30.0),
        );
        assert_eq!(track.position_at_frame(0), track.samples()[0]);
        assert_eq!(track.position_at_frame(300), track.samples()[1]);
    }

    #[test]
    fn test_exact_sample_hit() {
        let track = CursorTrack::from_samples(
            vec![
                CursorSample::new(0.0, 0.0, 0, CursorKind::Arrow),
                CursorSample::new(0.4, 0.6, 500, CursorKind::Pointer),
                CursorSample::new(1.0, 1.0, 1000, CursorKind::Arrow),
            ],
            fps(30.0),
        );
        let hit = track.position_at_ms(500.0);
        assert!((hit.x - 0.4).abs() < 1e-9);
        assert!((hit.y - 0.6).abs() < 1e-9);
        assert_eq!(hit.kind, CursorKind::Pointer);
    }

    #[test]
    fn test_duplicate_timestamps_do_not_divide_by_zero() {
        let track = CursorTrack::from_samples(
            vec![
                CursorSample::new(0.0, 0.0, 0, CursorKind::Arrow),
                CursorSample::new(0.5, 0.5, 100, CursorKind::Arrow),
                CursorSample::new(0.6, 0.6, 100, CursorKind::Text),
                CursorSample::new(1.0, 1.0, 200, CursorKind::Arrow),
            ],
            fps(100.0),
        );
        for frame in 0..=20 {
            let s = track.position_at_frame(frame);
            assert!(s.x.is_finite() && s.y.is_finite());
        }
    }

    #[test]
    fn test_frame_rate_changes_lookup() {
        let mut track = diagonal_track();
        track.set_frame_rate(fps(60.0));
        let mid = track.position_at_frame(30);
        assert!((mid.x - 0.5).abs() < 1e-9);
        assert_eq!(track.frame_count(), 60);
    }

    #[test]
    fn test_load_json_rejects_malformed_and_keeps_samples() {
        let mut track = diagonal_track();
        let err = track
            .load_json(r#"{"positions":[{"x":0.5,"y":0.5}]}"#)
            .unwrap_err();
        assert!(matches!(err, ReelcastError::Data { .. }));
        assert_eq!(track.len(), 2);

        track.load_json(r#"{"positions":[]}"#).unwrap();
        assert!(track.is_empty());
        assert_eq!(track.duration_ms(), 0);
    }

    proptest! {
        #[test]
        fn prop_before_first_and_after_last_are_verbatim(
            offset in 1u64..5_000,
            x0 in 0.0f64..=1.0, y0 in 0.0f64..=1.0,
            x1 in 0.0f64..=1.0, y1 in 0.0f64..=1.0,
            frame_after in 0u64..10_000,
        ) {
            let first = CursorSample::new(x0, y0, offset * 10, CursorKind::Text);
            let last = CursorSample::new(x1, y1, offset * 10 + 2_000, CursorKind::Pointer);
            let track = CursorTrack::from_samples(vec![first, last], fps(30.0));

            // Every frame at or before the first sample's time.
            let first_frame_start = ((offset * 10) as f64 * 30.0 / 1000.0).floor() as u64;
            for frame in 0..=first_frame_start {
                prop_assert_eq!(track.position_at_frame(frame), first);
            }

            let last_frame = track.frame_count();
            prop_assert_eq!(track.position_at_frame(last_frame + frame_after), last);
        }

        #[test]
        fn prop_interpolation_stays_between_samples(
            ts in 0u64..1_000,
            x0 in 0.0f64..=1.0, x1 in 0.0f64..=1.0,
        ) {
            let track = CursorTrack::from_samples(
                vec![
                    CursorSample::new(x0, 0.0, 0, CursorKind::Arrow),
                    CursorSample::new(x1, 1.0, 1_000, CursorKind::Arrow),
                ],
                fps(30.0),
            );
            let s = track.position_at_ms(ts as f64);
            let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
            prop_assert!(s.x >= lo - 1e-12 && s.x <= hi + 1e-12);
            prop_assert!((s.y - ts as f64 / 1_000.0).abs() < 1e-9);
        }
    }
}
