//! Reelcast Processing Core — the virtual camera
//!
//! Turns recorded cursor data and zoom layers into per-frame decisions:
//! - **Cursor Track:** Time-indexed cursor lookup with linear interpolation
//! - **Zoom Timeline:** Manual keyframed zooms and cursor-following auto zooms
//!   with eased boundaries and exponential smoothing
//! - **Camera Path:** One sequential pass over the timeline, cached per frame
//!
//! This crate is pure computation. It performs no I/O and touches no pixels.
//! All inputs are data; all outputs are data.

pub mod camera_path;
pub mod cursor_track;
pub mod ease;
pub mod zoom_timeline;

pub use camera_path::CameraPath;
pub use cursor_track::CursorTrack;
pub use zoom_timeline::{LayerWarning, SmoothingState, ZoomTimeline, TRANSITION_FRAMES};
