//! Reelcast Project Model
//!
//! Defines the data contracts consumed by the render pipeline:
//! - **Cursor:** Timestamped cursor samples and the closed set of cursor kinds
//! - **Recorder:** Adapter from recorder-specific cursor codes to [`CursorKind`]
//! - **Effects:** Cursor styling, background, and zoom layer configuration
//! - **Session:** Loading a cursor track and effect config from disk
//!
//! All cursor and pan coordinates are normalized to `[0.0, 1.0]` relative to
//! the recorded frame.

pub mod cursor;
pub mod effects;
pub mod recorder;
pub mod session;
pub mod viewport;

pub use cursor::*;
pub use effects::*;
pub use session::*;
pub use viewport::*;
