//! Reelcast Render Engine
//!
//! Per-frame compositing of a screen recording with its cursor track and
//! effect configuration.
//!
//! # Pipeline
//!
//! ```text
//! source frame ──► rounded corners ──► content scale ──► centered on background
//!                                                               │
//! cursor track ──► position at frame ──► cursor sprite ─────────┤
//!                                                               │
//! zoom layers ──► zoom timeline ──► resize + crop ◄─────────────┘
//!                                         │
//!                                         ▼
//!                                    output frame
//! ```

pub mod background;
pub mod camera;
pub mod compositor;
pub mod cursor;
pub mod export;
pub mod sprite;

pub use compositor::{FrameComposition, FrameCompositor};
pub use cursor::{CursorRenderer, SpriteLoadReport};
pub use export::*;
pub use sprite::CursorSprite;
