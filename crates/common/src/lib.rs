//! Reelcast Common Utilities
//!
//! Shared infrastructure for all Reelcast crates:
//! - Error types and result aliases
//! - Frame clock for frame-index/timestamp conversion
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
