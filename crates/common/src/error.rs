//! Error types shared across Reelcast crates.

use std::path::PathBuf;

/// Top-level error type for Reelcast operations.
#[derive(Debug, thiserror::Error)]
pub enum ReelcastError {
    /// Malformed or missing cursor/config input. Fails the whole run.
    #[error("Data error: {message}")]
    Data { message: String },

    /// One or more cursor sprites could not be loaded.
    #[error("Asset error: {message}")]
    Asset { message: String },

    /// Configuration produced an unusable geometry (zero or negative size).
    #[error("Geometry error: {message}")]
    Geometry { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ReelcastError.
pub type ReelcastResult<T> = Result<T, ReelcastError>;

impl ReelcastError {
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data {
            message: msg.into(),
        }
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset {
            message: msg.into(),
        }
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error should abort a render before the frame loop starts.
    ///
    /// Asset errors degrade to fallback rendering instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Asset { .. })
    }
}
