//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReelcastError, ReelcastResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the pre-rasterized cursor artwork.
    pub sprites_dir: PathBuf,

    /// Default render settings.
    pub render: RenderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default render parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// Frame rate assumed when the source does not report one.
    pub fallback_fps: f64,

    /// Emit a progress log line every N frames.
    pub progress_every_frames: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "reelcast=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sprites_dir: default_sprites_dir(),
            render: RenderDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            fallback_fps: 30.0,
            progress_every_frames: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// `$XDG_CONFIG_HOME/reelcast/config.json`.
    pub fn default_path() -> PathBuf {
        xdg_dir("XDG_CONFIG_HOME", &[".config"]).join("config.json")
    }

    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load config from `path`. A missing file yields defaults silently; an
    /// unreadable or malformed one yields defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let parsed = std::fs::read_to_string(path)
            .map_err(ReelcastError::from)
            .and_then(|content| serde_json::from_str(&content).map_err(ReelcastError::from));
        match parsed {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                Self::default()
            }
        }
    }

    /// Write config as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ReelcastResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// `$<var>/reelcast`, or `$HOME/<fallback...>/reelcast` when unset.
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    let base = std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(std::env::temp_dir);
            fallback.iter().fold(home, |dir, part| dir.join(part))
        });
    base.join("reelcast")
}

/// Default cursor artwork directory.
fn default_sprites_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"]).join("cursors")
}
