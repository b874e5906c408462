//! Render session inputs.
//!
//! A session ties together the two documents recorded next to a screen
//! capture: the cursor track and the effect configuration. Both are loaded
//! and checked before any frame is processed.

use std::path::{Path, PathBuf};

use crate::cursor::CursorTrackFile;
use crate::effects::EffectConfig;

/// Loaded session documents.
#[derive(Debug, Clone)]
pub struct Session {
    /// Where the cursor track was read from.
    pub cursor_path: PathBuf,
    /// Where the effect configuration was read from.
    pub config_path: PathBuf,
    pub track: CursorTrackFile,
    pub effects: EffectConfig,
}

impl Session {
    /// Load a cursor track and effect configuration.
    pub fn load(
        cursor_path: impl AsRef<Path>,
        config_path: impl AsRef<Path>,
    ) -> Result<Self, SessionError> {
        let cursor_path = cursor_path.as_ref().to_path_buf();
        let config_path = config_path.as_ref().to_path_buf();

        let cursor_json =
            std::fs::read_to_string(&cursor_path).map_err(|e| SessionError::IoError {
                path: cursor_path.clone(),
                source: e,
            })?;
        let track =
            CursorTrackFile::from_json(&cursor_json).map_err(|e| SessionError::ParseError {
                path: cursor_path.clone(),
                source: e,
            })?;

        let config_json =
            std::fs::read_to_string(&config_path).map_err(|e| SessionError::IoError {
                path: config_path.clone(),
                source: e,
            })?;
        let effects =
            EffectConfig::from_json(&config_json).map_err(|e| SessionError::ParseError {
                path: config_path.clone(),
                source: e,
            })?;

        tracing::debug!(
            samples = track.positions.len(),
            manual_layers = effects.zoom.manual_layers.len(),
            auto_layers = effects.zoom.auto_layers.len(),
            "Loaded session"
        );

        Ok(Self {
            cursor_path,
            config_path,
            track,
            effects,
        })
    }

    /// Report values that load fine but are likely mistakes.
    ///
    /// Nothing here is fatal: the renderer clamps every value it uses.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = vec![];

        let out_of_range = self
            .track
            .positions
            .iter()
            .filter(|s| !(0.0..=1.0).contains(&s.x) || !(0.0..=1.0).contains(&s.y))
            .count();
        if out_of_range > 0 {
            issues.push(format!(
                "{out_of_range} cursor sample(s) lie outside the normalized [0, 1] range"
            ));
        }

        let bg = &self.effects.background;
        if bg.content_scale <= 0.0 {
            issues.push(format!(
                "background.scale must be positive, got {}",
                bg.content_scale
            ));
        } else if bg.content_scale > 1.0 {
            issues.push(format!(
                "background.scale {} is larger than the canvas; content will be cropped",
                bg.content_scale
            ));
        }
        if bg.corner_radius_px < 0.0 {
            issues.push(format!(
                "background.cornerRadius must not be negative, got {}",
                bg.corner_radius_px
            ));
        }

        if self.effects.cursor.size_scale <= 0.0 {
            issues.push(format!(
                "cursor.size must be positive, got {}",
                self.effects.cursor.size_scale
            ));
        }

        for (i, layer) in self.effects.zoom.manual_layers.iter().enumerate() {
            if layer.start_scale < 1.0 || layer.end_scale < 1.0 {
                issues.push(format!("manualLayers[{i}] zooms out below 1.0"));
            }
        }
        for (i, layer) in self.effects.zoom.auto_layers.iter().enumerate() {
            if layer.min_scale > layer.max_scale {
                issues.push(format!(
                    "autoLayers[{i}] minScale {} exceeds maxScale {}",
                    layer.min_scale, layer.max_scale
                ));
            }
            if !(0.0..=1.0).contains(&layer.smoothing) {
                issues.push(format!(
                    "autoLayers[{i}] smoothing {} is outside [0, 1]",
                    layer.smoothing
                ));
            }
        }

        issues
    }
}

/// Errors that can occur when loading a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}
