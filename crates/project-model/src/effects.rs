//! Effect configuration (`zoom.json`).
//!
//! The effect document has three optional sections: `cursor` styling,
//! `background` framing, and `zoom` layers. Every absent field falls back
//! to the default the recorder's editor uses, so a `{}` document is valid.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Top-level effect configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub cursor: CursorStyle,
    pub background: BackgroundStyle,
    pub zoom: ZoomConfig,
}

impl EffectConfig {
    /// Parse an effect configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON in the editor's layout.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Cursor styling
// ---------------------------------------------------------------------------

/// Tint color with each channel normalized to `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub alpha: f64,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Tint {
    /// Split a packed `0xAARRGGBB` word.
    pub fn from_argb(argb: u32) -> Self {
        let channel = |shift: u32| ((argb >> shift) & 0xFF) as f64 / 255.0;
        Self {
            alpha: channel(24),
            red: channel(16),
            green: channel(8),
            blue: channel(0),
        }
    }

    /// Pack back into `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        let channel = |v: f64, shift: u32| ((v.clamp(0.0, 1.0) * 255.0).round() as u32) << shift;
        channel(self.alpha, 24)
            | channel(self.red, 16)
            | channel(self.green, 8)
            | channel(self.blue, 0)
    }
}

/// How the cursor sprite is styled before compositing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CursorSettings", into = "CursorSettings")]
pub struct CursorStyle {
    /// Multiplier applied on top of the per-draw base scale.
    pub size_scale: f64,
    /// Overall sprite opacity in `[0.0, 1.0]`.
    pub opacity: f64,
    /// Luminance-preserving tint, if enabled.
    pub tint: Option<Tint>,
}

impl Default for CursorStyle {
    fn default() -> Self {
        Self {
            size_scale: 1.0,
            opacity: 1.0,
            tint: None,
        }
    }
}

/// On-disk layout of the `cursor` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CursorSettings {
    size: f64,
    opacity: f64,
    has_tint: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tint_color: Option<u32>,
}

impl Default for CursorSettings {
    fn default() -> Self {
        Self {
            size: 1.0,
            opacity: 1.0,
            has_tint: false,
            tint_color: None,
        }
    }
}

impl TryFrom<CursorSettings> for CursorStyle {
    type Error = String;

    fn try_from(settings: CursorSettings) -> Result<Self, Self::Error> {
        let tint = match (settings.has_tint, settings.tint_color) {
            (true, Some(argb)) => Some(Tint::from_argb(argb)),
            (true, None) => return Err("cursor.hasTint is set but cursor.tintColor is missing".into()),
            (false, _) => None,
        };
        Ok(Self {
            size_scale: settings.size,
            opacity: settings.opacity.clamp(0.0, 1.0),
            tint,
        })
    }
}

impl From<CursorStyle> for CursorSettings {
    fn from(style: CursorStyle) -> Self {
        Self {
            size: style.size_scale,
            opacity: style.opacity,
            has_tint: style.tint.is_some(),
            tint_color: style.tint.map(Tint::to_argb),
        }
    }
}

// ---------------------------------------------------------------------------
// Background
// ---------------------------------------------------------------------------

/// Framing applied behind the recorded content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundStyle {
    /// Fill color as `0xAARRGGBB`. Alpha is ignored.
    #[serde(rename = "color")]
    pub color_argb: u32,
    /// Rounded corner radius in source pixels.
    #[serde(rename = "cornerRadius")]
    pub corner_radius_px: f64,
    /// Padding in pixels. Carried for the editor; the visible margin comes
    /// from `content_scale`.
    #[serde(rename = "padding")]
    pub padding_px: f64,
    /// Scale of the content inside the canvas.
    #[serde(rename = "scale")]
    pub content_scale: f64,
}

impl BackgroundStyle {
    /// Fill color as `[r, g, b]`.
    pub fn rgb(&self) -> [u8; 3] {
        [
            ((self.color_argb >> 16) & 0xFF) as u8,
            ((self.color_argb >> 8) & 0xFF) as u8,
            (self.color_argb & 0xFF) as u8,
        ]
    }
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self {
            color_argb: 0xFF00_0000,
            corner_radius_px: 12.0,
            padding_px: 16.0,
            content_scale: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Zoom
// ---------------------------------------------------------------------------

/// Which layer sequence wins when a manual and an auto layer overlap.
///
/// Any `type` other than `"Auto"` reads as `Manual`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ZoomMode {
    #[default]
    Manual,
    Auto,
}

impl From<String> for ZoomMode {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Auto" => Self::Auto,
            "Manual" => Self::Manual,
            other => {
                tracing::warn!(mode = other, "Unknown zoom type, using Manual");
                Self::Manual
            }
        }
    }
}

impl From<ZoomMode> for String {
    fn from(mode: ZoomMode) -> Self {
        match mode {
            ZoomMode::Manual => "Manual",
            ZoomMode::Auto => "Auto",
        }
        .to_string()
    }
}

/// Fallback parameters for absent layer fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomDefaults {
    pub default_scale: f64,
    /// Seconds. Transitions are a fixed frame count; kept for the editor.
    pub transition_duration: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub follow_speed: f64,
    pub smoothing: f64,
}

impl Default for ZoomDefaults {
    fn default() -> Self {
        Self {
            default_scale: 1.0,
            transition_duration: 0.5,
            min_scale: 1.0,
            max_scale: 2.5,
            follow_speed: 0.3,
            smoothing: 0.7,
        }
    }
}

/// A keyframed zoom with a fixed pan target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManualZoomLayer {
    pub start_frame: u64,
    pub end_frame: u64,
    /// Scale reached after the ease-in and held through the layer.
    pub start_scale: f64,
    /// Scale the ease-out starts from.
    pub end_scale: f64,
    pub target_x: f64,
    pub target_y: f64,
}

impl Default for ManualZoomLayer {
    fn default() -> Self {
        Self {
            start_frame: 0,
            end_frame: 0,
            start_scale: 1.0,
            end_scale: 2.0,
            target_x: 0.5,
            target_y: 0.5,
        }
    }
}

/// A zoom that follows the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoZoomLayer {
    pub start_frame: u64,
    pub end_frame: u64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Carried for the editor; the follow rate is governed by `smoothing`.
    pub follow_speed: f64,
    /// Exponential smoothing factor in `[0.0, 1.0]`; larger is smoother.
    pub smoothing: f64,
}

impl AutoZoomLayer {
    fn resolve(raw: AutoZoomLayerFile, defaults: &ZoomDefaults) -> Self {
        Self {
            start_frame: raw.start_frame,
            end_frame: raw.end_frame,
            min_scale: raw.min_scale.unwrap_or(defaults.min_scale),
            max_scale: raw.max_scale.unwrap_or(defaults.max_scale),
            follow_speed: raw.follow_speed.unwrap_or(defaults.follow_speed),
            smoothing: raw.smoothing.unwrap_or(defaults.smoothing),
        }
    }
}

/// A zoom layer of either kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomLayer {
    Manual(ManualZoomLayer),
    Auto(AutoZoomLayer),
}

impl ZoomLayer {
    /// Inclusive frame span.
    pub fn frames(&self) -> RangeInclusive<u64> {
        match self {
            ZoomLayer::Manual(l) => l.start_frame..=l.end_frame,
            ZoomLayer::Auto(l) => l.start_frame..=l.end_frame,
        }
    }

    /// Whether the layer covers `frame_index`.
    pub fn is_active(&self, frame_index: u64) -> bool {
        self.frames().contains(&frame_index)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ZoomLayer::Manual(_) => "manual",
            ZoomLayer::Auto(_) => "auto",
        }
    }
}

/// Zoom section: layer sequences in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ZoomConfigFile", into = "ZoomConfigFile")]
pub struct ZoomConfig {
    pub mode: ZoomMode,
    pub manual_layers: Vec<ManualZoomLayer>,
    pub auto_layers: Vec<AutoZoomLayer>,
    pub defaults: ZoomDefaults,
}

impl ZoomConfig {
    /// All layers, manual first, each kind in declaration order.
    pub fn layers(&self) -> impl Iterator<Item = ZoomLayer> + '_ {
        self.manual_layers
            .iter()
            .copied()
            .map(ZoomLayer::Manual)
            .chain(self.auto_layers.iter().copied().map(ZoomLayer::Auto))
    }

    /// Last frame covered by any layer.
    pub fn last_layer_frame(&self) -> Option<u64> {
        self.layers().map(|l| *l.frames().end()).max()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ZoomConfigFile {
    #[serde(rename = "type")]
    mode: ZoomMode,
    manual_layers: Vec<ManualZoomLayer>,
    auto_layers: Vec<AutoZoomLayerFile>,
    defaults: ZoomDefaults,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AutoZoomLayerFile {
    start_frame: u64,
    end_frame: u64,
    min_scale: Option<f64>,
    max_scale: Option<f64>,
    follow_speed: Option<f64>,
    smoothing: Option<f64>,
}

impl From<ZoomConfigFile> for ZoomConfig {
    fn from(file: ZoomConfigFile) -> Self {
        let defaults = file.defaults;
        Self {
            mode: file.mode,
            manual_layers: file.manual_layers,
            auto_layers: file
                .auto_layers
                .into_iter()
                .map(|raw| AutoZoomLayer::resolve(raw, &defaults))
                .collect(),
            defaults,
        }
    }
}

impl From<ZoomConfig> for ZoomConfigFile {
    fn from(config: ZoomConfig) -> Self {
        Self {
            mode: config.mode,
            manual_layers: config.manual_layers,
            auto_layers: config
                .auto_layers
                .into_iter()
                .map(|l| AutoZoomLayerFile {
                    start_frame: l.start_frame,
                    end_frame: l.end_frame,
                    min_scale: Some(l.min_scale),
                    max_scale: Some(l.max_scale),
                    follow_speed: Some(l.follow_speed),
                    smoothing: Some(l.smoothing),
                })
                .collect(),
            defaults: config.defaults,
        }
    }
}
