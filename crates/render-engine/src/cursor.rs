//! Cursor overlay rendering.

use std::collections::HashMap;
use std::path::Path;

use image::RgbImage;

use reelcast_common::error::ReelcastError;
use reelcast_project_model::cursor::CursorKind;
use reelcast_project_model::effects::CursorStyle;

use crate::sprite::{sprite_file_name, CursorSprite};

/// Smallest drawn sprite edge in pixels.
pub const MIN_SPRITE_PX: u32 = 16;

/// Fraction of the drawn sprite size the hotspot sits below and right of
/// the sprite's top-left corner.
const HOTSPOT_FRACTION: f64 = 0.3;

/// Outcome of [`CursorRenderer::load_sprites`].
#[derive(Debug, Default)]
pub struct SpriteLoadReport {
    pub loaded: Vec<CursorKind>,
    pub failed: Vec<(CursorKind, ReelcastError)>,
}

impl SpriteLoadReport {
    /// Whether every cursor kind loaded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// A single asset error summarizing every failure, if any.
    pub fn to_error(&self) -> Option<ReelcastError> {
        if self.failed.is_empty() {
            return None;
        }
        let kinds = self
            .failed
            .iter()
            .map(|(kind, _)| format!("{kind:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        Some(ReelcastError::asset(format!(
            "Missing cursor sprites: {kinds}; drawing with {:?} instead",
            CursorKind::FALLBACK
        )))
    }
}

/// Sprite cache plus the style applied to every draw.
#[derive(Debug, Clone, Default)]
pub struct CursorRenderer {
    sprites: HashMap<CursorKind, CursorSprite>,
    style: CursorStyle,
}

impl CursorRenderer {
    pub fn new(style: CursorStyle) -> Self {
        Self {
            sprites: HashMap::new(),
            style,
        }
    }

    /// Load the artwork for every cursor kind from `dir`.
    ///
    /// A failure for one kind never stops the others from loading.
    pub fn load_sprites(&mut self, dir: &Path) -> SpriteLoadReport {
        let mut report = SpriteLoadReport::default();

        for kind in CursorKind::ALL {
            let path = dir.join(sprite_file_name(kind));
            match CursorSprite::load(&path) {
                Ok(sprite) => {
                    tracing::debug!(
                        ?kind,
                        width = sprite.width(),
                        height = sprite.height(),
                        "Loaded cursor sprite"
                    );
                    self.sprites.insert(kind, sprite);
                    report.loaded.push(kind);
                }
                Err(e) => {
                    tracing::warn!(?kind, path = %path.display(), error = %e, "Failed to load cursor sprite");
                    report.failed.push((kind, e));
                }
            }
        }

        tracing::info!(
            dir = %dir.display(),
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "Cursor sprites loaded"
        );
        report
    }

    /// Whether every cursor kind has a sprite.
    pub fn is_ready(&self) -> bool {
        CursorKind::ALL.iter().all(|k| self.sprites.contains_key(k))
    }

    pub fn insert_sprite(&mut self, kind: CursorKind, sprite: CursorSprite) {
        self.sprites.insert(kind, sprite);
    }

    pub fn set_style(&mut self, style: CursorStyle) {
        self.style = style;
    }

    pub fn style(&self) -> &CursorStyle {
        &self.style
    }

    /// Sprite drawn for `kind`: its own, else the fallback's.
    pub fn resolve(&self, kind: CursorKind) -> Option<&CursorSprite> {
        self.sprites
            .get(&kind)
            .or_else(|| self.sprites.get(&CursorKind::FALLBACK))
    }

    /// Alpha-composite the cursor for `kind` with its hotspot at pixel
    /// `(x, y)` of `frame`.
    ///
    /// A no-op when neither `kind` nor the fallback has a sprite.
    pub fn draw(&self, frame: &mut RgbImage, x: i64, y: i64, kind: CursorKind, base_scale: f64) {
        let Some(sprite) = self.resolve(kind) else {
            return;
        };
        let opacity = self.style.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 || frame.width() == 0 || frame.height() == 0 {
            return;
        }

        // Never resample past the frame; anything larger is clipped anyway.
        let fit = (frame.width() as f64 / sprite.width() as f64)
            .min(frame.height() as f64 / sprite.height() as f64);
        let final_scale = (base_scale * self.style.size_scale).min(fit);
        let width = ((sprite.width() as f64 * final_scale) as u32).max(MIN_SPRITE_PX);
        let height = ((sprite.height() as f64 * final_scale) as u32).max(MIN_SPRITE_PX);

        let styled = match &self.style.tint {
            Some(tint) => sprite.tinted(tint),
            None => sprite.clone(),
        };
        let styled = styled.resized(width, height);

        let left = x - (width as f64 * HOTSPOT_FRACTION) as i64;
        let top = y - (height as f64 * HOTSPOT_FRACTION) as i64;
        let Some(placement) = Placement::clamped(left, top, width, height, frame.width(), frame.height())
        else {
            return;
        };

        blend(frame, &styled, &placement, opacity);
    }
}

/// Visible part of a sprite inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    /// Top-left of the visible region in frame pixels.
    dst_x: u32,
    dst_y: u32,
    /// Top-left of the visible region in sprite pixels.
    src_x: u32,
    src_y: u32,
    width: u32,
    height: u32,
}

impl Placement {
    /// Shift the sprite rectangle fully inside the frame. Sprites larger than
    /// the frame are pinned to the top-left and clipped.
    fn clamped(left: i64, top: i64, width: u32, height: u32, frame_w: u32, frame_h: u32) -> Option<Self> {
        let (dst_x, src_x, vis_w) = clamp_axis(left, width, frame_w)?;
        let (dst_y, src_y, vis_h) = clamp_axis(top, height, frame_h)?;
        Some(Self {
            dst_x,
            dst_y,
            src_x,
            src_y,
            width: vis_w,
            height: vis_h,
        })
    }
}

fn clamp_axis(start: i64, len: u32, frame_len: u32) -> Option<(u32, u32, u32)> {
    let max_start = frame_len as i64 - len as i64;
    let start = if max_start < 0 { 0 } else { start.clamp(0, max_start) };
    let visible = len.min(frame_len);
    (visible > 0).then_some((start as u32, 0, visible))
}

/// `dst = dst * (1 - a) + src * a` over the placement, row by row.
fn blend(frame: &mut RgbImage, sprite: &CursorSprite, placement: &Placement, opacity: f64) {
    let frame_stride = frame.width() as usize * 3;
    let sprite_stride = sprite.width() as usize * 3;
    let alpha_stride = sprite.width() as usize;
    let cols = placement.width as usize;

    let dst_buf: &mut [u8] = &mut **frame;
    let src_buf: &[u8] = sprite.rgb();
    let alpha_buf: &[u8] = sprite.alpha();

    for row in 0..placement.height as usize {
        let dst_start = (placement.dst_y as usize + row) * frame_stride + placement.dst_x as usize * 3;
        let src_start = (placement.src_y as usize + row) * sprite_stride + placement.src_x as usize * 3;
        let alpha_start = (placement.src_y as usize + row) * alpha_stride + placement.src_x as usize;

        let dst_row = &mut dst_buf[dst_start..dst_start + cols * 3];
        let src_row = &src_buf[src_start..src_start + cols * 3];
        let alpha_row = &alpha_buf[alpha_start..alpha_start + cols];

        for ((dst, src), &a) in dst_row
            .chunks_exact_mut(3)
            .zip(src_row.chunks_exact(3))
            .zip(alpha_row)
        {
            if a == 0 {
                continue;
            }
            let a = a as f64 / 255.0 * opacity;
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = (*d as f64 * (1.0 - a) + s as f64 * a).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
