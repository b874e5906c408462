//! Background framing: rounded corners, content scale, fill color.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

use reelcast_project_model::effects::BackgroundStyle;

/// Where the scaled content landed on the canvas, in canvas pixels.
///
/// `x`/`y` may be negative when the content scale exceeds 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl ContentRect {
    /// Canvas pixel for a normalized content coordinate.
    pub fn to_canvas(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x * self.width as f64) as i64 + self.x,
            (y * self.height as f64) as i64 + self.y,
        )
    }
}

const INSIDE: Luma<u8> = Luma([255]);

/// Usable corner radius: non-negative, at most half the shorter side.
pub fn effective_radius(radius_px: f64, width: u32, height: u32) -> u32 {
    if !radius_px.is_finite() || radius_px <= 0.0 {
        return 0;
    }
    (radius_px as u32).min(width.min(height) / 2)
}

/// Mask with 255 inside a `width` x `height` rounded rectangle of corner
/// radius `radius` and 0 outside: two inset rectangles plus four corner
/// discs centered `radius` pixels in from each corner.
pub fn rounded_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    if radius == 0 {
        return GrayImage::from_pixel(width, height, INSIDE);
    }
    let mut mask = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return mask;
    }

    let r = radius.min(width.min(height) / 2);
    let inset_w = width.saturating_sub(2 * r);
    let inset_h = height.saturating_sub(2 * r);
    if inset_w > 0 {
        draw_filled_rect_mut(&mut mask, Rect::at(r as i32, 0).of_size(inset_w, height), INSIDE);
    }
    if inset_h > 0 {
        draw_filled_rect_mut(&mut mask, Rect::at(0, r as i32).of_size(width, inset_h), INSIDE);
    }

    let (left, top) = (r as i32, r as i32);
    let (right, bottom) = ((width - r - 1) as i32, (height - r - 1) as i32);
    for center in [(left, top), (right, top), (left, bottom), (right, bottom)] {
        draw_filled_circle_mut(&mut mask, center, r as i32, INSIDE);
    }
    mask
}

/// Copy of `frame` with everything outside the rounded mask replaced by
/// `fill`. Hard edges, no anti-aliasing.
pub fn round_corners(frame: &RgbImage, fill: Rgb<u8>, radius: u32) -> RgbImage {
    let mut out = frame.clone();
    if radius == 0 {
        return out;
    }
    let mask = rounded_mask(frame.width(), frame.height(), radius);
    for (px, m) in out.pixels_mut().zip(mask.pixels()) {
        if m.0[0] == 0 {
            *px = fill;
        }
    }
    out
}

/// Frame the source on a solid background.
///
/// The source gets rounded corners, is scaled by `content_scale` (Lanczos)
/// and centered on a canvas of the source's size. Only the part of the
/// scaled content that lands on the canvas is ever resampled.
pub fn compose(frame: &RgbImage, style: &BackgroundStyle) -> (RgbImage, ContentRect) {
    let (width, height) = frame.dimensions();
    let fill = Rgb(style.rgb());
    if width == 0 || height == 0 {
        let rect = ContentRect {
            x: 0,
            y: 0,
            width,
            height,
        };
        return (frame.clone(), rect);
    }

    let radius = effective_radius(style.corner_radius_px, width, height);
    let rounded = round_corners(frame, fill, radius);

    let scale = if style.content_scale.is_finite() {
        style.content_scale
    } else {
        1.0
    };
    let content_w = ((width as f64 * scale) as u32).max(1);
    let content_h = ((height as f64 * scale) as u32).max(1);

    let rect = ContentRect {
        x: (width as i64 - content_w as i64) / 2,
        y: (height as i64 - content_h as i64) / 2,
        width: content_w,
        height: content_h,
    };
    if (content_w, content_h) == (width, height) {
        return (rounded, rect);
    }

    let cols = VisibleSpan::of(rect.x, content_w, width);
    let rows = VisibleSpan::of(rect.y, content_h, height);
    let window = imageops::crop_imm(&rounded, cols.src_start, rows.src_start, cols.src_len, rows.src_len)
        .to_image();
    let content = imageops::resize(&window, cols.dst_len, rows.dst_len, FilterType::Lanczos3);

    let mut canvas = RgbImage::from_pixel(width, height, fill);
    imageops::replace(&mut canvas, &content, cols.dst_start, rows.dst_start);
    (canvas, rect)
}

/// One axis of the scaled content clipped to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisibleSpan {
    /// Source pixels feeding the visible part.
    src_start: u32,
    src_len: u32,
    /// Where that part lands on the canvas, and how long it is there.
    dst_start: i64,
    dst_len: u32,
}

impl VisibleSpan {
    /// `offset` is the content's canvas position; `canvas` is also the
    /// source length, since content is the source scaled.
    fn of(offset: i64, content: u32, canvas: u32) -> Self {
        let hidden = (-offset).max(0) as f64;
        let dst_len = content.min(canvas);
        let src_per_px = canvas as f64 / content as f64;
        let src_start = ((hidden * src_per_px) as u32).min(canvas - 1);
        let src_len = ((dst_len as f64 * src_per_px).round() as u32).clamp(1, canvas - src_start);
        Self {
            src_start,
            src_len,
            dst_start: offset.max(0),
            dst_len,
        }
    }
}
