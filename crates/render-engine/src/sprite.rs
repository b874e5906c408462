//! Cursor artwork.
//!
//! Each cursor kind is drawn from a pre-rasterized RGBA PNG. On load the
//! image is split into an RGB bitmap and a single-channel alpha bitmap and
//! normalized to [`BASE_HEIGHT`], preserving aspect ratio.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage, RgbaImage};

use reelcast_common::error::{ReelcastError, ReelcastResult};
use reelcast_project_model::cursor::CursorKind;
use reelcast_project_model::effects::Tint;

/// Canonical sprite height in pixels.
pub const BASE_HEIGHT: u32 = 128;

/// Artwork file for a cursor kind, relative to the sprites directory.
pub fn sprite_file_name(kind: CursorKind) -> &'static str {
    match kind {
        CursorKind::Arrow => "cursor_normal.png",
        CursorKind::Text => "cursor_text.png",
        CursorKind::Pointer => "cursor_pointer.png",
        CursorKind::ResizeVertical => "cursor_resize_vertical.png",
        CursorKind::ResizeHorizontal => "cursor_resize_horizontal.png",
    }
}

/// An RGB bitmap plus matching alpha bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSprite {
    rgb: RgbImage,
    alpha: GrayImage,
}

impl CursorSprite {
    /// Pair an RGB bitmap with an alpha bitmap of the same dimensions.
    pub fn new(rgb: RgbImage, alpha: GrayImage) -> ReelcastResult<Self> {
        if rgb.dimensions() != alpha.dimensions() {
            return Err(ReelcastError::geometry(format!(
                "Sprite color is {:?} but alpha is {:?}",
                rgb.dimensions(),
                alpha.dimensions()
            )));
        }
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(ReelcastError::asset("Sprite has no pixels"));
        }
        Ok(Self { rgb, alpha })
    }

    /// Split an RGBA image into color and alpha, normalized to [`BASE_HEIGHT`].
    pub fn from_rgba(image: &RgbaImage) -> ReelcastResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ReelcastError::asset("Sprite has no pixels"));
        }

        let scale = BASE_HEIGHT as f64 / image.height() as f64;
        let width = ((image.width() as f64 * scale).round() as u32).max(1);
        let normalized = resample(image, width, BASE_HEIGHT);

        let (w, h) = normalized.dimensions();
        let mut rgb = RgbImage::new(w, h);
        let mut alpha = GrayImage::new(w, h);
        for (x, y, px) in normalized.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            rgb.put_pixel(x, y, Rgb([r, g, b]));
            alpha.put_pixel(x, y, Luma([a]));
        }

        Self::new(rgb, alpha)
    }

    /// Load and normalize an RGBA PNG.
    pub fn load(path: &Path) -> ReelcastResult<Self> {
        if !path.exists() {
            return Err(ReelcastError::asset(format!(
                "Sprite file missing: {}",
                path.display()
            )));
        }
        let image = image::open(path)
            .map_err(|e| ReelcastError::asset(format!("{}: {e}", path.display())))?;
        if !image.color().has_alpha() {
            return Err(ReelcastError::asset(format!(
                "{} has no alpha channel",
                path.display()
            )));
        }
        Self::from_rgba(&image.to_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    pub fn rgb(&self) -> &RgbImage {
        &self.rgb
    }

    pub fn alpha(&self) -> &GrayImage {
        &self.alpha
    }

    /// Copy resized to exactly `width` x `height`.
    ///
    /// Shrinking area-averages; enlarging uses Lanczos.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == self.rgb.dimensions() {
            return self.clone();
        }
        Self {
            rgb: resample(&self.rgb, width, height),
            alpha: resample(&self.alpha, width, height),
        }
    }

    /// Copy with every pixel recolored through `tint`, keeping its BT.601 luma.
    ///
    /// The tint's alpha component is ignored.
    pub fn tinted(&self, tint: &Tint) -> Self {
        let mut rgb = self.rgb.clone();
        let factors = [tint.red, tint.green, tint.blue];
        for px in rgb.pixels_mut() {
            let [r, g, b] = px.0;
            let luma = (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0;
            px.0 = factors.map(|f| (luma * f * 255.0).round().clamp(0.0, 255.0) as u8);
        }
        Self {
            rgb,
            alpha: self.alpha.clone(),
        }
    }
}

/// Area-average when both dimensions shrink, Lanczos otherwise.
fn resample<P>(image: &image::ImageBuffer<P, Vec<u8>>, width: u32, height: u32) -> image::ImageBuffer<P, Vec<u8>>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    if width <= image.width() && height <= image.height() {
        imageops::thumbnail(image, width, height)
    } else {
        imageops::resize(image, width, height, FilterType::Lanczos3)
    }
}
