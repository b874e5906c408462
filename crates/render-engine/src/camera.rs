//! Camera transform: zoom by resizing, pan by cropping.

use image::imageops::{self, FilterType};
use image::RgbImage;

use reelcast_project_model::viewport::ZoomEvaluation;

/// Left (or top) edge of the source window along one axis.
///
/// `excess` is how many pixels the frame exceeds the window by.
pub fn crop_offset(excess: u32, target: f64) -> u32 {
    ((excess as f64 * target) as i64).clamp(0, excess as i64) as u32
}

/// Zoom `frame` by `eval.scale` around `eval.target_*`, keeping its size.
///
/// The visible `1/scale` window is cropped first and resized (bilinear) to
/// the frame size. Scales below 1.0 are treated as 1.0.
pub fn apply(frame: &RgbImage, eval: &ZoomEvaluation) -> RgbImage {
    let (width, height) = frame.dimensions();
    let scale = if eval.scale.is_finite() {
        eval.scale.max(1.0)
    } else {
        1.0
    };

    let window_w = ((width as f64 / scale).round() as u32).clamp(1, width.max(1));
    let window_h = ((height as f64 / scale).round() as u32).clamp(1, height.max(1));
    if window_w >= width && window_h >= height {
        return frame.clone();
    }

    let x = crop_offset(width - window_w, eval.target_x);
    let y = crop_offset(height - window_h, eval.target_y);
    let window = imageops::crop_imm(frame, x, y, window_w, window_h).to_image();

    imageops::resize(&window, width, height, FilterType::Triangle)
}
