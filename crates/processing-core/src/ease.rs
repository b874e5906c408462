//! Easing and smoothing helpers.

/// Quadratic ease-in-out over `t` in `[0, 1]`.
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// One step of exponential smoothing from `current` toward `target`.
///
/// `smoothing` is in `[0, 1]`: 0 jumps straight to the target, 1 never moves.
pub fn smooth_toward(current: f64, target: f64, smoothing: f64) -> f64 {
    current + (target - current) * (1.0 - smoothing.clamp(0.0, 1.0))
}

/// Linear interpolation from `a` to `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
