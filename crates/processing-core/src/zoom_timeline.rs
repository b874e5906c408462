//! Zoom/pan timeline: the virtual camera.
//!
//! # Layers
//!
//! Two kinds of layers drive the camera, each stored in declaration order:
//!
//! - **Manual** layers hold a fixed pan target and ease the scale in from
//!   1.0 at the layer start, hold `startScale`, then ease out from
//!   `endScale` back to 1.0 at the layer end.
//! - **Auto** layers follow the cursor. Pan target and scale are
//!   exponentially smoothed across frames; the scale grows as the cursor
//!   approaches the frame center.
//!
//! Both kinds share the same boundary easing over [`TRANSITION_FRAMES`].
//! At most one layer of each kind is active per frame: the first declared
//! layer whose inclusive span covers the frame.
//!
//! # Smoothing state
//!
//! Auto layers are a running filter over frame order. The filter state is
//! an explicit [`SmoothingState`] value passed into and returned from
//! [`ZoomTimeline::evaluate`]; callers must thread it through frames in
//! strictly increasing order.

use std::fmt;

use serde::{Deserialize, Serialize};

use reelcast_project_model::cursor::CursorSample;
use reelcast_project_model::effects::{
    AutoZoomLayer, ManualZoomLayer, ZoomConfig, ZoomLayer, ZoomMode,
};
use reelcast_project_model::viewport::{Point2D, ZoomEvaluation};

use crate::ease::{ease_in_out_quad, lerp, smooth_toward};

/// Length of the eased transition at each layer boundary, in frames.
pub const TRANSITION_FRAMES: u64 = 30;

/// Cross-frame state of the auto-zoom filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingState {
    pub last_x: f64,
    pub last_y: f64,
    pub last_scale: f64,
}

impl SmoothingState {
    /// Centered and unzoomed; the state after every (re)configuration.
    pub const SEED: SmoothingState = SmoothingState {
        last_x: 0.5,
        last_y: 0.5,
        last_scale: 1.0,
    };
}

impl Default for SmoothingState {
    fn default() -> Self {
        Self::SEED
    }
}

/// Non-fatal layer configuration problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerWarning {
    /// Two layers of the same kind cover a common frame. The earlier one
    /// (`first`) wins wherever both are active.
    Overlap {
        kind: &'static str,
        first: usize,
        second: usize,
    },
    /// `endFrame < startFrame`: the layer is never active.
    Inverted { kind: &'static str, index: usize },
}

impl fmt::Display for LayerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerWarning::Overlap {
                kind,
                first,
                second,
            } => write!(
                f,
                "{kind} layers {first} and {second} overlap; layer {first} takes precedence"
            ),
            LayerWarning::Inverted { kind, index } => {
                write!(f, "{kind} layer {index} ends before it starts and is never active")
            }
        }
    }
}

/// Where a frame falls within its layer.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Inside the start window; carries the eased progress in `[0, 1]`.
    EaseIn(f64),
    Hold,
    /// Inside the end window; carries the eased remaining fraction in `[0, 1]`.
    EaseOut(f64),
}

impl Phase {
    /// The start window is checked first and includes its last frame, so it
    /// wins over the end window on layers shorter than two transitions.
    fn of(start_frame: u64, end_frame: u64, frame_index: u64) -> Phase {
        let window = TRANSITION_FRAMES as f64;
        if frame_index <= start_frame.saturating_add(TRANSITION_FRAMES) {
            let progress = frame_index.saturating_sub(start_frame) as f64 / window;
            Phase::EaseIn(ease_in_out_quad(progress))
        } else if frame_index.saturating_add(TRANSITION_FRAMES) > end_frame {
            let remaining = end_frame.saturating_sub(frame_index) as f64 / window;
            Phase::EaseOut(ease_in_out_quad(remaining))
        } else {
            Phase::Hold
        }
    }
}

/// The zoom/pan timeline.
#[derive(Debug, Clone, Default)]
pub struct ZoomTimeline {
    mode: ZoomMode,
    manual_layers: Vec<ManualZoomLayer>,
    auto_layers: Vec<AutoZoomLayer>,
    warnings: Vec<LayerWarning>,
}

impl ZoomTimeline {
    /// Build a timeline from a zoom configuration.
    pub fn new(config: &ZoomConfig) -> Self {
        let mut timeline = Self::default();
        timeline.configure(config);
        timeline
    }

    /// Replace all layers and return a freshly seeded smoothing state.
    pub fn configure(&mut self, config: &ZoomConfig) -> SmoothingState {
        self.mode = config.mode;
        self.manual_layers = config.manual_layers.clone();
        self.auto_layers = config.auto_layers.clone();
        self.warnings = collect_warnings(config);

        for warning in &self.warnings {
            tracing::warn!(%warning, "Zoom layer configuration");
        }
        tracing::debug!(
            mode = ?self.mode,
            manual = self.manual_layers.len(),
            auto = self.auto_layers.len(),
            "Configured zoom timeline"
        );

        SmoothingState::SEED
    }

    /// Problems found by the last [`configure`](Self::configure).
    pub fn warnings(&self) -> &[LayerWarning] {
        &self.warnings
    }

    /// First declared manual layer covering `frame_index`.
    pub fn active_manual_layer(&self, frame_index: u64) -> Option<&ManualZoomLayer> {
        self.manual_layers
            .iter()
            .find(|l| (l.start_frame..=l.end_frame).contains(&frame_index))
    }

    /// First declared auto layer covering `frame_index`.
    pub fn active_auto_layer(&self, frame_index: u64) -> Option<&AutoZoomLayer> {
        self.auto_layers
            .iter()
            .find(|l| (l.start_frame..=l.end_frame).contains(&frame_index))
    }

    /// The layer that drives the camera at `frame_index`, honoring the
    /// configured precedence between manual and auto layers.
    pub fn active_layer(&self, frame_index: u64) -> Option<ZoomLayer> {
        let manual = || self.active_manual_layer(frame_index).copied().map(ZoomLayer::Manual);
        let auto = || self.active_auto_layer(frame_index).copied().map(ZoomLayer::Auto);
        match self.mode {
            ZoomMode::Manual => manual().or_else(auto),
            ZoomMode::Auto => auto().or_else(manual),
        }
    }

    /// Camera state for one frame.
    ///
    /// `state` is the smoothing state returned by the previous frame's call
    /// (or [`SmoothingState::SEED`]). It only changes while an auto layer is
    /// active.
    pub fn evaluate(
        &self,
        frame_index: u64,
        cursor: &CursorSample,
        state: SmoothingState,
    ) -> (ZoomEvaluation, SmoothingState) {
        match self.active_layer(frame_index) {
            Some(ZoomLayer::Manual(layer)) => (evaluate_manual(&layer, frame_index), state),
            Some(ZoomLayer::Auto(layer)) => evaluate_auto(&layer, frame_index, cursor, state),
            None => (ZoomEvaluation::IDENTITY, state),
        }
    }
}

fn evaluate_manual(layer: &ManualZoomLayer, frame_index: u64) -> ZoomEvaluation {
    let scale = match Phase::of(layer.start_frame, layer.end_frame, frame_index) {
        Phase::EaseIn(t) => lerp(1.0, layer.start_scale, t),
        Phase::Hold => layer.start_scale,
        Phase::EaseOut(t) => lerp(layer.end_scale, 1.0, 1.0 - t),
    };
    ZoomEvaluation::new(scale, layer.target_x, layer.target_y)
}

fn evaluate_auto(
    layer: &AutoZoomLayer,
    frame_index: u64,
    cursor: &CursorSample,
    state: SmoothingState,
) -> (ZoomEvaluation, SmoothingState) {
    let next = advance_auto_state(layer, cursor, state);

    let follow = ZoomEvaluation::new(next.last_scale, next.last_x, next.last_y);
    let eval = match Phase::of(layer.start_frame, layer.end_frame, frame_index) {
        Phase::EaseIn(t) => ZoomEvaluation::lerp(&ZoomEvaluation::IDENTITY, &follow, t),
        Phase::Hold => follow,
        Phase::EaseOut(t) => ZoomEvaluation::lerp(&follow, &ZoomEvaluation::IDENTITY, 1.0 - t),
    };

    (eval, next)
}

/// One filter step toward the cursor.
fn advance_auto_state(
    layer: &AutoZoomLayer,
    cursor: &CursorSample,
    state: SmoothingState,
) -> SmoothingState {
    let last_x = smooth_toward(state.last_x, cursor.x, layer.smoothing);
    let last_y = smooth_toward(state.last_y, cursor.y, layer.smoothing);
    let target_scale = auto_target_scale(layer, last_x, last_y);
    let last_scale = smooth_toward(state.last_scale, target_scale, layer.smoothing);
    SmoothingState {
        last_x,
        last_y,
        last_scale,
    }
}

/// Unsmoothed scale for a (smoothed) cursor position: `maxScale` at the
/// center, falling linearly with distance, never below `minScale`.
pub fn auto_target_scale(layer: &AutoZoomLayer, x: f64, y: f64) -> f64 {
    let distance_from_center = Point2D::new(x, y).distance_to(&Point2D::CENTER);
    let (lo, hi) = if layer.min_scale <= layer.max_scale {
        (layer.min_scale, layer.max_scale)
    } else {
        (layer.max_scale, layer.min_scale)
    };
    let scale = layer.min_scale + (layer.max_scale - layer.min_scale) * (1.0 - distance_from_center);
    scale.clamp(lo, hi)
}

fn collect_warnings(config: &ZoomConfig) -> Vec<LayerWarning> {
    let manual: Vec<(u64, u64)> = config
        .manual_layers
        .iter()
        .map(|l| (l.start_frame, l.end_frame))
        .collect();
    let auto: Vec<(u64, u64)> = config
        .auto_layers
        .iter()
        .map(|l| (l.start_frame, l.end_frame))
        .collect();

    let mut warnings = span_warnings("manual", &manual);
    warnings.extend(span_warnings("auto", &auto));
    warnings
}

fn span_warnings(kind: &'static str, spans: &[(u64, u64)]) -> Vec<LayerWarning> {
    let mut warnings = vec![];
    for (index, &(start, end)) in spans.iter().enumerate() {
        if end < start {
            warnings.push(LayerWarning::Inverted { kind, index });
        }
    }
    for (first, &(s1, e1)) in spans.iter().enumerate() {
        if e1 < s1 {
            continue;
        }
        for (offset, &(s2, e2)) in spans[first + 1..].iter().enumerate() {
            if e2 >= s2 && s1 <= e2 && s2 <= e1 {
                warnings.push(LayerWarning::Overlap {
                    kind,
                    first,
                    second: first + 1 + offset,
                });
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use reelcast_project_model::cursor::CursorKind;
    use reelcast_project_model::effects::EffectConfig;

    fn manual(start: u64, end: u64, start_scale: f64, end_scale: f64) -> ManualZoomLayer {
        ManualZoomLayer {
            start_frame: start,
            end_frame: end,
            start_scale,
            end_scale,
            target_x: 0.25,
            target_y: 0.75,
        }
    }

    fn auto(start: u64, end: u64, smoothing: f64) -> AutoZoomLayer {
        AutoZoomLayer {
            start_frame: start,
            end_frame: end,
            min_scale: 1.0,
            max_scale: 2.0,
            follow_speed: 0.3,
            smoothing,
        }
    }

    fn timeline(manual_layers: Vec<ManualZoomLayer>, auto_layers: Vec<AutoZoomLayer>) -> ZoomTimeline {
        ZoomTimeline::new(&ZoomConfig {
            manual_layers,
            auto_layers,
            ..Default::default()
        })
    }

    fn cursor(x: f64, y: f64) -> CursorSample {
        CursorSample::new(x, y, 0, CursorKind::Arrow)
    }

    #[test]
    fn test_no_layer_is_identity() {
        let tl = timeline(vec![], vec![]);
        let (eval, state) = tl.evaluate(42, &cursor(0.1, 0.1), SmoothingState::SEED);
        assert_eq!(eval, ZoomEvaluation::IDENTITY);
        assert_eq!(state, SmoothingState::SEED);
    }

    #[test]
    fn test_manual_layer_boundaries() {
        let tl = timeline(vec![manual(100, 300, 2.0, 1.5)], vec![]);
        let c = cursor(0.5, 0.5);
        let scale = |f| tl.evaluate(f, &c, SmoothingState::SEED).0.scale;

        assert!((scale(100) - 1.0).abs() < 1e-9);
        assert!((scale(115) - 1.5).abs() < 1e-9);
        assert!((scale(130) - 2.0).abs() < 1e-9);
        assert_eq!(scale(200), 2.0);
        assert_eq!(scale(270), 2.0);
        // Ease-out starts from endScale.
        assert!((scale(271) - 1.5).abs() < 0.01);
        assert!((scale(300) - 1.0).abs() < 1e-9);
        assert_eq!(scale(301), 1.0);
    }

    #[test]
    fn test_ninety_frame_manual_zoom() {
        let tl = timeline(vec![manual(0, 90, 2.0, 1.0)], vec![]);
        let c = cursor(0.5, 0.5);
        let scales: Vec<f64> = [0, 30, 60, 90]
            .into_iter()
            .map(|f| tl.evaluate(f, &c, SmoothingState::SEED).0.scale)
            .collect();
        assert!((scales[0] - 1.0).abs() < 1e-9);
        assert!((scales[1] - 2.0).abs() < 1e-9);
        assert!((scales[2] - 2.0).abs() < 1e-9);
        assert!((scales[3] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_manual_target_is_fixed() {
        let tl = timeline(vec![manual(0, 200, 2.0, 2.0)], vec![]);
        for frame in [0, 10, 100, 190, 200] {
            let (eval, _) = tl.evaluate(frame, &cursor(0.9, 0.1), SmoothingState::SEED);
            assert_eq!(eval.target_x, 0.25);
            assert_eq!(eval.target_y, 0.75);
        }
    }

    #[test]
    fn test_short_layer_start_window_wins() {
        let tl = timeline(vec![manual(0, 40, 2.0, 1.0)], vec![]);
        // Frame 30 is in both windows; the start window applies.
        let (eval, _) = tl.evaluate(30, &cursor(0.5, 0.5), SmoothingState::SEED);
        assert!((eval.scale - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_layer_at_end_of_frame_range() {
        let json = r#"{"zoom": {"manualLayers": [
            {"startFrame": 18446744073709551610, "endFrame": 18446744073709551615, "startScale": 2.0}
        ]}}"#;
        let config = EffectConfig::from_json(json).unwrap();
        let tl = ZoomTimeline::new(&config.zoom);
        for frame in [u64::MAX - 5, u64::MAX - 2, u64::MAX] {
            let (eval, _) = tl.evaluate(frame, &cursor(0.5, 0.5), SmoothingState::SEED);
            assert!((1.0..=2.0).contains(&eval.scale), "frame {frame}: {}", eval.scale);
        }
    }

    #[test]
    fn test_first_declared_layer_wins_and_overlap_is_reported() {
        let tl = timeline(vec![manual(0, 100, 2.0, 2.0), manual(50, 150, 3.0, 3.0)], vec![]);
        let (eval, _) = tl.evaluate(75, &cursor(0.5, 0.5), SmoothingState::SEED);
        assert_eq!(eval.scale, 2.0);
        assert_eq!(
            tl.warnings(),
            &[LayerWarning::Overlap {
                kind: "manual",
                first: 0,
                second: 1
            }]
        );
    }

    #[test]
    fn test_inverted_layer_is_reported_and_inactive() {
        let tl = timeline(vec![manual(100, 50, 2.0, 2.0)], vec![]);
        assert_eq!(
            tl.warnings(),
            &[LayerWarning::Inverted {
                kind: "manual",
                index: 0
            }]
        );
        assert!(tl.active_manual_layer(75).is_none());
        assert!(tl.warnings()[0].to_string().contains("never active"));
    }

    #[test]
    fn test_manual_takes_precedence_by_default() {
        let tl = timeline(vec![manual(0, 100, 2.0, 2.0)], vec![auto(0, 100, 0.0)]);
        let state = SmoothingState::SEED;
        let (eval, next) = tl.evaluate(50, &cursor(0.9, 0.9), state);
        assert_eq!(eval.scale, 2.0);
        assert_eq!(next, state);
    }

    #[test]
    fn test_auto_mode_prefers_auto_layers() {
        let tl = ZoomTimeline::new(&ZoomConfig {
            mode: ZoomMode::Auto,
            manual_layers: vec![manual(0, 100, 2.0, 2.0)],
            auto_layers: vec![auto(0, 100, 0.0)],
            ..Default::default()
        });
        let (eval, next) = tl.evaluate(50, &cursor(0.9, 0.9), SmoothingState::SEED);
        assert_eq!(next.last_x, 0.9);
        assert_eq!(eval.target_x, 0.9);
    }

    #[test]
    fn test_auto_layer_starts_unzoomed_and_centered() {
        let tl = timeline(vec![], vec![auto(10, 200, 0.7)]);
        let (eval, next) = tl.evaluate(10, &cursor(0.2, 0.8), SmoothingState::SEED);
        assert_eq!(eval, ZoomEvaluation::IDENTITY);
        // The filter still advanced.
        assert!((next.last_x - (0.5 + (0.2 - 0.5) * 0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_auto_layer_converges_on_cursor() {
        let tl = timeline(vec![], vec![auto(0, 1000, 0.5)]);
        let mut state = SmoothingState::SEED;
        let mut eval = ZoomEvaluation::IDENTITY;
        for frame in 0..=500 {
            (eval, state) = tl.evaluate(frame, &cursor(0.5, 0.5), state);
        }
        // Centered cursor: full zoom.
        assert!((eval.scale - 2.0).abs() < 1e-6);
        assert!((eval.target_x - 0.5).abs() < 1e-9);

        let (eval, _) = tl.evaluate(1000, &cursor(0.5, 0.5), state);
        assert!((eval.scale - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_auto_state_untouched_outside_auto_layers() {
        let tl = timeline(vec![], vec![auto(100, 200, 0.5)]);
        let state = SmoothingState {
            last_x: 0.1,
            last_y: 0.2,
            last_scale: 1.7,
        };
        let (_, next) = tl.evaluate(50, &cursor(0.9, 0.9), state);
        assert_eq!(next, state);
    }

    #[test]
    fn test_configure_returns_seed() {
        let mut tl = timeline(vec![], vec![auto(0, 10, 0.5)]);
        let seed = tl.configure(&ZoomConfig::default());
        assert_eq!(seed, SmoothingState::SEED);
        assert!(tl.active_auto_layer(5).is_none());
    }

    #[test]
    fn test_inverted_min_max_does_not_panic() {
        let layer = AutoZoomLayer {
            min_scale: 3.0,
            max_scale: 1.5,
            ..auto(0, 10, 0.5)
        };
        let s = auto_target_scale(&layer, 0.5, 0.5);
        assert!((1.5..=3.0).contains(&s));
    }

    proptest! {
        #[test]
        fn prop_auto_scale_non_increasing_with_distance(
            d1 in 0.0f64..0.7,
            d2 in 0.0f64..0.7,
            angle in 0.0f64..std::f64::consts::TAU,
            min_scale in 1.0f64..2.0,
            extra in 0.0f64..2.0,
        ) {
            let layer = AutoZoomLayer {
                min_scale,
                max_scale: min_scale + extra,
                ..auto(0, 100, 0.5)
            };
            let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let at = |d: f64| auto_target_scale(&layer, 0.5 + d * angle.cos(), 0.5 + d * angle.sin());
            prop_assert!(at(far) <= at(near) + 1e-12);
        }

        #[test]
        fn prop_manual_layer_start_is_unzoomed(
            start in 0u64..10_000,
            len in 0u64..1_000,
            start_scale in 1.0f64..4.0,
        ) {
            let tl = timeline(vec![manual(start, start + len, start_scale, 1.0)], vec![]);
            let (eval, _) = tl.evaluate(start, &cursor(0.5, 0.5), SmoothingState::SEED);
            prop_assert!((eval.scale - 1.0).abs() < 1e-12);

            if len >= TRANSITION_FRAMES {
                let (eval, _) = tl.evaluate(start + TRANSITION_FRAMES, &cursor(0.5, 0.5), SmoothingState::SEED);
                prop_assert!((eval.scale - start_scale).abs() < 1e-9);
            }
        }
    }
}
