//! Camera framing types.
//!
//! The virtual camera is described by a zoom scale and a normalized pan
//! target: `(0.0, 0.0)` keeps the top-left of the zoomed frame in view,
//! `(1.0, 1.0)` the bottom-right, `(0.5, 0.5)` the center.

use serde::{Deserialize, Serialize};

/// Camera state for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomEvaluation {
    /// Zoom factor (1.0 = no zoom, 2.0 = 200% zoom).
    pub scale: f64,
    /// Horizontal pan target (normalized).
    pub target_x: f64,
    /// Vertical pan target (normalized).
    pub target_y: f64,
}

impl ZoomEvaluation {
    /// Unzoomed, centered camera.
    pub const IDENTITY: ZoomEvaluation = ZoomEvaluation {
        scale: 1.0,
        target_x: 0.5,
        target_y: 0.5,
    };

    pub fn new(scale: f64, target_x: f64, target_y: f64) -> Self {
        Self {
            scale,
            target_x,
            target_y,
        }
    }

    /// Whether this evaluation leaves the frame untouched.
    pub fn is_identity(&self) -> bool {
        (self.scale - 1.0).abs() < 1e-9
    }

    /// The pan target as a point.
    pub fn target(&self) -> Point2D {
        Point2D::new(self.target_x, self.target_y)
    }

    /// Linearly interpolate between two camera states.
    pub fn lerp(a: &ZoomEvaluation, b: &ZoomEvaluation, t: f64) -> ZoomEvaluation {
        let t = t.clamp(0.0, 1.0);
        ZoomEvaluation {
            scale: a.scale + (b.scale - a.scale) * t,
            target_x: a.target_x + (b.target_x - a.target_x) * t,
            target_y: a.target_y + (b.target_y - a.target_y) * t,
        }
    }
}

impl Default for ZoomEvaluation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A 2D normalized point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    /// Center of the frame.
    pub const CENTER: Point2D = Point2D { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}
