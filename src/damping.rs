//! First-order exponential easing applied once per rendered frame.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{CameraState, Orientation};

pub const DEFAULT_EASING: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("easing must be in (0, 1], got {0}")]
pub struct EasingOutOfRange(pub f32);

/// Exponential smoothing toward a target pose.
///
/// The step is frame based: a dropped frame simply means one fewer step, no
/// elapsed-time compensation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Damping {
    alpha: f32,
}

impl Damping {
    /// Returns `None` unless `alpha` lies in `(0, 1]`.
    pub fn new(alpha: f32) -> Option<Self> {
        (alpha > 0.0 && alpha <= 1.0).then_some(Self { alpha })
    }

    pub fn alpha(self) -> f32 {
        self.alpha
    }

    /// Advances `current` one frame toward `target`.
    ///
    /// `target` is already clamped, and with `alpha` in `(0, 1]` the result
    /// cannot overshoot it, so no clamping happens here.
    pub fn step(self, current: CameraState, target: CameraState) -> CameraState {
        CameraState {
            orientation: Orientation {
                pitch: ease(current.orientation.pitch, target.orientation.pitch, self.alpha),
                yaw: ease(current.orientation.yaw, target.orientation.yaw, self.alpha),
            },
            zoom: ease(current.zoom, target.zoom, self.alpha),
        }
    }

    pub fn has_converged(self, current: CameraState, target: CameraState, epsilon: f32) -> bool {
        (target.orientation.pitch - current.orientation.pitch).abs() <= epsilon
            && (target.orientation.yaw - current.orientation.yaw).abs() <= epsilon
            && (target.zoom - current.zoom).abs() <= epsilon
    }
}

impl TryFrom<f32> for Damping {
    type Error = EasingOutOfRange;

    fn try_from(alpha: f32) -> Result<Self, Self::Error> {
        Self::new(alpha).ok_or(EasingOutOfRange(alpha))
    }
}

impl From<Damping> for f32 {
    fn from(damping: Damping) -> Self {
        damping.alpha
    }
}

impl Default for Damping {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_EASING,
        }
    }
}

fn ease(current: f32, target: f32, alpha: f32) -> f32 {
    current + (target - current) * alpha
}
