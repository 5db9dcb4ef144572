use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::damping::Damping;

/// Lower bound for the orbit distance.
pub const MIN_ZOOM: f32 = 5.0;
/// Upper bound for the orbit distance.
pub const MAX_ZOOM: f32 = 50.0;
/// Pitch is kept within a quarter turn either side of the horizon.
pub const MAX_PITCH: f32 = FRAC_PI_2;

pub const DEFAULT_ZOOM: f32 = 15.0;
pub const DEFAULT_ROTATE_SENSITIVITY: f32 = 0.005;
pub const DEFAULT_ZOOM_SENSITIVITY: f32 = 0.05;

/// Camera orientation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
}

impl Orientation {
    pub const fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }
}

/// Pose consumed by the shader: orientation plus orbit distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub orientation: Orientation,
    pub zoom: f32,
}

impl CameraState {
    /// Builds a pose with pitch and zoom clamped into their legal ranges.
    pub fn clamped(orientation: Orientation, zoom: f32) -> Self {
        Self {
            orientation: Orientation::new(clamp_pitch(orientation.pitch), orientation.yaw),
            zoom: clamp_zoom(zoom),
        }
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Input sensitivities applied when converting pointer deltas into pose deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    /// Radians per pixel of pointer travel.
    pub rotate: f32,
    /// Distance units per unit of scroll delta.
    pub zoom: f32,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            rotate: DEFAULT_ROTATE_SENSITIVITY,
            zoom: DEFAULT_ZOOM_SENSITIVITY,
        }
    }
}

/// Owns the rendered (`current`) and requested (`target`) camera poses.
///
/// Input only ever moves `target`. `current` follows it through
/// [`CameraModel::advance`], which the render loop calls exactly once per
/// frame.
#[derive(Debug, Clone)]
pub struct CameraModel {
    current: CameraState,
    target: CameraState,
    sensitivity: Sensitivity,
    damping: Damping,
}

impl CameraModel {
    pub fn new(initial: CameraState, sensitivity: Sensitivity, damping: Damping) -> Self {
        let initial = CameraState::clamped(initial.orientation, initial.zoom);
        Self {
            current: initial,
            target: initial,
            sensitivity,
            damping,
        }
    }

    pub fn current(&self) -> CameraState {
        self.current
    }

    pub fn target(&self) -> CameraState {
        self.target
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub fn damping(&self) -> Damping {
        self.damping
    }

    /// Rotates the target pose by a pointer delta in pixels.
    pub fn apply_orientation_delta(&mut self, dx: f32, dy: f32) {
        let orientation = &mut self.target.orientation;
        orientation.yaw -= dx * self.sensitivity.rotate;
        orientation.pitch = clamp_pitch(orientation.pitch - dy * self.sensitivity.rotate);
    }

    /// Moves the target orbit distance by a scroll delta.
    pub fn apply_zoom_delta(&mut self, delta_y: f32) {
        self.target.zoom = clamp_zoom(self.target.zoom + delta_y * self.sensitivity.zoom);
    }

    /// Eases `current` one step toward `target`.
    pub fn advance(&mut self) -> CameraState {
        self.current = self.damping.step(self.current, self.target);
        self.current
    }

    /// True once `current` sits within `epsilon` of `target` on every component.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.damping.has_converged(self.current, self.target, epsilon)
    }
}

impl Default for CameraModel {
    fn default() -> Self {
        Self::new(CameraState::default(), Sensitivity::default(), Damping::default())
    }
}

fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-MAX_PITCH, MAX_PITCH)
}

fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_target(pitch: f32, zoom: f32) -> CameraModel {
        CameraModel::new(
            CameraState::clamped(Orientation::new(pitch, 0.0), zoom),
            Sensitivity::default(),
            Damping::default(),
        )
    }

    #[test]
    fn scroll_scenario_moves_zoom_by_five() {
        let mut model = model_with_target(0.0, 15.0);
        model.apply_zoom_delta(100.0);
        assert!((model.target().zoom - 20.0).abs() < 1e-5);
    }

    #[test]
    fn pitch_clamps_to_exact_bounds() {
        let mut model = model_with_target(1.5, DEFAULT_ZOOM);
        model.apply_orientation_delta(0.0, -1000.0);
        assert_eq!(model.target().orientation.pitch, MAX_PITCH);

        let mut model = model_with_target(1.5, DEFAULT_ZOOM);
        model.apply_orientation_delta(0.0, 1000.0);
        assert_eq!(model.target().orientation.pitch, -MAX_PITCH);
    }

    #[test]
    fn pitch_and_zoom_stay_in_range_for_arbitrary_sequences() {
        let mut model = CameraModel::default();
        let deltas = [
            (3.0, 400.0),
            (-120.0, -900.0),
            (0.0, 12_000.0),
            (55.5, -0.25),
            (-1e4, 1e4),
            (7.0, -31_415.0),
        ];
        for (index, (dx, dy)) in deltas.iter().enumerate() {
            model.apply_orientation_delta(*dx, *dy);
            model.apply_zoom_delta(dy * (index as f32 - 2.5));
            let target = model.target();
            assert!(target.orientation.pitch.abs() <= MAX_PITCH);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&target.zoom));
        }
    }

    #[test]
    fn yaw_is_unbounded() {
        let mut model = CameraModel::default();
        for _ in 0..10 {
            model.apply_orientation_delta(1000.0, 0.0);
        }
        assert!((model.target().orientation.yaw + 50.0).abs() < 1e-3);
    }

    #[test]
    fn input_never_touches_current() {
        let mut model = CameraModel::default();
        let before = model.current();
        model.apply_orientation_delta(40.0, -12.0);
        model.apply_zoom_delta(-80.0);
        assert_eq!(model.current(), before);
        assert_ne!(model.target(), before);
    }

    #[test]
    fn initial_pose_is_clamped() {
        let model = CameraModel::new(
            CameraState {
                orientation: Orientation::new(3.0, 1.0),
                zoom: 500.0,
            },
            Sensitivity::default(),
            Damping::default(),
        );
        assert_eq!(model.current().orientation.pitch, MAX_PITCH);
        assert_eq!(model.current().zoom, MAX_ZOOM);
        assert_eq!(model.target(), model.current());
    }

    #[test]
    fn advance_settles_on_target() {
        let mut model = CameraModel::default();
        model.apply_orientation_delta(100.0, 50.0);
        model.apply_zoom_delta(200.0);
        assert!(!model.is_settled(1e-4));
        for _ in 0..200 {
            model.advance();
        }
        assert!(model.is_settled(1e-4));
    }
}
