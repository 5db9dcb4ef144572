use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::window::CursorIcon;

use super::{CursorAffordance, PointerEvent};

/// Pixels per wheel notch, matching the browser `deltaY` convention.
const LINE_HEIGHT: f32 = 100.0;

/// Translates winit window events into [`PointerEvent`]s.
///
/// Positions are reported in logical pixels so rotation speed does not depend
/// on the display's pixel density.
#[derive(Debug, Default)]
pub struct WinitPointerMapper {
    cursor: Option<Vec2>,
}

impl WinitPointerMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, event: &WindowEvent, scale_factor: f64) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let position = to_logical(*position, scale_factor);
                self.cursor = Some(position);
                Some(PointerEvent::Moved { position })
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Some(PointerEvent::Left)
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self
                    .cursor
                    .map(|position| PointerEvent::Pressed { position }),
                ElementState::Released => Some(PointerEvent::Released),
            },
            WindowEvent::MouseWheel { delta, .. } => Some(PointerEvent::Scrolled {
                delta_y: wheel_delta(*delta, scale_factor),
            }),
            _ => None,
        }
    }
}

/// Converts a winit wheel delta into a browser-style `deltaY`.
///
/// winit reports scrolling up as positive, browsers report it as negative.
pub fn wheel_delta(delta: MouseScrollDelta, scale_factor: f64) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
        MouseScrollDelta::PixelDelta(position) => -to_logical(position, scale_factor).y,
    }
}

pub fn cursor_icon(cursor: CursorAffordance) -> CursorIcon {
    match cursor {
        CursorAffordance::Grab => CursorIcon::Grab,
        CursorAffordance::Grabbing => CursorIcon::Grabbing,
    }
}

fn to_logical(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let logical = position.to_logical::<f64>(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_notch_down_zooms_out() {
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, -1.0), 1.0), 100.0);
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, 2.0), 1.0), -200.0);
    }

    #[test]
    fn pixel_deltas_are_scaled_to_logical() {
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -30.0));
        assert_eq!(wheel_delta(delta, 2.0), 15.0);
    }

    #[test]
    fn cursor_icons_follow_affordance() {
        assert_eq!(cursor_icon(CursorAffordance::Grab), CursorIcon::Grab);
        assert_eq!(cursor_icon(CursorAffordance::Grabbing), CursorIcon::Grabbing);
    }
}
