use glam::Vec2;

use crate::camera::CameraModel;

pub mod native;

/// Platform-neutral pointer and wheel events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { position: Vec2 },
    Moved { position: Vec2 },
    Released,
    /// Pointer left the tracked surface.
    Left,
    /// Signed wheel delta in pixels, positive moves the camera away.
    Scrolled { delta_y: f32 },
}

/// Cursor shown over the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorAffordance {
    #[default]
    Grab,
    Grabbing,
}

/// Live drag between a press and the matching release or leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    last_position: Vec2,
}

impl DragSession {
    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }
}

/// What the platform layer should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputResponse {
    /// New cursor to display, only set when it changed.
    pub cursor: Option<CursorAffordance>,
    /// The platform's default handling must be suppressed, e.g. page
    /// scrolling in a browser host. winit has no default wheel behaviour, so
    /// the desktop viewer has nothing to suppress.
    pub consumed: bool,
}

/// Turns pointer and wheel events into camera target updates.
#[derive(Debug, Default)]
pub struct InputAdapter {
    session: Option<DragSession>,
    cursor: CursorAffordance,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn cursor(&self) -> CursorAffordance {
        self.cursor
    }

    /// Starts a drag at `position`. Ignored while a drag is already active.
    pub fn begin_drag(&mut self, position: Vec2) -> Option<CursorAffordance> {
        if self.session.is_some() {
            return None;
        }
        log::debug!("drag started at ({:.1}, {:.1})", position.x, position.y);
        self.session = Some(DragSession {
            last_position: position,
        });
        self.set_cursor(CursorAffordance::Grabbing)
    }

    /// Feeds a pointer move into the active drag and returns the applied delta.
    pub fn update_drag(&mut self, position: Vec2, camera: &mut CameraModel) -> Option<Vec2> {
        let session = self.session.as_mut()?;
        let delta = position - session.last_position;
        session.last_position = position;
        camera.apply_orientation_delta(delta.x, delta.y);
        Some(delta)
    }

    /// Ends the active drag, if any.
    pub fn end_drag(&mut self) -> Option<CursorAffordance> {
        if self.session.take().is_some() {
            log::debug!("drag ended");
        }
        self.set_cursor(CursorAffordance::Grab)
    }

    pub fn scroll(&mut self, delta_y: f32, camera: &mut CameraModel) {
        camera.apply_zoom_delta(delta_y);
    }

    /// Dispatches a single event. Release and leave share the same path.
    pub fn handle(&mut self, event: PointerEvent, camera: &mut CameraModel) -> InputResponse {
        match event {
            PointerEvent::Pressed { position } => InputResponse {
                cursor: self.begin_drag(position),
                consumed: false,
            },
            PointerEvent::Moved { position } => {
                self.update_drag(position, camera);
                InputResponse::default()
            }
            PointerEvent::Released | PointerEvent::Left => InputResponse {
                cursor: self.end_drag(),
                consumed: false,
            },
            PointerEvent::Scrolled { delta_y } => {
                self.scroll(delta_y, camera);
                InputResponse {
                    cursor: None,
                    consumed: true,
                }
            }
        }
    }

    fn set_cursor(&mut self, cursor: CursorAffordance) -> Option<CursorAffordance> {
        if self.cursor == cursor {
            return None;
        }
        self.cursor = cursor;
        Some(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_scenario_applies_expected_delta() {
        let mut camera = CameraModel::default();
        let mut input = InputAdapter::new();
        input.begin_drag(Vec2::new(100.0, 100.0));
        let delta = input.update_drag(Vec2::new(110.0, 95.0), &mut camera);
        assert_eq!(delta, Some(Vec2::new(10.0, -5.0)));

        let target = camera.target();
        assert!((target.orientation.yaw + 0.05).abs() < 1e-6);
        assert!((target.orientation.pitch - 0.025).abs() < 1e-6);
    }

    #[test]
    fn begin_drag_while_active_keeps_last_position() {
        let mut input = InputAdapter::new();
        assert_eq!(
            input.begin_drag(Vec2::new(5.0, 5.0)),
            Some(CursorAffordance::Grabbing)
        );
        assert_eq!(input.begin_drag(Vec2::new(300.0, 40.0)), None);
        assert_eq!(
            input.session().map(DragSession::last_position),
            Some(Vec2::new(5.0, 5.0))
        );
    }

    #[test]
    fn end_drag_twice_matches_once() {
        let mut input = InputAdapter::new();
        input.begin_drag(Vec2::ZERO);
        assert_eq!(input.end_drag(), Some(CursorAffordance::Grab));
        assert_eq!(input.end_drag(), None);
        assert!(!input.is_dragging());
        assert_eq!(input.cursor(), CursorAffordance::Grab);
    }

    #[test]
    fn moves_without_session_are_ignored() {
        let mut camera = CameraModel::default();
        let mut input = InputAdapter::new();
        assert_eq!(input.update_drag(Vec2::new(50.0, 50.0), &mut camera), None);
        assert_eq!(camera.target(), CameraModel::default().target());
    }

    #[test]
    fn leaving_mid_drag_stops_rotation_until_next_press() {
        let mut camera = CameraModel::default();
        let mut input = InputAdapter::new();
        input.handle(
            PointerEvent::Pressed {
                position: Vec2::new(10.0, 10.0),
            },
            &mut camera,
        );
        input.handle(
            PointerEvent::Moved {
                position: Vec2::new(20.0, 10.0),
            },
            &mut camera,
        );
        let response = input.handle(PointerEvent::Left, &mut camera);
        assert_eq!(response.cursor, Some(CursorAffordance::Grab));

        let after_leave = camera.target();
        input.handle(
            PointerEvent::Moved {
                position: Vec2::new(400.0, 250.0),
            },
            &mut camera,
        );
        assert_eq!(camera.target(), after_leave);

        input.handle(
            PointerEvent::Pressed {
                position: Vec2::new(400.0, 250.0),
            },
            &mut camera,
        );
        input.handle(
            PointerEvent::Moved {
                position: Vec2::new(410.0, 250.0),
            },
            &mut camera,
        );
        assert!(camera.target().orientation.yaw < after_leave.orientation.yaw);
    }

    #[test]
    fn scroll_is_consumed_and_zooms() {
        let mut camera = CameraModel::default();
        let mut input = InputAdapter::new();
        let response = input.handle(PointerEvent::Scrolled { delta_y: 100.0 }, &mut camera);
        assert!(response.consumed);
        assert_eq!(response.cursor, None);
        assert!((camera.target().zoom - 20.0).abs() < 1e-5);
    }
}
