//! Per-frame orchestration: input goes to the camera target, every tick eases
//! the camera and publishes the result to a [`ShadingSink`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::camera::CameraModel;
use crate::input::native::WinitPointerMapper;
use crate::input::{InputAdapter, InputResponse, PointerEvent};
use crate::render::{RenderError, ShaderParams, ShadingSink};
use crate::viewport::Viewport;

/// Source of "run again before the next repaint" requests.
pub trait FrameScheduler {
    fn request_frame(&self);
}

impl FrameScheduler for Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

/// Scheduler for callers that drive [`RenderLoop::tick`] in their own loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualScheduler;

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self) {}
}

/// Monotonic time source for the `time` shader parameter.
pub trait Clock {
    fn elapsed_secs(&self) -> f32;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Shared flag that halts a [`RenderLoop`]. Safe to trigger from any thread.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Distance below which the camera counts as settled for diagnostics.
const SETTLE_EPSILON: f32 = 1e-4;

/// Owns the camera, the drag state and the viewport, and feeds a sink once
/// per frame.
pub struct RenderLoop<S, C = SystemClock> {
    camera: CameraModel,
    input: InputAdapter,
    viewport: Viewport,
    sink: S,
    clock: C,
    stop: StopHandle,
    frame_limit: Option<u64>,
    frames: u64,
    settled: bool,
}

impl<S: ShadingSink, C: Clock> RenderLoop<S, C> {
    pub fn new(camera: CameraModel, viewport: Viewport, mut sink: S, clock: C) -> Self {
        let (width, height) = viewport.size();
        sink.resize(width, height);
        let settled = camera.is_settled(SETTLE_EPSILON);
        Self {
            camera,
            input: InputAdapter::new(),
            viewport,
            sink,
            clock,
            stop: StopHandle::default(),
            frame_limit: None,
            frames: 0,
            settled,
        }
    }

    /// Stops the loop on its own after `limit` rendered frames.
    pub fn with_frame_limit(mut self, limit: Option<u64>) -> Self {
        self.frame_limit = limit;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    pub fn input(&self) -> &InputAdapter {
        &self.input
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether the last rendered pose had reached the target.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Applies a pointer or wheel event to the camera target.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InputResponse {
        self.input.handle(event, &mut self.camera)
    }

    /// Maps a winit event to pointer input using the viewport's scale factor.
    /// Returns `None` for events that are not pointer input.
    pub fn handle_window_event(
        &mut self,
        mapper: &mut WinitPointerMapper,
        event: &WindowEvent,
    ) -> Option<InputResponse> {
        let pointer = mapper.map(event, self.viewport.scale_factor())?;
        Some(self.handle_pointer(pointer))
    }

    /// Resizes the published resolution and the sink surface. Returns
    /// `false` when the size did not change.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.viewport.resize(width, height) {
            return false;
        }
        self.sink.resize(width, height);
        true
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) -> bool {
        self.viewport.set_scale_factor(scale_factor)
    }

    /// Runs one frame: schedule the next one, ease the camera, publish, draw.
    pub fn tick(&mut self, scheduler: &impl FrameScheduler) -> Result<LoopState, RenderError> {
        if self.stop.is_stopped() {
            return Ok(LoopState::Stopped);
        }
        scheduler.request_frame();

        let camera = self.camera.advance();
        let settled = self.camera.is_settled(SETTLE_EPSILON);
        if settled && !self.settled {
            log::trace!("camera settled after {} frame(s)", self.frames + 1);
        }
        self.settled = settled;
        let time = self.clock.elapsed_secs();
        let params = ShaderParams::new(time, self.viewport.resolution(), camera);
        self.sink.publish(&params);
        self.sink.render()?;
        self.frames += 1;

        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            log::info!("frame limit reached after {} frame(s)", self.frames);
            self.stop.stop();
        }
        Ok(if self.stop.is_stopped() {
            LoopState::Stopped
        } else {
            LoopState::Running
        })
    }

    /// Ticks until stopped. For sinks that do not need a platform event loop.
    pub fn run_to_completion(&mut self) -> Result<u64, RenderError> {
        while self.tick(&ManualScheduler)? == LoopState::Running {}
        Ok(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use glam::Vec2;

    use super::*;
    use crate::input::CursorAffordance;
    use crate::render::HeadlessSink;

    #[derive(Default)]
    struct StepClock {
        now: Cell<f32>,
    }

    impl Clock for StepClock {
        fn elapsed_secs(&self) -> f32 {
            let now = self.now.get();
            self.now.set(now + 0.5);
            now
        }
    }

    #[derive(Default)]
    struct CountingScheduler {
        requests: Cell<u32>,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&self) {
            self.requests.set(self.requests.get() + 1);
        }
    }

    fn headless_loop() -> RenderLoop<HeadlessSink, StepClock> {
        RenderLoop::new(
            CameraModel::default(),
            Viewport::new(640, 480, 1.0),
            HeadlessSink::new(),
            StepClock::default(),
        )
    }

    #[test]
    fn tick_publishes_eased_pose_and_time() {
        let mut render_loop = headless_loop();
        render_loop.handle_pointer(PointerEvent::Scrolled { delta_y: 100.0 });
        let scheduler = CountingScheduler::default();

        assert_eq!(render_loop.tick(&scheduler).unwrap(), LoopState::Running);
        let first = *render_loop.sink().last_rendered().unwrap();
        assert_eq!(first.time, 0.0);
        assert_eq!(first.resolution, Vec2::new(640.0, 480.0));
        assert!((first.zoom - 16.5).abs() < 1e-5);

        render_loop.tick(&scheduler).unwrap();
        let second = *render_loop.sink().last_rendered().unwrap();
        assert_eq!(second.time, 0.5);
        assert!(second.zoom > first.zoom && second.zoom < 20.0);
        assert_eq!(scheduler.requests.get(), 2);
    }

    #[test]
    fn input_between_frames_is_seen_by_next_frame() {
        let mut render_loop = headless_loop();
        render_loop.tick(&ManualScheduler).unwrap();
        render_loop.handle_pointer(PointerEvent::Pressed {
            position: Vec2::new(100.0, 100.0),
        });
        render_loop.handle_pointer(PointerEvent::Moved {
            position: Vec2::new(110.0, 95.0),
        });
        assert_eq!(render_loop.camera().current().orientation.yaw, 0.0);

        render_loop.tick(&ManualScheduler).unwrap();
        let rotation = render_loop.sink().last_rendered().unwrap().rotation;
        assert!((rotation.y + 0.015).abs() < 1e-6);
        assert!((rotation.x - 0.0075).abs() < 1e-6);
    }

    #[test]
    fn stop_handle_halts_without_scheduling() {
        let mut render_loop = headless_loop();
        let scheduler = CountingScheduler::default();
        render_loop.stop_handle().stop();
        assert_eq!(render_loop.tick(&scheduler).unwrap(), LoopState::Stopped);
        assert_eq!(scheduler.requests.get(), 0);
        assert_eq!(render_loop.sink().frames(), 0);
    }

    #[test]
    fn frame_limit_stops_the_loop() {
        let mut render_loop = headless_loop().with_frame_limit(Some(5));
        assert_eq!(render_loop.run_to_completion().unwrap(), 5);
        assert_eq!(render_loop.sink().frames(), 5);
        assert_eq!(render_loop.tick(&ManualScheduler).unwrap(), LoopState::Stopped);
        assert_eq!(render_loop.sink().frames(), 5);
    }

    #[test]
    fn settles_after_easing_toward_new_target() {
        let mut render_loop = headless_loop();
        assert!(render_loop.is_settled());
        render_loop.handle_pointer(PointerEvent::Scrolled { delta_y: 100.0 });
        render_loop.tick(&ManualScheduler).unwrap();
        assert!(!render_loop.is_settled());
        for _ in 0..100 {
            render_loop.tick(&ManualScheduler).unwrap();
        }
        assert!(render_loop.is_settled());
    }

    #[test]
    fn window_pointer_events_use_viewport_scale_factor() {
        use winit::dpi::PhysicalPosition;
        use winit::event::{DeviceId, ElementState, MouseButton};

        let device_id = unsafe { DeviceId::dummy() };
        let moved = |x: f64, y: f64| WindowEvent::CursorMoved {
            device_id,
            position: PhysicalPosition::new(x, y),
        };

        let mut render_loop = headless_loop();
        render_loop.set_scale_factor(2.0);
        let mut mapper = WinitPointerMapper::new();

        render_loop.handle_window_event(&mut mapper, &moved(200.0, 200.0));
        let response = render_loop.handle_window_event(
            &mut mapper,
            &WindowEvent::MouseInput {
                device_id,
                state: ElementState::Pressed,
                button: MouseButton::Left,
            },
        );
        assert_eq!(
            response.and_then(|response| response.cursor),
            Some(CursorAffordance::Grabbing)
        );
        render_loop.handle_window_event(&mut mapper, &moved(220.0, 190.0));

        let target = render_loop.camera().target();
        assert!((target.orientation.yaw + 0.05).abs() < 1e-6);
        assert!((target.orientation.pitch - 0.025).abs() < 1e-6);
        assert!(render_loop
            .handle_window_event(&mut mapper, &WindowEvent::Focused(true))
            .is_none());
    }

    #[test]
    fn resize_reaches_sink_once_per_change() {
        let mut render_loop = headless_loop();
        assert_eq!(render_loop.sink().resize_count(), 1);
        assert!(render_loop.resize(1024, 768));
        assert!(!render_loop.resize(1024, 768));
        assert_eq!(render_loop.sink().resize_count(), 2);
        assert_eq!(render_loop.sink().size(), Some((1024, 768)));

        render_loop.tick(&ManualScheduler).unwrap();
        let params = render_loop.sink().last_rendered().unwrap();
        assert_eq!(params.resolution, Vec2::new(1024.0, 768.0));
    }
}
