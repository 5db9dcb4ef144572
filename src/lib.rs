//! Interactive orbit camera and render loop for a raymarched volume.
//!
//! Pointer drags and wheel scrolls move a *target* camera pose; once per
//! frame the rendered pose eases toward it and is published to a shading
//! sink as a handful of uniform values. The GPU sink lives in [`render`];
//! everything else is plain state that runs without a window.

pub mod app;
pub mod camera;
pub mod damping;
pub mod input;
pub mod render;
pub mod settings;
pub mod viewport;

pub use app::{Clock, FrameScheduler, LoopState, ManualScheduler, RenderLoop, StopHandle, SystemClock};
pub use camera::{CameraModel, CameraState, Orientation, Sensitivity};
pub use damping::{Damping, EasingOutOfRange};
pub use input::{CursorAffordance, DragSession, InputAdapter, InputResponse, PointerEvent};
pub use render::{BackgroundImage, HeadlessSink, RenderError, Renderer, ShaderParams, ShadingSink};
pub use settings::{Settings, SettingsError};
pub use viewport::Viewport;
