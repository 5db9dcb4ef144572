use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::info;
use pollster::block_on;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use orbit_raymarch::input::native::{cursor_icon, WinitPointerMapper};
use orbit_raymarch::{
    BackgroundImage, CameraModel, Clock, CursorAffordance, HeadlessSink, LoopState, PointerEvent,
    RenderLoop, Renderer, Settings, ShadingSink, SystemClock, Viewport,
};

const DEFAULT_HEADLESS_FRAMES: u64 = 120;
const USAGE: &str = "Usage: orbit-raymarch [settings.xml] [--background <image>] [--frames <n>] [--headless] [--scroll <delta>]...";

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse(env::args().skip(1))?;
    let mut settings = match &options.settings {
        Some(path) => {
            info!("loading settings from {}", path.display());
            Settings::load(path)?
        }
        None => Settings::default(),
    };
    if let Some(background) = &options.background {
        settings.background = Some(background.clone());
    }

    if options.headless {
        return run_headless(&settings, &options);
    }
    match run_interactive(&settings, &options) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!("{err}. Falling back to --headless mode.");
            run_headless(&settings, &options)
        }
        Err(err) => Err(err),
    }
}

fn run_headless(settings: &Settings, options: &CliOptions) -> Result<()> {
    let viewport = Viewport::new(settings.width, settings.height, 1.0);
    let frames = options.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES);
    let mut render_loop = RenderLoop::new(
        settings.camera_model(),
        viewport,
        HeadlessSink::new(),
        SystemClock::start(),
    )
    .with_frame_limit(Some(frames));
    apply_scripted_scrolls(&mut render_loop, &options.scrolls);

    let rendered = render_loop.run_to_completion()?;
    println!("Rendered {rendered} frame(s) headless");
    print_final_state(render_loop.camera());
    Ok(())
}

fn run_interactive(settings: &Settings, options: &CliOptions) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| WindowInitError::new("event loop", err))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let background = match &settings.background {
        Some(path) => BackgroundImage::load(path)?,
        None => BackgroundImage::default(),
    };

    let mut app = ViewerApp {
        settings: settings.clone(),
        frame_limit: options.frames,
        scrolls: options.scrolls.clone(),
        background,
        viewer: None,
        last_error: None,
    };
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    if let Some(err) = app.last_error.take() {
        return Err(err);
    }
    if let Some(viewer) = &app.viewer {
        print_final_state(viewer.render_loop.camera());
    }
    Ok(())
}

fn apply_scripted_scrolls<S: ShadingSink, C: Clock>(
    render_loop: &mut RenderLoop<S, C>,
    scrolls: &[f32],
) {
    for delta_y in scrolls {
        render_loop.handle_pointer(PointerEvent::Scrolled { delta_y: *delta_y });
    }
}

fn print_final_state(camera: &CameraModel) {
    let current = camera.current();
    println!(
        "Final camera: pitch={:.3} yaw={:.3} zoom={:.3}",
        current.orientation.pitch, current.orientation.yaw, current.zoom
    );
}

struct ViewerApp {
    settings: Settings,
    frame_limit: Option<u64>,
    scrolls: Vec<f32>,
    background: BackgroundImage,
    viewer: Option<Viewer>,
    last_error: Option<anyhow::Error>,
}

struct Viewer {
    window: Arc<Window>,
    render_loop: RenderLoop<Renderer>,
    pointer: WinitPointerMapper,
}

impl ViewerApp {
    fn create_viewer(&self, event_loop: &ActiveEventLoop) -> Result<Viewer> {
        let attributes = Window::default_attributes()
            .with_title(self.settings.title.as_str())
            .with_inner_size(LogicalSize::new(
                self.settings.width as f64,
                self.settings.height as f64,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|err| WindowInitError::new("window", err))?,
        );
        window.set_cursor(cursor_icon(CursorAffordance::default()));

        let renderer = block_on(Renderer::new(Arc::clone(&window), &self.background))?;
        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height, window.scale_factor());
        let mut render_loop = RenderLoop::new(
            self.settings.camera_model(),
            viewport,
            renderer,
            SystemClock::start(),
        )
        .with_frame_limit(self.frame_limit);
        apply_scripted_scrolls(&mut render_loop, &self.scrolls);

        Ok(Viewer {
            window,
            render_loop,
            pointer: WinitPointerMapper::new(),
        })
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match self.create_viewer(event_loop) {
            Ok(viewer) => {
                info!("viewer started");
                viewer.window.request_redraw();
                self.viewer = Some(viewer);
            }
            Err(err) => {
                self.last_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        if window_id != viewer.window.id() {
            return;
        }

        match &event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                viewer.render_loop.stop_handle().stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                viewer.render_loop.resize(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                viewer.render_loop.set_scale_factor(*scale_factor);
                let size = viewer.window.inner_size();
                viewer.render_loop.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => match viewer.render_loop.tick(&*viewer.window) {
                Ok(LoopState::Running) => {}
                Ok(LoopState::Stopped) => event_loop.exit(),
                Err(err) => {
                    self.last_error = Some(anyhow!(err).context("rendering failed"));
                    event_loop.exit();
                }
            },
            _ => {
                let response = viewer
                    .render_loop
                    .handle_window_event(&mut viewer.pointer, &event);
                if let Some(cursor) = response.and_then(|response| response.cursor) {
                    viewer.window.set_cursor(cursor_icon(cursor));
                }
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to initialize {stage}: {message}")]
struct WindowInitError {
    stage: &'static str,
    message: String,
}

impl WindowInitError {
    fn new(stage: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    settings: Option<PathBuf>,
    background: Option<PathBuf>,
    frames: Option<u64>,
    headless: bool,
    scrolls: Vec<f32>,
}

impl CliOptions {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--headless" => options.headless = true,
                "--background" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--background expects a path. {USAGE}"))?;
                    options.background = Some(PathBuf::from(value));
                }
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--frames expects a count. {USAGE}"))?;
                    let frames = value
                        .parse::<u64>()
                        .ok()
                        .filter(|frames| *frames > 0)
                        .ok_or_else(|| anyhow!("invalid frame count: {value}"))?;
                    options.frames = Some(frames);
                }
                "--scroll" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--scroll expects a delta. {USAGE}"))?;
                    let delta = value
                        .parse::<f32>()
                        .ok()
                        .filter(|delta| delta.is_finite())
                        .ok_or_else(|| anyhow!("invalid scroll delta: {value}"))?;
                    options.scrolls.push(delta);
                }
                other if other.starts_with("--") => {
                    return Err(anyhow!("Unknown argument: {other}. {USAGE}"));
                }
                other => {
                    if options.settings.is_some() {
                        return Err(anyhow!("Unexpected argument: {other}. {USAGE}"));
                    }
                    options.settings = Some(PathBuf::from(other));
                }
            }
        }
        Ok(options)
    }
}
