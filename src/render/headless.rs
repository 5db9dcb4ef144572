use super::{RenderError, ShaderParams, ShadingSink};

/// Sink that keeps the published parameters instead of drawing.
///
/// Used for the `--headless` mode and for exercising the render loop without
/// a GPU.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    pending: Option<ShaderParams>,
    last_rendered: Option<ShaderParams>,
    frames: u64,
    size: Option<(u32, u32)>,
    resizes: u32,
}

impl HeadlessSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters of the most recently rendered frame.
    pub fn last_rendered(&self) -> Option<&ShaderParams> {
        self.last_rendered.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn resize_count(&self) -> u32 {
        self.resizes
    }
}

impl ShadingSink for HeadlessSink {
    fn publish(&mut self, params: &ShaderParams) {
        self.pending = Some(*params);
    }

    fn render(&mut self) -> Result<(), RenderError> {
        if let Some(params) = self.pending.take() {
            log::trace!(
                "frame {} t={:.3} rotation=({:.4}, {:.4}) zoom={:.3}",
                self.frames,
                params.time,
                params.rotation.x,
                params.rotation.y,
                params.zoom
            );
            self.last_rendered = Some(params);
        }
        self.frames += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
        self.resizes += 1;
    }
}
