mod background;
mod common;
mod headless;
mod native;
mod shared;

use thiserror::Error;

pub use background::BackgroundImage;
pub use common::{ShaderParams, ShaderUniform};
pub use headless::HeadlessSink;
pub use native::Renderer;
pub use shared::SHADER;

/// Consumer of the per-frame shading parameters.
///
/// The render loop publishes a fresh [`ShaderParams`] value before every
/// [`render`](ShadingSink::render) call. Implementations never hand state back
/// to the loop.
pub trait ShadingSink {
    fn publish(&mut self, params: &ShaderParams);

    fn render(&mut self) -> Result<(), RenderError>;

    /// Matches the backing surface to a new physical size.
    fn resize(&mut self, width: u32, height: u32);
}

/// Failures the sink could not absorb on its own.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("GPU is out of memory")]
    OutOfMemory,
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
