use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;

const GRADIENT_TOP: Vec3 = Vec3::new(0.02, 0.03, 0.08);
const GRADIENT_BOTTOM: Vec3 = Vec3::new(0.16, 0.09, 0.22);

/// RGBA8 image sampled behind the volume. Bound once when the renderer is
/// created.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl BackgroundImage {
    /// Decodes a PNG or JPEG from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to load background {}", path.display()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        log::info!("loaded background {} ({width}x{height})", path.display());
        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    /// Vertical gradient used when no image is configured.
    pub fn gradient(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for row in 0..height {
            let t = if height > 1 {
                row as f32 / (height - 1) as f32
            } else {
                0.0
            };
            let color = GRADIENT_TOP.lerp(GRADIENT_BOTTOM, t) * 255.0;
            let texel = [
                color.x.round() as u8,
                color.y.round() as u8,
                color.z.round() as u8,
                255,
            ];
            for _ in 0..width {
                pixels.extend_from_slice(&texel);
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl Default for BackgroundImage {
    fn default() -> Self {
        Self::gradient(4, 256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_runs_top_to_bottom() {
        let image = BackgroundImage::gradient(2, 3);
        assert_eq!(image.pixels().len(), 2 * 3 * 4);
        let top = &image.pixels()[..4];
        let bottom = &image.pixels()[image.pixels().len() - 4..];
        assert_eq!(top, &[5, 8, 20, 255]);
        assert_eq!(bottom, &[41, 23, 56, 255]);
    }

    #[test]
    fn zero_sized_gradient_is_one_texel() {
        let image = BackgroundImage::gradient(0, 0);
        assert_eq!((image.width(), image.height()), (1, 1));
        assert_eq!(image.pixels().len(), 4);
    }

    #[test]
    fn loads_png_from_disk() {
        let file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .expect("temp file");
        let mut source = image::RgbaImage::new(3, 2);
        source.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        source.save(file.path()).expect("write png");

        let background = BackgroundImage::load(file.path()).expect("load png");
        assert_eq!((background.width(), background.height()), (3, 2));
        assert_eq!(&background.pixels()[20..24], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = BackgroundImage::load("/definitely/missing.png").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/missing.png"));
    }
}
