use glam::Vec2;

/// Drawable area in physical pixels plus the display's pixel density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scale_factor: sanitize_scale(scale_factor),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Density used to convert pointer positions to logical pixels.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Resolution published to the shader, in physical pixels.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Applies a new physical size. Returns `false` when nothing changed or
    /// the size has zero area.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return false;
        }
        log::debug!("viewport resized to {width}x{height}");
        self.width = width;
        self.height = height;
        true
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) -> bool {
        let scale_factor = sanitize_scale(scale_factor);
        if scale_factor == self.scale_factor {
            return false;
        }
        self.scale_factor = scale_factor;
        true
    }
}

fn sanitize_scale(scale_factor: f64) -> f64 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_is_idempotent() {
        let mut viewport = Viewport::new(800, 600, 1.0);
        assert!(viewport.resize(1024, 768));
        assert!(!viewport.resize(1024, 768));
        assert_eq!(viewport.resolution(), Vec2::new(1024.0, 768.0));
    }

    #[test]
    fn zero_area_is_ignored() {
        let mut viewport = Viewport::new(800, 600, 1.0);
        assert!(!viewport.resize(0, 600));
        assert!(!viewport.resize(800, 0));
        assert_eq!(viewport.size(), (800, 600));
    }

    #[test]
    fn scale_factor_changes_are_sanitized() {
        let mut viewport = Viewport::new(2560, 1440, 2.0);
        assert_eq!(viewport.scale_factor(), 2.0);
        assert!(!viewport.set_scale_factor(2.0));
        assert!(viewport.set_scale_factor(f64::NAN));
        assert_eq!(viewport.scale_factor(), 1.0);
    }
}
