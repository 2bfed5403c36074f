//! Window size bookkeeping.
//!
//! winit reports sizes in physical pixels together with a scale factor. The
//! galaxy is drawn at `logical size × pixel ratio`, where the pixel ratio is
//! the scale factor capped at [`MAX_PIXEL_RATIO`], so very dense displays
//! don't pay for more pixels than the points need.

use winit::dpi::PhysicalSize;

/// Ceiling on device pixels per logical pixel for the galaxy pass.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Window width in physical pixels.
    pub width: u32,
    /// Window height in physical pixels.
    pub height: u32,
    /// Physical pixels per logical pixel as reported by the window system.
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self {
            width: size.width,
            height: size.height,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.width = size.width;
        self.height = size.height;
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// A minimized window reports a zero dimension; nothing should be drawn.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width / height. Returns 1.0 for an empty viewport.
    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Effective pixel ratio for the galaxy pass.
    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(MAX_PIXEL_RATIO)
    }

    /// Size of the galaxy render target in pixels, at least 1×1.
    pub fn render_size(&self) -> (u32, u32) {
        let scale = self.pixel_ratio() / self.scale_factor;
        let w = (self.width as f64 * scale).round().max(1.0) as u32;
        let h = (self.height as f64 * scale).round().max(1.0) as u32;
        (w, h)
    }
}
