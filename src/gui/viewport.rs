use log::debug;

use super::camera::OrbitCamera;

pub const MAX_PIXEL_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Viewport {
            width,
            height,
            pixel_ratio: device_pixel_ratio.min(MAX_PIXEL_RATIO),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    // Only reported; kiss3d sizes its own framebuffer from the window
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let scale = |x: u32| (x as f64 * self.pixel_ratio).round() as u32;
        (scale(self.width), scale(self.height))
    }
}

pub fn apply_resize(viewport: &mut Viewport, camera: &mut OrbitCamera, width: u32, height: u32) {
    camera.set_viewport(width, height);
    viewport.resize(width, height);
    debug!(
        "Resized to {}x{} (aspect {:.3})",
        width,
        height,
        camera.aspect()
    );
}
