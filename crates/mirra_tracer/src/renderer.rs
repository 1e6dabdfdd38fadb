//! Whole-image rendering on top of [`trace`].
//!
//! One primary ray per pixel, no sampling. Colors are stored unclamped;
//! clamping and optional gamma happen only when converting to bytes.

use std::time::Instant;

use mirra_core::Scene;
use mirra_math::Vec4;

use crate::bucket::DEFAULT_BUCKET_SIZE;
use crate::tracer::trace;
use crate::Camera;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Bucket edge length in pixels for parallel rendering
    pub bucket_size: u32,
    /// Apply gamma 2.0 when converting to 8-bit
    pub gamma_correct: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bucket_size: DEFAULT_BUCKET_SIZE,
            gamma_correct: false,
        }
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a traced color to 8-bit RGBA.
pub fn color_to_rgba(color: Vec4, gamma_correct: bool) -> [u8; 4] {
    let encode = |c: f32| {
        let c = if gamma_correct { linear_to_gamma(c) } else { c };
        (255.0 * c.clamp(0.0, 1.0)).round() as u8
    };
    [
        encode(color.x),
        encode(color.y),
        encode(color.z),
        (255.0 * color.w.clamp(0.0, 1.0)).round() as u8,
    ]
}

/// Trace the primary ray for pixel (x, y).
#[inline]
pub fn render_pixel(camera: &Camera, scene: &Scene, x: u32, y: u32) -> Vec4 {
    trace(&camera.get_ray(x, y), scene)
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec4>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec4::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Vec4) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self, gamma_correct: bool) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color, gamma_correct));
        }
        bytes
    }
}

/// Render the entire scene to an image buffer on the calling thread.
pub fn render(camera: &Camera, scene: &Scene) -> ImageBuffer {
    let start = Instant::now();
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            image.set(x, y, render_pixel(camera, scene, x, y));
        }
    }

    log::info!(
        "Rendered {}x{} in {:.2?} (single thread)",
        image.width,
        image.height,
        start.elapsed()
    );
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirra_core::{Color, Material, SolidColor, Sphere};
    use mirra_math::Vec3;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        let rgba = color_to_rgba(Vec4::new(2.0, -1.0, 0.5, 1.0), false);
        assert_eq!(rgba, [255, 0, 128, 255]);
    }

    #[test]
    fn test_color_to_rgba_gamma() {
        let rgba = color_to_rgba(Vec4::new(0.25, 0.0, 1.0, 1.0), true);
        assert_eq!(rgba, [128, 0, 255, 255]);
    }

    #[test]
    fn test_image_buffer_roundtrip() {
        let mut image = ImageBuffer::new(3, 2);
        let c = Vec4::new(0.1, 0.2, 0.3, 1.0);
        image.set(2, 1, c);

        assert_eq!(image.get(2, 1), c);
        assert_eq!(image.get(0, 0), Vec4::ZERO);
        assert_eq!(image.to_rgba(false).len(), 3 * 2 * 4);
    }

    #[test]
    fn test_render_hits_sphere_in_center() {
        let red = Material::new(Color::ZERO, Color::new(1.0, 0.0, 0.0), 10.0);
        let scene = Scene::new(SolidColor(Color::new(0.0, 0.0, 1.0)))
            .with_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, red));

        let mut camera = Camera::new().with_resolution(9, 9);
        camera.initialize();

        let image = render(&camera, &scene);

        // Center pixel reflects the blue environment through the red tint
        let center = image.get(4, 4);
        assert_eq!(center, Vec4::new(0.0, 0.0, 0.0, 1.0));

        // Corner misses the sphere and sees the environment
        assert_eq!(image.get(0, 0), Vec4::new(0.0, 0.0, 1.0, 1.0));

        assert!(image.pixels.iter().all(|p| p.w == 1.0));
    }
}
