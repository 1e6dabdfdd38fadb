//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are traced independently
//! and in parallel using rayon. The scene is only read, so workers share
//! one `&Scene` with no locking.

use std::time::Instant;

use mirra_core::Scene;
use mirra_math::Vec4;
use rayon::prelude::*;

use crate::renderer::{render_pixel, ImageBuffer, RenderConfig};
use crate::Camera;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets for an image, sorted from the center outwards.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    buckets.sort_by(|a, b| {
        let a_center_x = a.x as f32 + a.width as f32 / 2.0;
        let a_center_y = a.y as f32 + a.height as f32 / 2.0;
        let b_center_x = b.x as f32 + b.width as f32 / 2.0;
        let b_center_y = b.y as f32 + b.height as f32 / 2.0;

        let a_dist = (a_center_x - center_x).powi(2) + (a_center_y - center_y).powi(2);
        let b_dist = (b_center_x - center_x).powi(2) + (b_center_y - center_y).powi(2);

        a_dist.partial_cmp(&b_dist).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render a single bucket to a vector of colors.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, scene: &Scene) -> Vec<Vec4> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(camera, scene, global_x, global_y));
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Vec4>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Vec4>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy this bucket's pixels into the full image.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let b = &self.bucket;
        for local_y in 0..b.height {
            for local_x in 0..b.width {
                let color = self.pixels[(local_y * b.width + local_x) as usize];
                image.set(b.x + local_x, b.y + local_y, color);
            }
        }
    }
}

/// Render the entire scene with all rayon worker threads.
///
/// Produces exactly the same image as [`crate::render`].
pub fn render_parallel(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);
    log::debug!(
        "Rendering {} buckets of {}px on {} threads",
        buckets.len(),
        config.bucket_size,
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, camera, scene)))
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        result.write_into(&mut image);
    }

    log::info!(
        "Rendered {}x{} in {:.2?} ({} buckets)",
        image.width,
        image.height,
        start.elapsed(),
        results.len()
    );
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::render;
    use mirra_core::presets;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
        assert_eq!(first.index, 0);
    }

    #[test]
    fn test_zero_bucket_size_is_clamped() {
        let buckets = generate_buckets(3, 2, 0);
        assert_eq!(buckets.len(), 6);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let file = presets::demo();
        let mut camera = Camera::new()
            .with_resolution(37, 23)
            .with_position(file.camera.look_from, file.camera.look_at, file.camera.up)
            .with_fov(file.camera.vfov);
        camera.initialize();

        let config = RenderConfig {
            bucket_size: 8,
            ..Default::default()
        };

        let serial = render(&camera, &file.scene);
        let parallel = render_parallel(&camera, &file.scene, &config);

        assert_eq!(serial.to_rgba(false), parallel.to_rgba(false));
        for (a, b) in serial.pixels.iter().zip(parallel.pixels.iter()) {
            assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
        }
    }
}
