//! Image textures for environment maps.
//!
//! Face images are decoded once with the `image` crate and kept as float
//! RGBA so lookups during rendering are plain array reads.

use std::path::Path;

use mirra_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// How stored 8-bit values map to the floats handed to the tracer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Use the stored values directly (value / 255).
    #[default]
    Linear,
    /// Decode sRGB to linear.
    Srgb,
}

impl ColorSpace {
    fn decode(self, value: u8) -> f32 {
        match self {
            ColorSpace::Linear => value as f32 / 255.0,
            ColorSpace::Srgb => srgb_to_linear(value),
        }
    }
}

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data as [R, G, B, A], row-major, top row first
    pub pixels: Vec<[f32; 4]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x, color.y, color.z, 1.0]],
            path: "<solid>".to_string(),
        }
    }

    /// Load a texture from an image file.
    pub fn load(path: impl AsRef<Path>, color_space: ColorSpace) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path.display().to_string()));
        }

        let pixels: Vec<[f32; 4]> = rgba
            .pixels()
            .map(|p| {
                [
                    color_space.decode(p[0]),
                    color_space.decode(p[1]),
                    color_space.decode(p[2]),
                    p[3] as f32 / 255.0, // Alpha is linear
                ]
            })
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Ok(Self::new(
            width,
            height,
            pixels,
            path.to_string_lossy().to_string(),
        ))
    }

    /// Sample the texture at UV coordinates (bilinear filtering).
    ///
    /// UV coordinates are in [0, 1] range, with (0, 0) at the top-left
    /// texel. Values outside the range are clamped to the edge.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let x = u * (self.width as f32 - 1.0);
        let y = v * (self.height as f32 - 1.0);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let p00 = self.get_pixel(x0, y0);
        let p10 = self.get_pixel(x1, y0);
        let p01 = self.get_pixel(x0, y1);
        let p11 = self.get_pixel(x1, y1);

        let top = p00.lerp(p10, fx);
        let bottom = p01.lerp(p11, fx);
        top.lerp(bottom, fy)
    }

    /// Get the RGB value at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> Vec3 {
        let idx = (y * self.width + x) as usize;
        let [r, g, b, _] = self.pixels.get(idx).copied().unwrap_or([0.0, 0.0, 0.0, 1.0]);
        Vec3::new(r, g, b)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
