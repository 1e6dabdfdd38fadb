//! Environments: the color seen along a ray that leaves the scene.
//!
//! The tracer only ever calls [`Environment::sample`] with the escaping
//! ray's direction. How that direction becomes a color is up to the host.

use std::path::Path;

use mirra_math::Vec3;
use serde::Deserialize;

use crate::scene::Color;
use crate::texture::{ColorSpace, Texture, TextureResult};

/// Background lookup by direction.
pub trait Environment: Send + Sync {
    /// Color seen along `direction`.
    fn sample(&self, direction: Vec3) -> Color;
}

impl<F> Environment for F
where
    F: Fn(Vec3) -> Color + Send + Sync,
{
    fn sample(&self, direction: Vec3) -> Color {
        self(direction)
    }
}

/// The same color in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor(pub Color);

impl Environment for SolidColor {
    fn sample(&self, _direction: Vec3) -> Color {
        self.0
    }
}

/// Which world axis points up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpAxis {
    Y,
    #[default]
    Z,
}

impl UpAxis {
    /// Unit vector along this axis.
    pub fn vector(self) -> Vec3 {
        match self {
            UpAxis::Y => Vec3::Y,
            UpAxis::Z => Vec3::Z,
        }
    }

    /// Map a world direction into the y-up frame cube maps are authored in.
    #[inline]
    fn to_y_up(self, d: Vec3) -> Vec3 {
        match self {
            UpAxis::Y => d,
            UpAxis::Z => Vec3::new(d.x, d.z, d.y),
        }
    }
}

/// Vertical blend between a horizon and a zenith color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    pub horizon: Color,
    pub zenith: Color,
    pub up: Vec3,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
            up: Vec3::Z,
        }
    }
}

impl Environment for SkyGradient {
    fn sample(&self, direction: Vec3) -> Color {
        let a = 0.5 * (direction.normalize().dot(self.up) + 1.0);
        self.horizon * (1.0 - a) + self.zenith * a
    }
}

/// Cube map face order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX = 0,
    NegativeX = 1,
    PositiveY = 2,
    NegativeY = 3,
    PositiveZ = 4,
    NegativeZ = 5,
}

/// Six-face environment map.
///
/// Faces are stored +X, -X, +Y, -Y, +Z, -Z and addressed with the usual
/// major-axis rule, so images exported for OpenGL or WebGL cube maps work
/// unchanged.
#[derive(Debug, Clone)]
pub struct CubeMap {
    faces: [Texture; 6],
    up_axis: UpAxis,
}

impl CubeMap {
    /// Build a cube map from six textures in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn new(faces: [Texture; 6], up_axis: UpAxis) -> Self {
        Self { faces, up_axis }
    }

    /// Load six face images in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn load<P: AsRef<Path>>(
        paths: &[P; 6],
        color_space: ColorSpace,
        up_axis: UpAxis,
    ) -> TextureResult<Self> {
        let [px, nx, py, ny, pz, nz] = paths;
        let faces = [
            Texture::load(px, color_space)?,
            Texture::load(nx, color_space)?,
            Texture::load(py, color_space)?,
            Texture::load(ny, color_space)?,
            Texture::load(pz, color_space)?,
            Texture::load(nz, color_space)?,
        ];
        log::info!(
            "Loaded cube map ({}x{} faces, {:?} up)",
            faces[0].width,
            faces[0].height,
            up_axis
        );
        Ok(Self::new(faces, up_axis))
    }

    /// Pick the face for a y-up direction and the (s, t) coordinates on it.
    ///
    /// `t` grows downwards on the face image.
    pub fn face_coords(d: Vec3) -> (CubeFace, f32, f32) {
        let a = d.abs();
        let (face, sc, tc, ma) = if a.x >= a.y && a.x >= a.z {
            if d.x >= 0.0 {
                (CubeFace::PositiveX, -d.z, -d.y, a.x)
            } else {
                (CubeFace::NegativeX, d.z, -d.y, a.x)
            }
        } else if a.y >= a.z {
            if d.y >= 0.0 {
                (CubeFace::PositiveY, d.x, d.z, a.y)
            } else {
                (CubeFace::NegativeY, d.x, -d.z, a.y)
            }
        } else if d.z >= 0.0 {
            (CubeFace::PositiveZ, d.x, -d.y, a.z)
        } else {
            (CubeFace::NegativeZ, -d.x, -d.y, a.z)
        };

        let s = 0.5 * (sc / ma + 1.0);
        let t = 0.5 * (tc / ma + 1.0);
        (face, s, t)
    }
}

impl Environment for CubeMap {
    fn sample(&self, direction: Vec3) -> Color {
        let (face, s, t) = Self::face_coords(self.up_axis.to_y_up(direction));
        self.faces[face as usize].sample(s, t)
    }
}
