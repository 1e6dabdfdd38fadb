//! JSON scene descriptions.
//!
//! A scene file carries the camera and image settings for the host next to
//! the scene itself:
//!
//! ```json
//! {
//!   "camera": { "lookFrom": [0, -8, 2], "lookAt": [0, 0, 0], "up": [0, 0, 1], "vfov": 45 },
//!   "image": { "width": 640, "height": 480 },
//!   "bounceLimit": 4,
//!   "spheres": [
//!     { "center": [0, 0, 0], "radius": 1,
//!       "material": { "diffuse": [0.8, 0.2, 0.2], "specular": [0.3, 0.3, 0.3], "shininess": 50 } }
//!   ],
//!   "lights": [ { "position": [5, -5, 10], "intensity": [1, 1, 1] } ],
//!   "environment": { "type": "gradient", "horizon": [1, 1, 1], "zenith": [0.5, 0.7, 1] }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use mirra_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::environment::{CubeMap, Environment, SkyGradient, SolidColor, UpAxis};
use crate::scene::{Color, Light, Material, Scene, Sphere, DEFAULT_BOUNCE_LIMIT};
use crate::texture::{ColorSpace, TextureError};

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Environment map error: {0}")]
    Texture(#[from] TextureError),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Camera placement and output size, as read from a scene file.
///
/// The tracer does not use these; they are for whoever generates the
/// primary rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(0.0, -8.0, 2.0),
            look_at: Vec3::ZERO,
            up: Vec3::Z,
            vfov: 45.0,
            width: 640,
            height: 480,
        }
    }
}

/// A loaded scene plus the host settings that came with it.
#[derive(Debug)]
pub struct SceneFile {
    pub scene: Scene,
    pub camera: CameraSettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneDescription {
    #[serde(default)]
    camera: CameraDescription,
    #[serde(default)]
    image: ImageDescription,
    #[serde(default = "default_bounce_limit")]
    bounce_limit: u32,
    #[serde(default)]
    spheres: Vec<SphereDescription>,
    #[serde(default)]
    lights: Vec<LightDescription>,
    #[serde(default)]
    environment: EnvironmentDescription,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CameraDescription {
    look_from: [f32; 3],
    look_at: [f32; 3],
    #[serde(default = "default_up")]
    up: [f32; 3],
    #[serde(default = "default_vfov")]
    vfov: f32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        let defaults = CameraSettings::default();
        Self {
            look_from: defaults.look_from.to_array(),
            look_at: defaults.look_at.to_array(),
            up: defaults.up.to_array(),
            vfov: defaults.vfov,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageDescription {
    width: u32,
    height: u32,
}

impl Default for ImageDescription {
    fn default() -> Self {
        let defaults = CameraSettings::default();
        Self {
            width: defaults.width,
            height: defaults.height,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SphereDescription {
    center: [f32; 3],
    radius: f32,
    #[serde(default)]
    material: MaterialDescription,
}

#[derive(Debug, Deserialize)]
struct MaterialDescription {
    #[serde(default)]
    diffuse: [f32; 3],
    #[serde(default)]
    specular: [f32; 3],
    #[serde(default = "default_shininess")]
    shininess: f32,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        let defaults = Material::default();
        Self {
            diffuse: defaults.diffuse.to_array(),
            specular: defaults.specular.to_array(),
            shininess: defaults.shininess,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LightDescription {
    position: [f32; 3],
    #[serde(default = "default_intensity")]
    intensity: [f32; 3],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum EnvironmentDescription {
    Solid {
        color: [f32; 3],
    },
    Gradient {
        horizon: [f32; 3],
        zenith: [f32; 3],
        #[serde(default, rename = "upAxis")]
        up_axis: UpAxis,
    },
    Cubemap {
        faces: CubeFacesDescription,
        #[serde(default, rename = "colorSpace")]
        color_space: ColorSpace,
        #[serde(default, rename = "upAxis")]
        up_axis: UpAxis,
    },
}

impl Default for EnvironmentDescription {
    fn default() -> Self {
        EnvironmentDescription::Solid { color: [0.0; 3] }
    }
}

#[derive(Debug, Deserialize)]
struct CubeFacesDescription {
    px: PathBuf,
    nx: PathBuf,
    py: PathBuf,
    ny: PathBuf,
    pz: PathBuf,
    nz: PathBuf,
}

fn default_bounce_limit() -> u32 {
    DEFAULT_BOUNCE_LIMIT
}

fn default_up() -> [f32; 3] {
    CameraSettings::default().up.to_array()
}

fn default_vfov() -> f32 {
    CameraSettings::default().vfov
}

fn default_shininess() -> f32 {
    Material::default().shininess
}

fn default_intensity() -> [f32; 3] {
    [1.0; 3]
}

/// Load a scene file from disk.
///
/// Relative cube map paths are resolved against the file's directory.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<SceneFile> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let file = load_scene_from_str(&json, base_dir)?;
    log::info!(
        "Loaded scene {}: {} spheres, {} lights, bounce limit {}",
        path.display(),
        file.scene.spheres.len(),
        file.scene.lights.len(),
        file.scene.bounce_limit
    );
    Ok(file)
}

/// Parse a scene description from a JSON string.
pub fn load_scene_from_str(json: &str, base_dir: impl AsRef<Path>) -> SceneResult<SceneFile> {
    let desc: SceneDescription = serde_json::from_str(json)?;
    let base_dir = base_dir.as_ref();

    let environment = build_environment(desc.environment, base_dir)?;

    let spheres = desc
        .spheres
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if s.radius <= 0.0 {
                log::warn!("Sphere {} has non-positive radius {}", i, s.radius);
            }
            Sphere::new(
                Vec3::from_array(s.center),
                s.radius,
                Material::new(
                    Color::from_array(s.material.diffuse),
                    Color::from_array(s.material.specular),
                    s.material.shininess,
                ),
            )
        })
        .collect();

    let lights = desc
        .lights
        .iter()
        .map(|l| Light::new(Vec3::from_array(l.position), Color::from_array(l.intensity)))
        .collect();

    let scene = Scene {
        spheres,
        lights,
        environment,
        bounce_limit: desc.bounce_limit,
    };

    let camera = CameraSettings {
        look_from: Vec3::from_array(desc.camera.look_from),
        look_at: Vec3::from_array(desc.camera.look_at),
        up: Vec3::from_array(desc.camera.up),
        vfov: desc.camera.vfov,
        width: desc.image.width,
        height: desc.image.height,
    };

    Ok(SceneFile { scene, camera })
}

fn build_environment(
    desc: EnvironmentDescription,
    base_dir: &Path,
) -> SceneResult<Box<dyn Environment>> {
    let environment: Box<dyn Environment> = match desc {
        EnvironmentDescription::Solid { color } => Box::new(SolidColor(Color::from_array(color))),
        EnvironmentDescription::Gradient {
            horizon,
            zenith,
            up_axis,
        } => Box::new(SkyGradient {
            horizon: Color::from_array(horizon),
            zenith: Color::from_array(zenith),
            up: up_axis.vector(),
        }),
        EnvironmentDescription::Cubemap {
            faces,
            color_space,
            up_axis,
        } => {
            let paths = [faces.px, faces.nx, faces.py, faces.ny, faces.pz, faces.nz]
                .map(|p| resolve_path(base_dir, p));
            Box::new(CubeMap::load(&paths, color_space, up_axis)?)
        }
    };
    Ok(environment)
}

/// Resolve a path relative to the scene file's directory.
fn resolve_path(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}
