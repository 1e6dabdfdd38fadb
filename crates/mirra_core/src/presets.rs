//! Built-in scenes, available without a scene file.

use mirra_math::Vec3;

use crate::config::{CameraSettings, SceneError, SceneFile, SceneResult};
use crate::environment::SkyGradient;
use crate::scene::{Color, Light, Material, Scene, Sphere};

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["demo", "mirror-pair"];

/// Look up a preset by name.
pub fn by_name(name: &str) -> SceneResult<SceneFile> {
    match name {
        "demo" => Ok(demo()),
        "mirror-pair" => Ok(mirror_pair()),
        other => Err(SceneError::UnknownPreset(other.to_string())),
    }
}

/// Four glossy spheres resting on a large ground sphere, lit by two lights.
pub fn demo() -> SceneFile {
    let ground = Material::new(Color::splat(0.4), Color::splat(0.2), 20.0);
    let gold = Material::new(Color::new(0.6, 0.45, 0.1), Color::new(0.8, 0.65, 0.3), 80.0);
    let red = Material::new(Color::new(0.7, 0.1, 0.1), Color::splat(0.3), 50.0);
    let blue = Material::new(Color::new(0.1, 0.2, 0.7), Color::splat(0.3), 50.0);

    let scene = Scene::new(SkyGradient::default())
        .with_sphere(Sphere::new(Vec3::new(0.0, 0.0, -1000.0), 1000.0, ground))
        .with_sphere(Sphere::new(Vec3::new(0.0, 0.0, 1.0), 1.0, Material::mirror()))
        .with_sphere(Sphere::new(Vec3::new(-2.2, 0.5, 0.8), 0.8, red))
        .with_sphere(Sphere::new(Vec3::new(2.2, 0.5, 0.8), 0.8, blue))
        .with_sphere(Sphere::new(Vec3::new(0.0, 2.5, 0.6), 0.6, gold))
        .with_light(Light::new(Vec3::new(-6.0, -8.0, 10.0), Color::splat(0.8)))
        .with_light(Light::new(Vec3::new(8.0, -2.0, 6.0), Color::splat(0.4)))
        .with_bounce_limit(5);

    let camera = CameraSettings {
        look_from: Vec3::new(0.0, -9.0, 3.0),
        look_at: Vec3::new(0.0, 0.0, 0.8),
        ..Default::default()
    };

    SceneFile { scene, camera }
}

/// Two facing mirrors, for watching the bounce limit at work.
pub fn mirror_pair() -> SceneFile {
    let tinted = Material::new(Color::splat(0.05), Color::new(0.9, 0.9, 0.8), 200.0);

    let scene = Scene::new(SkyGradient::default())
        .with_sphere(Sphere::new(Vec3::new(-1.6, 0.0, 1.0), 1.5, tinted))
        .with_sphere(Sphere::new(Vec3::new(1.6, 0.0, 1.0), 1.5, tinted))
        .with_light(Light::new(Vec3::new(0.0, -6.0, 8.0), Color::ONE))
        .with_bounce_limit(12);

    let camera = CameraSettings {
        look_from: Vec3::new(0.0, -7.0, 1.5),
        look_at: Vec3::new(0.0, 0.0, 1.0),
        vfov: 35.0,
        ..Default::default()
    };

    SceneFile { scene, camera }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_resolve() {
        for name in NAMES {
            let file = by_name(name).unwrap();
            assert!(!file.scene.spheres.is_empty(), "{name} has no spheres");
            assert!(!file.scene.lights.is_empty(), "{name} has no lights");
        }
    }

    #[test]
    fn test_unknown_preset() {
        let err = by_name("teapot").unwrap_err();
        assert!(matches!(err, SceneError::UnknownPreset(name) if name == "teapot"));
    }
}
