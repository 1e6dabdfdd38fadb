//! Top-level ray tracing: primary hit, direct lighting, mirror bounces.

use mirra_core::Scene;
use mirra_math::{reflect, Ray, Vec4};

use crate::intersect::intersect;
use crate::shade::shade;

/// Hard ceiling on reflection bounces, whatever `Scene::bounce_limit` says.
pub const MAX_BOUNCES: u32 = 16;

/// Trace a ray through the scene and return its color with alpha 1.
///
/// A miss returns the environment along `ray.direction`. A hit is shaded,
/// then reflected until a reflection escapes (which adds the environment
/// and stops), the accumulated specular tint sums to zero, or
/// `min(scene.bounce_limit, MAX_BOUNCES)` bounces have been taken.
///
/// Reflection rays start exactly at the hit point and every bounce is
/// shaded with the primary ray's view direction.
pub fn trace(ray: &Ray, scene: &Scene) -> Vec4 {
    let Some(hit) = intersect(ray, &scene.spheres) else {
        return scene.sample_environment(ray.direction).extend(1.0);
    };

    let view = (-ray.direction).normalize();
    let mut color = shade(scene, &hit.material, hit.position, hit.normal, view);

    let mut attenuation = hit.material.specular;
    let mut current_ray = *ray;
    let mut current_hit = hit;

    let bounce_cap = scene.bounce_limit.min(MAX_BOUNCES);
    let mut bounce = 0;

    while bounce < bounce_cap && attenuation.element_sum() > 0.0 {
        let reflected = Ray::new(
            current_hit.position,
            reflect(current_ray.direction, current_hit.normal).normalize(),
        );

        match intersect(&reflected, &scene.spheres) {
            Some(next) => {
                color += attenuation * shade(scene, &next.material, next.position, next.normal, view);
                attenuation *= next.material.specular;
                current_ray = reflected;
                current_hit = next;
                bounce += 1;
            }
            None => {
                // Escaped: no more bounces regardless of the remaining budget
                color += attenuation * scene.sample_environment(reflected.direction);
                break;
            }
        }
    }

    color.extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirra_core::{presets, Color, Light, Material, SolidColor, Sphere};
    use mirra_math::Vec3;

    const EPS: f32 = 1e-5;

    /// Environment that encodes the direction, so tests can see which way a
    /// ray escaped.
    fn direction_env(d: Vec3) -> Color {
        d * 0.5 + Vec3::splat(0.5)
    }

    fn mirror_scene() -> Scene {
        Scene::new(direction_env).with_sphere(Sphere::new(Vec3::ZERO, 1.0, Material::mirror()))
    }

    /// A lit unit sphere at the origin facing a second sphere straight
    /// above it, so a ray coming down the z axis bounces between the two.
    fn ping_pong_scene(upper: Material) -> Scene {
        let lower = Material::new(Color::splat(0.5), Color::splat(0.5), 10.0);
        Scene::new(SolidColor(Color::new(0.2, 0.4, 0.6)))
            .with_sphere(Sphere::new(Vec3::ZERO, 1.0, lower))
            .with_sphere(Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0, upper))
            .with_light(Light::new(Vec3::new(3.0, 0.0, 5.0), Color::ONE))
    }

    fn down_the_axis() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
    }

    fn with_limit(mut scene: Scene, limit: u32) -> Scene {
        scene.bounce_limit = limit;
        scene
    }

    #[test]
    fn test_miss_returns_environment() {
        let scene = mirror_scene();
        let dir = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), dir);

        assert_eq!(trace(&ray, &scene), direction_env(dir).extend(1.0));
    }

    #[test]
    fn test_miss_uses_raw_direction() {
        // The environment sees the direction exactly as given
        let scene = Scene::new(|d: Vec3| d);
        let dir = Vec3::new(0.0, 3.0, 4.0);
        let ray = Ray::new(Vec3::ZERO, dir);

        assert_eq!(trace(&ray, &scene), Vec4::new(0.0, 3.0, 4.0, 1.0));
    }

    #[test]
    fn test_mirror_reflects_environment() {
        // No lights and no diffuse: only the reflected environment remains
        let color = trace(&down_the_axis(), &mirror_scene());
        assert_eq!(color, direction_env(Vec3::Z).extend(1.0));
    }

    #[test]
    fn test_mirror_reflects_environment_oblique() {
        let ray = Ray::new(Vec3::new(0.6, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let color = trace(&ray, &mirror_scene());

        // Hit at (0.6, 0, 0.8); mirror of -z about that normal
        let expected = direction_env(Vec3::new(0.96, 0.0, 0.28));
        assert!((color.truncate() - expected).abs().max_element() < EPS, "{color:?}");
        assert_eq!(color.w, 1.0);
    }

    #[test]
    fn test_reflection_is_tinted_by_specular() {
        let tint = Material::new(Color::ZERO, Color::new(1.0, 0.5, 0.0), 10.0);
        let scene = Scene::new(SolidColor(Color::ONE)).with_sphere(Sphere::new(Vec3::ZERO, 1.0, tint));

        let color = trace(&down_the_axis(), &scene);
        assert_eq!(color, Vec4::new(1.0, 0.5, 0.0, 1.0));
    }

    #[test]
    fn test_bounce_limit_zero_skips_reflections() {
        let scene = with_limit(mirror_scene(), 0);
        assert_eq!(trace(&down_the_axis(), &scene), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_non_reflective_hit_is_local_shading_only() {
        let matte = Material::new(Color::splat(0.5), Color::ZERO, 1.0);
        let light = Light::new(Vec3::new(0.0, 0.0, 10.0), Color::ONE);
        let scene = Scene::new(SolidColor(Color::ONE))
            .with_sphere(Sphere::new(Vec3::ZERO, 1.0, matte))
            .with_light(light);

        let color = trace(&down_the_axis(), &scene);
        let expected = shade(&scene, &matte, Vec3::Z, Vec3::Z, Vec3::Z);
        assert_eq!(color, expected.extend(1.0));
    }

    #[test]
    fn test_raising_limit_after_escape_changes_nothing() {
        let baseline = trace(&down_the_axis(), &with_limit(mirror_scene(), 1));
        for limit in [2, 5, MAX_BOUNCES, MAX_BOUNCES + 1, u32::MAX] {
            let color = trace(&down_the_axis(), &with_limit(mirror_scene(), limit));
            assert_eq!(color, baseline, "limit {limit}");
        }
    }

    #[test]
    fn test_zero_attenuation_stops_bouncing() {
        let absorber = Material::new(Color::splat(0.5), Color::ZERO, 10.0);

        let none = trace(&down_the_axis(), &with_limit(ping_pong_scene(absorber), 0));
        let one = trace(&down_the_axis(), &with_limit(ping_pong_scene(absorber), 1));
        assert_ne!(none, one);

        for limit in [2, 3, MAX_BOUNCES, u32::MAX] {
            let color = trace(&down_the_axis(), &with_limit(ping_pong_scene(absorber), limit));
            assert_eq!(color, one, "limit {limit}");
        }
    }

    #[test]
    fn test_compiled_ceiling_caps_runtime_limit() {
        let glossy = Material::new(Color::splat(0.5), Color::splat(0.5), 10.0);

        let below = trace(&down_the_axis(), &with_limit(ping_pong_scene(glossy), MAX_BOUNCES - 1));
        let at = trace(&down_the_axis(), &with_limit(ping_pong_scene(glossy), MAX_BOUNCES));
        let above = trace(&down_the_axis(), &with_limit(ping_pong_scene(glossy), MAX_BOUNCES + 10));
        let huge = trace(&down_the_axis(), &with_limit(ping_pong_scene(glossy), u32::MAX));

        assert_ne!(below, at);
        assert_eq!(at, above);
        assert_eq!(at, huge);
    }

    #[test]
    fn test_each_bounce_adds_light() {
        let glossy = Material::new(Color::splat(0.5), Color::splat(0.5), 10.0);
        let mut previous = trace(&down_the_axis(), &with_limit(ping_pong_scene(glossy), 0));

        for limit in 1..=4 {
            let color = trace(&down_the_axis(), &with_limit(ping_pong_scene(glossy), limit));
            assert!(color.x > previous.x, "limit {limit}");
            previous = color;
        }
    }

    #[test]
    fn test_exact_tie_shades_later_sphere() {
        let red = Material::new(Color::new(1.0, 0.0, 0.0), Color::ZERO, 1.0);
        let blue = Material::new(Color::new(0.0, 0.0, 1.0), Color::ZERO, 1.0);
        let light = Light::new(Vec3::new(0.0, 0.0, 10.0), Color::ONE);

        let scene = Scene::new(SolidColor(Color::ZERO))
            .with_sphere(Sphere::new(Vec3::ZERO, 1.0, red))
            .with_sphere(Sphere::new(Vec3::ZERO, 1.0, blue))
            .with_light(light);

        let color = trace(&down_the_axis(), &scene);
        assert_eq!(color, Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_alpha_is_always_one() {
        let file = presets::demo();
        let scene = &file.scene;

        for i in -10..=10 {
            for j in -10..=10 {
                let dir = Vec3::new(i as f32 * 0.1, 1.0, j as f32 * 0.1).normalize();
                let ray = Ray::new(Vec3::new(0.0, -9.0, 3.0), dir);
                assert_eq!(trace(&ray, scene).w, 1.0);
            }
        }
    }

    #[test]
    fn test_is_deterministic() {
        let file = presets::mirror_pair();
        let ray = Ray::new(Vec3::new(0.0, -7.0, 1.5), Vec3::new(0.05, 1.0, -0.02).normalize());

        let a = trace(&ray, &file.scene);
        let b = trace(&ray, &file.scene);
        assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
    }

    #[test]
    fn test_scene_can_be_shared_across_threads() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<Scene>();
    }
}
