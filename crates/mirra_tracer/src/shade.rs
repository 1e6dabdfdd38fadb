//! Blinn-Phong direct lighting with hard shadows.

use mirra_core::{Color, Material, Scene};
use mirra_math::{Ray, Vec3};

use crate::intersect::intersect;

/// Direct illumination at a surface point.
///
/// `normal` is the outward unit normal and `view` the unit vector from the
/// point towards the viewer. Each light is tested with a shadow ray that
/// starts exactly at `position`; any sphere hit along it, even one beyond
/// the light, drops that light entirely. The result is not clamped.
pub fn shade(scene: &Scene, material: &Material, position: Vec3, normal: Vec3, view: Vec3) -> Color {
    let mut color = Color::ZERO;

    for light in &scene.lights {
        let to_light = (light.position - position).normalize();

        let shadow_ray = Ray::new(position, to_light);
        if intersect(&shadow_ray, &scene.spheres).is_some() {
            continue;
        }

        let cos_theta = normal.dot(to_light);
        let diffuse = material.diffuse * light.intensity * cos_theta.max(0.0);

        let half_dir = (view + to_light).normalize();
        let specular = material.specular
            * light.intensity
            * normal.dot(half_dir).max(0.0).powf(material.shininess);

        color += diffuse + specular;
    }

    color
}
