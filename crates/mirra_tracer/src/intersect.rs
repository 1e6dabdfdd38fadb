//! Ray-sphere intersection against the whole scene.
//!
//! The scene is a short fixed list, so this is a linear scan with no
//! acceleration structure.

use mirra_core::Sphere;
use mirra_math::Ray;

use crate::hit::HitInfo;

/// Starting "best distance" before anything has been hit.
pub const NO_HIT_T: f32 = 1e30;

/// Find the nearest sphere in front of the ray.
///
/// Only the near root of each sphere's quadratic is considered, so a ray
/// starting inside a sphere does not see that sphere at all. Candidates
/// replace the current hit when `0 < t <= best`, which means that for an
/// exact tie the sphere later in `spheres` wins.
pub fn intersect(ray: &Ray, spheres: &[Sphere]) -> Option<HitInfo> {
    let mut best_t = NO_HIT_T;
    let mut hit = None;

    for sphere in spheres {
        let Some(t0) = near_root(ray, sphere) else {
            continue;
        };

        if t0 > 0.0 && t0 <= best_t {
            best_t = t0;
            let position = ray.at(t0);
            hit = Some(HitInfo {
                t: t0,
                position,
                normal: (position - sphere.center).normalize(),
                material: sphere.material,
            });
        }
    }

    hit
}

/// Smaller root of |o + t d - c|^2 = r^2, if the ray's line meets the sphere.
#[inline]
fn near_root(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    Some((-b - discriminant.sqrt()) / (2.0 * a))
}
