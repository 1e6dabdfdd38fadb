//! Nearest-intersection record.

use mirra_core::Material;
use mirra_math::Vec3;

/// Where a ray first meets the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    /// Ray parameter of the intersection
    pub t: f32,
    /// Point of intersection
    pub position: Vec3,
    /// Outward unit normal, `normalize(position - center)`
    pub normal: Vec3,
    /// Copy of the struck sphere's material
    pub material: Material,
}
