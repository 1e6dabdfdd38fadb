// Re-export glam for convenience
pub use glam::*;

// Mirra math types
mod ray;
pub use ray::Ray;

/// Mirror `v` about the plane with unit normal `n`.
///
/// Same convention as GLSL `reflect`: `v` points towards the surface and the
/// result points away from it.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
