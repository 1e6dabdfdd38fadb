//! Mirra tracer - the per-sample ray tracing core.
//!
//! Traces one ray against a fixed list of spheres, shades the nearest hit
//! with Blinn-Phong and hard shadows, then follows mirror reflections up to
//! a bounded depth. Rays that leave the scene pick up the environment.
//!
//! Everything here is a pure function of the ray and a shared `&Scene`.
//! The camera and image modules are thin host-side drivers around
//! [`trace`].

mod bucket;
mod camera;
mod hit;
mod intersect;
mod renderer;
mod shade;
mod tracer;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use hit::HitInfo;
pub use intersect::{intersect, NO_HIT_T};
pub use renderer::{color_to_rgba, render, render_pixel, ImageBuffer, RenderConfig};
pub use shade::shade;
pub use tracer::{trace, MAX_BOUNCES};

/// Re-export scene types so users only need this crate
pub use mirra_core::{Color, Environment, Light, Material, Scene, Sphere};
pub use mirra_math::{Ray, Vec3, Vec4};
