//! Mirra Core - scene data for the Mirra ray tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Sphere`, `Material`, `Light`
//! - **Environments**: what a ray sees when it leaves the scene
//! - **Scene files**: JSON scene descriptions and built-in presets
//!
//! # Example
//!
//! ```ignore
//! use mirra_core::load_scene;
//!
//! let file = load_scene("scenes/demo.json")?;
//! println!("Loaded {} spheres, {} lights",
//!     file.scene.spheres.len(),
//!     file.scene.lights.len());
//! ```

pub mod config;
pub mod environment;
pub mod presets;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use config::{load_scene, load_scene_from_str, CameraSettings, SceneError, SceneFile, SceneResult};
pub use environment::{CubeMap, Environment, SkyGradient, SolidColor, UpAxis};
pub use scene::{Color, Light, Material, Scene, Sphere, DEFAULT_BOUNCE_LIMIT};
pub use texture::{ColorSpace, Texture, TextureError, TextureResult};
