//! Scene types for Mirra.
//!
//! A scene is a fixed list of spheres and point lights plus the environment
//! seen by escaping rays. It is built once by the host and only ever read by
//! the tracer, so a single `&Scene` can be shared by every render thread.

use std::fmt;

use mirra_math::Vec3;

use crate::environment::Environment;

/// Color type alias (linear RGB, not clamped)
pub type Color = Vec3;

/// Runtime reflection depth used when a scene does not set one.
pub const DEFAULT_BOUNCE_LIMIT: u32 = 8;

/// Blinn-Phong surface coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse coefficient (k_d)
    pub diffuse: Color,
    /// Specular coefficient (k_s), also the reflection tint
    pub specular: Color,
    /// Specular exponent
    pub shininess: f32,
}

impl Material {
    /// Create a new material.
    pub fn new(diffuse: Color, specular: Color, shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
        }
    }

    /// A perfect mirror: no diffuse response, full specular reflection.
    pub fn mirror() -> Self {
        Self::new(Color::ZERO, Color::ONE, 100.0)
    }

    /// True if reflections off this material carry any energy.
    pub fn is_reflective(&self) -> bool {
        self.specular.element_sum() > 0.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::splat(0.5),
            specular: Color::ZERO,
            shininess: 1.0,
        }
    }
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// The radius is stored as given. Zero or negative radii are not
    /// rejected; they simply produce degenerate intersections.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// A point light. No falloff with distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub intensity: Color,
}

impl Light {
    /// Create a new point light.
    pub fn new(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

/// Everything the tracer reads: geometry, lights, environment and the
/// runtime bounce limit.
pub struct Scene {
    /// Spheres in intersection order (order decides exact-distance ties)
    pub spheres: Vec<Sphere>,
    /// Point lights, shaded in order
    pub lights: Vec<Light>,
    /// Sampled by rays that hit nothing
    pub environment: Box<dyn Environment>,
    /// Runtime cap on reflection bounces
    pub bounce_limit: u32,
}

impl Scene {
    /// Create an empty scene around an environment.
    pub fn new(environment: impl Environment + 'static) -> Self {
        Self {
            spheres: Vec::new(),
            lights: Vec::new(),
            environment: Box::new(environment),
            bounce_limit: DEFAULT_BOUNCE_LIMIT,
        }
    }

    /// Add a sphere after the existing ones.
    pub fn with_sphere(mut self, sphere: Sphere) -> Self {
        self.spheres.push(sphere);
        self
    }

    /// Add a point light.
    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    /// Set the runtime bounce limit.
    pub fn with_bounce_limit(mut self, bounce_limit: u32) -> Self {
        self.bounce_limit = bounce_limit;
        self
    }

    /// Sample the environment along a direction.
    #[inline]
    pub fn sample_environment(&self, direction: Vec3) -> Color {
        self.environment.sample(direction)
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("spheres", &self.spheres)
            .field("lights", &self.lights)
            .field("bounce_limit", &self.bounce_limit)
            .finish_non_exhaustive()
    }
}
