//! Surface materials.

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

/// Surface response parameters, looked up by index from `Scene::materials`.
///
/// Geometry never owns a material; it stores an index into the scene table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Diffuse/albedo color (RGB, 0-1)
    pub albedo: Vec3,

    /// Roughness factor (0=smooth, 1=rough)
    pub roughness: f32,

    /// Metallic factor (0=dielectric, 1=metal)
    pub metallic: f32,

    /// Emissive color, scaled by `emission_power`
    pub emission_color: Vec3,

    /// Emission strength
    pub emission_power: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::ONE,
            roughness: 1.0,
            metallic: 0.0,
            emission_color: Vec3::ZERO,
            emission_power: 0.0,
        }
    }
}

impl Material {
    /// Create a diffuse material with the given albedo.
    pub fn new(albedo: Vec3) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }

    /// Set roughness and metallic factors.
    pub fn with_surface(mut self, roughness: f32, metallic: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Set the emission color and power.
    pub fn with_emission(mut self, color: Vec3, power: f32) -> Self {
        self.emission_color = color;
        self.emission_power = power;
        self
    }

    /// Emitted radiance: color × power.
    #[inline]
    pub fn emission(&self) -> Vec3 {
        self.emission_color * self.emission_power
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emission().length_squared() > 0.0
    }
}
