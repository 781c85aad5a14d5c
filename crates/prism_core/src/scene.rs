//! Scene container for the path tracer.
//!
//! A [`Scene`] owns every geometry node, material and light by value.
//! Geometry is addressed by its index in [`Scene::geometry`], which is
//! what intersection records carry.

use prism_math::Vec3;
use thiserror::Error;

use crate::geometry::{Geometry, Shape};
use crate::light::Light;
use crate::material::Material;

/// Background colour used when no sky colour is given.
pub const DEFAULT_SKY_COLOR: Vec3 = Vec3::new(0.5, 0.7, 0.9);

/// Problems that make a scene unusable for rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Scene has no materials; at least one is required")]
    NoMaterials,

    #[error("Geometry {geometry} references material {index}, but only {count} materials exist")]
    MaterialOutOfRange { geometry: usize, index: usize, count: usize },
}

/// Result type for scene validation.
pub type SceneResult<T> = Result<T, SceneError>;

/// Flat, read-only-while-rendering collection of everything in view.
#[derive(Debug, Clone)]
pub struct Scene {
    pub geometry: Vec<Geometry>,
    pub materials: Vec<Material>,
    pub lights: Vec<Light>,
    /// Radiance returned by rays that miss all geometry
    pub sky_color: Vec3,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            geometry: Vec::new(),
            materials: Vec::new(),
            lights: Vec::new(),
            sky_color: DEFAULT_SKY_COLOR,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sky_color(mut self, sky_color: Vec3) -> Self {
        self.sky_color = sky_color;
        self
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a geometry node and return its index.
    pub fn add_geometry(&mut self, geometry: impl Into<Geometry>) -> usize {
        self.geometry.push(geometry.into());
        self.geometry.len() - 1
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Check the invariants the renderer relies on: at least one material,
    /// and every material index any node can produce is in range.
    pub fn validate(&self) -> SceneResult<()> {
        self.validate_with(&mut Vec::new())
    }

    /// [`Scene::validate`] collecting indices into a caller-owned buffer,
    /// for callers that validate every frame.
    pub fn validate_with(&self, indices: &mut Vec<usize>) -> SceneResult<()> {
        if self.materials.is_empty() {
            return Err(SceneError::NoMaterials);
        }

        let count = self.materials.len();
        for (geometry, node) in self.geometry.iter().enumerate() {
            indices.clear();
            node.material_indices(indices);
            if let Some(&index) = indices.iter().find(|&&i| i >= count) {
                return Err(SceneError::MaterialOutOfRange { geometry, index, count });
            }
        }

        Ok(())
    }

    /// Material for a geometry node at a surface point.
    ///
    /// Falls back to material 0 for an out-of-range index, which
    /// [`Scene::validate`] rules out.
    pub fn material_at(&self, geometry: usize, point: Vec3) -> &Material {
        let index = self.geometry[geometry].material_index(point);
        self.materials.get(index).unwrap_or(&self.materials[0])
    }
}
