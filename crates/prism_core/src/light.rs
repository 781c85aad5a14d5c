//! Point and directional lights.

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

/// Where the light comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LightKind {
    /// Light radiating from a position in the scene
    Point { position: Vec3 },
    /// Light arriving from infinitely far away along `direction` (unit length)
    Directional { direction: Vec3 },
}

/// A light source: a kind plus color and intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    #[serde(flatten)]
    pub kind: LightKind,
    #[serde(default = "default_light_color")]
    pub color: Vec3,
    pub intensity: f32,
}

fn default_light_color() -> Vec3 {
    Vec3::ONE
}

impl Light {
    /// Create a white point light.
    pub fn point(position: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point { position },
            color: Vec3::ONE,
            intensity,
        }
    }

    /// Create a white directional light. The direction is normalized.
    pub fn directional(direction: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional {
                direction: direction.normalize_or_zero(),
            },
            color: Vec3::ONE,
            intensity,
        }
    }

    /// Set the light color.
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Return a copy whose directional vector has unit length.
    ///
    /// Lights read from a scene file go through this before use.
    pub fn normalized(mut self) -> Self {
        if let LightKind::Directional { direction } = &mut self.kind {
            *direction = direction.normalize_or_zero();
        }
        self
    }

    /// Unit direction from `point` toward the light.
    pub fn direction_from(&self, point: Vec3) -> Vec3 {
        match self.kind {
            LightKind::Point { position } => (position - point).normalize_or_zero(),
            LightKind::Directional { direction } => -direction,
        }
    }
}
